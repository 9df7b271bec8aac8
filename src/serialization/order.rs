// src/serialization/order.rs
//
// Deterministic member ordering. The exact comparator matters: re-encoding
// the same semantic graph must never perturb byte layout, no matter how the
// upstream member collection happened to iterate, and name-colliding
// overloads must get a stable relative order. Properties sort before
// functions; ties break on name, then arity, then a rendered signature.

use std::cmp::Ordering;

use crate::descriptors::{ClassId, DescriptorArena, MemberId};

fn member_kind_rank(member: MemberId) -> u8 {
    match member {
        MemberId::Property(_) => 0,
        MemberId::Function(_) => 1,
    }
}

/// Full structural disambiguator for overloads: receiver, parameter types,
/// and vararg markers, rendered with qualified class names.
fn member_signature(arena: &DescriptorArena, member: MemberId) -> String {
    match member {
        MemberId::Property(id) => {
            let property = arena.property(id);
            match &property.receiver_type {
                Some(receiver) => format!("{}.", receiver.render(arena)),
                None => String::new(),
            }
        }
        MemberId::Function(id) => {
            let function = arena.function(id);
            let mut out = String::new();
            if let Some(receiver) = &function.receiver_type {
                out.push_str(&receiver.render(arena));
                out.push('.');
            }
            out.push('(');
            for (i, parameter) in function.value_parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if parameter.vararg_element_type.is_some() {
                    out.push_str("vararg ");
                }
                out.push_str(&parameter.ty.render(arena));
            }
            out.push(')');
            out
        }
    }
}

fn member_arity(arena: &DescriptorArena, member: MemberId) -> usize {
    match member {
        MemberId::Property(_) => 0,
        MemberId::Function(id) => arena.function(id).value_parameters.len(),
    }
}

pub fn compare_members(arena: &DescriptorArena, a: MemberId, b: MemberId) -> Ordering {
    member_kind_rank(a)
        .cmp(&member_kind_rank(b))
        .then_with(|| arena.member_name(a).cmp(arena.member_name(b)))
        .then_with(|| member_arity(arena, a).cmp(&member_arity(arena, b)))
        .then_with(|| member_signature(arena, a).cmp(&member_signature(arena, b)))
}

pub fn sort_members(arena: &DescriptorArena, members: &mut [MemberId]) {
    members.sort_by(|&a, &b| compare_members(arena, a, b));
}

/// Nested classes (including enum entries) order by simple name.
pub fn sort_classes(arena: &DescriptorArena, classes: &mut [ClassId]) {
    classes.sort_by(|&a, &b| arena.class(a).name.cmp(&arena.class(b).name));
}
