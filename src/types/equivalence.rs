// src/types/equivalence.rs
//
// Type comparison used by signature reconciliation: structural equality,
// the looser signature-compatibility check (nullability and flexible-bound
// differences are legitimate restatements), and a subtype test for the
// covariant-return rule.

use crate::descriptors::{ClassId, DescriptorArena};
use crate::types::{Classifier, SimpleType, Type, TypeProjection, Variance};
use crate::types::substitution::TypeSubstitution;

/// Structural equality: classifiers, argument projections, and nullability
/// all match. Flexible types compare bound-for-bound; a flexible type never
/// equals a simple one.
pub fn equal_types(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Simple(a), Type::Simple(b)) => equal_simple(a, b),
        (Type::Flexible(a), Type::Flexible(b)) => {
            equal_simple(&a.lower, &b.lower) && equal_simple(&a.upper, &b.upper)
        }
        _ => false,
    }
}

fn equal_simple(a: &SimpleType, b: &SimpleType) -> bool {
    a.classifier == b.classifier
        && a.nullable == b.nullable
        && a.arguments.len() == b.arguments.len()
        && a.arguments
            .iter()
            .zip(b.arguments.iter())
            .all(|(x, y)| match (x, y) {
                (TypeProjection::Star, TypeProjection::Star) => true,
                (TypeProjection::Argument(va, ta), TypeProjection::Argument(vb, tb)) => {
                    va == vb && equal_types(ta, tb)
                }
                _ => false,
            })
}

/// Whether a declared signature type is an acceptable restatement of an
/// inferred one. Nullability marks may differ at any depth, and a flexible
/// original is matched by either of its bounds; everything structural must
/// agree.
pub fn compatible_for_signature(original: &Type, declared: &Type) -> bool {
    match original {
        Type::Simple(simple) => compatible_simple(simple, declared.lower_bound()),
        Type::Flexible(flexible) => {
            compatible_simple(&flexible.lower, declared.lower_bound())
                || compatible_simple(&flexible.upper, declared.lower_bound())
        }
    }
}

fn compatible_simple(original: &SimpleType, declared: &SimpleType) -> bool {
    original.classifier == declared.classifier
        && original.arguments.len() == declared.arguments.len()
        && original
            .arguments
            .iter()
            .zip(declared.arguments.iter())
            .all(|(x, y)| match (x, y) {
                (TypeProjection::Star, TypeProjection::Star) => true,
                (TypeProjection::Argument(va, ta), TypeProjection::Argument(vb, tb)) => {
                    va == vb && compatible_for_signature(ta, tb)
                }
                _ => false,
            })
}

/// Subtype check over declared supertypes. Flexible operands use the
/// standard lenient rule: `sub`'s lower bound against `sup`'s upper bound.
pub fn is_subtype(arena: &DescriptorArena, sub: &Type, sup: &Type) -> bool {
    simple_subtype(arena, sub.lower_bound(), sup.upper_bound())
}

fn simple_subtype(arena: &DescriptorArena, sub: &SimpleType, sup: &SimpleType) -> bool {
    if equal_simple(sub, sup) {
        return true;
    }
    if sub.nullable && !sup.nullable {
        return false;
    }

    let builtins = arena.builtins();

    // Nothing is the bottom type.
    if sub.classifier == Classifier::Class(builtins.nothing) {
        return true;
    }
    // Any is the top type.
    if sup.classifier == Classifier::Class(builtins.any) {
        return true;
    }

    match (sub.classifier, sup.classifier) {
        (Classifier::Parameter(a), Classifier::Parameter(b)) => {
            a == b
                || arena
                    .type_parameter(a)
                    .upper_bounds
                    .iter()
                    .any(|bound| simple_subtype(arena, bound.lower_bound(), sup))
        }
        (Classifier::Parameter(a), Classifier::Class(_)) => arena
            .type_parameter(a)
            .upper_bounds
            .iter()
            .any(|bound| simple_subtype(arena, bound.lower_bound(), sup)),
        (Classifier::Class(a), Classifier::Class(b)) if a == b => {
            arguments_admissible(arena, a, sub, sup)
        }
        (Classifier::Class(a), Classifier::Class(_)) => {
            // Walk declared supertypes, instantiating their arguments with
            // this occurrence's.
            let class = arena.class(a);
            let instantiation = class_instantiation(arena, a, sub);
            class.supertypes.iter().any(|declared| {
                match instantiation.substitute(declared, Variance::Invariant) {
                    Ok(instantiated) => {
                        simple_subtype(arena, instantiated.lower_bound(), sup)
                    }
                    Err(_) => false,
                }
            })
        }
        (Classifier::Class(_), Classifier::Parameter(_)) => false,
    }
}

/// Compare type arguments of two occurrences of the same class, honoring
/// use-site projections and falling back to the declared parameter variance.
fn arguments_admissible(
    arena: &DescriptorArena,
    class: ClassId,
    sub: &SimpleType,
    sup: &SimpleType,
) -> bool {
    if sub.arguments.len() != sup.arguments.len() {
        return false;
    }
    let parameters = &arena.class(class).type_parameters;
    sub.arguments
        .iter()
        .zip(sup.arguments.iter())
        .enumerate()
        .all(|(i, (a, b))| {
            let declared = parameters
                .get(i)
                .map(|&p| arena.type_parameter(p).variance)
                .unwrap_or(Variance::Invariant);
            match (a, b) {
                (_, TypeProjection::Star) => true,
                (TypeProjection::Star, _) => false,
                (TypeProjection::Argument(va, ta), TypeProjection::Argument(vb, tb)) => {
                    let variance = effective_variance(declared, *va, *vb);
                    match variance {
                        Some(Variance::Invariant) => equal_types(ta, tb),
                        Some(Variance::Out) => is_subtype(arena, ta, tb),
                        Some(Variance::In) => is_subtype(arena, tb, ta),
                        None => false,
                    }
                }
            }
        })
}

fn effective_variance(declared: Variance, sub: Variance, sup: Variance) -> Option<Variance> {
    if sub != sup {
        return None;
    }
    Some(match sub {
        Variance::Invariant => declared,
        projected => projected,
    })
}

/// Map a class occurrence's arguments onto its declared parameters, so its
/// supertypes can be instantiated. Star arguments fall back to the
/// parameter's first upper bound (or the default bound).
fn class_instantiation(
    arena: &DescriptorArena,
    class: ClassId,
    occurrence: &SimpleType,
) -> TypeSubstitution {
    let mut substitution = TypeSubstitution::new();
    for (i, &parameter) in arena.class(class).type_parameters.iter().enumerate() {
        let descriptor = arena.type_parameter(parameter);
        let image = match occurrence.arguments.get(i) {
            Some(TypeProjection::Argument(_, ty)) => (**ty).clone(),
            _ => descriptor
                .upper_bounds
                .first()
                .cloned()
                .unwrap_or_else(|| arena.default_bound()),
        };
        substitution.insert(parameter, descriptor.name.clone(), image);
    }
    substitution
}
