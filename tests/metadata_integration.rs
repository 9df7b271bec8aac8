// tests/metadata_integration.rs
//! End-to-end tests over the serializer and the signature reconciler:
//! whole-unit byte determinism, member-order stability under input
//! permutation, prefix-stable type-parameter ids, and reconciliation
//! feeding back into serialization.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use marten_metadata::descriptors::{
    ClassDescriptor, ClassId, ClassKind, ConstructorDescriptor, DescriptorArena,
    FunctionDescriptor, FunctionId, MemberId, Modality, PropertyDescriptor,
    TypeParameterDescriptor, ValueParameterDescriptor, Visibility,
};
use marten_metadata::serialization::{DescriptorSerializer, PlainExtension};
use marten_metadata::signature::{ReconcileMode, reconcile_function};
use marten_metadata::types::{SimpleType, Type, TypeProjection, Variance};

use smallvec::SmallVec;

/// A library-sized fixture: `shelf.Shelf<T>` with a nested `Slot`, several
/// overloaded members, a constructor, and an enum with entries.
struct Fixture {
    arena: DescriptorArena,
    shelf: ClassId,
    slot: ClassId,
    status: ClassId,
    text: ClassId,
}

fn fixture() -> Fixture {
    let mut arena = DescriptorArena::new();
    let any = arena.builtins().any;
    let any_ty = Type::class(any, Vec::new());

    let text = arena.alloc_class(ClassDescriptor {
        supertypes: vec![any_ty.clone()],
        ..ClassDescriptor::new("String", "text", ClassKind::Class)
    });
    let text_ty = Type::class(text, Vec::new());

    let default_bound = arena.default_bound();
    let element = arena.alloc_type_parameter(TypeParameterDescriptor {
        name: "T".to_string(),
        index: 0,
        reified: false,
        variance: Variance::Invariant,
        upper_bounds: SmallVec::from_vec(vec![default_bound]),
    });

    let shelf = arena.alloc_class(ClassDescriptor {
        modality: Modality::Open,
        type_parameters: vec![element],
        supertypes: vec![any_ty.clone()],
        ..ClassDescriptor::new("Shelf", "shelf", ClassKind::Class)
    });

    let slot = arena.alloc_class(ClassDescriptor {
        container: Some(shelf),
        supertypes: vec![any_ty.clone()],
        ..ClassDescriptor::new("Slot", "", ClassKind::Class)
    });
    arena.class_mut(shelf).nested_classes.push(slot);

    let status = arena.alloc_class(ClassDescriptor {
        container: Some(shelf),
        supertypes: vec![any_ty.clone()],
        ..ClassDescriptor::new("Status", "", ClassKind::EnumClass)
    });
    for entry in ["Empty", "Full"] {
        let id = arena.alloc_class(ClassDescriptor {
            container: Some(status),
            supertypes: vec![Type::class(status, Vec::new())],
            ..ClassDescriptor::new(entry, "", ClassKind::EnumEntry)
        });
        arena.class_mut(status).nested_classes.push(id);
    }
    arena.class_mut(shelf).nested_classes.push(status);

    let get = arena.alloc_function(FunctionDescriptor {
        container: Some(shelf),
        value_parameters: vec![ValueParameterDescriptor::new("index", any_ty.clone())],
        ..FunctionDescriptor::new("get", Type::parameter(element))
    });
    let get_by_name = arena.alloc_function(FunctionDescriptor {
        container: Some(shelf),
        value_parameters: vec![ValueParameterDescriptor::new("name", text_ty.clone())],
        ..FunctionDescriptor::new("get", Type::parameter(element).nullable())
    });
    let clear = arena.alloc_function(FunctionDescriptor {
        container: Some(shelf),
        visibility: Visibility::Internal,
        ..FunctionDescriptor::new("clear", any_ty.clone())
    });
    let label = arena.alloc_property(PropertyDescriptor {
        container: Some(shelf),
        ..PropertyDescriptor::new("label", text_ty.clone())
    });
    arena.class_mut(shelf).members.extend([
        MemberId::Function(get),
        MemberId::Function(get_by_name),
        MemberId::Function(clear),
        MemberId::Property(label),
    ]);

    let ctor = arena.alloc_constructor(ConstructorDescriptor {
        container: shelf,
        visibility: Visibility::Public,
        has_annotations: false,
        is_secondary: false,
        value_parameters: vec![ValueParameterDescriptor::new("capacity", any_ty)],
    });
    arena.class_mut(shelf).constructors.push(ctor);

    Fixture {
        arena,
        shelf,
        slot,
        status,
        text,
    }
}

fn encode_class(arena: &DescriptorArena, class: ClassId) -> Vec<u8> {
    let mut extension = PlainExtension::new();
    let mut serializer = DescriptorSerializer::for_class(arena, class, &mut extension);
    let message = serializer.class_message(class);
    serializer.serialize(&message).unwrap()
}

#[test]
fn whole_unit_encoding_is_deterministic() {
    let fixture = fixture();
    let first = encode_class(&fixture.arena, fixture.shelf);
    let second = encode_class(&fixture.arena, fixture.shelf);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn member_iteration_order_never_perturbs_bytes() {
    let fixture = fixture();
    let baseline = encode_class(&fixture.arena, fixture.shelf);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let mut arena = fixture.arena.clone();
        arena.class_mut(fixture.shelf).members.shuffle(&mut rng);
        arena.class_mut(fixture.shelf).nested_classes.shuffle(&mut rng);

        let bytes = encode_class(&arena, fixture.shelf);
        assert_eq!(bytes, baseline);
    }
}

#[test]
fn nested_class_encoding_reuses_outer_parameter_ids() {
    let fixture = fixture();

    // Encoding the outer class assigns its parameter id 0.
    let mut outer_extension = PlainExtension::new();
    let mut outer =
        DescriptorSerializer::for_class(&fixture.arena, fixture.shelf, &mut outer_extension);
    let outer_message = outer.class_message(fixture.shelf);
    assert_eq!(outer_message.type_parameters[0].id, 0);

    // Encoding the nested class independently interns the containment
    // chain first, so a reference to the outer parameter agrees.
    let element = fixture.arena.class(fixture.shelf).type_parameters[0];
    let mut inner_extension = PlainExtension::new();
    let mut inner =
        DescriptorSerializer::for_class(&fixture.arena, fixture.slot, &mut inner_extension);
    let reference = inner.type_message(&Type::parameter(element));
    assert_eq!(reference.type_parameter, Some(0));
}

#[test]
fn enum_entries_are_split_from_plain_nested_classes() {
    let fixture = fixture();
    let mut extension = PlainExtension::new();
    let mut serializer =
        DescriptorSerializer::for_class(&fixture.arena, fixture.status, &mut extension);
    let message = serializer.class_message(fixture.status);
    assert_eq!(message.enum_entry_names.len(), 2);
    assert!(message.nested_class_names.is_empty());
}

#[test]
fn accepted_reconciliation_changes_the_serialized_member() {
    let mut fixture = fixture();
    let text_ty = Type::class(fixture.text, Vec::new());

    // The host-inferred signature is flexible in nullability.
    let lower = match text_ty.clone() {
        Type::Simple(simple) => simple,
        _ => unreachable!(),
    };
    let upper = SimpleType {
        nullable: true,
        ..lower.clone()
    };
    let platform_text = Type::flexible(lower, upper, "host.platform");

    let inferred = fixture.arena.alloc_function(FunctionDescriptor {
        value_parameters: vec![ValueParameterDescriptor::new("p0", platform_text.clone())],
        ..FunctionDescriptor::new("describe", platform_text)
    });
    let before = encode_function(&fixture.arena, inferred);

    let result = reconcile_function(
        &mut fixture.arena,
        inferred,
        "fun describe(item: String): String?",
        ReconcileMode::Declaration,
    );
    assert!(result.is_authoritative());

    let reconciled = fixture.arena.alloc_function(FunctionDescriptor {
        type_parameters: result.type_parameters,
        value_parameters: result.value_parameters,
        return_type: result.return_type,
        ..FunctionDescriptor::new("describe", text_ty)
    });
    let after = encode_function(&fixture.arena, reconciled);

    // The flexible annotation disappears and the parameter is renamed.
    assert_ne!(before, after);
}

#[test]
fn rejected_reconciliation_leaves_the_serialized_member_untouched() {
    let mut fixture = fixture();
    let text_ty = Type::class(fixture.text, Vec::new());
    let inferred = fixture.arena.alloc_function(FunctionDescriptor {
        value_parameters: vec![
            ValueParameterDescriptor::new("p0", text_ty.clone()),
            ValueParameterDescriptor::new("p1", text_ty.clone()),
        ],
        ..FunctionDescriptor::new("join", text_ty.clone())
    });
    let before = encode_function(&fixture.arena, inferred);

    let result = reconcile_function(
        &mut fixture.arena,
        inferred,
        "fun join(only: String): String",
        ReconcileMode::Declaration,
    );
    assert!(!result.is_authoritative());

    // The fallback reproduces the inferred signature byte for byte.
    let fallback = fixture.arena.alloc_function(FunctionDescriptor {
        type_parameters: result.type_parameters,
        value_parameters: result.value_parameters,
        return_type: result.return_type,
        ..FunctionDescriptor::new("join", text_ty)
    });
    let after = encode_function(&fixture.arena, fallback);
    assert_eq!(before, after);
}

#[test]
fn vararg_round_trip_through_reconciliation_and_serialization() {
    let mut fixture = fixture();
    let text_ty = Type::class(fixture.text, Vec::new());
    let carrier = fixture.arena.array_of(text_ty.clone());
    let inferred = fixture.arena.alloc_function(FunctionDescriptor {
        value_parameters: vec![ValueParameterDescriptor {
            vararg_element_type: Some(text_ty.clone()),
            ..ValueParameterDescriptor::new("p0", carrier)
        }],
        ..FunctionDescriptor::new("printAll", text_ty.clone())
    });

    let result = reconcile_function(
        &mut fixture.arena,
        inferred,
        "fun printAll(vararg lines: String): String",
        ReconcileMode::Declaration,
    );
    assert!(result.is_authoritative());

    let reconciled = fixture.arena.alloc_function(FunctionDescriptor {
        value_parameters: result.value_parameters,
        return_type: result.return_type,
        ..FunctionDescriptor::new("printAll", text_ty)
    });

    let mut extension = PlainExtension::new();
    let mut serializer = DescriptorSerializer::top_level(&fixture.arena, &mut extension);
    let message = serializer.function_message(reconciled);
    let parameter = &message.value_parameters[0];
    assert!(parameter.ty.is_some());
    assert!(parameter.vararg_element_type.is_some());
}

#[test]
fn star_projections_and_variance_survive_encoding() {
    let fixture = fixture();
    let element = fixture.arena.class(fixture.shelf).type_parameters[0];
    let ty = Type::class(
        fixture.shelf,
        vec![TypeProjection::Argument(
            Variance::Out,
            Box::new(Type::parameter(element)),
        )],
    );
    let star = Type::class(fixture.shelf, vec![TypeProjection::Star]);

    let mut extension = PlainExtension::new();
    let mut serializer =
        DescriptorSerializer::for_class(&fixture.arena, fixture.shelf, &mut extension);
    let message = serializer.type_message(&ty);
    let star_message = serializer.type_message(&star);

    assert_eq!(message.arguments.len(), 1);
    assert!(message.arguments[0].ty.is_some());
    assert!(star_message.arguments[0].ty.is_none());
}

fn encode_function(arena: &DescriptorArena, function: FunctionId) -> Vec<u8> {
    let mut extension = PlainExtension::new();
    let mut serializer = DescriptorSerializer::top_level(arena, &mut extension);
    let message = serializer.function_message(function);
    serializer.serialize(&message).unwrap()
}
