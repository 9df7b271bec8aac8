// src/serialization/flags.rs
//
// Packed flag words, one fixed bit layout per declaration kind. Enum codes
// are ordered so that the common defaults (public, final, declared,
// class-kind "class") are all zero: the all-defaults word packs to 0 and is
// omitted from output entirely.

use crate::descriptors::{ClassKind, MemberOrigin, Modality, Visibility};

/// A bit field at a fixed offset inside a flag word.
#[derive(Debug, Clone, Copy)]
pub struct FlagField {
    offset: u32,
    width: u32,
}

impl FlagField {
    pub const fn first(width: u32) -> FlagField {
        FlagField { offset: 0, width }
    }

    pub const fn after(previous: FlagField, width: u32) -> FlagField {
        FlagField {
            offset: previous.offset + previous.width,
            width,
        }
    }

    pub fn pack(self, value: u32) -> u32 {
        debug_assert!(value < (1 << self.width), "flag value out of range");
        value << self.offset
    }

    pub fn unpack(self, flags: u32) -> u32 {
        (flags >> self.offset) & ((1 << self.width) - 1)
    }
}

// Layout shared by every callable and class flag word.
pub const HAS_ANNOTATIONS: FlagField = FlagField::first(1);
pub const VISIBILITY: FlagField = FlagField::after(HAS_ANNOTATIONS, 3);
pub const MODALITY: FlagField = FlagField::after(VISIBILITY, 2);

// Class layout.
pub const CLASS_KIND: FlagField = FlagField::after(MODALITY, 3);
pub const IS_INNER: FlagField = FlagField::after(CLASS_KIND, 1);

// Callable member layout.
pub const MEMBER_ORIGIN: FlagField = FlagField::after(MODALITY, 1);

// Function layout.
pub const IS_OPERATOR: FlagField = FlagField::after(MEMBER_ORIGIN, 1);
pub const IS_INFIX: FlagField = FlagField::after(IS_OPERATOR, 1);

// Property layout.
pub const IS_VAR: FlagField = FlagField::after(MEMBER_ORIGIN, 1);
pub const HAS_GETTER: FlagField = FlagField::after(IS_VAR, 1);
pub const HAS_SETTER: FlagField = FlagField::after(HAS_GETTER, 1);
pub const HAS_CONSTANT: FlagField = FlagField::after(HAS_SETTER, 1);
pub const IS_CONST: FlagField = FlagField::after(HAS_CONSTANT, 1);
pub const IS_LATE_INIT: FlagField = FlagField::after(IS_CONST, 1);

// Constructor layout.
pub const IS_SECONDARY: FlagField = FlagField::after(VISIBILITY, 1);

// Value parameter layout.
pub const DECLARES_DEFAULT_VALUE: FlagField = FlagField::after(HAS_ANNOTATIONS, 1);

// Accessor layout.
pub const IS_NOT_DEFAULT: FlagField = FlagField::after(MODALITY, 1);

pub fn visibility_code(visibility: Visibility) -> u32 {
    match visibility {
        Visibility::Public => 0,
        Visibility::Internal => 1,
        Visibility::Protected => 2,
        Visibility::Private => 3,
    }
}

pub fn modality_code(modality: Modality) -> u32 {
    match modality {
        Modality::Final => 0,
        Modality::Open => 1,
        Modality::Abstract => 2,
        Modality::Sealed => 3,
    }
}

pub fn class_kind_code(kind: ClassKind) -> u32 {
    match kind {
        ClassKind::Class => 0,
        ClassKind::Interface => 1,
        ClassKind::EnumClass => 2,
        ClassKind::EnumEntry => 3,
        ClassKind::AnnotationClass => 4,
        ClassKind::Object => 5,
        ClassKind::CompanionObject => 6,
    }
}

pub fn member_origin_code(origin: MemberOrigin) -> u32 {
    match origin {
        MemberOrigin::Declared => 0,
        MemberOrigin::SyntheticOverride => 1,
    }
}

fn bool_code(value: bool) -> u32 {
    u32::from(value)
}

pub fn class_flags(
    has_annotations: bool,
    visibility: Visibility,
    modality: Modality,
    kind: ClassKind,
    is_inner: bool,
) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | VISIBILITY.pack(visibility_code(visibility))
        | MODALITY.pack(modality_code(modality))
        | CLASS_KIND.pack(class_kind_code(kind))
        | IS_INNER.pack(bool_code(is_inner))
}

pub fn function_flags(
    has_annotations: bool,
    visibility: Visibility,
    modality: Modality,
    origin: MemberOrigin,
    is_operator: bool,
    is_infix: bool,
) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | VISIBILITY.pack(visibility_code(visibility))
        | MODALITY.pack(modality_code(modality))
        | MEMBER_ORIGIN.pack(member_origin_code(origin))
        | IS_OPERATOR.pack(bool_code(is_operator))
        | IS_INFIX.pack(bool_code(is_infix))
}

#[allow(clippy::too_many_arguments)]
pub fn property_flags(
    has_annotations: bool,
    visibility: Visibility,
    modality: Modality,
    origin: MemberOrigin,
    is_var: bool,
    has_getter: bool,
    has_setter: bool,
    has_constant: bool,
    is_const: bool,
    is_late_init: bool,
) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | VISIBILITY.pack(visibility_code(visibility))
        | MODALITY.pack(modality_code(modality))
        | MEMBER_ORIGIN.pack(member_origin_code(origin))
        | IS_VAR.pack(bool_code(is_var))
        | HAS_GETTER.pack(bool_code(has_getter))
        | HAS_SETTER.pack(bool_code(has_setter))
        | HAS_CONSTANT.pack(bool_code(has_constant))
        | IS_CONST.pack(bool_code(is_const))
        | IS_LATE_INIT.pack(bool_code(is_late_init))
}

pub fn constructor_flags(has_annotations: bool, visibility: Visibility, is_secondary: bool) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | VISIBILITY.pack(visibility_code(visibility))
        | IS_SECONDARY.pack(bool_code(is_secondary))
}

pub fn value_parameter_flags(has_annotations: bool, declares_default_value: bool) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | DECLARES_DEFAULT_VALUE.pack(bool_code(declares_default_value))
}

/// Accessor flag words reuse the common layout plus a "has a body of its
/// own" bit; they are serialized only when they diverge from the property's
/// defaults.
pub fn accessor_flags(
    has_annotations: bool,
    visibility: Visibility,
    modality: Modality,
    is_not_default: bool,
) -> u32 {
    HAS_ANNOTATIONS.pack(bool_code(has_annotations))
        | VISIBILITY.pack(visibility_code(visibility))
        | MODALITY.pack(modality_code(modality))
        | IS_NOT_DEFAULT.pack(bool_code(is_not_default))
}
