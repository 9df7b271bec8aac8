// src/serialization/model.rs
//
// The message tree. Every message mirrors one descriptor kind; `Option` and
// empty-`Vec` fields realize the omit-if-default rule uniformly. Fields are
// written in ascending field-number order, repeated fields in element
// order, and extension fields (appended by the platform hook) last.
//
// Field numbers below 100 belong to the core format; the extension hook
// appends raw fields numbered 100 and up.

use crate::serialization::wire::{
    self, Encode, put_bool_field, put_message_field, put_varint_field,
};

/// Variance / projection code on the wire. Invariant is the omitted
/// default; `Star` only occurs in argument projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionCode {
    Invariant = 0,
    In = 1,
    Out = 2,
    Star = 3,
}

/// A field appended by the serializer extension, opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub field: u32,
    pub value: RawValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Varint(u64),
    Bytes(Vec<u8>),
}

fn put_raw_fields(out: &mut Vec<u8>, fields: &[RawField]) {
    for raw in fields {
        debug_assert!(raw.field >= EXTENSION_FIELD_BASE);
        match &raw.value {
            RawValue::Varint(value) => put_varint_field(out, raw.field, *value),
            RawValue::Bytes(bytes) => wire::put_bytes_field(out, raw.field, bytes),
        }
    }
}

pub const EXTENSION_FIELD_BASE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeArgumentMessage {
    pub projection: ProjectionCode,
    pub ty: Option<Box<TypeMessage>>,
}

impl Default for ProjectionCode {
    fn default() -> Self {
        ProjectionCode::Invariant
    }
}

impl TypeArgumentMessage {
    const PROJECTION: u32 = 1;
    const TYPE: u32 = 2;

    pub fn star() -> Self {
        Self {
            projection: ProjectionCode::Star,
            ty: None,
        }
    }
}

impl Encode for TypeArgumentMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if self.projection != ProjectionCode::Invariant {
            put_varint_field(out, Self::PROJECTION, self.projection as u64);
        }
        if let Some(ty) = &self.ty {
            put_message_field(out, Self::TYPE, ty.as_ref());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMessage {
    /// String-table index of the class's qualified name. Mutually exclusive
    /// with `type_parameter`.
    pub class_name: Option<u32>,
    /// Interned type-parameter id within the serialization lineage.
    pub type_parameter: Option<u32>,
    pub arguments: Vec<TypeArgumentMessage>,
    pub nullable: bool,
    /// Present only on the encoding of a flexible type's lower bound. A
    /// reader unaware of flexibility still sees a valid lower-bound type.
    pub flexible_capabilities_id: Option<u32>,
    pub flexible_upper_bound: Option<Box<TypeMessage>>,
    pub extensions: Vec<RawField>,
}

impl TypeMessage {
    const CLASS_NAME: u32 = 1;
    const TYPE_PARAMETER: u32 = 2;
    const ARGUMENT: u32 = 3;
    const NULLABLE: u32 = 4;
    const FLEXIBLE_CAPABILITIES_ID: u32 = 5;
    const FLEXIBLE_UPPER_BOUND: u32 = 6;
}

impl Encode for TypeMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(index) = self.class_name {
            put_varint_field(out, Self::CLASS_NAME, u64::from(index));
        }
        if let Some(id) = self.type_parameter {
            put_varint_field(out, Self::TYPE_PARAMETER, u64::from(id));
        }
        for argument in &self.arguments {
            put_message_field(out, Self::ARGUMENT, argument);
        }
        put_bool_field(out, Self::NULLABLE, self.nullable);
        if let Some(index) = self.flexible_capabilities_id {
            put_varint_field(out, Self::FLEXIBLE_CAPABILITIES_ID, u64::from(index));
        }
        if let Some(upper) = &self.flexible_upper_bound {
            put_message_field(out, Self::FLEXIBLE_UPPER_BOUND, upper.as_ref());
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeParameterMessage {
    pub id: u32,
    pub name: u32,
    pub reified: bool,
    pub variance: ProjectionCode,
    pub upper_bounds: Vec<TypeMessage>,
}

impl TypeParameterMessage {
    const ID: u32 = 1;
    const NAME: u32 = 2;
    const REIFIED: u32 = 3;
    const VARIANCE: u32 = 4;
    const UPPER_BOUND: u32 = 5;
}

impl Encode for TypeParameterMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        put_varint_field(out, Self::ID, u64::from(self.id));
        put_varint_field(out, Self::NAME, u64::from(self.name));
        put_bool_field(out, Self::REIFIED, self.reified);
        if self.variance != ProjectionCode::Invariant {
            put_varint_field(out, Self::VARIANCE, self.variance as u64);
        }
        for bound in &self.upper_bounds {
            put_message_field(out, Self::UPPER_BOUND, bound);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueParameterMessage {
    pub flags: Option<u32>,
    pub name: u32,
    pub ty: Option<TypeMessage>,
    pub vararg_element_type: Option<TypeMessage>,
    pub extensions: Vec<RawField>,
}

impl ValueParameterMessage {
    const FLAGS: u32 = 1;
    const NAME: u32 = 2;
    const TYPE: u32 = 3;
    const VARARG_ELEMENT_TYPE: u32 = 4;
}

impl Encode for ValueParameterMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(flags) = self.flags {
            put_varint_field(out, Self::FLAGS, u64::from(flags));
        }
        put_varint_field(out, Self::NAME, u64::from(self.name));
        if let Some(ty) = &self.ty {
            put_message_field(out, Self::TYPE, ty);
        }
        if let Some(element) = &self.vararg_element_type {
            put_message_field(out, Self::VARARG_ELEMENT_TYPE, element);
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMessage {
    pub flags: Option<u32>,
    pub name: u32,
    pub return_type: Option<TypeMessage>,
    pub type_parameters: Vec<TypeParameterMessage>,
    pub receiver_type: Option<TypeMessage>,
    pub value_parameters: Vec<ValueParameterMessage>,
    pub extensions: Vec<RawField>,
}

impl FunctionMessage {
    const FLAGS: u32 = 1;
    const NAME: u32 = 2;
    const RETURN_TYPE: u32 = 3;
    const TYPE_PARAMETER: u32 = 4;
    const RECEIVER_TYPE: u32 = 5;
    const VALUE_PARAMETER: u32 = 6;
}

impl Encode for FunctionMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(flags) = self.flags {
            put_varint_field(out, Self::FLAGS, u64::from(flags));
        }
        put_varint_field(out, Self::NAME, u64::from(self.name));
        if let Some(return_type) = &self.return_type {
            put_message_field(out, Self::RETURN_TYPE, return_type);
        }
        for parameter in &self.type_parameters {
            put_message_field(out, Self::TYPE_PARAMETER, parameter);
        }
        if let Some(receiver) = &self.receiver_type {
            put_message_field(out, Self::RECEIVER_TYPE, receiver);
        }
        for parameter in &self.value_parameters {
            put_message_field(out, Self::VALUE_PARAMETER, parameter);
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMessage {
    pub flags: Option<u32>,
    pub name: u32,
    pub return_type: Option<TypeMessage>,
    pub type_parameters: Vec<TypeParameterMessage>,
    pub receiver_type: Option<TypeMessage>,
    pub setter_value_parameter: Option<ValueParameterMessage>,
    /// Present only when the accessor's flags diverge from the
    /// property-level defaults.
    pub getter_flags: Option<u32>,
    pub setter_flags: Option<u32>,
    pub extensions: Vec<RawField>,
}

impl PropertyMessage {
    const FLAGS: u32 = 1;
    const NAME: u32 = 2;
    const RETURN_TYPE: u32 = 3;
    const TYPE_PARAMETER: u32 = 4;
    const RECEIVER_TYPE: u32 = 5;
    const SETTER_VALUE_PARAMETER: u32 = 6;
    const GETTER_FLAGS: u32 = 7;
    const SETTER_FLAGS: u32 = 8;
}

impl Encode for PropertyMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(flags) = self.flags {
            put_varint_field(out, Self::FLAGS, u64::from(flags));
        }
        put_varint_field(out, Self::NAME, u64::from(self.name));
        if let Some(return_type) = &self.return_type {
            put_message_field(out, Self::RETURN_TYPE, return_type);
        }
        for parameter in &self.type_parameters {
            put_message_field(out, Self::TYPE_PARAMETER, parameter);
        }
        if let Some(receiver) = &self.receiver_type {
            put_message_field(out, Self::RECEIVER_TYPE, receiver);
        }
        if let Some(parameter) = &self.setter_value_parameter {
            put_message_field(out, Self::SETTER_VALUE_PARAMETER, parameter);
        }
        if let Some(flags) = self.getter_flags {
            put_varint_field(out, Self::GETTER_FLAGS, u64::from(flags));
        }
        if let Some(flags) = self.setter_flags {
            put_varint_field(out, Self::SETTER_FLAGS, u64::from(flags));
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorMessage {
    pub flags: Option<u32>,
    pub value_parameters: Vec<ValueParameterMessage>,
    pub extensions: Vec<RawField>,
}

impl ConstructorMessage {
    const FLAGS: u32 = 1;
    const VALUE_PARAMETER: u32 = 2;
}

impl Encode for ConstructorMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(flags) = self.flags {
            put_varint_field(out, Self::FLAGS, u64::from(flags));
        }
        for parameter in &self.value_parameters {
            put_message_field(out, Self::VALUE_PARAMETER, parameter);
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMessage {
    pub flags: Option<u32>,
    /// String-table index of the fully qualified name. Always present.
    pub fq_name: u32,
    pub type_parameters: Vec<TypeParameterMessage>,
    pub supertypes: Vec<TypeMessage>,
    pub constructors: Vec<ConstructorMessage>,
    pub functions: Vec<FunctionMessage>,
    pub properties: Vec<PropertyMessage>,
    pub nested_class_names: Vec<u32>,
    pub enum_entry_names: Vec<u32>,
    pub companion_object_name: Option<u32>,
    pub extensions: Vec<RawField>,
}

impl ClassMessage {
    const FLAGS: u32 = 1;
    const FQ_NAME: u32 = 2;
    const TYPE_PARAMETER: u32 = 3;
    const SUPERTYPE: u32 = 4;
    const CONSTRUCTOR: u32 = 5;
    const FUNCTION: u32 = 6;
    const PROPERTY: u32 = 7;
    const NESTED_CLASS_NAME: u32 = 8;
    const ENUM_ENTRY_NAME: u32 = 9;
    const COMPANION_OBJECT_NAME: u32 = 10;
}

impl Encode for ClassMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        if let Some(flags) = self.flags {
            put_varint_field(out, Self::FLAGS, u64::from(flags));
        }
        put_varint_field(out, Self::FQ_NAME, u64::from(self.fq_name));
        for parameter in &self.type_parameters {
            put_message_field(out, Self::TYPE_PARAMETER, parameter);
        }
        for supertype in &self.supertypes {
            put_message_field(out, Self::SUPERTYPE, supertype);
        }
        for constructor in &self.constructors {
            put_message_field(out, Self::CONSTRUCTOR, constructor);
        }
        for function in &self.functions {
            put_message_field(out, Self::FUNCTION, function);
        }
        for property in &self.properties {
            put_message_field(out, Self::PROPERTY, property);
        }
        for &name in &self.nested_class_names {
            put_varint_field(out, Self::NESTED_CLASS_NAME, u64::from(name));
        }
        for &name in &self.enum_entry_names {
            put_varint_field(out, Self::ENUM_ENTRY_NAME, u64::from(name));
        }
        if let Some(name) = self.companion_object_name {
            put_varint_field(out, Self::COMPANION_OBJECT_NAME, u64::from(name));
        }
        put_raw_fields(out, &self.extensions);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMessage {
    pub functions: Vec<FunctionMessage>,
    pub properties: Vec<PropertyMessage>,
    pub extensions: Vec<RawField>,
}

impl PackageMessage {
    const FUNCTION: u32 = 1;
    const PROPERTY: u32 = 2;
}

impl Encode for PackageMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        for function in &self.functions {
            put_message_field(out, Self::FUNCTION, function);
        }
        for property in &self.properties {
            put_message_field(out, Self::PROPERTY, property);
        }
        put_raw_fields(out, &self.extensions);
    }
}
