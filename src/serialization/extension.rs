// src/serialization/extension.rs
//
// The platform-specific seam. The core engine serializes one way; a
// platform layer appends the fields only it knows about (interop annotation
// data and the like) through this narrow capability interface, and supplies
// the string table the whole lineage shares. Injected once per top-level
// encode session.

use crate::descriptors::{
    ClassDescriptor, ConstructorDescriptor, DescriptorArena, FunctionDescriptor,
    PackageFragment, PropertyDescriptor, ValueParameterDescriptor,
};
use crate::serialization::model::{
    ClassMessage, ConstructorMessage, FunctionMessage, PackageMessage, PropertyMessage,
    TypeMessage, ValueParameterMessage,
};
use crate::serialization::strings::{SimpleStringTable, StringTable};
use crate::types::Type;

#[allow(unused_variables)]
pub trait SerializerExtension {
    fn string_table(&mut self) -> &mut dyn StringTable;

    fn extend_class(
        &mut self,
        arena: &DescriptorArena,
        class: &ClassDescriptor,
        message: &mut ClassMessage,
    ) {
    }

    fn extend_function(
        &mut self,
        arena: &DescriptorArena,
        function: &FunctionDescriptor,
        message: &mut FunctionMessage,
    ) {
    }

    fn extend_property(
        &mut self,
        arena: &DescriptorArena,
        property: &PropertyDescriptor,
        message: &mut PropertyMessage,
    ) {
    }

    fn extend_constructor(
        &mut self,
        arena: &DescriptorArena,
        constructor: &ConstructorDescriptor,
        message: &mut ConstructorMessage,
    ) {
    }

    fn extend_value_parameter(
        &mut self,
        arena: &DescriptorArena,
        parameter: &ValueParameterDescriptor,
        message: &mut ValueParameterMessage,
    ) {
    }

    fn extend_type(&mut self, arena: &DescriptorArena, ty: &Type, message: &mut TypeMessage) {}

    fn extend_package(
        &mut self,
        arena: &DescriptorArena,
        fragments: &[PackageFragment],
        message: &mut PackageMessage,
    ) {
    }
}

/// Extension that appends nothing and owns a plain string table. The
/// default for platforms without extra metadata, and for tests.
#[derive(Debug, Default)]
pub struct PlainExtension {
    strings: SimpleStringTable,
}

impl PlainExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strings(&self) -> &SimpleStringTable {
        &self.strings
    }
}

impl SerializerExtension for PlainExtension {
    fn string_table(&mut self) -> &mut dyn StringTable {
        &mut self.strings
    }
}
