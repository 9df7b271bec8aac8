// src/serialization/serializer.rs
//
// Walks a descriptor graph and produces the message tree for one persisted
// unit. The descriptor graph is acyclic by declaration nesting (types may
// reference type parameters but never recurse through a cycle back to the
// same class), so plain structural recursion needs no cycle guard.
//
// Type parameters get dense ids per top-level lineage. A serializer for a
// nested class interns its containment chain outward-in first, so ids for
// an enclosing class's parameters agree no matter which class of the chain
// is serialized first. A child scope created for a single declaration
// overlays the parent's assignments: outer ids are visible, new ids stay
// private to the declaration and are never observed by siblings.

use std::io::Write;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::descriptors::{
    ClassId, ClassKind, ConstructorId, DescriptorArena, FunctionId, MemberId, MemberOrigin,
    PackageFragment, PropertyId, TypeParameterId, ValueParameterDescriptor,
};
use crate::errors::SerializeError;
use crate::serialization::extension::SerializerExtension;
use crate::serialization::model::{
    ClassMessage, ConstructorMessage, FunctionMessage, PackageMessage, ProjectionCode,
    PropertyMessage, TypeArgumentMessage, TypeMessage, TypeParameterMessage,
    ValueParameterMessage,
};
use crate::serialization::wire::Encode;
use crate::serialization::{flags, order};
use crate::types::{Classifier, SimpleType, Type, TypeProjection, Variance};

/// Layered type-parameter interner. A child layer sees everything its
/// parents assigned and appends only to itself; ids are dense across the
/// whole lineage.
#[derive(Debug, Default)]
struct TypeParameterScope<'p> {
    parent: Option<&'p TypeParameterScope<'p>>,
    assigned: FxHashMap<TypeParameterId, u32>,
    next_id: u32,
}

impl<'p> TypeParameterScope<'p> {
    fn root() -> Self {
        Self::default()
    }

    fn child(&self) -> TypeParameterScope<'_> {
        TypeParameterScope {
            parent: Some(self),
            assigned: FxHashMap::default(),
            next_id: self.next_id,
        }
    }

    fn lookup(&self, parameter: TypeParameterId) -> Option<u32> {
        self.assigned
            .get(&parameter)
            .copied()
            .or_else(|| self.parent.and_then(|parent| parent.lookup(parameter)))
    }

    fn intern(&mut self, parameter: TypeParameterId) -> u32 {
        if let Some(existing) = self.lookup(parameter) {
            return existing;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.assigned.insert(parameter, id);
        id
    }
}

fn projection_code(variance: Variance) -> ProjectionCode {
    match variance {
        Variance::Invariant => ProjectionCode::Invariant,
        Variance::In => ProjectionCode::In,
        Variance::Out => ProjectionCode::Out,
    }
}

pub struct DescriptorSerializer<'a, E: SerializerExtension> {
    arena: &'a DescriptorArena,
    type_parameters: TypeParameterScope<'a>,
    extension: &'a mut E,
}

impl<'a, E: SerializerExtension> DescriptorSerializer<'a, E> {
    /// Serializer for top-level members and package fragments.
    pub fn top_level(arena: &'a DescriptorArena, extension: &'a mut E) -> Self {
        Self {
            arena,
            type_parameters: TypeParameterScope::root(),
            extension,
        }
    }

    /// Serializer for one class. Interns the type parameters of the whole
    /// containment chain, outermost class first, so that the ids this
    /// serializer assigns agree with those assigned when any enclosing
    /// class is serialized on its own.
    pub fn for_class(arena: &'a DescriptorArena, class: ClassId, extension: &'a mut E) -> Self {
        let mut serializer = Self::top_level(arena, extension);
        serializer.intern_containment_chain(class);
        serializer
    }

    fn intern_containment_chain(&mut self, class: ClassId) {
        let arena = self.arena;
        let mut chain = vec![class];
        let mut cursor = class;
        while let Some(outer) = arena.class(cursor).container {
            chain.push(outer);
            cursor = outer;
        }
        for &link in chain.iter().rev() {
            for &parameter in &arena.class(link).type_parameters {
                self.type_parameters.intern(parameter);
            }
        }
    }

    /// Child serializer for one declaration's scope: same string table,
    /// overlaid type-parameter ids.
    fn child(&mut self) -> DescriptorSerializer<'_, E> {
        let DescriptorSerializer {
            arena,
            type_parameters,
            extension,
        } = self;
        DescriptorSerializer {
            arena: *arena,
            type_parameters: type_parameters.child(),
            extension: &mut **extension,
        }
    }

    pub fn class_message(&mut self, id: ClassId) -> ClassMessage {
        let arena = self.arena;
        let class = arena.class(id);
        trace!(class = %arena.fq_name(id), "serializing class metadata");

        let mut message = ClassMessage::default();

        let class_flags = flags::class_flags(
            class.has_annotations,
            class.visibility,
            class.modality,
            class.kind,
            class.is_inner,
        );
        if class_flags != 0 {
            message.flags = Some(class_flags);
        }

        message.fq_name = self.extension.string_table().class_name_index(arena, id);

        for &parameter in &class.type_parameters {
            let parameter_message = self.type_parameter_message(parameter);
            message.type_parameters.push(parameter_message);
        }

        // The two root classes are the only ones with no supertypes at all;
        // everything else encodes its full supertype list.
        if !arena.is_root_class(id) {
            for supertype in &class.supertypes {
                let supertype_message = self.type_message(supertype);
                message.supertypes.push(supertype_message);
            }
        }

        for &constructor in &class.constructors {
            let constructor_message = self.constructor_message(constructor);
            message.constructors.push(constructor_message);
        }

        let mut members = class.members.clone();
        order::sort_members(arena, &mut members);
        for member in members {
            // Structural copies introduced for override compatibility are
            // not user code and are never serialized.
            if arena.member_origin(member) == MemberOrigin::SyntheticOverride {
                continue;
            }
            match member {
                MemberId::Property(property) => {
                    let property_message = self.property_message(property);
                    message.properties.push(property_message);
                }
                MemberId::Function(function) => {
                    let function_message = self.function_message(function);
                    message.functions.push(function_message);
                }
            }
        }

        let mut nested = class.nested_classes.clone();
        order::sort_classes(arena, &mut nested);
        for nested_id in nested {
            let name = self
                .extension
                .string_table()
                .string_index(&arena.class(nested_id).name);
            if arena.class(nested_id).kind == ClassKind::EnumEntry {
                message.enum_entry_names.push(name);
            } else {
                message.nested_class_names.push(name);
            }
        }

        if let Some(companion) = class.companion_object {
            message.companion_object_name = Some(
                self.extension
                    .string_table()
                    .string_index(&arena.class(companion).name),
            );
        }

        self.extension.extend_class(arena, class, &mut message);
        message
    }

    pub fn function_message(&mut self, id: FunctionId) -> FunctionMessage {
        let arena = self.arena;
        let function = arena.function(id);
        let mut local = self.child();

        let mut message = FunctionMessage::default();

        let function_flags = flags::function_flags(
            function.has_annotations,
            function.visibility,
            function.modality,
            function.origin,
            function.is_operator,
            function.is_infix,
        );
        if function_flags != 0 {
            message.flags = Some(function_flags);
        }

        message.name = local.extension.string_table().string_index(&function.name);

        if let Some(return_type) = &function.return_type {
            message.return_type = Some(local.type_message(return_type));
        }
        for &parameter in &function.type_parameters {
            let parameter_message = local.type_parameter_message(parameter);
            message.type_parameters.push(parameter_message);
        }
        if let Some(receiver) = &function.receiver_type {
            message.receiver_type = Some(local.type_message(receiver));
        }
        for parameter in &function.value_parameters {
            let parameter_message = local.value_parameter_message(parameter);
            message.value_parameters.push(parameter_message);
        }

        drop(local);
        self.extension.extend_function(arena, function, &mut message);
        message
    }

    pub fn property_message(&mut self, id: PropertyId) -> PropertyMessage {
        let arena = self.arena;
        let property = arena.property(id);
        let mut local = self.child();

        let mut message = PropertyMessage::default();

        // Accessor flags are recorded only when they diverge from what the
        // property itself implies.
        let default_accessor_flags = flags::accessor_flags(
            property.has_annotations,
            property.visibility,
            property.modality,
            false,
        );

        let mut has_getter = false;
        let mut has_setter = false;

        if let Some(getter) = &property.getter {
            has_getter = true;
            let getter_flags = flags::accessor_flags(
                getter.has_annotations,
                getter.visibility,
                getter.modality,
                !getter.is_default,
            );
            if getter_flags != default_accessor_flags {
                message.getter_flags = Some(getter_flags);
            }
        }

        if let Some(setter) = &property.setter {
            has_setter = true;
            let setter_flags = flags::accessor_flags(
                setter.has_annotations,
                setter.visibility,
                setter.modality,
                !setter.is_default,
            );
            if setter_flags != default_accessor_flags {
                message.setter_flags = Some(setter_flags);
            }
            if !setter.is_default
                && let Some(parameter) = &setter.value_parameter
            {
                message.setter_value_parameter = Some(local.value_parameter_message(parameter));
            }
        }

        let property_flags = flags::property_flags(
            property.has_annotations,
            property.visibility,
            property.modality,
            property.origin,
            property.is_var,
            has_getter,
            has_setter,
            property.has_constant,
            property.is_const,
            property.is_late_init,
        );
        if property_flags != 0 {
            message.flags = Some(property_flags);
        }

        message.name = local.extension.string_table().string_index(&property.name);
        message.return_type = Some(local.type_message(&property.return_type));

        for &parameter in &property.type_parameters {
            let parameter_message = local.type_parameter_message(parameter);
            message.type_parameters.push(parameter_message);
        }
        if let Some(receiver) = &property.receiver_type {
            message.receiver_type = Some(local.type_message(receiver));
        }

        drop(local);
        self.extension.extend_property(arena, property, &mut message);
        message
    }

    pub fn constructor_message(&mut self, id: ConstructorId) -> ConstructorMessage {
        let arena = self.arena;
        let constructor = arena.constructor(id);
        let mut local = self.child();

        let mut message = ConstructorMessage::default();

        let constructor_flags = flags::constructor_flags(
            constructor.has_annotations,
            constructor.visibility,
            constructor.is_secondary,
        );
        if constructor_flags != 0 {
            message.flags = Some(constructor_flags);
        }

        for parameter in &constructor.value_parameters {
            let parameter_message = local.value_parameter_message(parameter);
            message.value_parameters.push(parameter_message);
        }

        drop(local);
        self.extension
            .extend_constructor(arena, constructor, &mut message);
        message
    }

    pub fn value_parameter_message(
        &mut self,
        parameter: &ValueParameterDescriptor,
    ) -> ValueParameterMessage {
        let arena = self.arena;
        let mut message = ValueParameterMessage::default();

        let parameter_flags = flags::value_parameter_flags(
            parameter.has_annotations,
            parameter.declares_default_value,
        );
        if parameter_flags != 0 {
            message.flags = Some(parameter_flags);
        }

        message.name = self.extension.string_table().string_index(&parameter.name);
        message.ty = Some(self.type_message(&parameter.ty));
        if let Some(element) = &parameter.vararg_element_type {
            message.vararg_element_type = Some(self.type_message(element));
        }

        self.extension
            .extend_value_parameter(arena, parameter, &mut message);
        message
    }

    pub fn type_parameter_message(&mut self, id: TypeParameterId) -> TypeParameterMessage {
        let arena = self.arena;
        let parameter = arena.type_parameter(id);
        let mut message = TypeParameterMessage {
            id: self.type_parameters.intern(id),
            name: self.extension.string_table().string_index(&parameter.name),
            reified: parameter.reified,
            variance: projection_code(parameter.variance),
            upper_bounds: Vec::new(),
        };

        // The implicit default bound is elided entirely.
        if parameter.upper_bounds.len() == 1 && arena.is_default_bound(&parameter.upper_bounds[0]) {
            return message;
        }
        for bound in &parameter.upper_bounds {
            let bound_message = self.type_message(bound);
            message.upper_bounds.push(bound_message);
        }
        message
    }

    /// A flexible type encodes as its lower bound annotated with the upper
    /// bound and a capability-set string index, not as a distinct message
    /// kind: a reader unaware of flexibility still sees a valid type.
    pub fn type_message(&mut self, ty: &Type) -> TypeMessage {
        let arena = self.arena;
        let mut message = match ty {
            Type::Simple(simple) => self.simple_type_message(simple),
            Type::Flexible(flexible) => {
                let mut lower = self.simple_type_message(&flexible.lower);
                lower.flexible_capabilities_id = Some(
                    self.extension
                        .string_table()
                        .string_index(&flexible.capabilities),
                );
                let upper = Type::Simple(flexible.upper.clone());
                lower.flexible_upper_bound = Some(Box::new(self.type_message(&upper)));
                lower
            }
        };
        self.extension.extend_type(arena, ty, &mut message);
        message
    }

    fn simple_type_message(&mut self, simple: &SimpleType) -> TypeMessage {
        let arena = self.arena;
        let mut message = TypeMessage::default();

        match simple.classifier {
            Classifier::Class(class) => {
                message.class_name =
                    Some(self.extension.string_table().class_name_index(arena, class));
            }
            Classifier::Parameter(parameter) => {
                message.type_parameter = Some(self.type_parameters.intern(parameter));
            }
        }

        for argument in &simple.arguments {
            let argument_message = match argument {
                TypeProjection::Star => TypeArgumentMessage::star(),
                TypeProjection::Argument(variance, inner) => TypeArgumentMessage {
                    projection: projection_code(*variance),
                    ty: Some(Box::new(self.type_message(inner))),
                },
            };
            message.arguments.push(argument_message);
        }

        message.nullable = simple.nullable;
        message
    }

    /// Merge package fragments, sort the members, and encode them. The skip
    /// predicate excludes members already serialized elsewhere (for example
    /// as part of a facade).
    pub fn package_message(
        &mut self,
        fragments: &[PackageFragment],
        skip: Option<&dyn Fn(MemberId) -> bool>,
    ) -> PackageMessage {
        let arena = self.arena;
        let mut members: Vec<MemberId> = fragments
            .iter()
            .flat_map(|fragment| fragment.members.iter().copied())
            .collect();
        order::sort_members(arena, &mut members);

        let mut message = PackageMessage::default();
        for member in members {
            if let Some(skip) = skip
                && skip(member)
            {
                continue;
            }
            match member {
                MemberId::Property(property) => {
                    let property_message = self.property_message(property);
                    message.properties.push(property_message);
                }
                MemberId::Function(function) => {
                    let function_message = self.function_message(function);
                    message.functions.push(function_message);
                }
            }
        }

        self.extension.extend_package(arena, fragments, &mut message);
        message
    }

    /// Emit one persisted unit: the lineage's string table followed by the
    /// message bytes. A write failure is fatal for the unit and propagated
    /// untouched; partial encodes are not resumable.
    pub fn serialize_to(
        &mut self,
        message: &impl Encode,
        out: &mut dyn Write,
    ) -> Result<(), SerializeError> {
        let bytes = message.to_bytes();
        debug!(message_bytes = bytes.len(), "flushing serialized metadata");
        self.extension.string_table().write_to(out)?;
        out.write_all(&bytes)?;
        Ok(())
    }

    pub fn serialize(&mut self, message: &impl Encode) -> Result<Vec<u8>, SerializeError> {
        let mut out = Vec::new();
        self.serialize_to(message, &mut out)?;
        Ok(out)
    }
}
