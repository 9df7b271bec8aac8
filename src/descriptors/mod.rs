// src/descriptors/mod.rs
//
// The declaration descriptor model: resolved, typed representations of
// program declarations, produced by upstream resolution and read-only for
// the rest of this crate. Descriptors live in a `DescriptorArena` and refer
// to each other through dense ids, never through owned pointers, so the
// containment graph may be walked in any order.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::types::{Type, TypeProjection, Variance};

/// Identifies a class descriptor in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) u32);

/// Identifies a function descriptor in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub(crate) u32);

/// Identifies a property descriptor in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub(crate) u32);

/// Identifies a constructor descriptor in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorId(pub(crate) u32);

/// Identifies a type parameter descriptor in the arena.
///
/// Type-parameter identity is id identity: two occurrences of `T` in the
/// same declaration share one id, and a shadow `T` built by the signature
/// reconciler gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeParameterId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl TypeParameterId {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Object,
    CompanionObject,
}

/// How a callable member came to exist in its scope. Synthetic overrides are
/// structural copies introduced only to satisfy override compatibility; they
/// are never written by the user and never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    Declared,
    SyntheticOverride,
}

/// A member of a class scope or package fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberId {
    Function(FunctionId),
    Property(PropertyId),
}

#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: String,
    /// Package path for top-level classes; nested classes derive their
    /// qualified name from the containment chain instead.
    pub package: String,
    pub container: Option<ClassId>,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modality: Modality,
    pub has_annotations: bool,
    pub is_inner: bool,
    pub companion_object: Option<ClassId>,
    pub type_parameters: Vec<TypeParameterId>,
    pub supertypes: Vec<Type>,
    pub constructors: Vec<ConstructorId>,
    pub members: Vec<MemberId>,
    pub nested_classes: Vec<ClassId>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, package: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            container: None,
            kind,
            visibility: Visibility::Public,
            modality: Modality::Final,
            has_annotations: false,
            is_inner: false,
            companion_object: None,
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            members: Vec::new(),
            nested_classes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeParameterDescriptor {
    pub name: String,
    /// Position in the owning declaration's parameter list.
    pub index: u32,
    pub reified: bool,
    pub variance: Variance,
    pub upper_bounds: SmallVec<[Type; 1]>,
}

#[derive(Debug, Clone)]
pub struct ValueParameterDescriptor {
    pub name: String,
    pub ty: Type,
    pub vararg_element_type: Option<Type>,
    pub declares_default_value: bool,
    pub has_annotations: bool,
}

impl ValueParameterDescriptor {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            vararg_element_type: None,
            declares_default_value: false,
            has_annotations: false,
        }
    }

    /// The type reconciliation compares against: the element type for a
    /// vararg parameter, the declared type otherwise.
    pub fn effective_type(&self) -> &Type {
        self.vararg_element_type.as_ref().unwrap_or(&self.ty)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub container: Option<ClassId>,
    pub visibility: Visibility,
    pub modality: Modality,
    pub origin: MemberOrigin,
    pub has_annotations: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub type_parameters: Vec<TypeParameterId>,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub return_type: Option<Type>,
    pub receiver_type: Option<Type>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            container: None,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: MemberOrigin::Declared,
            has_annotations: false,
            is_operator: false,
            is_infix: false,
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            return_type: Some(return_type),
            receiver_type: None,
        }
    }
}

/// Getter or setter attached to a property. Accessor flags are serialized
/// only when they diverge from the property-level defaults.
#[derive(Debug, Clone)]
pub struct AccessorDescriptor {
    pub visibility: Visibility,
    pub modality: Modality,
    pub has_annotations: bool,
    /// A default accessor is the compiler-generated one with no body.
    pub is_default: bool,
    /// Setter-only: the explicit value parameter of a non-default setter.
    pub value_parameter: Option<ValueParameterDescriptor>,
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub container: Option<ClassId>,
    pub visibility: Visibility,
    pub modality: Modality,
    pub origin: MemberOrigin,
    pub has_annotations: bool,
    pub is_var: bool,
    pub is_const: bool,
    pub is_late_init: bool,
    pub has_constant: bool,
    pub getter: Option<AccessorDescriptor>,
    pub setter: Option<AccessorDescriptor>,
    pub type_parameters: Vec<TypeParameterId>,
    pub return_type: Type,
    pub receiver_type: Option<Type>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            container: None,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: MemberOrigin::Declared,
            has_annotations: false,
            is_var: false,
            is_const: false,
            is_late_init: false,
            has_constant: false,
            getter: None,
            setter: None,
            type_parameters: Vec::new(),
            return_type,
            receiver_type: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorDescriptor {
    pub container: ClassId,
    pub visibility: Visibility,
    pub has_annotations: bool,
    pub is_secondary: bool,
    pub value_parameters: Vec<ValueParameterDescriptor>,
}

/// A slice of a package's member scope, as produced by one source file.
#[derive(Debug, Clone, Default)]
pub struct PackageFragment {
    pub members: Vec<MemberId>,
}

/// The built-in classes the serializer and reconciler consult: the two root
/// classes with no supertypes, and the array class vararg parameters desugar
/// to.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub any: ClassId,
    pub nothing: ClassId,
    pub array: ClassId,
    pub array_element: TypeParameterId,
}

#[derive(Debug, Clone)]
pub struct DescriptorArena {
    classes: Vec<ClassDescriptor>,
    functions: Vec<FunctionDescriptor>,
    properties: Vec<PropertyDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    type_parameters: Vec<TypeParameterDescriptor>,
    builtins: Option<Builtins>,
}

impl Default for DescriptorArena {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorArena {
    /// Create an arena with the `core` builtins registered.
    pub fn new() -> Self {
        let mut arena = Self {
            classes: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            type_parameters: Vec::new(),
            builtins: None,
        };

        let any = arena.alloc_class(ClassDescriptor {
            modality: Modality::Open,
            ..ClassDescriptor::new("Any", "core", ClassKind::Class)
        });
        let nothing = arena.alloc_class(ClassDescriptor::new("Nothing", "core", ClassKind::Class));

        let element = arena.alloc_type_parameter(TypeParameterDescriptor {
            name: "T".to_string(),
            index: 0,
            reified: false,
            variance: Variance::Out,
            upper_bounds: SmallVec::new(),
        });
        let array = arena.alloc_class(ClassDescriptor {
            type_parameters: vec![element],
            supertypes: vec![Type::class(any, Vec::new())],
            ..ClassDescriptor::new("Array", "core", ClassKind::Class)
        });

        arena.builtins = Some(Builtins {
            any,
            nothing,
            array,
            array_element: element,
        });
        // Any? is the implicit default bound.
        arena.type_parameters[element.0 as usize].upper_bounds =
            SmallVec::from_vec(vec![Type::class(any, Vec::new()).nullable()]);
        arena
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins.expect("arena constructed without builtins")
    }

    pub fn alloc_class(&mut self, descriptor: ClassDescriptor) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(descriptor);
        id
    }

    pub fn alloc_function(&mut self, descriptor: FunctionDescriptor) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(descriptor);
        id
    }

    pub fn alloc_property(&mut self, descriptor: PropertyDescriptor) -> PropertyId {
        let id = PropertyId(self.properties.len() as u32);
        self.properties.push(descriptor);
        id
    }

    pub fn alloc_constructor(&mut self, descriptor: ConstructorDescriptor) -> ConstructorId {
        let id = ConstructorId(self.constructors.len() as u32);
        self.constructors.push(descriptor);
        id
    }

    pub fn alloc_type_parameter(&mut self, descriptor: TypeParameterDescriptor) -> TypeParameterId {
        let id = TypeParameterId(self.type_parameters.len() as u32);
        self.type_parameters.push(descriptor);
        id
    }

    /// Fill in a type parameter's bounds after its identity exists. The
    /// reconciler registers all identities in a parameter list before any
    /// bound is resolved, so self-referential bounds never recurse.
    pub fn set_upper_bounds(&mut self, id: TypeParameterId, bounds: Vec<Type>) {
        self.type_parameters[id.0 as usize].upper_bounds = SmallVec::from_vec(bounds);
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDescriptor {
        &mut self.classes[id.0 as usize]
    }

    pub fn class(&self, id: ClassId) -> &ClassDescriptor {
        &self.classes[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDescriptor {
        &self.functions[id.0 as usize]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDescriptor {
        &self.properties[id.0 as usize]
    }

    pub fn constructor(&self, id: ConstructorId) -> &ConstructorDescriptor {
        &self.constructors[id.0 as usize]
    }

    pub fn type_parameter(&self, id: TypeParameterId) -> &TypeParameterDescriptor {
        &self.type_parameters[id.0 as usize]
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDescriptor)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId(i as u32), c))
    }

    pub fn member_name(&self, member: MemberId) -> &str {
        match member {
            MemberId::Function(id) => &self.function(id).name,
            MemberId::Property(id) => &self.property(id).name,
        }
    }

    pub fn member_origin(&self, member: MemberId) -> MemberOrigin {
        match member {
            MemberId::Function(id) => self.function(id).origin,
            MemberId::Property(id) => self.property(id).origin,
        }
    }

    /// Fully qualified dotted name, derived from the containment chain.
    pub fn fq_name(&self, id: ClassId) -> String {
        let class = self.class(id);
        match class.container {
            Some(outer) => format!("{}.{}", self.fq_name(outer), class.name),
            None if class.package.is_empty() => class.name.clone(),
            None => format!("{}.{}", class.package, class.name),
        }
    }

    /// The two root classes are the only ones encoded with an empty
    /// supertype list.
    pub fn is_root_class(&self, id: ClassId) -> bool {
        let builtins = self.builtins();
        id == builtins.any || id == builtins.nothing
    }

    /// The implicit unconstrained bound, `core.Any?`.
    pub fn default_bound(&self) -> Type {
        Type::class(self.builtins().any, Vec::new()).nullable()
    }

    pub fn is_default_bound(&self, ty: &Type) -> bool {
        match ty.as_simple() {
            Some(simple) => {
                simple.nullable
                    && simple.arguments.is_empty()
                    && simple.classifier == crate::types::Classifier::Class(self.builtins().any)
            }
            None => false,
        }
    }

    /// The array type a vararg parameter of the given element type carries.
    pub fn array_of(&self, element: Type) -> Type {
        Type::class(
            self.builtins().array,
            vec![TypeProjection::Argument(Variance::Out, Box::new(element))],
        )
    }

    /// Lookup table from class names (both qualified and simple) to ids,
    /// used when resolving signature annotation text. On a simple-name
    /// collision the first registered class wins; annotation text can always
    /// disambiguate with the qualified name.
    pub fn class_name_lookup(&self) -> FxHashMap<String, ClassId> {
        let mut lookup = FxHashMap::default();
        for (id, class) in self.classes() {
            lookup.insert(self.fq_name(id), id);
            lookup.entry(class.name.clone()).or_insert(id);
        }
        lookup
    }
}
