// src/signature/reconcile.rs
//
// Reconciliation of an inferred callable signature with developer-authored
// alternative signature text. The checks run in a fixed order and fail fast:
// parse, name, type-parameter arity and bounds, value parameters, return
// type, then the extra override-compatibility checks. Each check is a
// Result-returning step; the public entry catches the first mismatch and
// falls back to the inferred signature with the error attached, so a bad
// annotation never aborts compilation.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::descriptors::{
    DescriptorArena, FunctionDescriptor, FunctionId, TypeParameterDescriptor, TypeParameterId,
    ValueParameterDescriptor,
};
use crate::errors::SignatureMismatch;
use crate::signature::ast::SignatureAst;
use crate::signature::parse::parse_signature;
use crate::signature::resolve::TypeResolver;
use crate::types::equivalence::{compatible_for_signature, equal_types, is_subtype};
use crate::types::substitution::{SubstitutionError, TypeSubstitution};
use crate::types::{Type, Variance};

/// Whether the callable is known to override a supertype member. Override
/// mode adds the invariant-parameter, invariant-bound, and covariant-return
/// checks on top of the plain compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    Declaration,
    Override,
}

/// The signature a callable carries after reconciliation. On success this
/// is the shadow-derived signature (renamed parameters, resolved types) and
/// `error` is `None`; on failure it is the original inferred signature with
/// the first mismatch attached for later reporting.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub type_parameters: Vec<TypeParameterId>,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub return_type: Option<Type>,
    pub error: Option<SignatureMismatch>,
}

impl Reconciliation {
    /// True when the alternative signature was accepted and is now the
    /// authoritative one.
    pub fn is_authoritative(&self) -> bool {
        self.error.is_none()
    }
}

pub fn reconcile_function(
    arena: &mut DescriptorArena,
    original: FunctionId,
    text: &str,
    mode: ReconcileMode,
) -> Reconciliation {
    let function = arena.function(original).clone();
    debug!(function = %function.name, ?mode, "reconciling alternative signature");

    match try_reconcile(arena, &function, text, mode) {
        Ok(reconciliation) => reconciliation,
        Err(error) => {
            debug!(function = %function.name, %error, "alternative signature rejected");
            Reconciliation {
                type_parameters: function.type_parameters,
                value_parameters: function.value_parameters,
                return_type: function.return_type,
                error: Some(error),
            }
        }
    }
}

fn try_reconcile(
    arena: &mut DescriptorArena,
    original: &FunctionDescriptor,
    text: &str,
    mode: ReconcileMode,
) -> Result<Reconciliation, SignatureMismatch> {
    let shadow = parse_signature(text)?;

    if shadow.name != original.name {
        return Err(SignatureMismatch::NameMismatch {
            original: original.name.clone(),
            alternative: shadow.name,
        });
    }

    if shadow.type_parameters.len() != original.type_parameters.len() {
        return Err(SignatureMismatch::TypeParameterArity {
            original: original.type_parameters.len(),
            alternative: shadow.type_parameters.len(),
        });
    }

    // Phase one: register shadow type-parameter identities before any bound
    // is resolved, so self- and cross-referential bounds resolve to the
    // fresh parameters.
    let shadow_parameters = allocate_shadow_parameters(arena, original, &shadow);
    let substitution = identity_substitution(arena, original, &shadow_parameters);
    let outer_parameters = enclosing_parameters(arena, original);

    // Phase two: resolve every type reference in the shadow against the
    // arena plus the visible parameter names.
    let (bounds, parameter_types, declared_return) = {
        let mut resolver = TypeResolver::new(arena);
        for &parameter in &outer_parameters {
            resolver.add_parameter(arena.type_parameter(parameter).name.clone(), parameter);
        }
        for (index, parameter_ast) in shadow.type_parameters.iter().enumerate() {
            resolver.add_parameter(parameter_ast.name.clone(), shadow_parameters[index]);
        }

        let mut bounds = Vec::with_capacity(shadow.type_parameters.len());
        for parameter_ast in &shadow.type_parameters {
            let mut resolved = Vec::with_capacity(parameter_ast.bounds.len());
            for bound in &parameter_ast.bounds {
                resolved.push(resolver.resolve(bound)?);
            }
            bounds.push(resolved);
        }

        let mut parameter_types = Vec::with_capacity(shadow.value_parameters.len());
        for parameter_ast in &shadow.value_parameters {
            parameter_types.push(resolver.resolve(&parameter_ast.ty)?);
        }

        let declared_return = match &shadow.return_type {
            Some(ast) => Some(resolver.resolve(ast)?),
            None => None,
        };
        (bounds, parameter_types, declared_return)
    };

    for (index, resolved) in bounds.iter().enumerate() {
        let parameter_bounds = if resolved.is_empty() {
            vec![arena.default_bound()]
        } else {
            resolved.clone()
        };
        arena.set_upper_bounds(shadow_parameters[index], parameter_bounds);
    }

    check_upper_bounds(arena, original, &shadow, &bounds, &substitution)?;
    let value_parameters =
        check_value_parameters(arena, original, &shadow, &parameter_types, &substitution)?;
    let return_type = check_return_type(arena, original, &declared_return, &substitution, mode)?;

    if mode == ReconcileMode::Override {
        check_override_compatibility(
            arena,
            original,
            &shadow,
            &bounds,
            &parameter_types,
            &return_type,
            &substitution,
        )?;
    }

    trace!(
        function = %original.name,
        parameters = value_parameters.len(),
        "alternative signature accepted"
    );
    Ok(Reconciliation {
        type_parameters: shadow_parameters,
        value_parameters,
        return_type,
        error: None,
    })
}

fn allocate_shadow_parameters(
    arena: &mut DescriptorArena,
    original: &FunctionDescriptor,
    shadow: &SignatureAst,
) -> Vec<TypeParameterId> {
    let mut shadow_parameters = Vec::with_capacity(shadow.type_parameters.len());
    for (index, parameter_ast) in shadow.type_parameters.iter().enumerate() {
        let (reified, variance) = {
            let original_parameter = arena.type_parameter(original.type_parameters[index]);
            (original_parameter.reified, original_parameter.variance)
        };
        shadow_parameters.push(arena.alloc_type_parameter(TypeParameterDescriptor {
            name: parameter_ast.name.clone(),
            index: index as u32,
            reified,
            variance,
            upper_bounds: SmallVec::new(),
        }));
    }
    shadow_parameters
}

/// Total map over every parameter reachable from the original signature:
/// the function's own parameters map to their shadow counterparts, the
/// enclosing declaration chain's parameters map to themselves.
fn identity_substitution(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
    shadow_parameters: &[TypeParameterId],
) -> TypeSubstitution {
    let mut substitution = TypeSubstitution::new();
    for (index, &original_id) in original.type_parameters.iter().enumerate() {
        let name = arena.type_parameter(original_id).name.clone();
        substitution.insert(original_id, name, Type::parameter(shadow_parameters[index]));
    }
    for &parameter in &enclosing_parameters(arena, original) {
        let name = arena.type_parameter(parameter).name.clone();
        substitution.insert(parameter, name, Type::parameter(parameter));
    }
    substitution
}

fn enclosing_parameters(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
) -> Vec<TypeParameterId> {
    let mut parameters = Vec::new();
    let mut container = original.container;
    while let Some(class) = container {
        parameters.extend(arena.class(class).type_parameters.iter().copied());
        container = arena.class(class).container;
    }
    parameters
}

fn check_upper_bounds(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
    shadow: &SignatureAst,
    bounds: &[Vec<Type>],
    substitution: &TypeSubstitution,
) -> Result<(), SignatureMismatch> {
    for (index, &original_id) in original.type_parameters.iter().enumerate() {
        let declared = &bounds[index];
        let original_bounds = &arena.type_parameter(original_id).upper_bounds;
        let parameter = &shadow.type_parameters[index].name;

        if declared.is_empty() {
            // Zero declared bounds stand in for exactly the implicit
            // default bound, nothing else.
            if original_bounds.len() == 1 && arena.is_default_bound(&original_bounds[0]) {
                continue;
            }
            return Err(SignatureMismatch::UpperBoundArity {
                parameter: parameter.clone(),
                original: original_bounds.len(),
                alternative: 0,
            });
        }
        if declared.len() != original_bounds.len() {
            return Err(SignatureMismatch::UpperBoundArity {
                parameter: parameter.clone(),
                original: original_bounds.len(),
                alternative: declared.len(),
            });
        }

        // Bounds are matched by enumeration order, not as a set.
        for (bound_index, declared_bound) in declared.iter().enumerate() {
            let substituted = substitute(substitution, &original_bounds[bound_index])?;
            if !compatible_for_signature(&substituted, declared_bound) {
                return Err(SignatureMismatch::UpperBoundMismatch {
                    parameter: parameter.clone(),
                    original: substituted.render(arena),
                    alternative: declared_bound.render(arena),
                });
            }
        }
    }
    Ok(())
}

fn check_value_parameters(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
    shadow: &SignatureAst,
    parameter_types: &[Type],
    substitution: &TypeSubstitution,
) -> Result<Vec<ValueParameterDescriptor>, SignatureMismatch> {
    if shadow.value_parameters.len() != original.value_parameters.len() {
        return Err(SignatureMismatch::ValueParameterArity {
            original: original.value_parameters.len(),
            alternative: shadow.value_parameters.len(),
        });
    }

    let mut value_parameters = Vec::with_capacity(shadow.value_parameters.len());
    for (index, parameter_ast) in shadow.value_parameters.iter().enumerate() {
        let original_parameter = &original.value_parameters[index];
        let original_is_vararg = original_parameter.vararg_element_type.is_some();
        if original_is_vararg != parameter_ast.is_vararg {
            return Err(SignatureMismatch::VarargMismatch {
                parameter: parameter_ast.name.clone(),
                original_is_vararg,
            });
        }

        let substituted = substitute(substitution, original_parameter.effective_type())?;
        let declared = &parameter_types[index];
        if !compatible_for_signature(&substituted, declared) {
            return Err(SignatureMismatch::ParameterTypeMismatch {
                parameter: parameter_ast.name.clone(),
                original: substituted.render(arena),
                alternative: declared.render(arena),
            });
        }

        // The shadow's name becomes the display name; a vararg parameter's
        // carrier type is rebuilt around the declared element type.
        let descriptor = if parameter_ast.is_vararg {
            ValueParameterDescriptor {
                name: parameter_ast.name.clone(),
                ty: arena.array_of(declared.clone()),
                vararg_element_type: Some(declared.clone()),
                declares_default_value: original_parameter.declares_default_value,
                has_annotations: original_parameter.has_annotations,
            }
        } else {
            ValueParameterDescriptor {
                name: parameter_ast.name.clone(),
                ty: declared.clone(),
                vararg_element_type: None,
                declares_default_value: original_parameter.declares_default_value,
                has_annotations: original_parameter.has_annotations,
            }
        };
        value_parameters.push(descriptor);
    }
    Ok(value_parameters)
}

fn check_return_type(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
    declared_return: &Option<Type>,
    substitution: &TypeSubstitution,
    mode: ReconcileMode,
) -> Result<Option<Type>, SignatureMismatch> {
    match (&original.return_type, declared_return) {
        // In override mode the return type is checked for covariance
        // instead, so the plain comparison is skipped here.
        (Some(_), Some(declared)) if mode == ReconcileMode::Override => Ok(Some(declared.clone())),
        (Some(original_return), Some(declared)) => {
            let substituted = substitute(substitution, original_return)?;
            if !compatible_for_signature(&substituted, declared) {
                return Err(SignatureMismatch::ReturnTypeMismatch {
                    original: substituted.render(arena),
                    alternative: declared.render(arena),
                });
            }
            Ok(Some(declared.clone()))
        }
        // An omitted return annotation adopts the substituted original.
        (Some(original_return), None) => Ok(Some(substitute(substitution, original_return)?)),
        (None, declared) => Ok(declared.clone()),
    }
}

#[allow(clippy::too_many_arguments)]
fn check_override_compatibility(
    arena: &DescriptorArena,
    original: &FunctionDescriptor,
    shadow: &SignatureAst,
    bounds: &[Vec<Type>],
    parameter_types: &[Type],
    return_type: &Option<Type>,
    substitution: &TypeSubstitution,
) -> Result<(), SignatureMismatch> {
    // Parameter types of an overriding member are invariant: compatibility
    // is not enough here, they must be exactly equal.
    for (index, original_parameter) in original.value_parameters.iter().enumerate() {
        let substituted = substitute(substitution, original_parameter.effective_type())?;
        let declared = &parameter_types[index];
        if !equal_types(&substituted, declared) {
            return Err(SignatureMismatch::OverrideParameterType {
                parameter: shadow.value_parameters[index].name.clone(),
                original: substituted.render(arena),
                alternative: declared.render(arena),
            });
        }
    }

    for (index, &original_id) in original.type_parameters.iter().enumerate() {
        let declared = &bounds[index];
        if declared.is_empty() {
            continue;
        }
        let original_bounds = &arena.type_parameter(original_id).upper_bounds;
        for (bound_index, declared_bound) in declared.iter().enumerate() {
            let substituted = substitute(substitution, &original_bounds[bound_index])?;
            if !equal_types(&substituted, declared_bound) {
                return Err(SignatureMismatch::OverrideBound {
                    parameter: shadow.type_parameters[index].name.clone(),
                    original: substituted.render(arena),
                    alternative: declared_bound.render(arena),
                });
            }
        }
    }

    // Covariant return is allowed, contravariant is not.
    if let (Some(original_return), Some(declared)) = (&original.return_type, return_type) {
        let substituted = substitute(substitution, original_return)?;
        if !is_subtype(arena, declared, &substituted) {
            return Err(SignatureMismatch::OverrideReturnType {
                original: substituted.render(arena),
                alternative: declared.render(arena),
            });
        }
    }
    Ok(())
}

fn substitute(
    substitution: &TypeSubstitution,
    ty: &Type,
) -> Result<Type, SignatureMismatch> {
    substitution.substitute(ty, Variance::Invariant).map_err(internal)
}

fn internal(error: SubstitutionError) -> SignatureMismatch {
    SignatureMismatch::Internal {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{ClassDescriptor, ClassId, ClassKind, Modality};
    use crate::types::SimpleType;

    struct Zoo {
        arena: DescriptorArena,
        animal: ClassId,
        dog: ClassId,
        text: ClassId,
    }

    fn zoo() -> Zoo {
        let mut arena = DescriptorArena::new();
        let any = arena.builtins().any;

        let animal = arena.alloc_class(ClassDescriptor {
            modality: Modality::Open,
            supertypes: vec![Type::class(any, Vec::new())],
            ..ClassDescriptor::new("Animal", "zoo", ClassKind::Class)
        });
        let dog = arena.alloc_class(ClassDescriptor {
            supertypes: vec![Type::class(animal, Vec::new())],
            ..ClassDescriptor::new("Dog", "zoo", ClassKind::Class)
        });
        let text = arena.alloc_class(ClassDescriptor {
            supertypes: vec![Type::class(any, Vec::new())],
            ..ClassDescriptor::new("String", "text", ClassKind::Class)
        });
        Zoo {
            arena,
            animal,
            dog,
            text,
        }
    }

    fn simple(class: ClassId) -> SimpleType {
        match Type::class(class, Vec::new()) {
            Type::Simple(simple) => simple,
            _ => unreachable!(),
        }
    }

    /// The usual host-platform shape: nullability unknown, so the inferred
    /// type is flexible between `C` and `C?`.
    fn platform(class: ClassId) -> Type {
        let lower = simple(class);
        let mut upper = lower.clone();
        upper.nullable = true;
        Type::flexible(lower, upper, "host.platform")
    }

    #[test]
    fn accepted_signature_tightens_platform_types_and_renames() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new("p0", platform(zoo.text))],
            ..FunctionDescriptor::new("greet", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun greet(name: String): String?",
            ReconcileMode::Declaration,
        );

        assert!(result.is_authoritative());
        assert_eq!(result.value_parameters[0].name, "name");
        assert_eq!(
            result.value_parameters[0].ty,
            Type::class(zoo.text, Vec::new())
        );
        assert_eq!(
            result.return_type,
            Some(Type::class(zoo.text, Vec::new()).nullable())
        );
    }

    #[test]
    fn name_mismatch_falls_back_to_the_inferred_signature() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new("p0", platform(zoo.text))],
            ..FunctionDescriptor::new("greet", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun salute(name: String): String",
            ReconcileMode::Declaration,
        );

        assert!(matches!(
            result.error,
            Some(SignatureMismatch::NameMismatch { .. })
        ));
        // Fallback keeps the inferred parameter name and flexible type.
        assert_eq!(result.value_parameters[0].name, "p0");
        assert_eq!(result.value_parameters[0].ty, platform(zoo.text));
    }

    #[test]
    fn value_parameter_arity_mismatch_fails() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![
                ValueParameterDescriptor::new("p0", platform(zoo.text)),
                ValueParameterDescriptor::new("p1", platform(zoo.text)),
            ],
            ..FunctionDescriptor::new("join", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun join(only: String): String",
            ReconcileMode::Declaration,
        );

        assert!(matches!(
            result.error,
            Some(SignatureMismatch::ValueParameterArity {
                original: 2,
                alternative: 1,
            })
        ));
        assert_eq!(result.value_parameters.len(), 2);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new("p0", platform(zoo.text))],
            ..FunctionDescriptor::new("greet", platform(zoo.text))
        });

        let text = "fun greet(name: String): String";
        let first = reconcile_function(&mut zoo.arena, original, text, ReconcileMode::Declaration);
        let second = reconcile_function(&mut zoo.arena, original, text, ReconcileMode::Declaration);

        assert_eq!(first.error, second.error);
        assert_eq!(first.value_parameters[0].name, second.value_parameters[0].name);
        assert_eq!(first.value_parameters[0].ty, second.value_parameters[0].ty);
        assert_eq!(first.return_type, second.return_type);
    }

    #[test]
    fn default_bound_elision_accepts_unbounded_and_rejects_new_bounds() {
        let mut zoo = zoo();
        let default_bound = zoo.arena.default_bound();
        let t = zoo.arena.alloc_type_parameter(TypeParameterDescriptor {
            name: "T".to_string(),
            index: 0,
            reified: false,
            variance: Variance::Invariant,
            upper_bounds: SmallVec::from_vec(vec![default_bound]),
        });
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            type_parameters: vec![t],
            value_parameters: vec![ValueParameterDescriptor::new("p0", Type::parameter(t))],
            ..FunctionDescriptor::new("identity", Type::parameter(t))
        });

        let accepted = reconcile_function(
            &mut zoo.arena,
            original,
            "fun identity<T>(value: T): T",
            ReconcileMode::Declaration,
        );
        assert!(accepted.is_authoritative());

        let rejected = reconcile_function(
            &mut zoo.arena,
            original,
            "fun identity<T : zoo.Animal>(value: T): T",
            ReconcileMode::Declaration,
        );
        assert!(matches!(
            rejected.error,
            Some(SignatureMismatch::UpperBoundMismatch { .. })
        ));
    }

    #[test]
    fn vararg_congruity_is_required_both_ways() {
        let mut zoo = zoo();
        let element = platform(zoo.text);
        let carrier = zoo.arena.array_of(element.clone());
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor {
                vararg_element_type: Some(element),
                ..ValueParameterDescriptor::new("p0", carrier)
            }],
            ..FunctionDescriptor::new("printAll", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun printAll(items: String): String",
            ReconcileMode::Declaration,
        );

        assert!(matches!(
            result.error,
            Some(SignatureMismatch::VarargMismatch {
                original_is_vararg: true,
                ..
            })
        ));
    }

    #[test]
    fn vararg_parameter_rebuilds_the_array_carrier() {
        let mut zoo = zoo();
        let element = platform(zoo.text);
        let carrier = zoo.arena.array_of(element.clone());
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor {
                vararg_element_type: Some(element),
                ..ValueParameterDescriptor::new("p0", carrier)
            }],
            ..FunctionDescriptor::new("printAll", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun printAll(vararg items: String): String",
            ReconcileMode::Declaration,
        );

        assert!(result.is_authoritative());
        let parameter = &result.value_parameters[0];
        let declared = Type::class(zoo.text, Vec::new());
        assert_eq!(parameter.vararg_element_type, Some(declared.clone()));
        assert_eq!(parameter.ty, zoo.arena.array_of(declared));
    }

    #[test]
    fn omitted_return_annotation_adopts_the_substituted_original() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new("p0", platform(zoo.text))],
            ..FunctionDescriptor::new("greet", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun greet(name: String)",
            ReconcileMode::Declaration,
        );

        assert!(result.is_authoritative());
        assert_eq!(result.return_type, Some(platform(zoo.text)));
    }

    #[test]
    fn override_mode_allows_covariant_return_and_rejects_contravariant() {
        let mut zoo = zoo();
        let original = zoo
            .arena
            .alloc_function(FunctionDescriptor::new("pet", platform(zoo.animal)));

        let covariant = reconcile_function(
            &mut zoo.arena,
            original,
            "fun pet(): zoo.Dog",
            ReconcileMode::Override,
        );
        assert!(covariant.is_authoritative());
        assert_eq!(covariant.return_type, Some(Type::class(zoo.dog, Vec::new())));

        let contravariant = reconcile_function(
            &mut zoo.arena,
            original,
            "fun pet(): core.Any",
            ReconcileMode::Override,
        );
        assert!(matches!(
            contravariant.error,
            Some(SignatureMismatch::OverrideReturnType { .. })
        ));
    }

    #[test]
    fn override_mode_requires_exactly_equal_parameter_types() {
        let mut zoo = zoo();
        // Plain-mode compatibility ignores nullability; override mode does
        // not, so a nullability change is rejected there.
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new(
                "p0",
                Type::class(zoo.text, Vec::new()),
            )],
            ..FunctionDescriptor::new("feed", Type::class(zoo.animal, Vec::new()))
        });

        let declaration = reconcile_function(
            &mut zoo.arena,
            original,
            "fun feed(food: String?): zoo.Animal",
            ReconcileMode::Declaration,
        );
        assert!(declaration.is_authoritative());

        let overriding = reconcile_function(
            &mut zoo.arena,
            original,
            "fun feed(food: String?): zoo.Animal",
            ReconcileMode::Override,
        );
        assert!(matches!(
            overriding.error,
            Some(SignatureMismatch::OverrideParameterType { .. })
        ));
    }

    #[test]
    fn syntax_errors_fall_back_without_running_later_checks() {
        let mut zoo = zoo();
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            value_parameters: vec![ValueParameterDescriptor::new("p0", platform(zoo.text))],
            ..FunctionDescriptor::new("greet", platform(zoo.text))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun greet(name String)",
            ReconcileMode::Declaration,
        );

        assert!(matches!(result.error, Some(SignatureMismatch::Syntax { .. })));
        assert_eq!(result.value_parameters[0].name, "p0");
    }

    #[test]
    fn generic_method_bounds_substitute_through_the_identity_map() {
        let mut zoo = zoo();
        let animal_bound = Type::class(zoo.animal, Vec::new());
        let t = zoo.arena.alloc_type_parameter(TypeParameterDescriptor {
            name: "T".to_string(),
            index: 0,
            reified: false,
            variance: Variance::Invariant,
            upper_bounds: SmallVec::from_vec(vec![animal_bound]),
        });
        let original = zoo.arena.alloc_function(FunctionDescriptor {
            type_parameters: vec![t],
            value_parameters: vec![ValueParameterDescriptor::new("p0", Type::parameter(t))],
            ..FunctionDescriptor::new("tag", Type::parameter(t))
        });

        let result = reconcile_function(
            &mut zoo.arena,
            original,
            "fun tag<Subject : zoo.Animal>(animal: Subject): Subject",
            ReconcileMode::Declaration,
        );

        assert!(result.is_authoritative());
        // The accepted signature references the fresh shadow parameter, not
        // the original one.
        let shadow = result.type_parameters[0];
        assert_ne!(shadow, t);
        assert_eq!(result.value_parameters[0].ty, Type::parameter(shadow));
        assert_eq!(result.return_type, Some(Type::parameter(shadow)));
        assert_eq!(
            zoo.arena.type_parameter(shadow).upper_bounds.as_slice(),
            &[Type::class(zoo.animal, Vec::new())]
        );
    }
}
