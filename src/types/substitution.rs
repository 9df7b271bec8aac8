// src/types/substitution.rs
//
// The type substitution engine. Given a mapping from type-parameter
// identities to replacement types, rewrites a type by replacing every
// reachable parameter reference, threading position variance through
// argument projections. Substitution is pure: equal inputs always produce
// structurally equal outputs.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::descriptors::TypeParameterId;
use crate::types::{Classifier, SimpleType, Type, TypeProjection, Variance};

/// Raised when a type reaches the engine with a free parameter the map does
/// not cover. Callers always build total maps, so this is a defect; it
/// aborts the current declaration's processing, never the whole compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no substitution image for type parameter '{name}' (id {id})")]
pub struct SubstitutionError {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeParameterId, Type>,
    /// Names for error reporting only; looked up lazily would require arena
    /// access inside the engine, so they are captured at insertion.
    names: FxHashMap<TypeParameterId, String>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn insert(&mut self, parameter: TypeParameterId, name: impl Into<String>, image: Type) {
        self.names.insert(parameter, name.into());
        self.map.insert(parameter, image);
    }

    /// Convenience for the common renaming case: every parameter maps to a
    /// plain reference to another parameter.
    pub fn renaming<'a>(
        pairs: impl IntoIterator<Item = (TypeParameterId, &'a str, TypeParameterId)>,
    ) -> Self {
        let mut substitution = Self::new();
        for (from, name, to) in pairs {
            substitution.insert(from, name, Type::parameter(to));
        }
        substitution
    }

    pub fn substitute(&self, ty: &Type, position: Variance) -> Result<Type, SubstitutionError> {
        match ty {
            Type::Simple(simple) => self.substitute_simple(simple, position, Pick::Whole),
            Type::Flexible(flexible) => {
                let lower = self.substitute_simple(&flexible.lower, position, Pick::Lower)?;
                let upper = self.substitute_simple(&flexible.upper, position, Pick::Upper)?;
                Ok(Type::Flexible(crate::types::FlexibleType {
                    lower: into_simple(lower),
                    upper: into_simple(upper),
                    capabilities: flexible.capabilities.clone(),
                }))
            }
        }
    }

    fn substitute_simple(
        &self,
        simple: &SimpleType,
        position: Variance,
        pick: Pick,
    ) -> Result<Type, SubstitutionError> {
        match simple.classifier {
            Classifier::Parameter(id) => {
                let image = self.map.get(&id).ok_or_else(|| SubstitutionError {
                    id: id.index(),
                    name: self
                        .names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", id.index())),
                })?;
                let mut result = pick.collapse(image.clone());
                if simple.nullable {
                    result = result.nullable();
                }
                Ok(result)
            }
            Classifier::Class(_) => {
                let mut arguments = smallvec::SmallVec::new();
                for argument in &simple.arguments {
                    arguments.push(match argument {
                        TypeProjection::Star => TypeProjection::Star,
                        TypeProjection::Argument(variance, inner) => TypeProjection::Argument(
                            *variance,
                            Box::new(self.substitute(inner, position.compose(*variance))?),
                        ),
                    });
                }
                Ok(Type::Simple(SimpleType {
                    classifier: simple.classifier,
                    arguments,
                    nullable: simple.nullable,
                }))
            }
        }
    }
}

/// Which bound to take when a substitution image is itself flexible.
/// Flexibility never nests, so an image landing inside a flexible bound
/// collapses to the matching bound.
#[derive(Clone, Copy)]
enum Pick {
    Whole,
    Lower,
    Upper,
}

impl Pick {
    fn collapse(self, image: Type) -> Type {
        match (self, image) {
            (Pick::Whole, image) => image,
            (Pick::Lower, Type::Flexible(flexible)) => Type::Simple(flexible.lower),
            (Pick::Upper, Type::Flexible(flexible)) => Type::Simple(flexible.upper),
            (_, image) => image,
        }
    }
}

fn into_simple(ty: Type) -> SimpleType {
    match ty {
        Type::Simple(simple) => simple,
        // Unreachable through `Pick`, but keep the collapse total.
        Type::Flexible(flexible) => flexible.lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{
        ClassDescriptor, ClassKind, DescriptorArena, TypeParameterDescriptor,
    };
    use smallvec::SmallVec;

    fn fresh_parameter(arena: &mut DescriptorArena, name: &str) -> TypeParameterId {
        arena.alloc_type_parameter(TypeParameterDescriptor {
            name: name.to_string(),
            index: 0,
            reified: false,
            variance: Variance::Invariant,
            upper_bounds: SmallVec::new(),
        })
    }

    #[test]
    fn renames_parameter_references() {
        let mut arena = DescriptorArena::new();
        let t = fresh_parameter(&mut arena, "T");
        let u = fresh_parameter(&mut arena, "U");

        let substitution = TypeSubstitution::renaming([(t, "T", u)]);
        let result = substitution
            .substitute(&Type::parameter(t), Variance::Invariant)
            .unwrap();
        assert_eq!(result, Type::parameter(u));
    }

    #[test]
    fn rewrites_nested_arguments_and_keeps_nullability() {
        let mut arena = DescriptorArena::new();
        let list = arena.alloc_class(ClassDescriptor::new("List", "core", ClassKind::Interface));
        let t = fresh_parameter(&mut arena, "T");
        let u = fresh_parameter(&mut arena, "U");

        let substitution = TypeSubstitution::renaming([(t, "T", u)]);
        let original = Type::class(
            list,
            vec![TypeProjection::Argument(
                Variance::Out,
                Box::new(Type::parameter(t).nullable()),
            )],
        );

        let result = substitution
            .substitute(&original, Variance::Invariant)
            .unwrap();
        let expected = Type::class(
            list,
            vec![TypeProjection::Argument(
                Variance::Out,
                Box::new(Type::parameter(u).nullable()),
            )],
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn unmapped_parameter_is_an_error() {
        let mut arena = DescriptorArena::new();
        let t = fresh_parameter(&mut arena, "T");

        let substitution = TypeSubstitution::new();
        let err = substitution
            .substitute(&Type::parameter(t), Variance::Invariant)
            .unwrap_err();
        assert_eq!(err.id, t.index());
    }

    #[test]
    fn substitution_is_referentially_transparent() {
        let mut arena = DescriptorArena::new();
        let map = arena.alloc_class(ClassDescriptor::new("Map", "core", ClassKind::Interface));
        let t = fresh_parameter(&mut arena, "T");
        let u = fresh_parameter(&mut arena, "U");
        let v = fresh_parameter(&mut arena, "V");

        let substitution = TypeSubstitution::renaming([(t, "T", v), (u, "U", v)]);
        let ty = Type::class(
            map,
            vec![
                TypeProjection::Argument(Variance::In, Box::new(Type::parameter(t))),
                TypeProjection::Star,
                TypeProjection::Argument(Variance::Invariant, Box::new(Type::parameter(u))),
            ],
        );

        let first = substitution.substitute(&ty, Variance::Invariant).unwrap();
        let second = substitution.substitute(&ty, Variance::Invariant).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flexible_bounds_are_substituted_independently() {
        let mut arena = DescriptorArena::new();
        let t = fresh_parameter(&mut arena, "T");
        let u = fresh_parameter(&mut arena, "U");

        let substitution = TypeSubstitution::renaming([(t, "T", u)]);
        let lower = match Type::parameter(t) {
            Type::Simple(s) => s,
            _ => unreachable!(),
        };
        let upper = match Type::parameter(t).nullable() {
            Type::Simple(s) => s,
            _ => unreachable!(),
        };
        let flexible = Type::flexible(lower, upper, "platform");

        let result = substitution
            .substitute(&flexible, Variance::Invariant)
            .unwrap();
        match result {
            Type::Flexible(f) => {
                assert_eq!(f.lower.classifier, Classifier::Parameter(u));
                assert!(!f.lower.nullable);
                assert!(f.upper.nullable);
                assert_eq!(f.capabilities, "platform");
            }
            other => panic!("expected flexible type, got {other:?}"),
        }
    }
}
