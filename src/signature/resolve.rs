// src/signature/resolve.rs
//
// Resolves parsed type references against the descriptor arena and the
// scope of type-parameter names visible to one signature. Annotation text
// can only express plain (non-flexible) types.

use rustc_hash::FxHashMap;

use crate::descriptors::{ClassId, DescriptorArena, TypeParameterId};
use crate::errors::SignatureMismatch;
use crate::signature::ast::{ProjectionAst, TypeAst};
use crate::types::{Type, TypeProjection};

pub struct TypeResolver<'a> {
    arena: &'a DescriptorArena,
    classes: FxHashMap<String, ClassId>,
    /// Visible type parameters by name: the enclosing declaration chain's
    /// parameters plus the shadow's own. A parameter name shadows a class
    /// of the same simple name.
    parameters: FxHashMap<String, TypeParameterId>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(arena: &'a DescriptorArena) -> Self {
        Self {
            arena,
            classes: arena.class_name_lookup(),
            parameters: FxHashMap::default(),
        }
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, id: TypeParameterId) {
        self.parameters.insert(name.into(), id);
    }

    pub fn resolve(&self, ast: &TypeAst) -> Result<Type, SignatureMismatch> {
        if let Some(&parameter) = self.parameters.get(&ast.name) {
            if !ast.arguments.is_empty() {
                return Err(SignatureMismatch::TypeArgumentArity {
                    name: ast.name.clone(),
                    expected: 0,
                    found: ast.arguments.len(),
                });
            }
            let ty = Type::parameter(parameter);
            return Ok(if ast.nullable { ty.nullable() } else { ty });
        }

        let Some(&class) = self.classes.get(&ast.name) else {
            return Err(SignatureMismatch::UnknownType {
                name: ast.name.clone(),
            });
        };

        let expected = self.arena.class(class).type_parameters.len();
        if ast.arguments.len() != expected {
            return Err(SignatureMismatch::TypeArgumentArity {
                name: ast.name.clone(),
                expected,
                found: ast.arguments.len(),
            });
        }

        let mut arguments = Vec::with_capacity(ast.arguments.len());
        for argument in &ast.arguments {
            arguments.push(match argument {
                ProjectionAst::Star => TypeProjection::Star,
                ProjectionAst::Argument(variance, inner) => {
                    TypeProjection::Argument(*variance, Box::new(self.resolve(inner)?))
                }
            });
        }

        let ty = Type::class(class, arguments);
        Ok(if ast.nullable { ty.nullable() } else { ty })
    }
}
