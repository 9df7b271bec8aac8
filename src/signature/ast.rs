// src/signature/ast.rs
//
// The shadow declaration: a declaration tree built from parsed alternative
// signature text, used only for comparison against an inferred signature.
// Type references are by name here; `resolve` turns them into arena types.

use crate::signature::token::Span;
use crate::types::Variance;

#[derive(Debug, Clone)]
pub struct SignatureAst {
    pub name: String,
    pub name_span: Span,
    pub type_parameters: Vec<TypeParameterAst>,
    pub value_parameters: Vec<ValueParameterAst>,
    /// Absent when the annotation omits the return annotation; the
    /// reconciler then adopts the substituted original return type.
    pub return_type: Option<TypeAst>,
}

#[derive(Debug, Clone)]
pub struct TypeParameterAst {
    pub name: String,
    pub span: Span,
    pub bounds: Vec<TypeAst>,
}

#[derive(Debug, Clone)]
pub struct ValueParameterAst {
    pub name: String,
    pub is_vararg: bool,
    pub ty: TypeAst,
    pub span: Span,
}

/// A type reference: a possibly-dotted name, ordered argument projections,
/// and a nullability marker.
#[derive(Debug, Clone)]
pub struct TypeAst {
    pub name: String,
    pub arguments: Vec<ProjectionAst>,
    pub nullable: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ProjectionAst {
    Star,
    Argument(Variance, TypeAst),
}
