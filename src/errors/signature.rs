// src/errors/signature.rs
//! Signature reconciliation mismatches (E5xxx).
//!
//! One variant per check in the reconciliation protocol. These are
//! per-declaration recoverable conditions: the reconciler records the first
//! one raised and falls back to the inferred signature, so they surface as
//! compiler diagnostics at the annotation site rather than aborting
//! compilation.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SignatureMismatch {
    #[error("syntax error in alternative signature: {message}")]
    #[diagnostic(code(E5001))]
    Syntax {
        message: String,
        #[label("invalid signature syntax")]
        span: SourceSpan,
    },

    #[error("function names mismatch, original: {original}, alternative: {alternative}")]
    #[diagnostic(code(E5002))]
    NameMismatch { original: String, alternative: String },

    #[error("method signature has {original} type parameters, but alternative signature has {alternative}")]
    #[diagnostic(code(E5003))]
    TypeParameterArity { original: usize, alternative: usize },

    #[error("upper bound number mismatch for {parameter}: expected {original}, but found {alternative}")]
    #[diagnostic(code(E5004))]
    UpperBoundArity {
        parameter: String,
        original: usize,
        alternative: usize,
    },

    #[error("upper bound of {parameter} changed: {alternative}, was: {original}")]
    #[diagnostic(code(E5005))]
    UpperBoundMismatch {
        parameter: String,
        original: String,
        alternative: String,
    },

    #[error("method signature has {original} value parameters, but alternative signature has {alternative}")]
    #[diagnostic(code(E5006))]
    ValueParameterArity { original: usize, alternative: usize },

    #[error("parameter {parameter}: method signature and alternative signature disagree on vararg")]
    #[diagnostic(code(E5007))]
    VarargMismatch {
        parameter: String,
        /// True when the method signature is vararg and the alternative
        /// signature is not; false for the opposite direction.
        original_is_vararg: bool,
    },

    #[error("type of parameter {parameter} changed: {alternative}, was: {original}")]
    #[diagnostic(code(E5008))]
    ParameterTypeMismatch {
        parameter: String,
        original: String,
        alternative: String,
    },

    #[error("return type changed: {alternative}, was: {original}")]
    #[diagnostic(code(E5009))]
    ReturnTypeMismatch { original: String, alternative: String },

    #[error("parameter type changed for method which overrides another: {alternative}, was: {original}")]
    #[diagnostic(code(E5010))]
    OverrideParameterType {
        parameter: String,
        original: String,
        alternative: String,
    },

    #[error("type parameter's upper bound changed for method which overrides another: {alternative}, was: {original}")]
    #[diagnostic(code(E5011))]
    OverrideBound {
        parameter: String,
        original: String,
        alternative: String,
    },

    #[error("return type is changed to not subtype for method which overrides another: {alternative}, was: {original}")]
    #[diagnostic(code(E5012))]
    OverrideReturnType { original: String, alternative: String },

    #[error("unknown type '{name}' in alternative signature")]
    #[diagnostic(code(E5013))]
    UnknownType { name: String },

    #[error("'{name}' takes {expected} type arguments, but alternative signature supplies {found}")]
    #[diagnostic(code(E5014))]
    TypeArgumentArity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Internal invariant violation (for example, a substitution over a
    /// non-total map). A defect, not a user error, but it still aborts only
    /// the current declaration.
    #[error("internal error while reconciling signature: {message}")]
    #[diagnostic(code(E5015))]
    Internal { message: String },
}
