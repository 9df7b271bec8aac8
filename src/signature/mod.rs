// src/signature/mod.rs
//
// Alternative-signature reconciliation: parse developer-authored signature
// text into a shadow declaration, resolve it against the descriptor arena,
// and check it against the inferred signature of a compiled host member.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod reconcile;
pub mod resolve;
pub mod token;

pub use parse::parse_signature;
pub use reconcile::{ReconcileMode, Reconciliation, reconcile_function};
pub use resolve::TypeResolver;
