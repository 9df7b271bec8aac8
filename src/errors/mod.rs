// src/errors/mod.rs
//! Structured errors for the metadata layer.
//!
//! Serialization failures are fatal I/O errors; signature reconciliation
//! failures are per-declaration diagnostics with stable codes.

pub mod serialize;
pub mod signature;

pub use serialize::SerializeError;
pub use signature::SignatureMismatch;
