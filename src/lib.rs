// src/lib.rs
pub mod descriptors;
pub mod errors;
pub mod serialization;
pub mod signature;
pub mod types;
