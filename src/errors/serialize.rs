// src/errors/serialize.rs
//! Metadata serialization errors.

use thiserror::Error;

/// Failure while emitting the persisted metadata bytes. Always fatal for
/// the unit being encoded and never retried; the caller discards the whole
/// unit and may re-attempt the full encode.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to write serialized metadata: {0}")]
    Io(#[from] std::io::Error),
}
