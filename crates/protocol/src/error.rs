//! Error types for the operation registry and protocol primitives.

use thiserror::Error;

/// Result alias used throughout the protocol crate.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("protocol: unknown operation tag {tag} (registry holds {count} operations)")]
    UnknownOperationTag { tag: u64, count: usize },
    #[error("protocol: unknown operation name: {name}")]
    UnknownOperationName { name: String },
    #[error("protocol: invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
