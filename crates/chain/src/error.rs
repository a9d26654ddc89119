use opfork_protocol::{OperationKind, ProtocolError, TimePointSec};
use thiserror::Error;

use crate::hardfork::{Hardfork, HardforkParseError};

pub type ActivationResult<T> = Result<T, ActivationError>;

/// Errors raised while resolving or gating operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(
        "hardfork: {operation} is not allowed until {hardfork} at {activation} (reference time {now})"
    )]
    NotYetActive {
        operation: OperationKind,
        hardfork: Hardfork,
        activation: TimePointSec,
        now: TimePointSec,
    },
    #[error(
        "hardfork: {operation} follows the first gated operation but is not assigned a hardfork"
    )]
    Unclassified { operation: OperationKind },
    #[error(
        "hardfork: {operation} predates the first gated operation but is assigned to {hardfork}"
    )]
    Misclassified {
        operation: OperationKind,
        hardfork: Hardfork,
    },
    #[error("hardfork: {hardfork} gates no operations")]
    EmptyGroup { hardfork: Hardfork },
}

/// Errors raised while loading an activation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("activation schedule: json parse error: {0}")]
    JsonError(String),
    #[error("activation schedule: toml parse error: {0}")]
    TomlError(String),
    #[error("activation schedule: invalid hardfork name: {name}")]
    InvalidHardforkName { name: String },
}

impl From<HardforkParseError> for ScheduleError {
    fn from(err: HardforkParseError) -> Self {
        ScheduleError::InvalidHardforkName { name: err.name }
    }
}
