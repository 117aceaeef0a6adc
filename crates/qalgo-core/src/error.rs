//! Error types for the algorithms crate.

use qalgo_hal::HalError;
use qalgo_ir::IrError;
use thiserror::Error;

/// Errors produced by the algorithms.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// An argument was rejected before any circuit was built.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend failed; its message is passed through unchanged.
    #[error(transparent)]
    Backend(#[from] HalError),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),
}

impl AlgoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for algorithm operations.
pub type AlgoResult<T> = Result<T, AlgoError>;
