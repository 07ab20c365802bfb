//! Error types for batch operations

use thiserror::Error;

/// Errors that can occur while running a batch
#[derive(Error, Debug)]
pub enum BatchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Failure of a single batch operation
///
/// Recorded against the unit and counted in the report; never aborts the
/// remaining operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct OperationError {
    message: String,
}

impl OperationError {
    /// Create an error from any displayable cause
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// The failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}
