//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Repository store error
    #[error("Store error: {0}")]
    Store(#[from] scribe_store::StoreError),

    /// Submission error
    #[error("{0}")]
    Planner(#[from] scribe_planner::PlannerError),

    /// Batch runner error
    #[error("Batch error: {0}")]
    Batch(#[from] scribe_batch::BatchError),

    /// Action setup error
    #[error("Action error: {0}")]
    Action(#[from] crate::actions::ActionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
