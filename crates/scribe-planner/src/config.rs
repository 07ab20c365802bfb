//! Configuration for the planner

use scribe_batch::BatchMessages;
use serde::{Deserialize, Serialize};

/// Configuration for a submission
///
/// # Examples
///
/// ```
/// use scribe_planner::PlannerConfig;
///
/// let config = PlannerConfig::from_toml("max_depth = 8").unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.action_handle, "extract_text_from_service_file");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum walk iterations before the hierarchy is rejected
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Handle of the action each unit invokes
    #[serde(default = "default_action_handle")]
    pub action_handle: String,

    /// Batch title
    #[serde(default = "default_batch_title")]
    pub batch_title: String,

    /// Progress template shown after every tick
    #[serde(default = "default_progress_message")]
    pub progress_message: String,

    /// Shown when the batch finishes with failures
    #[serde(default = "default_error_message")]
    pub error_message: String,

    /// Status message shown once the batch is queued
    #[serde(default = "default_status_message")]
    pub status_message: String,
}

fn default_max_depth() -> usize {
    64
}

fn default_action_handle() -> String {
    "extract_text_from_service_file".to_string()
}

fn default_batch_title() -> String {
    "Extracting text...".to_string()
}

fn default_progress_message() -> String {
    "Processed @current out of @total. Estimated time: @estimate.".to_string()
}

fn default_error_message() -> String {
    "The process has encountered an error.".to_string()
}

fn default_status_message() -> String {
    "Pages have been added to the queue, but may take some time to process".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            action_handle: default_action_handle(),
            batch_title: default_batch_title(),
            progress_message: default_progress_message(),
            error_message: default_error_message(),
            status_message: default_status_message(),
        }
    }
}

impl PlannerConfig {
    /// Message templates for the batch
    pub fn batch_messages(&self) -> BatchMessages {
        BatchMessages {
            progress_message: self.progress_message.clone(),
            error_message: self.error_message.clone(),
            ..BatchMessages::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be greater than 0".to_string());
        }
        if self.action_handle.trim().is_empty() {
            return Err("action_handle must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
