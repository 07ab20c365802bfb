//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use scribe_batch::BatchConfig;
use scribe_planner::PlannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every section has defaults, so a partial file loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Repository database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Discovery and batch messages
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Batch pacing
    #[serde(default)]
    pub batch: BatchConfig,

    /// Derivative action
    #[serde(default)]
    pub action: ActionConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Repository database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Settings for the derivative action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Handle the action is registered under
    #[serde(default = "default_action_handle")]
    pub handle: String,

    /// Base URL of the message broker's REST endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Queue the derivative connector listens on
    #[serde(default = "default_queue")]
    pub queue: String,

    /// Public base URL of the repository site
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Where the extracted text is written; `{nid}` is replaced with the node id
    #[serde(default = "default_destination_template")]
    pub destination_template: String,

    /// Extra arguments passed to the OCR connector
    #[serde(default)]
    pub args: String,

    /// Request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".scribe").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path), falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.planner.validate().map_err(CliError::Config)?;
        self.batch
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        if self.action.handle != self.planner.action_handle {
            return Err(CliError::Config(format!(
                "action.handle '{}' does not match planner.action_handle '{}'",
                self.action.handle, self.planner.action_handle
            )));
        }
        if self.action.timeout_secs == 0 {
            return Err(CliError::Config("action.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            handle: default_action_handle(),
            endpoint: default_endpoint(),
            queue: default_queue(),
            site_url: default_site_url(),
            destination_template: default_destination_template(),
            args: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ActionConfig {
    /// URL events are posted to.
    pub fn queue_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.queue)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_database_path() -> String {
    "repository.db".to_string()
}

fn default_action_handle() -> String {
    "extract_text_from_service_file".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:8161/api/message".to_string()
}

fn default_queue() -> String {
    "islandora-connector-ocr".to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

fn default_destination_template() -> String {
    "public://derivatives/ocr/{nid}.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
