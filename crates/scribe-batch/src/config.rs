//! Configuration for batch processing
//!
//! Defines how many operations run per tick and how far apart ticks are.

use crate::BatchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the batch runner and worker
///
/// # Examples
///
/// ```
/// use scribe_batch::BatchConfig;
///
/// // Default configuration (balanced)
/// let config = BatchConfig::default();
/// assert_eq!(config.ops_per_tick, 5);
///
/// // One unit per tick, like a request-driven progress page
/// let config = BatchConfig::interactive();
/// assert_eq!(config.ops_per_tick, 1);
///
/// // Large ticks with short pauses for unattended runs
/// let config = BatchConfig::background();
/// assert_eq!(config.ops_per_tick, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum operations attempted per tick
    /// Default: 5
    #[serde(default = "default_ops_per_tick")]
    pub ops_per_tick: usize,

    /// Pause between ticks (in milliseconds)
    /// Default: 100
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_ops_per_tick() -> usize {
    5
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            ops_per_tick: default_ops_per_tick(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl BatchConfig {
    /// Interactive configuration: one operation per tick
    ///
    /// Progress is reported after every unit.
    pub fn interactive() -> Self {
        Self {
            ops_per_tick: 1,
            tick_interval_ms: 250,
        }
    }

    /// Background configuration: large ticks, short pauses
    pub fn background() -> Self {
        Self {
            ops_per_tick: 50,
            tick_interval_ms: 10,
        }
    }

    /// Get tick interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate the configuration
    ///
    /// Both values must be non-zero; a zero interval would make the worker's
    /// ticker panic.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.ops_per_tick == 0 {
            return Err(BatchError::Config(
                "ops_per_tick must be greater than 0".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(BatchError::Config(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
