//! Outcome tracking for batch runs

use std::time::Duration;

/// A failed unit, as recorded in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// Position of the unit in the batch
    pub index: usize,

    /// Operation label
    pub label: String,

    /// Failure message
    pub message: String,
}

/// Counts and failures collected while a batch runs
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Operations in the batch
    pub total: usize,

    /// Operations that completed
    pub succeeded: usize,

    /// Operations that failed
    pub failed: usize,

    /// Details of every failure, in batch order
    pub failures: Vec<UnitFailure>,

    /// Ticks executed
    pub ticks: usize,

    /// Wall time from first to last tick
    pub elapsed: Duration,
}

impl BatchReport {
    /// Create an empty report for a batch of `total` operations
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Record a completed unit
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failed unit
    pub fn record_failure(&mut self, failure: UnitFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Record a tick
    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    /// Operations attempted so far
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every operation has been attempted
    pub fn is_complete(&self) -> bool {
        self.attempted() >= self.total
    }

    /// Whether any operation failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Operations: {}", self.total),
            format!("Succeeded: {}", self.succeeded),
            format!("Failed: {}", self.failed),
            format!("Ticks: {}", self.ticks),
            format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failures:".to_string());
            for failure in &self.failures {
                lines.push(format!(
                    "  #{} {}: {}",
                    failure.index + 1,
                    failure.label,
                    failure.message
                ));
            }
        }

        lines.join("\n")
    }
}
