//! Async driver that ticks a batch runner on a schedule

use crate::{BatchConfig, BatchError, BatchRunner, TickOutcome};
use tokio::time::{interval, Duration};

/// Worker that drives a [`BatchRunner`] until it finishes
///
/// Operations are blocking, so each tick runs on tokio's blocking pool. The
/// runner moves into the blocking task and back out again, and the worker
/// hands it back to the caller when it stops.
///
/// # Examples
///
/// ```no_run
/// use scribe_batch::{Batch, BatchConfig, BatchRunner, BatchWorker, FnOperation};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BatchConfig::default();
///     let mut batch = Batch::new("Extracting text...");
///     batch.add_operation(FnOperation::new("node 1", || Ok(())));
///
///     let runner = BatchRunner::new(batch, config.clone())?;
///     let worker = BatchWorker::new(&config);
///
///     // Run until finished (or Ctrl+C)
///     let runner = worker.run(runner).await?;
///     println!("{}", runner.report().summary());
///     Ok(())
/// }
/// ```
pub struct BatchWorker {
    interval: Duration,
}

impl BatchWorker {
    /// Create a worker ticking at the configured interval
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            interval: config.tick_interval(),
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(&BatchConfig::default())
    }

    /// Tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the batch to completion
    ///
    /// Stops early if a shutdown signal (Ctrl+C) is received; units not yet
    /// attempted stay pending on the returned runner.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Worker` if a blocking tick panics or is cancelled.
    pub async fn run(&self, mut runner: BatchRunner) -> Result<BatchRunner, BatchError> {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Batch worker started for '{}' ({} units, interval: {:?})",
            runner.title(),
            runner.remaining(),
            self.interval
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (returned, outcome) = tick_blocking(runner).await?;
                    runner = returned;
                    tracing::debug!(
                        "Tick attempted {} units ({} failed)",
                        outcome.attempted,
                        outcome.failed
                    );
                    if outcome.finished {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!(
                        "Shutdown signal received, stopping batch with {} units pending",
                        runner.remaining()
                    );
                    break;
                }
            }
        }

        Ok(runner)
    }

    /// Run at most `ticks` ticks (useful for testing)
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Worker` if a blocking tick panics or is cancelled.
    pub async fn run_ticks(
        &self,
        mut runner: BatchRunner,
        ticks: usize,
    ) -> Result<BatchRunner, BatchError> {
        let mut ticker = interval(self.interval);

        for tick in 0..ticks {
            ticker.tick().await;

            let (returned, outcome) = tick_blocking(runner).await?;
            runner = returned;
            tracing::debug!("Tick {}/{} attempted {} units", tick + 1, ticks, outcome.attempted);

            if outcome.finished {
                break;
            }
        }

        Ok(runner)
    }
}

async fn tick_blocking(mut runner: BatchRunner) -> Result<(BatchRunner, TickOutcome), BatchError> {
    tokio::task::spawn_blocking(move || {
        let outcome = runner.tick();
        (runner, outcome)
    })
    .await
    .map_err(|e| BatchError::Worker(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Batch, FnOperation, OperationError, UnitState};

    fn config(ops_per_tick: usize) -> BatchConfig {
        BatchConfig {
            ops_per_tick,
            tick_interval_ms: 1,
        }
    }

    fn batch(count: usize, fail_at: Option<usize>) -> Batch {
        let mut batch = Batch::new("Worker test");
        for i in 0..count {
            batch.add_operation(FnOperation::new(format!("unit {}", i + 1), move || {
                if Some(i) == fail_at {
                    Err(OperationError::new("failed"))
                } else {
                    Ok(())
                }
            }));
        }
        batch
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = BatchWorker::default_config();
        assert_eq!(worker.interval(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_run_until_finished() {
        let config = config(2);
        let runner = BatchRunner::new(batch(5, Some(1)), config.clone()).unwrap();
        let worker = BatchWorker::new(&config);

        let runner = worker.run(runner).await.unwrap();

        assert!(runner.is_finished());
        assert_eq!(runner.report().succeeded, 4);
        assert_eq!(runner.report().failed, 1);
        assert_eq!(runner.report().ticks, 3);
    }

    #[tokio::test]
    async fn test_run_ticks_stops_early() {
        let config = config(1);
        let runner = BatchRunner::new(batch(4, None), config.clone()).unwrap();
        let worker = BatchWorker::new(&config);

        let runner = worker.run_ticks(runner, 2).await.unwrap();

        assert!(!runner.is_finished());
        assert_eq!(runner.remaining(), 2);
        assert_eq!(runner.states()[3], UnitState::Pending);
    }

    #[tokio::test]
    async fn test_run_ticks_stops_when_finished() {
        let config = config(10);
        let runner = BatchRunner::new(batch(3, None), config.clone()).unwrap();
        let worker = BatchWorker::new(&config);

        let runner = worker.run_ticks(runner, 5).await.unwrap();

        assert!(runner.is_finished());
        assert_eq!(runner.report().ticks, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let config = config(1);
        let runner = BatchRunner::new(Batch::new("Empty"), config.clone()).unwrap();
        let worker = BatchWorker::new(&config);

        let runner = worker.run(runner).await.unwrap();
        assert!(runner.is_finished());
        assert_eq!(runner.report().total, 0);
    }
}
