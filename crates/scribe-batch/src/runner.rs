//! Tick-based batch execution with per-unit fault isolation

use crate::batch::{render_message, BatchMessages, Operation, ProgressValues};
use crate::{Batch, BatchConfig, BatchError, BatchId, BatchReport, UnitFailure};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Lifecycle of a single unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    /// Not yet attempted
    Pending,

    /// Currently executing
    Running,

    /// Completed successfully
    Done,

    /// Failed with the given message
    Failed(String),
}

/// A progress report emitted after every tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Batch title
    pub title: String,

    /// Operations attempted so far
    pub current: usize,

    /// Operations in the batch
    pub total: usize,

    /// Failures so far
    pub failed: usize,

    /// Rendered progress message
    pub message: String,
}

/// Receives progress as a batch runs
pub trait ProgressSink: Send {
    /// Called once before the first unit runs
    fn started(&mut self, _title: &str, _message: &str) {}

    /// Called after every tick that attempted at least one unit
    fn progress(&mut self, update: &ProgressUpdate);

    /// Called when a unit fails
    fn unit_failed(&mut self, _failure: &UnitFailure) {}

    /// Called once when every unit has been attempted
    fn finished(&mut self, _report: &BatchReport, _messages: &BatchMessages) {}
}

/// Progress sink that writes to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn started(&mut self, title: &str, message: &str) {
        tracing::info!("{} {}", title, message);
    }

    fn progress(&mut self, update: &ProgressUpdate) {
        tracing::info!("{}", update.message);
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Units attempted in this tick
    pub attempted: usize,

    /// Units that failed in this tick
    pub failed: usize,

    /// Whether the batch is now finished
    pub finished: bool,
}

/// Runs a batch a few operations at a time
///
/// Each call to [`BatchRunner::tick`] attempts up to `ops_per_tick` pending
/// units in order. A failing unit is recorded and the runner moves on; the
/// batch only finishes once every unit has been attempted.
///
/// # Examples
///
/// ```
/// use scribe_batch::{Batch, BatchConfig, BatchRunner, FnOperation, OperationError};
///
/// let mut batch = Batch::new("Demo");
/// batch.add_operation(FnOperation::new("ok", || Ok(())));
/// batch.add_operation(FnOperation::new("bad", || Err(OperationError::new("boom"))));
///
/// let mut runner = BatchRunner::new(batch, BatchConfig::default()).unwrap();
/// let report = runner.run_to_completion();
/// assert_eq!(report.succeeded, 1);
/// assert_eq!(report.failed, 1);
/// ```
pub struct BatchRunner {
    id: BatchId,
    title: String,
    operations: Vec<Box<dyn Operation>>,
    states: Vec<UnitState>,
    messages: BatchMessages,
    config: BatchConfig,
    cursor: usize,
    report: BatchReport,
    started: Option<Instant>,
    finished_reported: bool,
    sink: Box<dyn ProgressSink>,
}

impl BatchRunner {
    /// Create a runner for a batch
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Config` if the configuration is invalid.
    pub fn new(batch: Batch, config: BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;

        let (id, title, operations, messages) = batch.into_parts();
        let total = operations.len();

        Ok(Self {
            id,
            title,
            states: vec![UnitState::Pending; total],
            operations,
            messages,
            config,
            cursor: 0,
            report: BatchReport::new(total),
            started: None,
            finished_reported: false,
            sink: Box::new(TracingProgress),
        })
    }

    /// Replace the progress sink
    pub fn with_progress_sink<P: ProgressSink + 'static>(mut self, sink: P) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Batch identifier
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Batch title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current report
    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    /// State of every unit, in batch order
    pub fn states(&self) -> &[UnitState] {
        &self.states
    }

    /// Units not yet attempted
    pub fn remaining(&self) -> usize {
        self.operations.len() - self.cursor
    }

    /// Whether every unit has been attempted
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.operations.len()
    }

    /// Attempt the next `ops_per_tick` pending units
    pub fn tick(&mut self) -> TickOutcome {
        let started = match self.started {
            Some(started) => started,
            None => {
                self.sink.started(&self.title, &self.messages.init_message);
                let now = Instant::now();
                self.started = Some(now);
                now
            }
        };

        let mut outcome = TickOutcome::default();
        let end = (self.cursor + self.config.ops_per_tick).min(self.operations.len());

        while self.cursor < end {
            let index = self.cursor;
            let operation = &self.operations[index];
            self.states[index] = UnitState::Running;

            let result = match panic::catch_unwind(AssertUnwindSafe(|| operation.run())) {
                Ok(result) => result.map_err(|e| e.message().to_string()),
                Err(payload) => Err(format!("Unit panicked: {}", panic_message(payload.as_ref()))),
            };

            match result {
                Ok(()) => {
                    self.states[index] = UnitState::Done;
                    self.report.record_success();
                }
                Err(message) => {
                    let failure = UnitFailure {
                        index,
                        label: operation.label(),
                        message,
                    };
                    tracing::warn!(
                        "Unit #{} ({}) failed: {}",
                        index + 1,
                        failure.label,
                        failure.message
                    );
                    self.sink.unit_failed(&failure);
                    self.states[index] = UnitState::Failed(failure.message.clone());
                    self.report.record_failure(failure);
                    outcome.failed += 1;
                }
            }

            outcome.attempted += 1;
            self.cursor += 1;
        }

        self.report.record_tick();
        self.report.elapsed = started.elapsed();

        if outcome.attempted > 0 {
            let values = ProgressValues {
                current: self.cursor,
                total: self.operations.len(),
                elapsed: self.report.elapsed,
            };
            let update = ProgressUpdate {
                title: self.title.clone(),
                current: values.current,
                total: values.total,
                failed: self.report.failed,
                message: render_message(&self.messages.progress_message, &values),
            };
            self.sink.progress(&update);
        }

        outcome.finished = self.is_finished();
        if outcome.finished && !self.finished_reported {
            self.finished_reported = true;
            if self.report.has_failures() {
                tracing::error!("{}", self.messages.error_message);
                tracing::error!("Batch finished with failures:\n{}", self.report.summary());
            } else {
                tracing::info!("Batch finished:\n{}", self.report.summary());
            }
            self.sink.finished(&self.report, &self.messages);
        }

        outcome
    }

    /// Tick until every unit has been attempted
    pub fn run_to_completion(&mut self) -> &BatchReport {
        loop {
            if self.tick().finished {
                break;
            }
        }
        &self.report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnOperation, OperationError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        started: usize,
        updates: Vec<ProgressUpdate>,
        failures: Vec<UnitFailure>,
        finished: usize,
    }

    // Sink that records every callback for assertions
    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Recorded>>);

    impl ProgressSink for RecordingSink {
        fn started(&mut self, _title: &str, _message: &str) {
            self.0.lock().unwrap().started += 1;
        }

        fn progress(&mut self, update: &ProgressUpdate) {
            self.0.lock().unwrap().updates.push(update.clone());
        }

        fn unit_failed(&mut self, failure: &UnitFailure) {
            self.0.lock().unwrap().failures.push(failure.clone());
        }

        fn finished(&mut self, _report: &BatchReport, _messages: &BatchMessages) {
            self.0.lock().unwrap().finished += 1;
        }
    }

    fn counting_batch(count: usize, fail_at: Option<usize>, calls: Arc<AtomicUsize>) -> Batch {
        let mut batch = Batch::new("Test batch");
        for i in 0..count {
            let calls = Arc::clone(&calls);
            batch.add_operation(FnOperation::new(format!("unit {}", i + 1), move || {
                calls.fetch_add(1, Ordering::SeqCst);
                if Some(i) == fail_at {
                    Err(OperationError::new("simulated load error"))
                } else {
                    Ok(())
                }
            }));
        }
        batch
    }

    fn config(ops_per_tick: usize) -> BatchConfig {
        BatchConfig {
            ops_per_tick,
            tick_interval_ms: 1,
        }
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let calls = Arc::new(AtomicUsize::new(0));
        let batch = counting_batch(3, Some(1), Arc::clone(&calls));
        let mut runner = BatchRunner::new(batch, config(10)).unwrap();

        let report = runner.run_to_completion().clone();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].label, "unit 2");
        assert_eq!(
            runner.states(),
            &[
                UnitState::Done,
                UnitState::Failed("simulated load error".to_string()),
                UnitState::Done,
            ]
        );
    }

    #[test]
    fn test_panicking_unit_is_recorded_as_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut batch = Batch::new("Test batch");
        for i in 0..3 {
            let calls = Arc::clone(&calls);
            batch.add_operation(FnOperation::new(format!("unit {}", i + 1), move || {
                calls.fetch_add(1, Ordering::SeqCst);
                if i == 1 {
                    panic!("service file vanished");
                }
                Ok(())
            }));
        }
        let mut runner = BatchRunner::new(batch, config(10)).unwrap();

        let report = runner.run_to_completion().clone();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].message, "Unit panicked: service file vanished");
        assert_eq!(runner.states()[2], UnitState::Done);
    }

    #[test]
    fn test_ticks_respect_ops_per_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let batch = counting_batch(5, None, Arc::clone(&calls));
        let mut runner = BatchRunner::new(batch, config(2)).unwrap();

        let first = runner.tick();
        assert_eq!(first.attempted, 2);
        assert!(!first.finished);
        assert_eq!(runner.remaining(), 3);
        assert_eq!(runner.states()[2], UnitState::Pending);

        runner.tick();
        let last = runner.tick();
        assert_eq!(last.attempted, 1);
        assert!(last.finished);
        assert_eq!(runner.report().ticks, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_progress_messages() {
        let sink = RecordingSink::default();
        let batch = counting_batch(4, Some(3), Arc::new(AtomicUsize::new(0))).with_messages(BatchMessages {
            progress_message: "Processed @current out of @total.".to_string(),
            ..BatchMessages::default()
        });
        let mut runner = BatchRunner::new(batch, config(2))
            .unwrap()
            .with_progress_sink(sink.clone());

        runner.run_to_completion();

        let recorded = sink.0.lock().unwrap();
        assert_eq!(recorded.started, 1);
        assert_eq!(recorded.finished, 1);
        let messages: Vec<&str> = recorded.updates.iter().map(|u| u.message.as_str()).collect();
        assert_eq!(messages, vec!["Processed 2 out of 4.", "Processed 4 out of 4."]);
        assert_eq!(recorded.updates[1].failed, 1);
        assert_eq!(recorded.failures.len(), 1);
        assert_eq!(recorded.failures[0].index, 3);
    }

    #[test]
    fn test_empty_batch_finishes_on_first_tick() {
        let sink = RecordingSink::default();
        let mut runner = BatchRunner::new(Batch::new("Empty"), config(1))
            .unwrap()
            .with_progress_sink(sink.clone());

        let outcome = runner.tick();
        assert!(outcome.finished);
        assert_eq!(outcome.attempted, 0);

        let recorded = sink.0.lock().unwrap();
        assert!(recorded.updates.is_empty());
        assert_eq!(recorded.finished, 1);
    }

    #[test]
    fn test_finished_reported_once() {
        let sink = RecordingSink::default();
        let batch = counting_batch(1, None, Arc::new(AtomicUsize::new(0)));
        let mut runner = BatchRunner::new(batch, config(1))
            .unwrap()
            .with_progress_sink(sink.clone());

        runner.tick();
        runner.tick();
        runner.tick();

        assert_eq!(sink.0.lock().unwrap().finished, 1);
        assert_eq!(runner.report().attempted(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = BatchRunner::new(Batch::new("Bad"), config(0));
        assert!(matches!(result, Err(BatchError::Config(_))));
    }
}
