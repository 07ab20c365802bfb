//! Batch definition: operations plus the messages shown while they run

use crate::OperationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unique identifier for a batch (UUIDv7, so ids sort by creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(uuid::Uuid);

impl BatchId {
    /// Generate a new batch id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One independent unit of work in a batch
///
/// Operations must be self-contained: a unit may be re-run if the host
/// retries, and no state is shared between units except read-only handles.
pub trait Operation: Send {
    /// Short description used in progress and failure reports
    fn label(&self) -> String;

    /// Run the unit
    fn run(&self) -> Result<(), OperationError>;
}

/// An operation backed by a closure
pub struct FnOperation<F> {
    label: String,
    f: F,
}

impl<F> FnOperation<F>
where
    F: Fn() -> Result<(), OperationError> + Send,
{
    /// Wrap a closure as an operation
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<F> Operation for FnOperation<F>
where
    F: Fn() -> Result<(), OperationError> + Send,
{
    fn label(&self) -> String {
        self.label.clone()
    }

    fn run(&self) -> Result<(), OperationError> {
        (self.f)()
    }
}

/// Message templates shown while a batch runs
///
/// The progress template understands `@current`, `@remaining`, `@total`,
/// `@percentage`, `@elapsed` and `@estimate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMessages {
    /// Shown before the first tick
    #[serde(default = "default_init_message")]
    pub init_message: String,

    /// Shown after every tick
    #[serde(default = "default_progress_message")]
    pub progress_message: String,

    /// Shown when the batch finishes with failures
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

fn default_init_message() -> String {
    "Initializing.".to_string()
}

fn default_progress_message() -> String {
    "Completed @current of @total.".to_string()
}

fn default_error_message() -> String {
    "An error has occurred.".to_string()
}

impl Default for BatchMessages {
    fn default() -> Self {
        Self {
            init_message: default_init_message(),
            progress_message: default_progress_message(),
            error_message: default_error_message(),
        }
    }
}

/// An ordered list of operations with a title and message templates
///
/// # Examples
///
/// ```
/// use scribe_batch::{Batch, FnOperation};
///
/// let mut batch = Batch::new("Extracting text...");
/// batch.add_operation(FnOperation::new("unit 1", || Ok(())));
/// assert_eq!(batch.len(), 1);
/// ```
pub struct Batch {
    id: BatchId,
    title: String,
    operations: Vec<Box<dyn Operation>>,
    messages: BatchMessages,
}

impl Batch {
    /// Create an empty batch
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BatchId::new(),
            title: title.into(),
            operations: Vec::new(),
            messages: BatchMessages::default(),
        }
    }

    /// Replace the message templates
    pub fn with_messages(mut self, messages: BatchMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Append an operation
    pub fn add_operation<O: Operation + 'static>(&mut self, operation: O) {
        self.operations.push(Box::new(operation));
    }

    /// Batch identifier
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Batch title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Message templates
    pub fn messages(&self) -> &BatchMessages {
        &self.messages
    }

    /// Labels of the queued operations, in order
    pub fn labels(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.label()).collect()
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the batch has no operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub(crate) fn into_parts(self) -> (BatchId, String, Vec<Box<dyn Operation>>, BatchMessages) {
        (self.id, self.title, self.operations, self.messages)
    }
}

/// Values substituted into the progress template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressValues {
    /// Operations attempted so far
    pub current: usize,

    /// Operations in the batch
    pub total: usize,

    /// Time since the first tick
    pub elapsed: Duration,
}

impl ProgressValues {
    /// Operations not yet attempted
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.current)
    }

    /// Whole percentage complete; an empty batch is 100%
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.current * 100 / self.total
        }
    }

    /// Projected time left, from the average time per attempted operation
    pub fn estimate(&self) -> Duration {
        if self.current == 0 {
            return Duration::ZERO;
        }
        let per_op = self.elapsed / self.current as u32;
        per_op * self.remaining() as u32
    }
}

/// Fill a message template with progress values
pub fn render_message(template: &str, values: &ProgressValues) -> String {
    template
        .replace("@current", &values.current.to_string())
        .replace("@remaining", &values.remaining().to_string())
        .replace("@total", &values.total.to_string())
        .replace("@percentage", &values.percentage().to_string())
        .replace("@elapsed", &format_interval(values.elapsed))
        .replace("@estimate", &format_interval(values.estimate()))
}

/// Format a duration with its two most significant units
///
/// # Examples
///
/// ```
/// use scribe_batch::format_interval;
/// use std::time::Duration;
///
/// assert_eq!(format_interval(Duration::from_secs(0)), "0 sec");
/// assert_eq!(format_interval(Duration::from_secs(75)), "1 min 15 sec");
/// assert_eq!(format_interval(Duration::from_secs(3725)), "1 hour 2 min");
/// ```
pub fn format_interval(duration: Duration) -> String {
    const UNITS: [(u64, &str, &str); 3] = [(3600, "hour", "hours"), (60, "min", "min"), (1, "sec", "sec")];

    let mut secs = duration.as_secs();
    let mut parts = Vec::new();

    for (size, singular, plural) in UNITS {
        if parts.len() == 2 {
            break;
        }
        if secs >= size {
            let count = secs / size;
            secs %= size;
            parts.push(format!("{} {}", count, if count == 1 { singular } else { plural }));
        } else if !parts.is_empty() {
            // Granularity counts adjacent units only
            break;
        }
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_progress_template() {
        let values = ProgressValues {
            current: 3,
            total: 12,
            elapsed: Duration::from_secs(30),
        };

        let message = render_message(
            "Processed @current out of @total. Estimated time: @estimate.",
            &values,
        );
        assert_eq!(message, "Processed 3 out of 12. Estimated time: 1 min 30 sec.");
    }

    #[test]
    fn test_render_all_placeholders() {
        let values = ProgressValues {
            current: 1,
            total: 4,
            elapsed: Duration::from_secs(2),
        };

        let message = render_message("@current/@total @remaining left @percentage% @elapsed", &values);
        assert_eq!(message, "1/4 3 left 25% 2 sec");
    }

    #[test]
    fn test_estimate_before_first_unit() {
        let values = ProgressValues {
            current: 0,
            total: 10,
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(values.estimate(), Duration::ZERO);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let values = ProgressValues {
            current: 0,
            total: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(values.percentage(), 100);
        assert_eq!(values.remaining(), 0);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_millis(400)), "0 sec");
        assert_eq!(format_interval(Duration::from_secs(1)), "1 sec");
        assert_eq!(format_interval(Duration::from_secs(60)), "1 min");
        assert_eq!(format_interval(Duration::from_secs(7200)), "2 hours");
        assert_eq!(format_interval(Duration::from_secs(3601)), "1 hour");
    }

    #[test]
    fn test_batch_collects_operations() {
        let mut batch = Batch::new("Test");
        assert!(batch.is_empty());

        batch.add_operation(FnOperation::new("a", || Ok(())));
        batch.add_operation(FnOperation::new("b", || Err(OperationError::new("boom"))));

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.labels(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(batch.messages(), &BatchMessages::default());
    }
}
