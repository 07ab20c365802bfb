//! Operator-facing status and progress output.

use crate::output::Formatter;
use scribe_batch::{BatchMessages, BatchReport, ProgressSink, ProgressUpdate, UnitFailure};
use scribe_domain::traits::Messenger;

/// Prints status messages to stdout.
pub struct ConsoleMessenger {
    formatter: Formatter,
}

impl ConsoleMessenger {
    /// Create a messenger using the given formatter.
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }
}

impl Messenger for ConsoleMessenger {
    fn status(&self, message: &str) {
        println!("{}", self.formatter.info(message));
    }
}

/// Prints batch progress to stderr as it runs.
pub struct ConsoleProgress {
    formatter: Formatter,
}

impl ConsoleProgress {
    /// Create a progress printer using the given formatter.
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }
}

impl ProgressSink for ConsoleProgress {
    fn started(&mut self, title: &str, _message: &str) {
        eprintln!("{}", self.formatter.info(title));
    }

    fn progress(&mut self, update: &ProgressUpdate) {
        eprintln!("{}", update.message);
    }

    fn unit_failed(&mut self, failure: &UnitFailure) {
        eprintln!(
            "{}",
            self.formatter
                .warning(&format!("{}: {}", failure.label, failure.message))
        );
    }

    fn finished(&mut self, report: &BatchReport, messages: &BatchMessages) {
        if report.has_failures() {
            eprintln!("{}", self.formatter.error(&messages.error_message));
        }
    }
}
