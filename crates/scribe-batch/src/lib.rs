//! Scribe Batch
//!
//! Progress-tracked execution of independent units of work.
//!
//! # Overview
//!
//! A [`Batch`] is a titled, ordered list of [`Operation`]s plus the message
//! templates shown while it runs. The [`BatchRunner`] executes it a few
//! operations per tick:
//! - **Fault isolation**: a failing unit is recorded and the rest still run
//! - **Progress**: a rendered progress message after every tick
//! - **Reporting**: a [`BatchReport`] with per-unit failures at the end
//!
//! ## Unit Lifecycle
//!
//! | State | Meaning |
//! |-------|---------|
//! | **Pending** | Queued, not yet attempted |
//! | **Running** | Executing in the current tick |
//! | **Done** | Completed without error |
//! | **Failed** | Returned an error; recorded in the report |
//!
//! # Usage
//!
//! ## Synchronous Run
//!
//! ```
//! use scribe_batch::{Batch, BatchConfig, BatchRunner, FnOperation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut batch = Batch::new("Extracting text...");
//! batch.add_operation(FnOperation::new("node 1", || Ok(())));
//!
//! let mut runner = BatchRunner::new(batch, BatchConfig::default())?;
//! let report = runner.run_to_completion();
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use scribe_batch::{Batch, BatchConfig, BatchRunner, BatchWorker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::background();
//!     let runner = BatchRunner::new(Batch::new("Extracting text..."), config.clone())?;
//!
//!     // Tick until finished (or Ctrl+C)
//!     let runner = BatchWorker::new(&config).run(runner).await?;
//!     println!("{}", runner.report().summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [batch]
//! ops_per_tick = 5
//! tick_interval_ms = 100
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod report;
mod runner;
mod worker;

pub use batch::{
    format_interval, render_message, Batch, BatchId, BatchMessages, FnOperation, Operation,
    ProgressValues,
};
pub use config::BatchConfig;
pub use error::{BatchError, OperationError};
pub use report::{BatchReport, UnitFailure};
pub use runner::{BatchRunner, ProgressSink, ProgressUpdate, TickOutcome, TracingProgress, UnitState};
pub use worker::BatchWorker;
