//! Scribe Planner
//!
//! Finds the pages of a collection that still need OCR text and queues one
//! extraction unit per page.
//!
//! # Overview
//!
//! A submission runs three steps against the repository before anything is
//! queued:
//! - **Term resolution**: map the fixed vocabulary URIs to local term ids
//! - **Hierarchy walk**: expand the chosen collection into every container
//!   below it (collections, compound objects, newspapers, books, issues)
//! - **Selection**: find Part nodes directly under those containers that have
//!   no Extracted Text media yet
//!
//! The selection is then dispatched as a [`scribe_batch::Batch`] with one
//! [`ExtractTextOperation`] per page.
//!
//! # Architecture
//!
//! ```text
//! collection → terms → walker → selector → dispatcher → BatchRunner
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use scribe_planner::{PlannerConfig, Submission};
//! use scribe_domain::traits::Messenger;
//! use scribe_domain::NodeId;
//! # use scribe_domain::traits::{Action, ActionRegistry};
//! # use scribe_domain::Node;
//! use scribe_store::SqliteStore;
//! use std::sync::{Arc, Mutex};
//! # struct Noop;
//! # impl Action for Noop {
//! #     type Error = String;
//! #     fn handle(&self) -> &str { "extract_text_from_service_file" }
//! #     fn execute(&self, _nodes: &[Node]) -> Result<(), String> { Ok(()) }
//! # }
//! # struct Registry;
//! # impl ActionRegistry for Registry {
//! #     type Action = Noop;
//! #     type Error = String;
//! #     fn load_action(&self, _handle: &str) -> Result<Option<Arc<Noop>>, String> { Ok(Some(Arc::new(Noop))) }
//! # }
//!
//! struct Console;
//! impl Messenger for Console {
//!     fn status(&self, message: &str) {
//!         println!("{}", message);
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(Mutex::new(SqliteStore::new("repository.db")?));
//! let mut submission = Submission::new(store, Registry, PlannerConfig::default());
//!
//! let batch = submission.submit(NodeId::new(42), &Console)?;
//! println!("Queued {} pages", batch.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod selector;
mod submission;
mod terms;
mod walker;

#[cfg(test)]
mod fixtures;

pub use config::PlannerConfig;
pub use dispatcher::{Dispatcher, ExtractTextOperation};
pub use error::{PlannerError, UnitError};
pub use selector::Selector;
pub use submission::{Plan, Submission, SubmissionState};
pub use terms::{lookup_vocabulary, resolve_term, resolve_terms, TermLookup};
pub use walker::{Expansion, HierarchyWalker};
