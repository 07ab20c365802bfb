//! Command implementations.

pub mod collections;
pub mod config;
pub mod plan;
pub mod submit;
pub mod terms;

pub use self::collections::{execute_collections, find_collections};
pub use self::config::execute_config;
pub use self::plan::execute_plan;
pub use self::submit::{execute_submit, SubmitOutcome};
pub use self::terms::execute_terms;

use crate::error::{CliError, Result};
use scribe_domain::NodeId;

/// Parse a collection argument (`123` or `Some Title (123)`).
pub(crate) fn parse_collection(input: &str) -> Result<NodeId> {
    NodeId::parse(input).map_err(CliError::InvalidInput)
}
