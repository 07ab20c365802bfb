//! Error types for the planner

use scribe_batch::OperationError;
use scribe_domain::NodeId;
use thiserror::Error;

/// Errors that abort a submission
///
/// All of these occur before any unit is queued.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A fixed vocabulary URI has no local term
    #[error("No term found for URI: {uri}")]
    TermNotFound {
        /// The unmapped URI
        uri: String,
    },

    /// The term lookup itself failed
    #[error("Failed to resolve term for {uri}: {reason}")]
    TermResolution {
        /// The URI being resolved
        uri: String,
        /// Underlying failure
        reason: String,
    },

    /// A discovery query failed
    #[error("Query error: {0}")]
    Query(String),

    /// The walk did not converge within the depth bound
    #[error("Hierarchy deeper than {max_depth} levels")]
    HierarchyTooDeep {
        /// The configured bound
        max_depth: usize,
    },

    /// No action is registered under the handle
    #[error("Action not found: {0}")]
    ActionNotFound(String),

    /// The action registry failed
    #[error("Action registry error: {0}")]
    Registry(String),

    /// Operation not allowed in the current submission state
    #[error("Invalid submission state: {0}")]
    InvalidState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single extraction unit
///
/// Recorded against the unit; never aborts its siblings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The node no longer exists
    #[error("Node {0} not found")]
    NodeMissing(NodeId),

    /// Loading the node failed
    #[error("Failed to load node {node}: {reason}")]
    Load {
        /// Node being loaded
        node: NodeId,
        /// Underlying failure
        reason: String,
    },

    /// The action failed on the node
    #[error("Action failed on node {node}: {reason}")]
    Action {
        /// Node the action ran on
        node: NodeId,
        /// Underlying failure
        reason: String,
    },
}

impl From<UnitError> for OperationError {
    fn from(e: UnitError) -> Self {
        OperationError::new(e)
    }
}
