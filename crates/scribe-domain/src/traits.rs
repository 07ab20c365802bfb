//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the planning logic and the
//! host infrastructure. Implementations live in other crates (or in tests,
//! as fakes).

use crate::{Node, NodeId, NodeRow, TermId};
use std::sync::Arc;

/// Trait for mapping vocabulary URIs to local term ids
///
/// Implemented by the infrastructure layer (scribe-store)
pub trait TermResolver {
    /// Error type for lookups
    type Error;

    /// Resolve a URI to a term id, or `None` when no term carries it
    fn term_for_uri(&self, uri: &str) -> Result<Option<TermId>, Self::Error>;
}

/// Members of a set of parents, filtered by model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    /// Parent nodes (`field_member_of` targets)
    pub parents: Vec<NodeId>,

    /// Accepted model terms
    pub models: Vec<TermId>,
}

/// Part nodes under a set of containers that lack a given media use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Containers the parts must be direct members of
    pub containers: Vec<NodeId>,

    /// Model term the nodes must carry
    pub part_model: TermId,

    /// Media use that excludes a node when present
    pub excluded_use: TermId,
}

/// Trait for the read-only hierarchy queries
///
/// Implemented by the infrastructure layer (scribe-store). Both queries take
/// list parameters; an empty list is an error, not an empty result.
pub trait HierarchyQueries {
    /// Error type for query execution
    type Error;

    /// Fetch ids of nodes that are members of `parents` with a model in `models`
    fn member_nodes(&self, query: &MemberQuery) -> Result<Vec<NodeId>, Self::Error>;

    /// Fetch Part rows under `containers` with no `excluded_use` media,
    /// ordered by ascending node id
    fn pending_parts(&self, query: &PendingQuery) -> Result<Vec<NodeRow>, Self::Error>;
}

/// Trait for loading full node entities
///
/// Implemented by the infrastructure layer (scribe-store)
pub trait EntityStore {
    /// Error type for loads
    type Error;

    /// Load a node by id
    fn load_node(&self, id: NodeId) -> Result<Option<Node>, Self::Error>;
}

/// A side-effecting action invoked on loaded nodes
pub trait Action {
    /// Error type for execution
    type Error;

    /// The handle this action was registered under
    fn handle(&self) -> &str;

    /// Execute the action against the given nodes
    fn execute(&self, nodes: &[Node]) -> Result<(), Self::Error>;
}

/// Trait for looking up actions by handle
///
/// Implemented by the application layer (scribe-cli)
pub trait ActionRegistry {
    /// Concrete action type handed out
    type Action: Action;

    /// Error type for lookups
    type Error;

    /// Load an action, or `None` when the handle is unknown
    fn load_action(&self, handle: &str) -> Result<Option<Arc<Self::Action>>, Self::Error>;
}

/// One-shot status messages for the operator
pub trait Messenger {
    /// Show a status message
    fn status(&self, message: &str);
}
