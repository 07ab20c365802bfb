//! One extraction unit per selected node

use crate::UnitError;
use scribe_batch::{Batch, BatchMessages, Operation, OperationError};
use scribe_domain::traits::{Action, EntityStore};
use scribe_domain::NodeId;
use std::fmt::Display;
use std::sync::{Arc, Mutex};

/// Loads one node and runs the action on it
///
/// Holds only the node id and shared handles, so running it twice is safe.
pub struct ExtractTextOperation<S, A> {
    node_id: NodeId,
    store: Arc<Mutex<S>>,
    action: Arc<A>,
}

impl<S, A> ExtractTextOperation<S, A>
where
    S: EntityStore,
    S::Error: Display,
    A: Action,
    A::Error: Display,
{
    /// Create a unit for one node
    pub fn new(node_id: NodeId, store: Arc<Mutex<S>>, action: Arc<A>) -> Self {
        Self {
            node_id,
            store,
            action,
        }
    }

    /// The node this unit processes
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn extract(&self) -> Result<(), UnitError> {
        let node = {
            let store = self.store.lock().map_err(|e| UnitError::Load {
                node: self.node_id,
                reason: e.to_string(),
            })?;
            store.load_node(self.node_id).map_err(|e| UnitError::Load {
                node: self.node_id,
                reason: e.to_string(),
            })?
        }
        .ok_or(UnitError::NodeMissing(self.node_id))?;

        self.action
            .execute(std::slice::from_ref(&node))
            .map_err(|e| UnitError::Action {
                node: self.node_id,
                reason: e.to_string(),
            })
    }
}

impl<S, A> Operation for ExtractTextOperation<S, A>
where
    S: EntityStore + Send,
    S::Error: Display,
    A: Action + Send + Sync,
    A::Error: Display,
{
    fn label(&self) -> String {
        format!("node {}", self.node_id)
    }

    fn run(&self) -> Result<(), OperationError> {
        self.extract().map_err(OperationError::from)
    }
}

/// Builds the extraction batch for a selection
pub struct Dispatcher<S, A> {
    store: Arc<Mutex<S>>,
    action: Arc<A>,
    title: String,
    messages: BatchMessages,
}

impl<S, A> Dispatcher<S, A>
where
    S: EntityStore + Send + 'static,
    S::Error: Display,
    A: Action + Send + Sync + 'static,
    A::Error: Display,
{
    /// Create a dispatcher sharing one store handle and one action
    pub fn new(store: Arc<Mutex<S>>, action: Arc<A>, title: impl Into<String>, messages: BatchMessages) -> Self {
        Self {
            store,
            action,
            title: title.into(),
            messages,
        }
    }

    /// One operation per item, in selection order
    pub fn dispatch(&self, items: &[NodeId]) -> Batch {
        let mut batch = Batch::new(self.title.clone()).with_messages(self.messages.clone());

        for node_id in items {
            batch.add_operation(ExtractTextOperation::new(
                *node_id,
                Arc::clone(&self.store),
                Arc::clone(&self.action),
            ));
        }

        batch
    }
}
