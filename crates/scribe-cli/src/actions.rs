//! Derivative actions and the catalog they are looked up in.

use crate::config::ActionConfig;
use scribe_domain::traits::{Action, ActionRegistry};
use scribe_domain::{Node, NodeId};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// MIME type of the derivative the OCR connector produces.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Errors raised by derivative actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The node has no service file to extract from
    #[error("Node {0} has no service file")]
    MissingServiceFile(NodeId),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The queue endpoint rejected the event
    #[error("Queue endpoint returned {status}: {body}")]
    Rejected {
        /// HTTP status
        status: u16,
        /// Response body
        body: String,
    },
}

/// Build the "Generate Derivative" event for a node.
///
/// The event follows the ActivityStreams shape the derivative connectors
/// consume: the node as object, the service file as source, and a
/// `text/plain` destination.
pub fn derivative_event(node: &Node, config: &ActionConfig) -> Result<Value, ActionError> {
    let source = node
        .service_file
        .as_ref()
        .ok_or(ActionError::MissingServiceFile(node.id))?;

    let site = config.site_url.trim_end_matches('/');
    let destination = config.destination_template.replace("{nid}", &node.id.to_string());

    Ok(json!({
        "@context": "https://www.w3.org/ns/activitystreams",
        "type": "Activity",
        "summary": "Generate Derivative",
        "object": {
            "id": format!("urn:uuid:{}", node.uuid),
            "url": [{
                "name": "Canonical",
                "type": "Link",
                "href": format!("{}/node/{}", site, node.id),
                "mediaType": "text/html",
                "rel": "canonical"
            }],
            "isNewVersion": false
        },
        "attachment": {
            "type": "Object",
            "mediaType": "application/json",
            "content": {
                "event": "Generate Derivative",
                "source_uri": source.uri,
                "source_mimetype": source.mime_type,
                "destination_uri": destination,
                "file_upload_uri": destination,
                "mimetype": TEXT_MIME_TYPE,
                "args": config.args
            }
        }
    }))
}

/// Posts a derivative event per node to the OCR queue.
pub struct HttpDerivativeAction {
    config: ActionConfig,
    client: reqwest::blocking::Client,
}

impl HttpDerivativeAction {
    /// Create an action posting to the configured queue.
    pub fn new(config: ActionConfig) -> Result<Self, ActionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ActionError::HttpClient(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn post(&self, node: &Node) -> Result<(), ActionError> {
        let event = derivative_event(node, &self.config)?;
        let url = self.config.queue_url();

        let response = self
            .client
            .post(&url)
            .json(&event)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ActionError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    ActionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ActionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Queued derivative for {} at {}", node.label(), url);
        Ok(())
    }
}

/// Logs the event it would post instead of posting it.
pub struct DryRunAction {
    config: ActionConfig,
    planned: AtomicUsize,
}

impl DryRunAction {
    /// Create a dry-run action.
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            planned: AtomicUsize::new(0),
        }
    }

    /// Events that would have been posted.
    pub fn planned(&self) -> usize {
        self.planned.load(Ordering::SeqCst)
    }
}

/// An action the catalog can hand out.
pub enum CatalogAction {
    /// Posts to the derivative queue
    Http(HttpDerivativeAction),
    /// Logs only
    DryRun(DryRunAction),
}

impl CatalogAction {
    fn config(&self) -> &ActionConfig {
        match self {
            Self::Http(action) => &action.config,
            Self::DryRun(action) => &action.config,
        }
    }
}

impl Action for CatalogAction {
    type Error = ActionError;

    fn handle(&self) -> &str {
        &self.config().handle
    }

    fn execute(&self, nodes: &[Node]) -> Result<(), Self::Error> {
        for node in nodes {
            match self {
                Self::Http(action) => action.post(node)?,
                Self::DryRun(action) => {
                    let event = derivative_event(node, &action.config)?;
                    action.planned.fetch_add(1, Ordering::SeqCst);
                    tracing::info!(
                        "Dry run: would queue {} to {}: {}",
                        node.label(),
                        action.config.queue_url(),
                        event
                    );
                }
            }
        }
        Ok(())
    }
}

/// Actions available to submissions, keyed by handle.
#[derive(Default)]
pub struct ActionCatalog {
    actions: HashMap<String, Arc<CatalogAction>>,
}

impl ActionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the configured derivative action.
    pub fn from_config(config: &ActionConfig, dry_run: bool) -> Result<Self, ActionError> {
        let action = if dry_run {
            CatalogAction::DryRun(DryRunAction::new(config.clone()))
        } else {
            CatalogAction::Http(HttpDerivativeAction::new(config.clone())?)
        };

        let mut catalog = Self::new();
        catalog.register(action);
        Ok(catalog)
    }

    /// Add an action under its own handle, replacing any previous one.
    pub fn register(&mut self, action: CatalogAction) {
        self.actions
            .insert(action.handle().to_string(), Arc::new(action));
    }
}

impl ActionRegistry for ActionCatalog {
    type Action = CatalogAction;
    type Error = std::convert::Infallible;

    fn load_action(&self, handle: &str) -> Result<Option<Arc<Self::Action>>, Self::Error> {
        Ok(self.actions.get(handle).cloned())
    }
}
