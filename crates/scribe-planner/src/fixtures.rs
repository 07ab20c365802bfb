//! In-memory collaborators for unit tests

use scribe_domain::traits::{
    Action, ActionRegistry, EntityStore, HierarchyQueries, MemberQuery, Messenger, PendingQuery,
    TermResolver,
};
use scribe_domain::{Node, NodeId, NodeRow, ServiceFile, TermId, Vocabulary};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Repository fake covering terms, queries and node loads
pub(crate) struct FakeRepository {
    terms: HashMap<&'static str, TermId>,
    nodes: BTreeMap<NodeId, Node>,
    media: Vec<(NodeId, TermId)>,
    queries: AtomicUsize,
    fail_lookups: bool,
    fail_loads: bool,
}

impl FakeRepository {
    /// Repository with every vocabulary entry mapped to terms 1 to 8
    pub(crate) fn with_vocabulary() -> Self {
        let terms = Vocabulary::ALL
            .iter()
            .enumerate()
            .map(|(i, v)| (v.uri(), TermId::new(i as u64 + 1)))
            .collect();

        Self {
            terms,
            nodes: BTreeMap::new(),
            media: Vec::new(),
            queries: AtomicUsize::new(0),
            fail_lookups: false,
            fail_loads: false,
        }
    }

    pub(crate) fn without_term(mut self, vocabulary: Vocabulary) -> Self {
        self.terms.remove(vocabulary.uri());
        self
    }

    pub(crate) fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub(crate) fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    pub(crate) fn term(&self, vocabulary: Vocabulary) -> TermId {
        self.terms[vocabulary.uri()]
    }

    /// Add a node with the given model and parents
    pub(crate) fn add_node(&mut self, id: u64, model: Vocabulary, parents: &[u64]) -> NodeId {
        let node_id = NodeId::new(id);
        let model = self.terms.get(model.uri()).copied();
        self.nodes.insert(
            node_id,
            Node {
                id: node_id,
                uuid: format!("uuid-{}", id),
                bundle: "islandora_object".to_string(),
                title: format!("Node {}", id),
                model,
                member_of: parents.iter().copied().map(NodeId::new).collect(),
                service_file: Some(ServiceFile {
                    media_id: id,
                    uri: format!("public://{}.tiff", id),
                    mime_type: "image/tiff".to_string(),
                }),
            },
        );
        node_id
    }

    /// Attach a media with the given use to a node
    pub(crate) fn add_media(&mut self, node: u64, media_use: Vocabulary) {
        let term = self.term(media_use);
        self.media.push((NodeId::new(node), term));
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn members_of<'a>(
        &'a self,
        parents: &'a [NodeId],
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.member_of.iter().any(|p| parents.contains(p)))
    }
}

impl TermResolver for FakeRepository {
    type Error = String;

    fn term_for_uri(&self, uri: &str) -> Result<Option<TermId>, Self::Error> {
        if self.fail_lookups {
            return Err("taxonomy unavailable".to_string());
        }
        Ok(self.terms.get(uri).copied())
    }
}

impl HierarchyQueries for FakeRepository {
    type Error = String;

    fn member_nodes(&self, query: &MemberQuery) -> Result<Vec<NodeId>, Self::Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if query.parents.is_empty() || query.models.is_empty() {
            return Err("empty list parameter".to_string());
        }

        Ok(self
            .members_of(&query.parents)
            .filter(|n| n.model.is_some_and(|m| query.models.contains(&m)))
            .map(|n| n.id)
            .collect())
    }

    fn pending_parts(&self, query: &PendingQuery) -> Result<Vec<NodeRow>, Self::Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if query.containers.is_empty() {
            return Err("empty list parameter".to_string());
        }

        Ok(self
            .members_of(&query.containers)
            .filter(|n| n.model == Some(query.part_model))
            .filter(|n| {
                !self
                    .media
                    .iter()
                    .any(|(of, u)| *of == n.id && *u == query.excluded_use)
            })
            .map(|n| NodeRow { nid: n.id })
            .collect())
    }
}

impl EntityStore for FakeRepository {
    type Error = String;

    fn load_node(&self, id: NodeId) -> Result<Option<Node>, Self::Error> {
        if self.fail_loads {
            return Err("storage offline".to_string());
        }
        Ok(self.nodes.get(&id).cloned())
    }
}

/// Action that records the nodes it ran on
#[derive(Default)]
pub(crate) struct RecordingAction {
    executed: Mutex<Vec<NodeId>>,
    fail_on: Vec<NodeId>,
}

impl RecordingAction {
    pub(crate) fn failing_on(ids: &[u64]) -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            fail_on: ids.iter().copied().map(NodeId::new).collect(),
        }
    }

    pub(crate) fn executed(&self) -> Vec<NodeId> {
        self.executed.lock().unwrap().clone()
    }
}

impl Action for RecordingAction {
    type Error = String;

    fn handle(&self) -> &str {
        "extract_text_from_service_file"
    }

    fn execute(&self, nodes: &[Node]) -> Result<(), Self::Error> {
        for node in nodes {
            if self.fail_on.contains(&node.id) {
                return Err(format!("derivative queue rejected {}", node.id));
            }
            self.executed.lock().unwrap().push(node.id);
        }
        Ok(())
    }
}

/// Registry holding at most one action
pub(crate) struct FakeRegistry {
    action: Option<Arc<RecordingAction>>,
    lookups: AtomicUsize,
}

impl FakeRegistry {
    pub(crate) fn with_action(action: Arc<RecordingAction>) -> Self {
        Self {
            action: Some(action),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            action: None,
            lookups: AtomicUsize::new(0),
        }
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ActionRegistry for FakeRegistry {
    type Action = RecordingAction;
    type Error = String;

    fn load_action(&self, handle: &str) -> Result<Option<Arc<Self::Action>>, Self::Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .action
            .as_ref()
            .filter(|a| a.handle() == handle)
            .map(Arc::clone))
    }
}

/// Messenger that keeps every status message
#[derive(Default)]
pub(crate) struct RecordingMessenger {
    messages: Mutex<Vec<String>>,
}

impl RecordingMessenger {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Messenger for RecordingMessenger {
    fn status(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
