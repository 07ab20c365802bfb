//! Submission lifecycle: discover pages, queue one unit per page, track the run

use crate::dispatcher::Dispatcher;
use crate::terms::resolve_terms;
use crate::walker::{Expansion, HierarchyWalker};
use crate::{PlannerConfig, PlannerError, Selector};
use scribe_batch::{Batch, BatchReport};
use scribe_domain::traits::{
    Action, ActionRegistry, EntityStore, HierarchyQueries, Messenger, TermResolver,
};
use scribe_domain::{NodeId, ResolvedTerms};
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex};

/// Where a submission is in its lifecycle
///
/// `Idle -> ResolvingTerms -> Walking -> Selecting -> Queued -> Processing
/// -> Completed`, with `Aborted` reachable from any non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing started
    Idle,
    /// Looking up vocabulary terms
    ResolvingTerms,
    /// Expanding the root into containers
    Walking,
    /// Running the pending-pages query
    Selecting,
    /// Batch built, not yet running
    Queued,
    /// Batch running
    Processing,
    /// Every unit attempted
    Completed,
    /// Stopped before queuing, or interrupted while processing
    Aborted(String),
}

impl SubmissionState {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted(_))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ResolvingTerms => "resolving terms",
            Self::Walking => "walking",
            Self::Selecting => "selecting",
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Aborted(_) => "aborted",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// Everything discovery found for a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The collection the walk started from
    pub root: NodeId,

    /// Terms resolved for this submission
    pub terms: ResolvedTerms,

    /// Containers found below the root
    pub expansion: Expansion,

    /// Pages to extract, ascending by id
    pub pending: Vec<NodeId>,
}

/// Turns an operator's collection choice into a queued extraction batch
///
/// A submission is single-use. Discovery runs synchronously and completes
/// before any unit is built; any failure on the way aborts with nothing
/// queued.
pub struct Submission<S, R> {
    store: Arc<Mutex<S>>,
    registry: R,
    config: PlannerConfig,
    state: SubmissionState,
}

impl<S, R> Submission<S, R>
where
    S: TermResolver + HierarchyQueries + EntityStore + Send + 'static,
    <S as TermResolver>::Error: Display,
    <S as HierarchyQueries>::Error: Display,
    <S as EntityStore>::Error: Display,
    R: ActionRegistry,
    R::Action: Send + Sync + 'static,
    <R::Action as Action>::Error: Display,
    R::Error: Display,
{
    /// Create an idle submission
    pub fn new(store: Arc<Mutex<S>>, registry: R, config: PlannerConfig) -> Self {
        Self {
            store,
            registry,
            config,
            state: SubmissionState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Run discovery without queuing anything
    ///
    /// On success the submission returns to `Idle` and may still be
    /// submitted.
    pub fn plan(&mut self, root: NodeId) -> Result<Plan, PlannerError> {
        self.require(SubmissionState::Idle)?;
        self.config.validate().map_err(PlannerError::Config)?;

        match self.discover(root) {
            Ok(plan) => {
                self.transition(SubmissionState::Idle);
                Ok(plan)
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Discover pending pages under `root` and build their batch
    ///
    /// The action is loaded before anything else, so an unknown handle
    /// aborts without touching the repository.
    pub fn submit<M: Messenger>(&mut self, root: NodeId, messenger: &M) -> Result<Batch, PlannerError> {
        self.require(SubmissionState::Idle)?;
        self.config.validate().map_err(PlannerError::Config)?;

        let action = match self.load_action() {
            Ok(action) => action,
            Err(e) => return Err(self.abort(e)),
        };

        let plan = match self.discover(root) {
            Ok(plan) => plan,
            Err(e) => return Err(self.abort(e)),
        };

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.store),
            action,
            self.config.batch_title.clone(),
            self.config.batch_messages(),
        );
        let batch = dispatcher.dispatch(&plan.pending);

        tracing::info!("Processing {}", batch.len());
        messenger.status(&self.config.status_message);
        self.transition(SubmissionState::Queued);

        Ok(batch)
    }

    /// Mark the queued batch as running
    pub fn start_processing(&mut self) -> Result<(), PlannerError> {
        self.require(SubmissionState::Queued)?;
        self.transition(SubmissionState::Processing);
        Ok(())
    }

    /// Record the end of the run
    ///
    /// A complete report moves to `Completed`, failed units included. A run
    /// that stopped with units still pending is `Aborted`.
    pub fn finish(&mut self, report: &BatchReport) -> Result<&SubmissionState, PlannerError> {
        self.require(SubmissionState::Processing)?;

        if report.is_complete() {
            self.transition(SubmissionState::Completed);
        } else {
            let pending = report.total - report.attempted();
            self.transition(SubmissionState::Aborted(format!(
                "Interrupted with {} units pending",
                pending
            )));
        }

        Ok(&self.state)
    }

    fn load_action(&self) -> Result<Arc<R::Action>, PlannerError> {
        let handle = &self.config.action_handle;
        self.registry
            .load_action(handle)
            .map_err(|e| PlannerError::Registry(e.to_string()))?
            .ok_or_else(|| PlannerError::ActionNotFound(handle.clone()))
    }

    fn discover(&mut self, root: NodeId) -> Result<Plan, PlannerError> {
        let store = Arc::clone(&self.store);
        let store = store
            .lock()
            .map_err(|e| PlannerError::Query(format!("Store lock error: {}", e)))?;

        self.transition(SubmissionState::ResolvingTerms);
        let terms = resolve_terms(&*store)?;

        self.transition(SubmissionState::Walking);
        let expansion = HierarchyWalker::new(&*store, self.config.max_depth)
            .expand(root, &terms.containers)?;

        self.transition(SubmissionState::Selecting);
        let pending = Selector::new(&*store).select(
            &expansion.containers,
            terms.part,
            terms.extracted_text,
        )?;

        Ok(Plan {
            root,
            terms,
            expansion,
            pending,
        })
    }

    fn require(&self, expected: SubmissionState) -> Result<(), PlannerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PlannerError::InvalidState(format!(
                "expected {}, found {}",
                expected, self.state
            )))
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        tracing::debug!("Submission {} -> {}", self.state, next);
        self.state = next;
    }

    fn abort(&mut self, error: PlannerError) -> PlannerError {
        tracing::error!("Submission aborted: {}", error);
        self.transition(SubmissionState::Aborted(error.to_string()));
        error
    }
}
