//! Recording store operations for invariant checks.

use wallfeed_app::{FetchMode, FetchOutcome, MergePolicy, MessageFeedStore};
use wallfeed_client::Transport;

use crate::FeedSnapshot;

/// Store operation a test can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOp {
    /// [`MessageFeedStore::load_more`].
    LoadMore,
    /// [`MessageFeedStore::fetch_page`].
    FetchPage {
        /// 1-based page.
        page: usize,
        /// Merge mode.
        mode: FetchMode,
    },
    /// [`MessageFeedStore::reset_and_load`].
    ResetAndLoad,
}

/// One applied operation and the state it left behind.
#[derive(Debug, Clone)]
pub struct Step {
    /// Operation applied.
    pub op: FeedOp,
    /// What the store reported.
    pub outcome: FetchOutcome,
    /// State before the operation.
    pub before: FeedSnapshot,
    /// State after the operation.
    pub after: FeedSnapshot,
}

/// Ordered record of operations applied to one store.
#[derive(Debug, Clone, Default)]
pub struct FeedTrace {
    /// Merge policy of the traced store.
    pub policy: MergePolicy,
    /// Steps in application order.
    pub steps: Vec<Step>,
}

impl FeedTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace holding a single step.
    pub fn single(step: Step) -> Self {
        Self { steps: vec![step], ..Self::default() }
    }

    /// State after the last step.
    pub fn last(&self) -> Option<&FeedSnapshot> {
        self.steps.last().map(|s| &s.after)
    }
}

/// Applies operations to a store one at a time and records each step.
pub struct Tracer<'a, T> {
    store: &'a MessageFeedStore<T>,
    trace: FeedTrace,
}

impl<'a, T: Transport> Tracer<'a, T> {
    /// Trace operations on `store`.
    pub fn new(store: &'a MessageFeedStore<T>) -> Self {
        let trace = FeedTrace { policy: store.config().merge_policy, ..FeedTrace::new() };
        Self { store, trace }
    }

    /// Apply `op` to completion and record it.
    pub async fn apply(&mut self, op: FeedOp) -> FetchOutcome {
        let before = FeedSnapshot::capture(&self.store.snapshot());

        let outcome = match op {
            FeedOp::LoadMore => self.store.load_more().await,
            FeedOp::FetchPage { page, mode } => self.store.fetch_page(page, mode).await,
            FeedOp::ResetAndLoad => self.store.reset_and_load().await,
        };

        let after = FeedSnapshot::capture(&self.store.snapshot());
        tracing::trace!(?op, ?outcome, loaded = after.ids.len(), "step recorded");
        self.trace.steps.push(Step { op, outcome, before, after });
        outcome
    }

    /// Steps recorded so far.
    pub fn trace(&self) -> &FeedTrace {
        &self.trace
    }
}
