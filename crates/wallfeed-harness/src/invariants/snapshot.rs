//! Observable feed state for invariant checking.
//!
//! Snapshots copy what a consumer can see of the store at one point in time.
//! Message bodies are reduced to ids; invariants only reason about order and
//! identity.

use wallfeed_app::FeedState;

/// Observable store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Message ids in feed order.
    pub ids: Vec<u64>,
    /// Whether a fetch was in flight.
    pub loading: bool,
    /// Whether a refresh was in flight.
    pub refreshing: bool,
    /// Last error, if any.
    pub error: Option<String>,
    /// Last successfully fetched page.
    pub current_page: usize,
    /// Page size from the last negotiation.
    pub page_size: usize,
    /// Server-reported total.
    pub total_messages: usize,
    /// Whether more records are available.
    pub has_more: bool,
}

impl FeedSnapshot {
    /// Copy the observable parts of `state`.
    pub fn capture(state: &FeedState) -> Self {
        Self {
            ids: state.messages().iter().map(|m| m.id).collect(),
            loading: state.loading(),
            refreshing: state.is_refreshing(),
            error: state.error().map(str::to_string),
            current_page: state.current_page(),
            page_size: state.page_size(),
            total_messages: state.total_messages(),
            has_more: state.has_more(),
        }
    }

    /// Number of messages in the feed.
    pub fn loaded(&self) -> usize {
        self.ids.len()
    }
}
