//! Observable feed state.
//!
//! [`FeedState`] is the view model a presentation layer renders from. Only
//! [`crate::MessageFeedStore`] mutates it; consumers receive clones through
//! [`crate::MessageFeedStore::snapshot`] or borrow it briefly through
//! [`crate::MessageFeedStore::with_state`].

use std::collections::HashSet;

use wallfeed_proto::{Message, MessagesPage};

use crate::MergePolicy;

/// How a fetch merges its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replace the feed with the fetched page.
    Refresh,
    /// Append the fetched page to the feed.
    Append,
}

/// Coarse state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No fetch in flight and the last fetch succeeded (or none ran yet).
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed.
    Error,
}

/// Accumulated feed and pagination bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    messages: Vec<Message>,
    error: Option<String>,
    current_page: usize,
    page_size: usize,
    total_messages: usize,
    has_more: bool,
    /// Fetches in flight.
    pending: usize,
    /// Refresh fetches in flight, a subset of `pending`.
    refreshing: usize,
}

impl FeedState {
    /// Fresh state: empty feed, page 1, more data assumed.
    pub fn new(page_size: usize) -> Self {
        Self {
            messages: Vec::new(),
            error: None,
            current_page: 1,
            page_size,
            total_messages: 0,
            has_more: true,
            pending: 0,
            refreshing: 0,
        }
    }

    /// Messages in page-arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while any fetch is in flight.
    pub fn loading(&self) -> bool {
        self.pending > 0
    }

    /// True while a refresh (non-append) fetch is in flight.
    ///
    /// Presentation layers show a full-feed spinner for refreshes only, so
    /// infinite scroll does not flicker.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing > 0
    }

    /// Last failure description. `None` if the last fetch succeeded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last successfully fetched page (1-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Page size from the most recent negotiation.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Server-reported total as of the last successful fetch.
    pub fn total_messages(&self) -> usize {
        self.total_messages
    }

    /// True if the server reports more records than the feed holds.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Coarse phase for rendering.
    pub fn phase(&self) -> FeedPhase {
        if self.loading() {
            FeedPhase::Loading
        } else if self.error.is_some() {
            FeedPhase::Error
        } else {
            FeedPhase::Idle
        }
    }

    pub(crate) fn begin(&mut self, mode: FetchMode) {
        self.pending += 1;
        if mode == FetchMode::Refresh {
            self.refreshing += 1;
        }
        self.error = None;
    }

    pub(crate) fn finish(&mut self, mode: FetchMode) {
        self.pending = self.pending.saturating_sub(1);
        if mode == FetchMode::Refresh {
            self.refreshing = self.refreshing.saturating_sub(1);
        }
    }

    pub(crate) fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    pub(crate) fn fail(&mut self, reason: String) {
        self.error = Some(reason);
    }

    pub(crate) fn reset(&mut self) {
        self.messages.clear();
        self.current_page = 1;
        self.has_more = true;
    }

    /// Merge page `page_number`, fetched at `page_size`, and recompute
    /// `has_more`.
    ///
    /// Under [`MergePolicy::DedupById`] skipped duplicates never count toward
    /// the total, so the feed is also exhausted once the fetched offsets reach
    /// the server's total.
    ///
    /// Returns the number of records added to the feed.
    pub(crate) fn merge(
        &mut self,
        page_number: usize,
        page_size: usize,
        page: MessagesPage,
        mode: FetchMode,
        policy: MergePolicy,
    ) -> usize {
        let MessagesPage { records, total } = page;

        if mode == FetchMode::Refresh {
            self.messages.clear();
        }
        let before = self.messages.len();

        match policy {
            MergePolicy::Append => self.messages.extend(records),
            MergePolicy::DedupById => {
                let mut seen: HashSet<u64> = self.messages.iter().map(|m| m.id).collect();
                self.messages.extend(records.into_iter().filter(|m| seen.insert(m.id)));
            },
        }

        self.total_messages = total;
        self.current_page = page_number;
        self.has_more = self.messages.len() < self.total_messages;
        if policy == MergePolicy::DedupById {
            let fetched_end = page_number.saturating_mul(page_size);
            self.has_more &= fetched_end < self.total_messages;
        }

        self.messages.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[u64], total: usize) -> MessagesPage {
        MessagesPage { records: ids.iter().map(|&id| Message::new(id, "m", "t")).collect(), total }
    }

    fn ids(state: &FeedState) -> Vec<u64> {
        state.messages().iter().map(|m| m.id).collect()
    }

    #[test]
    fn new_state_is_idle_with_more_assumed() {
        let state = FeedState::new(15);
        assert_eq!(state.phase(), FeedPhase::Idle);
        assert!(state.has_more());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 15);
    }

    #[test]
    fn append_concatenates_and_recomputes_has_more() {
        let mut state = FeedState::new(2);
        state.merge(1, 2, page(&[1, 2], 3), FetchMode::Append, MergePolicy::Append);
        assert!(state.has_more());

        let added = state.merge(2, 2, page(&[3], 3), FetchMode::Append, MergePolicy::Append);
        assert_eq!(added, 1);
        assert_eq!(ids(&state), vec![1, 2, 3]);
        assert_eq!(state.current_page(), 2);
        assert!(!state.has_more());
    }

    #[test]
    fn refresh_replaces() {
        let mut state = FeedState::new(2);
        state.merge(1, 2, page(&[1, 2], 10), FetchMode::Append, MergePolicy::Append);
        state.merge(1, 2, page(&[7, 8], 10), FetchMode::Refresh, MergePolicy::Append);
        assert_eq!(ids(&state), vec![7, 8]);
    }

    #[test]
    fn dedup_skips_known_ids() {
        let mut state = FeedState::new(2);
        state.merge(1, 2, page(&[1, 2], 4), FetchMode::Append, MergePolicy::DedupById);
        let added =
            state.merge(2, 2, page(&[2, 3, 3], 4), FetchMode::Append, MergePolicy::DedupById);

        assert_eq!(added, 1);
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[test]
    fn dedup_exhausts_when_offsets_reach_total() {
        // Server shifted by one: the last page holds only already-seen ids.
        let mut state = FeedState::new(2);
        state.merge(1, 2, page(&[1, 2], 5), FetchMode::Append, MergePolicy::DedupById);
        state.merge(2, 2, page(&[2, 3], 5), FetchMode::Append, MergePolicy::DedupById);
        assert!(state.has_more());

        let added = state.merge(3, 2, page(&[3], 5), FetchMode::Append, MergePolicy::DedupById);
        assert_eq!(added, 0);
        assert_eq!(state.messages().len(), 3);
        assert!(!state.has_more());
    }

    #[test]
    fn plain_append_keeps_duplicates() {
        let mut state = FeedState::new(2);
        state.merge(1, 2, page(&[1, 2], 4), FetchMode::Append, MergePolicy::Append);
        state.merge(2, 2, page(&[2, 3], 4), FetchMode::Append, MergePolicy::Append);
        assert_eq!(ids(&state), vec![1, 2, 2, 3]);
    }

    #[test]
    fn phase_tracks_in_flight_and_errors() {
        let mut state = FeedState::new(2);
        state.begin(FetchMode::Append);
        assert_eq!(state.phase(), FeedPhase::Loading);
        assert!(!state.is_refreshing());

        state.fail("boom".into());
        state.finish(FetchMode::Append);
        assert_eq!(state.phase(), FeedPhase::Error);

        state.begin(FetchMode::Refresh);
        assert!(state.is_refreshing());
        assert_eq!(state.error(), None);
        state.finish(FetchMode::Refresh);
        assert_eq!(state.phase(), FeedPhase::Idle);
    }

    #[test]
    fn reset_clears_feed_but_keeps_total() {
        let mut state = FeedState::new(2);
        state.merge(3, 2, page(&[1, 2], 2), FetchMode::Append, MergePolicy::Append);
        assert!(!state.has_more());

        state.reset();
        assert!(state.messages().is_empty());
        assert_eq!(state.current_page(), 1);
        assert!(state.has_more());
    }
}
