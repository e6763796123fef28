//! Paginated message feed.
//!
//! [`MessageFeedStore`] owns the feed and drives fetch cycles: negotiate the
//! page size, fetch the page's offset range, merge. Operations take `&self`
//! so a scroll handler and a refresh button can hold the same store.
//!
//! # Admission
//!
//! The `loading` flag is the only admission gate: [`MessageFeedStore::load_more`]
//! checks it and marks the fetch in flight under one lock acquisition, so two
//! scroll events polled concurrently admit exactly one fetch. The lock is
//! never held across an `.await`.
//!
//! # Failure
//!
//! A failed, timed-out or cancelled cycle records its error and leaves the
//! feed and page cursor untouched. The in-flight mark is released by a drop
//! guard, so it is cleared even when the caller drops the future.

use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::sync::Notify;
use wallfeed_client::{FeedFetcher, PageSizeNegotiator, Transport};
use wallfeed_proto::MessagesPage;

use crate::{FeedConfig, FeedError, FeedState, FetchMode};

/// Result of one store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page merged; `added` records joined the feed.
    Merged {
        /// Records added to the feed.
        added: usize,
    },
    /// Cycle failed; see [`FeedState::error`].
    Failed,
    /// `load_more` declined: a fetch is in flight or the feed is exhausted.
    Skipped,
}

/// Feed store over a [`Transport`].
pub struct MessageFeedStore<T> {
    negotiator: PageSizeNegotiator<T>,
    fetcher: FeedFetcher<T>,
    config: FeedConfig,
    state: Mutex<FeedState>,
    cancel: Notify,
}

/// Releases an in-flight mark on drop.
struct InFlight<'a> {
    state: &'a Mutex<FeedState>,
    mode: FetchMode,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).finish(self.mode);
    }
}

impl<T: Transport> MessageFeedStore<T> {
    /// Create a store whose negotiator and fetcher share `transport`.
    pub fn new(transport: T, config: FeedConfig) -> Self {
        let negotiator = PageSizeNegotiator::new(transport.clone(), config.default_page_size);
        let fetcher = FeedFetcher::new(transport);
        Self::from_parts(negotiator, fetcher, config)
    }

    /// Create a store from prebuilt components.
    ///
    /// The initial page size is the negotiator's default.
    pub fn from_parts(
        negotiator: PageSizeNegotiator<T>,
        fetcher: FeedFetcher<T>,
        config: FeedConfig,
    ) -> Self {
        let state = FeedState::new(negotiator.default_page_size());
        Self { negotiator, fetcher, config, state: Mutex::new(state), cancel: Notify::new() }
    }

    /// Store configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> FeedState {
        self.lock().clone()
    }

    /// Read the current state without cloning the feed.
    ///
    /// `f` runs under the store lock; keep it short.
    pub fn with_state<R>(&self, f: impl FnOnce(&FeedState) -> R) -> R {
        f(&self.lock())
    }

    /// Fetch 1-based `page`, replacing or extending the feed per `mode`.
    ///
    /// Not gated by `loading`; incremental loading should go through
    /// [`Self::load_more`], which is.
    pub async fn fetch_page(&self, page: usize, mode: FetchMode) -> FetchOutcome {
        let flight = {
            let mut state = self.lock();
            state.begin(mode);
            InFlight { state: &self.state, mode }
        };

        self.run(page, flight).await
    }

    /// Fetch the page after the current one and append it.
    ///
    /// Returns [`FetchOutcome::Skipped`] without any request when a fetch is
    /// in flight or the server has no more records.
    pub async fn load_more(&self) -> FetchOutcome {
        let (page, flight) = {
            let mut state = self.lock();
            if state.loading() || !state.has_more() {
                tracing::debug!(
                    loading = state.loading(),
                    has_more = state.has_more(),
                    "load_more skipped"
                );
                return FetchOutcome::Skipped;
            }

            state.begin(FetchMode::Append);
            (state.current_page() + 1, InFlight { state: &self.state, mode: FetchMode::Append })
        };

        self.run(page, flight).await
    }

    /// Clear the feed and load page 1.
    pub async fn reset_and_load(&self) -> FetchOutcome {
        self.lock().reset();
        self.fetch_page(1, FetchMode::Refresh).await
    }

    /// Abandon every fetch currently in flight.
    ///
    /// Each abandoned cycle fails with [`FeedError::Cancelled`]. No effect
    /// when nothing is in flight.
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    async fn run(&self, page: usize, flight: InFlight<'_>) -> FetchOutcome {
        let mode = flight.mode;
        let result = self.bounded(self.cycle(page)).await;

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok((page_size, fetched)) => {
                    let added =
                        state.merge(page, page_size, fetched, mode, self.config.merge_policy);
                    tracing::info!(
                        page,
                        added,
                        loaded = state.messages().len(),
                        total = state.total_messages(),
                        has_more = state.has_more(),
                        "page merged"
                    );
                    FetchOutcome::Merged { added }
                },
                Err(e) => {
                    tracing::error!(page, ?mode, error = %e, "page fetch failed");
                    state.fail(e.to_string());
                    FetchOutcome::Failed
                },
            }
        };

        drop(flight);
        outcome
    }

    /// Negotiate the page size, then fetch `page` at that size.
    async fn cycle(&self, page: usize) -> Result<(usize, MessagesPage), FeedError> {
        let page_size = self.negotiator.negotiate().await;
        self.lock().set_page_size(page_size);

        Ok((page_size, self.fetcher.fetch_page(page, page_size).await?))
    }

    /// Race `work` against the deadline and [`Self::cancel`].
    async fn bounded<R, F>(&self, work: F) -> Result<R, FeedError>
    where
        F: Future<Output = Result<R, FeedError>>,
    {
        let cancelled = self.cancel.notified();
        let timeout = self.config.fetch_timeout;
        let deadline = async {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = work => result,
            () = cancelled => Err(FeedError::Cancelled),
            () = deadline => Err(FeedError::TimedOut(timeout.unwrap_or_default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
