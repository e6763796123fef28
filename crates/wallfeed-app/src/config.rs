//! Feed configuration.

use std::time::Duration;

/// Page size assumed before the first negotiation and whenever negotiation
/// fails.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Deadline for one fetch cycle (negotiation plus data request).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How fetched records are merged in append mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Append every record as received.
    ///
    /// Relies on the server serving a stable snapshot for the whole session.
    /// If records are inserted while paginating, the same id can appear twice.
    #[default]
    Append,

    /// Skip records whose id is already in the feed.
    DedupById,
}

/// Tunables for [`crate::MessageFeedStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Fallback page size. Values below 1 are raised to 1.
    pub default_page_size: usize,
    /// Deadline for one fetch cycle. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
    /// Merge policy for append fetches.
    pub merge_policy: MergePolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            merge_policy: MergePolicy::Append,
        }
    }
}

impl FeedConfig {
    /// Set the fallback page size.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    /// Set the fetch deadline. `None` disables it.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the merge policy.
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }
}
