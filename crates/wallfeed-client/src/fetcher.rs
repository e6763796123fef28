//! Page fetching.

use wallfeed_proto::{MessagesPage, PageRange, endpoint};

use crate::{FetchError, Transport};

/// Requests slices of the server's ordered message list.
#[derive(Debug, Clone)]
pub struct FeedFetcher<T> {
    transport: T,
}

impl<T: Transport> FeedFetcher<T> {
    /// Create a fetcher.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch the records in `range` and the server's total count.
    pub async fn fetch_range(&self, range: PageRange) -> Result<MessagesPage, FetchError> {
        tracing::debug!(start = range.start, end = range.end, "fetching messages");

        let reply = self.transport.get(endpoint::MESSAGES, &range.query()).await?;
        let body = reply.into_body(endpoint::MESSAGES)?;
        let page = MessagesPage::decode(&body)?;

        tracing::debug!(records = page.len(), total = page.total, "fetched messages");
        Ok(page)
    }

    /// Fetch 1-based `page` at `page_size` records per page.
    pub async fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<MessagesPage, FetchError> {
        let range = PageRange::for_page(page, page_size)?;
        self.fetch_range(range).await
    }
}
