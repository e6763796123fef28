//! Page-size negotiation.
//!
//! The server owns the page size. It is asked before every fetch, never
//! cached, so a server-side change applies from the next page on.

use wallfeed_proto::{PageSizeReply, endpoint};

use crate::{ConfigError, Transport};

/// Asks the server for the page size, falling back to a default.
#[derive(Debug, Clone)]
pub struct PageSizeNegotiator<T> {
    transport: T,
    default_page_size: usize,
}

impl<T: Transport> PageSizeNegotiator<T> {
    /// Create a negotiator.
    ///
    /// A `default_page_size` of zero is raised to one so the fallback is
    /// always a valid page size.
    pub fn new(transport: T, default_page_size: usize) -> Self {
        Self { transport, default_page_size: default_page_size.max(1) }
    }

    /// Page size used when negotiation fails.
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// Query the server, reporting failures.
    pub async fn try_negotiate(&self) -> Result<usize, ConfigError> {
        let reply = self.transport.get(endpoint::PAGE_SIZE, &[]).await?;
        let body = reply.into_body(endpoint::PAGE_SIZE)?;
        PageSizeReply::decode(&body)?.usable().ok_or(ConfigError::Missing)
    }

    /// Query the server. Any failure yields the default page size.
    pub async fn negotiate(&self) -> usize {
        match self.try_negotiate().await {
            Ok(page_size) => {
                tracing::debug!(page_size, "negotiated page size");
                page_size
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = self.default_page_size,
                    "page size negotiation failed, using default"
                );
                self.default_page_size
            },
        }
    }
}
