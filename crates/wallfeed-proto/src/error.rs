//! Protocol-level errors.

use thiserror::Error;

/// Reply body could not be parsed as the envelope the endpoint promises.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed reply from {endpoint}: {reason}")]
pub struct DecodeError {
    /// Endpoint path the body came from.
    pub endpoint: &'static str,
    /// Parser diagnostic.
    pub reason: String,
}

impl DecodeError {
    pub(crate) fn new(endpoint: &'static str, err: &serde_json::Error) -> Self {
        Self { endpoint, reason: err.to_string() }
    }

    /// Decode error with a custom reason.
    pub fn with_reason(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self { endpoint, reason: reason.into() }
    }
}

/// A page request that cannot be expressed as an offset range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Pages are numbered from 1.
    #[error("page numbers start at 1, got 0")]
    ZeroPage,

    /// A page must hold at least one record.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// `page * page_size` does not fit in an offset.
    #[error("page {page} with size {page_size} overflows the offset range")]
    Overflow {
        /// Requested page.
        page: usize,
        /// Negotiated page size.
        page_size: usize,
    },
}
