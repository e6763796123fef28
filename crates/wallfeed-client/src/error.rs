//! Error types for client operations.
//!
//! One enum per operation so callers match only on failures that operation
//! can produce.

use thiserror::Error;
use wallfeed_proto::{DecodeError, RangeError};

use crate::TransportError;

/// Page-size negotiation failed.
///
/// Never surfaced by [`crate::PageSizeNegotiator::negotiate`], which falls
/// back to its default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Request failed or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reply body was malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Reply carried no usable page size.
    #[error("server sent no usable page size")]
    Missing,
}

/// Page fetch failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request failed or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reply body was malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Page cannot be expressed as an offset range.
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Comment submission failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    /// Request failed or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reply body was malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Server refused the comment.
    #[error("comment rejected: {0}")]
    Rejected(String),
}
