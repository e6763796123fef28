//! Error types for the application layer.

use std::{io, time::Duration};

use thiserror::Error;
use wallfeed_client::FetchError;

/// A fetch cycle failed.
///
/// The store records these as text in [`crate::FeedState::error`]; they are
/// never returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Data request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cycle did not finish before the configured deadline.
    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),

    /// Cycle was abandoned through [`crate::MessageFeedStore::cancel`].
    #[error("fetch cancelled")]
    Cancelled,
}

/// Settings could not be read or written.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be accessed.
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Settings file is not valid JSON.
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
