//! Command errors.

use std::io;

use thiserror::Error;
use wallfeed_app::SettingsError;
use wallfeed_client::{CommentError, TransportError};

/// A command could not complete.
#[derive(Error, Debug)]
pub enum CliError {
    /// Output could not be written.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// Transport could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Feed fetch failed; carries the store's error text.
    #[error("feed fetch failed: {0}")]
    Feed(String),

    /// Comment submission failed.
    #[error(transparent)]
    Comment(#[from] CommentError),

    /// Theme preference could not be saved.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
