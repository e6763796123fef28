//! Application layer for the wall client.
//!
//! Stateful components a presentation layer binds to. All network access goes
//! through the `wallfeed-client` components, so the same code runs against
//! the real server and the simulation harness.
//!
//! # Components
//!
//! - [`MessageFeedStore`]: paginated, append-only message feed
//! - [`CommentComposer`]: per-message comment inputs and submission
//! - [`ThemeService`]: dark-mode preference over a [`SettingsStore`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composer;
mod config;
mod error;
mod settings;
mod state;
mod store;

pub use composer::CommentComposer;
pub use config::{DEFAULT_FETCH_TIMEOUT, DEFAULT_PAGE_SIZE, FeedConfig, MergePolicy};
pub use error::{FeedError, SettingsError};
pub use settings::{JsonFileSettings, MemorySettings, SettingsStore, Theme, ThemeService};
pub use state::{FeedPhase, FeedState, FetchMode};
pub use store::{FetchOutcome, MessageFeedStore};
