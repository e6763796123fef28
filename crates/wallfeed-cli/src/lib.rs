//! Command implementations for the `wallfeed` binary.
//!
//! Commands are generic over [`wallfeed_client::Transport`] and write to any
//! [`std::io::Write`], so the binary wires them to HTTP and stdout while
//! tests run them against the simulated wall.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod error;
pub mod render;

pub use commands::{FeedOptions, ThemeAction, comment, feed, theme};
pub use error::CliError;
