//! Wire protocol for the wall message API.
//!
//! Types exchanged with the wall server and the pure functions that encode
//! requests and decode replies. Nothing in this crate performs I/O; the
//! transport lives in `wallfeed-client`.
//!
//! # Components
//!
//! - [`Message`], [`Comment`]: records served by the wall
//! - [`MessagesPage`], [`PageSizeReply`], [`CommentReply`]: reply envelopes
//! - [`PageRange`]: 1-based page to zero-based `[start, end)` conversion
//! - [`endpoint`]: request paths

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod endpoint;
mod envelope;
mod error;
mod message;
mod range;

pub use envelope::{CommentPayload, CommentReply, MessagesPage, PageSizeReply};
pub use error::{DecodeError, RangeError};
pub use message::{ANONYMOUS_USER, Comment, Message};
pub use range::PageRange;
