//! Client
//!
//! Request/response layer for the wall API. Each component owns a handle to a
//! [`Transport`] and turns one logical operation into one request, decoding
//! the reply with `wallfeed-proto`.
//!
//! # Components
//!
//! - [`PageSizeNegotiator`]: authoritative page size, absorbing failures
//! - [`FeedFetcher`]: one page of messages plus the total count
//! - [`CommentClient`]: comment submission
//! - [`Transport`]: the I/O seam, implemented by `HttpTransport` (feature `http`) and
//!   by the simulation server in `wallfeed-harness`
//!
//! # Transport (optional)
//!
//! With the `http` feature enabled, this crate also provides
//! `HttpTransport`, backed by `reqwest`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod comments;
mod error;
mod fetcher;
mod negotiator;
mod transport;

#[cfg(feature = "http")]
pub mod http;

pub use comments::CommentClient;
pub use error::{CommentError, ConfigError, FetchError};
pub use fetcher::FeedFetcher;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use negotiator::PageSizeNegotiator;
pub use transport::{Reply, Transport, TransportError};
pub use wallfeed_proto::{Comment, Message, MessagesPage, PageRange};
