//! Transport abstraction.
//!
//! The [`Transport`] trait decouples request logic from the HTTP stack. The
//! production implementation is `HttpTransport` (feature `http`); tests drive
//! the same components through an in-memory server.

use std::future::Future;

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be sent or the reply could not be read.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },
}

/// Raw reply: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl Reply {
    /// Reply with a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a successful reply, or [`TransportError::Status`].
    pub fn into_body(self, path: &str) -> Result<Vec<u8>, TransportError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(TransportError::Status { status: self.status, path: path.to_string() })
        }
    }
}

/// Issues requests against the wall server.
///
/// Must be Clone (each component holds its own handle) and Send + Sync.
/// Implementations share connection state internally, so clones talk to the
/// same server.
///
/// A non-success status is NOT an error at this layer: implementations
/// return it as a [`Reply`] and callers decide. Errors are reserved for
/// requests that could not complete.
pub trait Transport: Clone + Send + Sync + 'static {
    /// GET `path` with query string pairs.
    fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    /// POST `path` with a form-encoded body.
    fn post_form(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}
