//! HTTP transport for the client.
//!
//! Provides [`HttpTransport`], a thin `reqwest` layer that maps request
//! paths onto a base URL. Request logic stays in the components that own a
//! [`Transport`] handle.

use std::time::Duration;

use crate::{Reply, Transport, TransportError};

/// Connect timeout applied by [`HttpTransport::new`].
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Transport`] over HTTP(S).
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url` (e.g.
    /// `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Connection(format!("client setup failed: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a transport with a preconfigured `reqwest` client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Read status and body, leaving status interpretation to the caller.
async fn read_reply(response: reqwest::Response) -> Result<Reply, TransportError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| TransportError::Connection(format!("body read failed: {e}")))?;

    Ok(Reply { status, body: body.to_vec() })
}

impl Transport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::Connection(format!("GET {path} failed: {e}")))?;

        read_reply(response).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| TransportError::Connection(format!("POST {path} failed: {e}")))?;

        read_reply(response).await
    }
}
