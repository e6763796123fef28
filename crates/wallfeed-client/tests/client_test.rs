//! Request/reply tests for the client components.
//!
//! A canned transport records every request and answers from a fixed table,
//! so each test checks both what was sent and how the reply was interpreted.

use std::sync::{Arc, Mutex, PoisonError};

use wallfeed_client::{
    CommentClient, CommentError, ConfigError, FeedFetcher, FetchError, PageSizeNegotiator, Reply,
    Transport, TransportError,
};
use wallfeed_proto::{ANONYMOUS_USER, PageRange, RangeError};

/// Request as seen by the transport: method, path, parameters.
type Request = (&'static str, String, Vec<(&'static str, String)>);

#[derive(Clone, Default)]
struct CannedTransport {
    replies: Arc<Mutex<Vec<(String, Result<Reply, TransportError>)>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl CannedTransport {
    fn reply(self, path: &str, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_string(), Ok(Reply::new(status, body))));
        self
    }

    fn unreachable(self, path: &str) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_string(), Err(TransportError::Connection("refused".into()))));
        self
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn answer(
        &self,
        method: &'static str,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push((
            method,
            path.to_string(),
            params.to_vec(),
        ));

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(p, _)| p == path)
            .map_or_else(|| Ok(Reply::new(404, "")), |(_, r)| r.clone())
    }
}

impl Transport for CannedTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        self.answer("GET", path, query)
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        self.answer("POST", path, form)
    }
}

fn messages_body(ids: std::ops::Range<u64>, total: usize) -> String {
    let data: Vec<_> = ids
        .map(|id| serde_json::json!({"id": id, "text": format!("post {id}"), "timestamp": "t"}))
        .collect();
    serde_json::json!({"data": data, "total": total}).to_string()
}

#[tokio::test]
async fn negotiator_uses_server_page_size() {
    let transport = CannedTransport::default().reply("/api/get_page_size", 200, r#"{"page_size":15}"#);
    let negotiator = PageSizeNegotiator::new(transport.clone(), 10);

    assert_eq!(negotiator.negotiate().await, 15);
    assert_eq!(transport.requests(), vec![("GET", "/api/get_page_size".to_string(), vec![])]);
}

#[tokio::test]
async fn negotiator_falls_back_on_server_error() {
    let transport = CannedTransport::default().reply("/api/get_page_size", 503, "");
    let negotiator = PageSizeNegotiator::new(transport, 10);

    assert!(matches!(
        negotiator.try_negotiate().await,
        Err(ConfigError::Transport(TransportError::Status { status: 503, .. }))
    ));
    assert_eq!(negotiator.negotiate().await, 10);
}

#[tokio::test]
async fn negotiator_falls_back_when_unreachable_or_zero() {
    let unreachable = PageSizeNegotiator::new(CannedTransport::default().unreachable("/api/get_page_size"), 15);
    assert_eq!(unreachable.negotiate().await, 15);

    let zero = PageSizeNegotiator::new(
        CannedTransport::default().reply("/api/get_page_size", 200, r#"{"page_size":0}"#),
        15,
    );
    assert_eq!(zero.try_negotiate().await, Err(ConfigError::Missing));
    assert_eq!(zero.negotiate().await, 15);

    let garbage = PageSizeNegotiator::new(
        CannedTransport::default().reply("/api/get_page_size", 200, "not json"),
        15,
    );
    assert!(matches!(garbage.try_negotiate().await, Err(ConfigError::Decode(_))));
}

#[tokio::test]
async fn fetcher_sends_half_open_range() {
    let transport =
        CannedTransport::default().reply("/api/get_messages", 200, &messages_body(15..30, 40));
    let fetcher = FeedFetcher::new(transport.clone());

    let page = fetcher.fetch_page(2, 15).await.unwrap();

    assert_eq!(page.len(), 15);
    assert_eq!(page.total, 40);
    assert_eq!(page.records.first().map(|m| m.id), Some(15));
    assert_eq!(transport.requests(), vec![(
        "GET",
        "/api/get_messages".to_string(),
        vec![("start", "15".to_string()), ("end", "30".to_string())]
    )]);
}

#[tokio::test]
async fn fetcher_maps_failures() {
    let server_error =
        FeedFetcher::new(CannedTransport::default().reply("/api/get_messages", 500, "oops"));
    assert!(matches!(
        server_error.fetch_range(PageRange { start: 0, end: 15 }).await,
        Err(FetchError::Transport(TransportError::Status { status: 500, .. }))
    ));

    let malformed =
        FeedFetcher::new(CannedTransport::default().reply("/api/get_messages", 200, "{}"));
    assert!(matches!(malformed.fetch_page(1, 15).await, Err(FetchError::Decode(_))));

    let transport = CannedTransport::default();
    let invalid = FeedFetcher::new(transport.clone());
    assert_eq!(invalid.fetch_page(0, 15).await, Err(FetchError::Range(RangeError::ZeroPage)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn comment_submission_synthesizes_anonymous_author() {
    let transport = CannedTransport::default().reply(
        "/wall/comment/7",
        200,
        r#"{"success":true,"comment":{"id":3,"text":"hello","timestamp":"2024-05-01 12:00"}}"#,
    );
    let client = CommentClient::new(transport.clone());

    let comment = client.submit(7, "hello").await.unwrap();

    assert_eq!(comment.id, 3);
    assert_eq!(comment.text, "hello");
    assert_eq!(comment.user, ANONYMOUS_USER);
    assert_eq!(transport.requests(), vec![(
        "POST",
        "/wall/comment/7".to_string(),
        vec![("text", "hello".to_string())]
    )]);
}

#[tokio::test]
async fn comment_rejection_and_missing_payload() {
    let rejected = CommentClient::new(CannedTransport::default().reply(
        "/wall/comment/7",
        200,
        r#"{"success":false,"error":"text required"}"#,
    ));
    assert_eq!(
        rejected.submit(7, "").await,
        Err(CommentError::Rejected("text required".to_string()))
    );

    let hollow = CommentClient::new(
        CannedTransport::default().reply("/wall/comment/7", 200, r#"{"success":true}"#),
    );
    assert!(matches!(hollow.submit(7, "x").await, Err(CommentError::Decode(_))));

    let missing = CommentClient::new(CannedTransport::default());
    assert!(matches!(
        missing.submit(8, "x").await,
        Err(CommentError::Transport(TransportError::Status { status: 404, .. }))
    ));
}
