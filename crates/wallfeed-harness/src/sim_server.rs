//! In-memory wall server.
//!
//! `SimServer` answers the three wall endpoints from a message list held in
//! memory. Handles are cheap clones sharing one wall, so a test keeps one
//! handle for control and gives clones to the components under test.
//!
//! Control surface:
//! - page size, or none at all, reported by the config endpoint
//! - wrapped `{ data, total }` or bare array message replies
//! - per-endpoint HTTP status failures and refused connections
//! - a stall gate that holds every request until released
//! - a request log

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use wallfeed_client::{Reply, Transport, TransportError};
use wallfeed_proto::{
    ANONYMOUS_USER, Comment, CommentPayload, CommentReply, Message, MessagesPage, PageSizeReply,
    endpoint,
};

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET with query parameters.
    Get,
    /// POST with a form body.
    Post,
}

/// Request as received by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method.
    pub method: Method,
    /// Path without query string.
    pub path: String,
    /// Query or form parameters.
    pub params: Vec<(&'static str, String)>,
}

impl Request {
    /// Value of parameter `name`, if sent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }
}

struct Wall {
    messages: Vec<Message>,
    page_size: Option<u64>,
    bare_format: bool,
    failures: Vec<(String, u16)>,
    refuse_connections: bool,
    comment_rejection: Option<String>,
    next_comment_id: u64,
    requests: Vec<Request>,
}

/// Shared in-memory wall. See the module docs.
#[derive(Clone)]
pub struct SimServer {
    wall: Arc<Mutex<Wall>>,
    stall: Arc<watch::Sender<bool>>,
}

impl Default for SimServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimServer {
    /// Empty wall reporting a page size of 15.
    pub fn new() -> Self {
        let wall = Wall {
            messages: Vec::new(),
            page_size: Some(15),
            bare_format: false,
            failures: Vec::new(),
            refuse_connections: false,
            comment_rejection: None,
            next_comment_id: 1,
            requests: Vec::new(),
        };
        let (stall, _) = watch::channel(false);

        Self { wall: Arc::new(Mutex::new(wall)), stall: Arc::new(stall) }
    }

    /// Wall holding messages `1..=count`.
    pub fn with_messages(count: u64) -> Self {
        let server = Self::new();
        server.seed(count);
        server
    }

    /// Append messages numbered after the current highest id.
    pub fn seed(&self, count: u64) {
        let mut wall = self.lock();
        let first = wall.messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        for id in first..first + count {
            wall.messages.push(Message::new(
                id,
                format!("message {id}"),
                format!("2024-05-01 12:{:02}:{:02}", (id / 60) % 60, id % 60),
            ));
        }
    }

    /// Insert `message` at the head of the wall, as a newly posted message.
    pub fn post_to_front(&self, message: Message) {
        self.lock().messages.insert(0, message);
    }

    /// Page size the config endpoint reports. `None` sends an empty object.
    pub fn set_page_size(&self, page_size: Option<u64>) {
        self.lock().page_size = page_size;
    }

    /// Serve message pages as bare arrays without a total.
    pub fn set_bare_format(&self, bare: bool) {
        self.lock().bare_format = bare;
    }

    /// Answer every request whose path starts with `path` with `status`.
    pub fn fail(&self, path: &str, status: u16) {
        let mut wall = self.lock();
        wall.failures.retain(|(p, _)| p != path);
        wall.failures.push((path.to_string(), status));
    }

    /// Undo [`Self::fail`] for `path`.
    pub fn heal(&self, path: &str) {
        self.lock().failures.retain(|(p, _)| p != path);
    }

    /// Fail every request at the connection level.
    pub fn set_refuse_connections(&self, refuse: bool) {
        self.lock().refuse_connections = refuse;
    }

    /// Reject every comment with `reason`. `None` accepts comments again.
    pub fn set_comment_rejection(&self, reason: Option<&str>) {
        self.lock().comment_rejection = reason.map(str::to_string);
    }

    /// Hold every request until [`Self::release`].
    ///
    /// Requests are logged on arrival, before they block.
    pub fn stall(&self) {
        self.stall.send_replace(true);
    }

    /// Let stalled and future requests through.
    pub fn release(&self) {
        self.stall.send_replace(false);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Number of requests received for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.lock().requests.iter().filter(|r| r.path == path).count()
    }

    /// Number of messages on the wall.
    pub fn total(&self) -> usize {
        self.lock().messages.len()
    }

    /// Comments stored on message `id`.
    pub fn comments_on(&self, id: u64) -> Vec<Comment> {
        self.lock()
            .messages
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.comments.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Wall> {
        self.wall.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log the request and apply connection-level and status failures.
    fn admit(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Option<Reply>, TransportError> {
        let mut wall = self.lock();
        wall.requests.push(Request { method, path: path.to_string(), params: params.to_vec() });

        if wall.refuse_connections {
            return Err(TransportError::Connection("connection refused".to_string()));
        }

        let injected = wall.failures.iter().find(|(p, _)| path.starts_with(p.as_str()));
        Ok(injected.map(|(_, status)| Reply::new(*status, "injected failure")))
    }

    async fn wait_if_stalled(&self) {
        let mut gate = self.stall.subscribe();
        // Sender is owned by `self`, so the channel cannot close here.
        let _ = gate.wait_for(|stalled| !*stalled).await;
    }

    fn answer_get(&self, path: &str, query: &[(&'static str, String)]) -> Reply {
        let wall = self.lock();

        match path {
            endpoint::PAGE_SIZE => json_reply(&PageSizeReply { page_size: wall.page_size }),
            endpoint::MESSAGES => {
                let bound = |name: &str| {
                    query.iter().find(|(k, _)| *k == name).and_then(|(_, v)| v.parse::<usize>().ok())
                };
                let (Some(start), Some(end)) = (bound("start"), bound("end")) else {
                    return Reply::new(400, "start and end are required");
                };

                let len = wall.messages.len();
                let start = start.min(len);
                let end = end.clamp(start, len);
                let records = wall.messages[start..end].to_vec();

                if wall.bare_format {
                    json_reply(&records)
                } else {
                    json_reply(&MessagesPage { records, total: len })
                }
            },
            _ => Reply::new(404, "not found"),
        }
    }

    fn answer_post(&self, path: &str, form: &[(&'static str, String)]) -> Reply {
        let Some(id) = path
            .strip_prefix(endpoint::COMMENT_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|id| id.parse::<u64>().ok())
        else {
            return Reply::new(404, "not found");
        };

        let mut wall = self.lock();
        let text = form.iter().find(|(k, _)| *k == "text").map(|(_, v)| v.trim().to_string());

        let rejection = match (&wall.comment_rejection, &text) {
            (Some(reason), _) => Some(reason.clone()),
            (None, None) => Some("comment text is required".to_string()),
            (None, Some(t)) if t.is_empty() => Some("comment text is required".to_string()),
            _ => None,
        };
        if let Some(reason) = rejection {
            return json_reply(&rejected(reason));
        }

        let comment_id = wall.next_comment_id;
        let Some(message) = wall.messages.iter_mut().find(|m| m.id == id) else {
            return json_reply(&rejected("message not found".to_string()));
        };

        let payload = CommentPayload {
            id: comment_id,
            text: text.unwrap_or_default(),
            timestamp: "2024-05-01 13:00:00".to_string(),
        };
        message.comments.get_or_insert_with(Vec::new).push(Comment {
            id: payload.id,
            text: payload.text.clone(),
            timestamp: payload.timestamp.clone(),
            user: ANONYMOUS_USER.to_string(),
        });
        wall.next_comment_id += 1;

        json_reply(&CommentReply { success: true, comment: Some(payload), error: None })
    }
}

impl Transport for SimServer {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Reply, TransportError> {
        let injected = self.admit(Method::Get, path, query)?;
        self.wait_if_stalled().await;

        Ok(match injected {
            Some(reply) => reply,
            None => self.answer_get(path, query),
        })
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        let injected = self.admit(Method::Post, path, form)?;
        self.wait_if_stalled().await;

        Ok(match injected {
            Some(reply) => reply,
            None => self.answer_post(path, form),
        })
    }
}

fn rejected(reason: String) -> CommentReply {
    CommentReply { success: false, comment: None, error: Some(reason) }
}

fn json_reply<S: Serialize>(value: &S) -> Reply {
    match serde_json::to_vec(value) {
        Ok(body) => Reply::new(200, body),
        Err(e) => Reply::new(500, e.to_string()),
    }
}
