//! Reply envelopes.
//!
//! Each endpoint has a small JSON envelope. Decoding is tolerant where the
//! server is known to vary: the messages endpoint may return either
//! `{ "data": [...], "total": n }` or a bare array from older deployments,
//! and `total` may be missing or null.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ANONYMOUS_USER, Comment, DecodeError, Message, endpoint};

/// Reply of the page-size endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSizeReply {
    /// Records per page. May be absent or zero on misconfigured servers.
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl PageSizeReply {
    /// Decode a reply body.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(body).map_err(|e| DecodeError::new(endpoint::PAGE_SIZE, &e))
    }

    /// Page size if the server sent a usable one.
    ///
    /// Zero and values that do not fit in `usize` are treated as absent.
    pub fn usable(&self) -> Option<usize> {
        self.page_size.filter(|&n| n > 0).and_then(|n| usize::try_from(n).ok())
    }
}

/// One page of messages plus the server's total record count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessagesPage {
    /// Records in server order.
    #[serde(rename = "data")]
    pub records: Vec<Message>,
    /// Total records available on the server. Zero when the server omits it
    /// or sends null.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total: usize,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(Option::<usize>::deserialize(deserializer)?.unwrap_or(0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessagesEnvelope {
    Wrapped(MessagesPage),
    Bare(Vec<Message>),
}

impl MessagesPage {
    /// Decode a reply body in either envelope format.
    ///
    /// A bare array carries no total, so it decodes with `total == 0`.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let envelope: MessagesEnvelope =
            serde_json::from_slice(body).map_err(|e| DecodeError::new(endpoint::MESSAGES, &e))?;

        Ok(match envelope {
            MessagesEnvelope::Wrapped(page) => page,
            MessagesEnvelope::Bare(records) => Self { records, total: 0 },
        })
    }

    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Comment as echoed back by the server, without author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    /// Server-assigned identifier.
    pub id: u64,
    /// Comment body.
    pub text: String,
    /// Server-formatted creation time.
    pub timestamp: String,
}

impl CommentPayload {
    /// Full comment attributed to [`ANONYMOUS_USER`].
    pub fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            text: self.text,
            timestamp: self.timestamp,
            user: ANONYMOUS_USER.to_string(),
        }
    }
}

/// Reply of the comment submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReply {
    /// Whether the server stored the comment.
    pub success: bool,
    /// Stored comment. Present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentPayload>,
    /// Rejection reason. Present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommentReply {
    /// Decode a reply body.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(body)
            .map_err(|e| DecodeError::new(endpoint::COMMENT_PREFIX, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_page_decodes_total() {
        let page = MessagesPage::decode(
            br#"{"data":[{"id":1,"text":"a","timestamp":"t"}],"total":40}"#,
        )
        .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.total, 40);
    }

    #[test]
    fn wrapped_page_without_total_defaults_to_zero() {
        let page = MessagesPage::decode(br#"{"data":[]}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn wrapped_page_with_null_total_defaults_to_zero() {
        let page = MessagesPage::decode(
            br#"{"data":[{"id":1,"text":"a","timestamp":"t"}],"total":null}"#,
        )
        .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn bare_array_is_accepted() {
        let page = MessagesPage::decode(
            br#"[{"id":1,"text":"a","timestamp":"t"},{"id":2,"text":"b","timestamp":"t"}]"#,
        )
        .unwrap();

        assert_eq!(page.records.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn object_without_data_is_rejected() {
        let err = MessagesPage::decode(br#"{"total":3}"#).unwrap_err();
        assert_eq!(err.endpoint, endpoint::MESSAGES);
    }

    #[test]
    fn html_error_page_is_rejected() {
        assert!(MessagesPage::decode(b"<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn page_size_zero_or_missing_is_unusable() {
        assert_eq!(PageSizeReply::decode(br#"{"page_size":15}"#).unwrap().usable(), Some(15));
        assert_eq!(PageSizeReply::decode(br#"{"page_size":0}"#).unwrap().usable(), None);
        assert_eq!(PageSizeReply::decode(b"{}").unwrap().usable(), None);
        assert_eq!(PageSizeReply::decode(br#"{"page_size":null}"#).unwrap().usable(), None);
        assert!(PageSizeReply::decode(br#"{"page_size":-1}"#).is_err());
    }

    #[test]
    fn successful_comment_reply_becomes_anonymous_comment() {
        let reply = CommentReply::decode(
            br#"{"success":true,"comment":{"id":3,"text":"hello","timestamp":"2024-05-01"}}"#,
        )
        .unwrap();

        let comment = reply.comment.map(CommentPayload::into_comment).unwrap();
        assert_eq!(comment.id, 3);
        assert_eq!(comment.user, ANONYMOUS_USER);
    }

    #[test]
    fn failed_comment_reply_carries_reason() {
        let reply = CommentReply::decode(br#"{"success":false,"error":"empty text"}"#).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("empty text"));
        assert!(reply.comment.is_none());
    }
}
