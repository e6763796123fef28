//! Records served by the wall.
//!
//! A [`Message`] is immutable once fetched: the feed engine appends whole
//! records and never edits their fields.

use serde::{Deserialize, Serialize};

/// Author label used when the server does not report who wrote a comment.
///
/// The wall accepts anonymous comments and never returns author identity, so
/// this is a display placeholder rather than a real user.
pub const ANONYMOUS_USER: &str = "匿名用户";

fn anonymous_user() -> String {
    ANONYMOUS_USER.to_string()
}

/// A post on the wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned identifier, unique across the wall.
    pub id: u64,
    /// Post body.
    pub text: String,
    /// Server-formatted creation time.
    pub timestamp: String,
    /// Like counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    /// Comments in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// Attached file references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl Message {
    /// Message with only the required fields set.
    pub fn new(id: u64, text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp: timestamp.into(),
            likes: None,
            comments: None,
            files: None,
        }
    }

    /// Number of comments attached to this message.
    pub fn comment_count(&self) -> usize {
        self.comments.as_ref().map_or(0, Vec::len)
    }
}

/// A comment attached to a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Server-assigned identifier.
    pub id: u64,
    /// Comment body.
    pub text: String,
    /// Server-formatted creation time.
    pub timestamp: String,
    /// Author label. [`ANONYMOUS_USER`] when the server omits it.
    #[serde(default = "anonymous_user")]
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_none() {
        let msg: Message =
            serde_json::from_str(r#"{"id":1,"text":"hi","timestamp":"2024-05-01 10:00"}"#)
                .unwrap();

        assert_eq!(msg, Message::new(1, "hi", "2024-05-01 10:00"));
        assert_eq!(msg.comment_count(), 0);
    }

    #[test]
    fn comment_without_user_is_anonymous() {
        let comment: Comment =
            serde_json::from_str(r#"{"id":3,"text":"hello","timestamp":"t"}"#).unwrap();

        assert_eq!(comment.user, ANONYMOUS_USER);
    }

    #[test]
    fn nested_comments_keep_order() {
        let msg: Message = serde_json::from_str(
            r#"{"id":9,"text":"x","timestamp":"t","likes":4,"files":["a.png"],
                "comments":[{"id":2,"text":"b","timestamp":"t","user":"bob"},
                            {"id":1,"text":"a","timestamp":"t"}]}"#,
        )
        .unwrap();

        let ids: Vec<u64> = msg.comments.iter().flatten().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(msg.likes, Some(4));
        assert_eq!(msg.files.as_deref(), Some(&["a.png".to_string()][..]));
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let json = serde_json::to_string(&Message::new(5, "t", "ts")).unwrap();
        assert!(!json.contains("likes"));
        assert!(!json.contains("comments"));
        assert!(!json.contains("files"));
    }
}
