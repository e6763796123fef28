//! Comment submission.
//!
//! The server stores comments anonymously and echoes back only id, text and
//! timestamp. The returned [`Comment`] is completed with
//! [`wallfeed_proto::ANONYMOUS_USER`].

use wallfeed_proto::{Comment, CommentReply, DecodeError, endpoint};

use crate::{CommentError, Transport};

/// Posts comments to messages.
#[derive(Debug, Clone)]
pub struct CommentClient<T> {
    transport: T,
}

impl<T: Transport> CommentClient<T> {
    /// Create a comment client.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Submit `text` as a comment on `message_id`.
    pub async fn submit(&self, message_id: u64, text: &str) -> Result<Comment, CommentError> {
        let path = endpoint::comment(message_id);
        let reply = self.transport.post_form(&path, &[("text", text.to_string())]).await?;
        let body = reply.into_body(&path)?;
        let reply = CommentReply::decode(&body)?;

        if !reply.success {
            let reason = reply.error.unwrap_or_else(|| "no reason given".to_string());
            tracing::warn!(message_id, %reason, "comment rejected");
            return Err(CommentError::Rejected(reason));
        }

        let payload = reply.comment.ok_or_else(|| {
            DecodeError::with_reason(endpoint::COMMENT_PREFIX, "success reply without comment")
        })?;

        tracing::debug!(message_id, comment_id = payload.id, "comment stored");
        Ok(payload.into_comment())
    }
}
