//! Per-message comment inputs.

use std::collections::HashSet;

use wallfeed_client::{CommentClient, CommentError, Transport};
use wallfeed_proto::Comment;

/// Tracks which messages have an open comment input and submits comments.
#[derive(Debug)]
pub struct CommentComposer<T> {
    client: CommentClient<T>,
    open: HashSet<u64>,
}

impl<T: Transport> CommentComposer<T> {
    /// Create a composer with every input closed.
    pub fn new(client: CommentClient<T>) -> Self {
        Self { client, open: HashSet::new() }
    }

    /// Flip the input for `message_id` and return whether it is now open.
    pub fn toggle_input(&mut self, message_id: u64) -> bool {
        if self.open.remove(&message_id) {
            false
        } else {
            self.open.insert(message_id);
            true
        }
    }

    /// Whether the input for `message_id` is open.
    pub fn is_open(&self, message_id: u64) -> bool {
        self.open.contains(&message_id)
    }

    /// Submit `text` on `message_id`.
    ///
    /// The input closes on success and stays open on failure so the text can
    /// be resubmitted.
    pub async fn submit(&mut self, message_id: u64, text: &str) -> Result<Comment, CommentError> {
        match self.client.submit(message_id, text).await {
            Ok(comment) => {
                self.open.remove(&message_id);
                tracing::info!(message_id, comment_id = comment.id, "comment posted");
                Ok(comment)
            },
            Err(e) => {
                tracing::error!(message_id, error = %e, "comment submission failed");
                Err(e)
            },
        }
    }
}
