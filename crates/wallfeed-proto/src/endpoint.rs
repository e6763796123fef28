//! Request paths served by the wall.

/// Authoritative page size.
pub const PAGE_SIZE: &str = "/api/get_page_size";

/// Slice of the message list, queried with `start` and `end`.
pub const MESSAGES: &str = "/api/get_messages";

/// Prefix of the comment submission path.
pub const COMMENT_PREFIX: &str = "/wall/comment";

/// Comment submission path for a message.
pub fn comment(message_id: u64) -> String {
    format!("{COMMENT_PREFIX}/{message_id}")
}
