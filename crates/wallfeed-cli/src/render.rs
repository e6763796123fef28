//! Plain-text rendering.

use wallfeed_app::FeedState;
use wallfeed_proto::{Comment, Message};

/// One line per message: id, timestamp, text and counters.
pub fn message_line(message: &Message) -> String {
    let mut line = format!("#{} [{}] {}", message.id, message.timestamp, message.text);

    let mut counters = Vec::new();
    if let Some(likes) = message.likes {
        counters.push(format!("{likes} likes"));
    }
    if message.comment_count() > 0 {
        counters.push(format!("{} comments", message.comment_count()));
    }
    if let Some(files) = message.files.as_ref().filter(|f| !f.is_empty()) {
        counters.push(format!("{} files", files.len()));
    }
    if !counters.is_empty() {
        line.push_str(&format!(" ({})", counters.join(", ")));
    }
    line
}

/// Indented comment line.
pub fn comment_line(comment: &Comment) -> String {
    format!("    {} [{}]: {}", comment.user, comment.timestamp, comment.text)
}

/// Pagination summary for the end of a feed listing.
pub fn feed_summary(state: &FeedState) -> String {
    let tail = if state.has_more() { "more available" } else { "end of feed" };
    format!(
        "{} of {} messages, page {} at {} per page, {tail}",
        state.messages().len(),
        state.total_messages(),
        state.current_page(),
        state.page_size(),
    )
}
