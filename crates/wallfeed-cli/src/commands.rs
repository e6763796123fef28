//! `feed`, `comment` and `theme` commands.

use std::io::Write;

use wallfeed_app::{
    CommentComposer, FeedConfig, FeedState, FetchOutcome, MessageFeedStore, SettingsStore, Theme,
    ThemeService,
};
use wallfeed_client::{CommentClient, PageSizeNegotiator, Transport};
use wallfeed_proto::Comment;

use crate::{CliError, render};

/// How much of the feed to load.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Pages to load, counting the first. Zero is treated as one.
    pub pages: usize,
    /// Load until the feed is exhausted, ignoring `pages`.
    pub all: bool,
    /// Print each message's comments under it.
    pub show_comments: bool,
    /// Report the raw page-size negotiation result before loading.
    pub verbose: bool,
}

/// Load the feed and print it.
///
/// Returns the final state. The first failed fetch ends the command.
pub async fn feed<T: Transport, W: Write>(
    transport: T,
    config: FeedConfig,
    options: &FeedOptions,
    out: &mut W,
) -> Result<FeedState, CliError> {
    if options.verbose {
        let negotiator = PageSizeNegotiator::new(transport.clone(), config.default_page_size);
        match negotiator.try_negotiate().await {
            Ok(size) => writeln!(out, "server page size: {size}")?,
            Err(e) => writeln!(
                out,
                "page size negotiation failed ({e}), using default {}",
                negotiator.default_page_size()
            )?,
        }
    }

    let store = MessageFeedStore::new(transport, config);
    let mut outcome = store.reset_and_load().await;
    let mut loaded = 1;

    while outcome != FetchOutcome::Failed && (options.all || loaded < options.pages.max(1)) {
        outcome = store.load_more().await;
        match outcome {
            FetchOutcome::Merged { .. } => loaded += 1,
            FetchOutcome::Skipped | FetchOutcome::Failed => break,
        }
    }

    let state = store.snapshot();
    if outcome == FetchOutcome::Failed {
        return Err(CliError::Feed(state.error().unwrap_or("unknown error").to_string()));
    }

    for message in state.messages() {
        writeln!(out, "{}", render::message_line(message))?;
        if options.show_comments {
            for comment in message.comments.iter().flatten() {
                writeln!(out, "{}", render::comment_line(comment))?;
            }
        }
    }
    writeln!(out, "{}", render::feed_summary(&state))?;

    Ok(state)
}

/// Post `text` as a comment on `message_id`.
pub async fn comment<T: Transport, W: Write>(
    transport: T,
    message_id: u64,
    text: &str,
    out: &mut W,
) -> Result<Comment, CliError> {
    let mut composer = CommentComposer::new(CommentClient::new(transport));
    composer.toggle_input(message_id);

    let comment = composer.submit(message_id, text).await?;
    writeln!(out, "comment #{} posted on message #{message_id} as {}", comment.id, comment.user)?;
    Ok(comment)
}

/// What the `theme` command does with the preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Flip and save.
    Toggle,
    /// Save an explicit dark-mode value.
    Set(bool),
}

/// Show or change the saved theme.
pub fn theme<S: SettingsStore, W: Write>(
    store: S,
    system_prefers_dark: bool,
    action: ThemeAction,
    out: &mut W,
) -> Result<Theme, CliError> {
    let mut service = ThemeService::init(store, system_prefers_dark);

    let changed = match action {
        ThemeAction::Show => false,
        ThemeAction::Toggle => {
            service.toggle()?;
            true
        },
        ThemeAction::Set(dark) => service.set_dark_mode(dark)?,
    };

    let name = match service.theme() {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };
    if changed {
        writeln!(out, "theme: {name} (saved)")?;
    } else {
        writeln!(out, "theme: {name}")?;
    }

    Ok(service.theme())
}
