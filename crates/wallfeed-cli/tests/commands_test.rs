//! Command output against the simulated wall.

use wallfeed_app::{
    FeedConfig, JsonFileSettings, MemorySettings, MergePolicy, SettingsStore, Theme,
};
use wallfeed_cli::{CliError, FeedOptions, ThemeAction};
use wallfeed_harness::SimServer;
use wallfeed_client::HttpTransport;
use wallfeed_proto::{ANONYMOUS_USER, Message, endpoint};

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn feed_prints_requested_pages() {
    let server = SimServer::with_messages(40);
    let mut out = Vec::new();
    let options = FeedOptions { pages: 2, ..FeedOptions::default() };

    let state = wallfeed_cli::feed(server, FeedConfig::default(), &options, &mut out).await.unwrap();

    assert_eq!(state.messages().len(), 30);
    let output = text(out);
    assert!(output.starts_with("#1 ["));
    assert!(output.contains("#30 ["));
    assert!(!output.contains("#31 ["));
    assert!(output.ends_with("30 of 40 messages, page 2 at 15 per page, more available\n"));
}

#[tokio::test]
async fn feed_all_stops_at_end() {
    let server = SimServer::with_messages(40);
    let mut out = Vec::new();
    let options = FeedOptions { all: true, ..FeedOptions::default() };

    let state = wallfeed_cli::feed(server.clone(), FeedConfig::default(), &options, &mut out)
        .await
        .unwrap();

    assert!(!state.has_more());
    assert_eq!(server.request_count(endpoint::MESSAGES), 3);
    assert!(text(out).ends_with("end of feed\n"));
}

#[tokio::test]
async fn feed_all_with_dedup_stops_at_end() {
    let server = SimServer::with_messages(40);
    server.post_to_front(Message::new(100, "fresh", "now"));
    server.set_page_size(Some(15));
    let config = FeedConfig::default().with_merge_policy(MergePolicy::DedupById);
    let options = FeedOptions { all: true, ..FeedOptions::default() };
    let mut out = Vec::new();

    let state = wallfeed_cli::feed(server.clone(), config, &options, &mut out).await.unwrap();

    assert!(!state.has_more());
    assert_eq!(state.messages().len(), 41);
    assert_eq!(server.request_count(endpoint::MESSAGES), 3);
}

#[test]
fn http_transport_is_exported_at_crate_root() {
    let transport = HttpTransport::new("http://wall.test/").unwrap();
    assert_eq!(transport.base_url(), "http://wall.test");
}

#[tokio::test]
async fn feed_failure_is_an_error() {
    let server = SimServer::with_messages(40);
    server.fail(endpoint::MESSAGES, 500);
    let mut out = Vec::new();

    let err = wallfeed_cli::feed(server, FeedConfig::default(), &FeedOptions::default(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Feed(ref reason) if reason.contains("500")));
    assert!(out.is_empty());
}

#[tokio::test]
async fn verbose_feed_reports_negotiation() {
    let server = SimServer::with_messages(5);
    server.fail(endpoint::PAGE_SIZE, 503);
    let mut out = Vec::new();
    let options = FeedOptions { verbose: true, ..FeedOptions::default() };

    wallfeed_cli::feed(server, FeedConfig::default(), &options, &mut out).await.unwrap();

    let output = text(out);
    assert!(output.starts_with("page size negotiation failed"));
    assert!(output.contains("using default 15"));
}

#[tokio::test]
async fn comment_reports_anonymous_author() {
    let server = SimServer::with_messages(10);
    let mut out = Vec::new();

    let comment = wallfeed_cli::comment(server.clone(), 7, "hello", &mut out).await.unwrap();

    assert_eq!(comment.user, ANONYMOUS_USER);
    assert_eq!(text(out), format!("comment #1 posted on message #7 as {ANONYMOUS_USER}\n"));
    assert_eq!(server.comments_on(7).len(), 1);
}

#[tokio::test]
async fn feed_shows_comments_when_asked() {
    let server = SimServer::with_messages(3);
    wallfeed_cli::comment(server.clone(), 2, "first!", &mut Vec::new()).await.unwrap();
    let mut out = Vec::new();
    let options = FeedOptions { show_comments: true, ..FeedOptions::default() };

    wallfeed_cli::feed(server, FeedConfig::default(), &options, &mut out).await.unwrap();

    let output = text(out);
    assert!(output.contains("#2 [2024-05-01 12:00:02] message 2 (1 comments)"));
    assert!(output.contains(&format!("    {ANONYMOUS_USER} [")));
}

#[test]
fn theme_show_does_not_write() {
    let mut out = Vec::new();
    let store = MemorySettings::with_dark_mode(true);

    let theme = wallfeed_cli::theme(&store, false, ThemeAction::Show, &mut out).unwrap();

    assert_eq!(theme, Theme::Dark);
    assert_eq!(store.writes(), 0);
    assert_eq!(text(out), "theme: dark\n");
}

#[test]
fn theme_toggle_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut out = Vec::new();

    let theme =
        wallfeed_cli::theme(JsonFileSettings::new(&path), false, ThemeAction::Toggle, &mut out)
            .unwrap();

    assert_eq!(theme, Theme::Dark);
    assert_eq!(text(out), "theme: dark (saved)\n");
    assert_eq!(JsonFileSettings::new(&path).load_dark_mode().unwrap(), Some(true));
}

#[test]
fn theme_set_to_current_value_is_not_saved() {
    let mut out = Vec::new();
    let store = MemorySettings::with_dark_mode(false);

    wallfeed_cli::theme(&store, true, ThemeAction::Set(false), &mut out).unwrap();

    assert_eq!(store.writes(), 0);
    assert_eq!(text(out), "theme: light\n");
}
