//! `wallfeed` binary.
//!
//! # Usage
//!
//! ```bash
//! # First page of the wall
//! wallfeed --server http://localhost:5000 feed
//!
//! # Everything, with comments
//! wallfeed feed --all --comments
//!
//! # Comment on message 7
//! wallfeed comment 7 "nice post"
//!
//! # Flip the saved theme
//! wallfeed theme --toggle
//! ```

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wallfeed_app::{DEFAULT_PAGE_SIZE, FeedConfig, JsonFileSettings, MergePolicy};
use wallfeed_cli::{FeedOptions, ThemeAction};
use wallfeed_client::HttpTransport;

/// Message wall client
#[derive(Parser, Debug)]
#[command(name = "wallfeed")]
#[command(about = "Browse and comment on a message wall")]
#[command(version)]
struct Args {
    /// Wall server base URL
    #[arg(short, long, default_value = "http://localhost:5000", global = true)]
    server: String,

    /// Page size used when the server does not report one
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, global = true)]
    page_size_default: usize,

    /// Deadline for one fetch in seconds (0 disables it)
    #[arg(long, default_value = "30", global = true)]
    timeout_secs: u64,

    /// Drop records already in the feed when appending
    #[arg(long, global = true)]
    dedup: bool,

    /// Settings file for the theme preference
    #[arg(long, default_value = "wallfeed-settings.json", global = true)]
    settings: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the message feed
    Feed {
        /// Pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,

        /// Load every page
        #[arg(short, long)]
        all: bool,

        /// Show comments under each message
        #[arg(short, long)]
        comments: bool,

        /// Report page-size negotiation details
        #[arg(short, long)]
        verbose: bool,
    },

    /// Comment on a message
    Comment {
        /// Message to comment on
        message_id: u64,

        /// Comment text
        text: String,
    },

    /// Show or change the theme preference
    Theme {
        /// Flip the saved preference
        #[arg(long, conflicts_with = "dark")]
        toggle: bool,

        /// Save an explicit preference
        #[arg(long)]
        dark: Option<bool>,

        /// Assume the system prefers dark when nothing is saved
        #[arg(long)]
        system_dark: bool,
    },
}

impl Args {
    fn feed_config(&self) -> FeedConfig {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        let policy = if self.dedup { MergePolicy::DedupById } else { MergePolicy::Append };

        FeedConfig::default()
            .with_default_page_size(self.page_size_default)
            .with_fetch_timeout(timeout)
            .with_merge_policy(policy)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let mut out = std::io::stdout().lock();

    match &args.command {
        Command::Feed { pages, all, comments, verbose } => {
            let transport = HttpTransport::new(args.server.as_str())?;
            tracing::debug!(server = transport.base_url(), "loading feed");

            let options =
                FeedOptions { pages: *pages, all: *all, show_comments: *comments, verbose: *verbose };
            wallfeed_cli::feed(transport, args.feed_config(), &options, &mut out).await?;
        },
        Command::Comment { message_id, text } => {
            let transport = HttpTransport::new(args.server.as_str())?;
            wallfeed_cli::comment(transport, *message_id, text, &mut out).await?;
        },
        Command::Theme { toggle, dark, system_dark } => {
            let action = match (toggle, dark) {
                (true, _) => ThemeAction::Toggle,
                (false, Some(dark)) => ThemeAction::Set(*dark),
                (false, None) => ThemeAction::Show,
            };
            let store = JsonFileSettings::new(&args.settings);
            wallfeed_cli::theme(store, *system_dark, action, &mut out)?;
        },
    }

    Ok(())
}
