//! Inkwell CLI
//!
//! Command-line interface for inspecting and repairing the local autosave
//! state of the editor: stored drafts, the offline queue, and manual saves.

#![allow(clippy::print_stdout)]

mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, init_telemetry};

/// Inkwell CLI
#[derive(Debug, Parser)]
#[command(name = "inkwell-cli")]
#[command(author, version, about = "Inkwell draft autosave CLI", long_about = None)]
pub(crate) struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "INKWELL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Show storage, queue and backend status
    Status,

    /// Inspect or discard locally stored drafts
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Inspect, replay or clear the offline queue
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },

    /// Save a draft to the backend immediately
    ///
    /// Without --id a new post is created. A failed save is kept in the
    /// offline queue.
    ///
    /// Example: inkwell-cli save --title "Hello" --body-file ./hello.md --id 42
    Save {
        /// Post title
        #[arg(short, long)]
        title: String,

        /// File holding the post body (Markdown)
        #[arg(short, long)]
        body_file: PathBuf,

        /// Backend id of an existing post
        #[arg(long)]
        id: Option<u64>,

        /// Slug of the existing post (requires --id)
        #[arg(long, requires = "id")]
        slug: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum DraftAction {
    /// List every stored draft
    List,

    /// Show the stored draft of a post (or of the unsaved new post)
    Show {
        /// Backend id of the post
        #[arg(long)]
        id: Option<u64>,
    },

    /// Delete the stored draft of a post (or of the unsaved new post)
    Discard {
        /// Backend id of the post
        #[arg(long)]
        id: Option<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum QueueAction {
    /// List queued saves, oldest first
    List,

    /// Replay queued saves against the backend
    Flush,

    /// Drop every queued save
    Clear,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    config.validate()?;
    init_telemetry(&config.telemetry)?;

    let app = app::App::open(config)?;

    match cli.command {
        Commands::Status => commands::status(&app).await?,
        Commands::Draft { action } => match action {
            DraftAction::List => commands::draft_list(&app).await?,
            DraftAction::Show { id } => commands::draft_show(&app, id).await?,
            DraftAction::Discard { id } => commands::draft_discard(&app, id).await?,
        },
        Commands::Queue { action } => match action {
            QueueAction::List => commands::queue_list(&app).await,
            QueueAction::Flush => commands::queue_flush(&app).await?,
            QueueAction::Clear => commands::queue_clear(&app).await,
        },
        Commands::Save {
            title,
            body_file,
            id,
            slug,
        } => commands::save(&app, title, &body_file, id, slug).await?,
    }

    Ok(())
}
