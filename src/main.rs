mod commands;
mod config;
mod prompt;
mod render;
mod when;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::Session;
use slotnote_core::Flag;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slotnote")]
#[command(about = "Keep yes/no notes on calendar time slots")]
struct Cli {
    /// Directory holding the notes (overrides data_dir from config.toml)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a note on a time slot
    New {
        /// Note title (prompted for when omitted; empty cancels)
        title: Option<String>,

        /// Slot start (e.g., "2025-03-20T10:00")
        #[arg(short, long)]
        start: String,

        /// Slot end, as a time or a duration from the start
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Slot length (e.g., "30m", "1h")
        #[arg(short, long, conflicts_with = "end")]
        duration: Option<String>,
    },
    /// Show notes grouped by day
    List {
        /// Only notes from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only notes until this date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Check the yes or no box of a note
    Mark {
        /// Note id (any unique prefix)
        id: String,

        #[arg(value_enum)]
        answer: Answer,
    },
    /// Change a note's title
    Edit {
        /// Note id (any unique prefix)
        id: String,

        /// New title (edited interactively when omitted)
        title: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id (any unique prefix)
        id: String,
    },
    /// Browse and edit notes interactively
    View,
}

#[derive(Clone, Copy, ValueEnum)]
enum Answer {
    Yes,
    No,
}

impl From<Answer> for Flag {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => Flag::Yes,
            Answer::No => Flag::No,
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = config::load_config()?;
    let session = Session::open(config, cli.data_dir)?;

    match cli.command {
        Commands::New {
            title,
            start,
            end,
            duration,
        } => commands::new::run(session, title, start, end, duration),
        Commands::List { from, to } => {
            let from = from.as_deref().map(when::parse_day_start).transpose()?;
            let to = to.as_deref().map(when::parse_day_end).transpose()?;
            commands::list::run(session, from, to)
        }
        Commands::Mark { id, answer } => commands::mark::run(session, &id, answer.into()),
        Commands::Edit { id, title } => commands::edit::run(session, &id, title),
        Commands::Delete { id } => commands::delete::run(session, &id),
        Commands::View => commands::view::run(session),
    }
}

/// Log to stderr, filtered by SLOTNOTE_LOG (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("SLOTNOTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
