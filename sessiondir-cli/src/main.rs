mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sessiondir_core::SessionDir;
use tracing_subscriber::EnvFilter;

use crate::commands::TableArgs;

#[derive(Parser)]
#[command(name = "sessiondir", version)]
#[command(about = "Ingest community events into a local sessiondir and browse their sessions")]
struct Cli {
    /// Directory holding events/, sessions/ and public/ (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new events and their sessions, then rebuild the browsing dataset
    Update {
        /// Only show what would be fetched
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild the browsing dataset from the local files
    Process,
    /// Show the summary of the last update
    Status {
        /// Also compare the remote event list against local files
        #[arg(long)]
        check: bool,
    },
    /// List sessions
    Sessions {
        #[command(flatten)]
        table: TableArgs,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Export the listed sessions as CSV
    Export {
        #[command(flatten)]
        table: TableArgs,

        /// Output file (defaults to null-sessions-<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show configuration and data paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Terminal output is printed directly; logs only surface warnings unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut sessiondir = SessionDir::load()?;
    if let Some(data_dir) = cli.data_dir {
        sessiondir = sessiondir.with_data_dir(data_dir);
    }

    match cli.command {
        Commands::Update { dry_run } => commands::update::run(&sessiondir, dry_run).await,
        Commands::Process => commands::process::run(&sessiondir),
        Commands::Status { check } => commands::status::run(&sessiondir, check).await,
        Commands::Sessions { table, page } => commands::sessions::run(&sessiondir, &table, page),
        Commands::Export { table, output } => commands::export::run(&sessiondir, &table, output),
        Commands::Config => commands::config::run(&sessiondir),
    }
}
