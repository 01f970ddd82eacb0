#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the script archive.
//!
//! Builds (or loads) the dialogue dataset for a show, lists its episodes,
//! parses single script pages, and exports the persisted table to CSV.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use script_archive_transcript::show::load_show_file;
use script_archive_transcript::{DEFAULT_SHOW_ID, ShowDefinition, find_show};

#[derive(Parser)]
#[command(name = "script_archive", about = "TV script archive dataset builder")]
struct Cli {
    /// Embedded show definition to use
    #[arg(long, global = true, default_value = DEFAULT_SHOW_ID)]
    show: String,
    /// Load the show definition from this TOML file instead
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dataset, or load it if it already exists
    Build {
        /// Dataset file (defaults to `$SCRIPT_ARCHIVE_DATA_DIR/<show>.duckdb`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Delete any existing dataset and rebuild from the network
        #[arg(long)]
        force: bool,
        /// Keep rows from scripts known to parse badly
        #[arg(long)]
        keep_known_bad: bool,
    },
    /// Fetch the index page and list its episodes
    Episodes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch one script page and print its dialogue lines
    Script {
        /// Script page URL
        url: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export a persisted dataset to CSV (no network access)
    Export {
        /// CSV file to write
        #[arg(long)]
        output: PathBuf,
        /// Dataset file to read (defaults to the build location)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Keep rows from scripts known to parse badly
        #[arg(long)]
        keep_known_bad: bool,
    },
    /// List the embedded show definitions
    Shows,
}

fn resolve_show(cli: &Cli) -> Result<ShowDefinition, Box<dyn std::error::Error>> {
    let show = match &cli.config {
        Some(path) => {
            log::info!("Loading show definition from {}", path.display());
            load_show_file(path)?
        }
        None => find_show(&cli.show)?,
    };
    Ok(show)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = script_archive_cli_utils::init_logger();
    let cli = Cli::parse();

    let show = resolve_show(&cli)?;

    match cli.command {
        Commands::Build {
            output,
            force,
            keep_known_bad,
        } => {
            commands::build(&show, output, force, keep_known_bad, &multi).await?;
        }
        Commands::Episodes { json } => commands::episodes(&show, json).await?,
        Commands::Script { url, json } => commands::script(&show, &url, json).await?,
        Commands::Export {
            output,
            input,
            keep_known_bad,
        } => commands::export(&show, input, &output, keep_known_bad)?,
        Commands::Shows => commands::list_shows(),
    }

    Ok(())
}
