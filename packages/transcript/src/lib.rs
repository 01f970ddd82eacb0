#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parsing for the script archive.
//!
//! - [`index`] turns the show's index page into episode references.
//! - [`dialogue`] turns one episode's script text into dialogue lines.
//! - [`speakers`] holds the speaker alias table and non-speaker blocklist.
//! - [`show`] and [`registry`] describe each archive site in TOML.

pub mod dialogue;
pub mod index;
pub mod parsing;
pub mod registry;
pub mod show;
pub mod speakers;

use script_archive_scraper::ScrapeError;

pub use dialogue::TranscriptParser;
pub use index::IndexParser;
pub use registry::{DEFAULT_SHOW_ID, all_shows, find_show};
pub use show::ShowDefinition;
pub use speakers::SpeakerTable;

/// Errors that can occur while configuring or running the parsers.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// A show definition failed to parse.
    #[error("Config error: {0}")]
    Config(String),

    /// A show definition file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL or selector in the configuration was rejected.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// No embedded show has the requested id.
    #[error("Unknown show: {0}")]
    UnknownShow(String),
}
