#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dialogue dataset construction and persistence.
//!
//! [`builder::DatasetBuilder`] drives the pipeline (index → episode pages →
//! dialogue lines → rows) and caches the result in a `DuckDB` table via
//! [`store`]. The persisted table is the only durable artifact; nothing else
//! survives between runs.

pub mod builder;
pub mod export;
pub mod filter;
pub mod paths;
pub mod progress;
pub mod store;

use std::collections::BTreeSet;

use script_archive_scraper::ScrapeError;
use script_archive_transcript::TranscriptError;
use script_archive_transcript_models::DatasetRow;

pub use builder::{DatasetBuilder, EpisodeScript};

/// Errors that can occur while building, storing or exporting a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Fetching or reading a page failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The show configuration was rejected.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// A `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A stored value could not be converted back into a row field.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Headline counts for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Number of dialogue rows.
    pub rows: usize,
    /// Number of distinct episodes with at least one row.
    pub episodes: usize,
    /// Number of distinct speakers.
    pub speakers: usize,
    /// Total number of tokens.
    pub tokens: usize,
}

impl DatasetSummary {
    /// Computes the summary of `rows`.
    #[must_use]
    pub fn of(rows: &[DatasetRow]) -> Self {
        let episodes: BTreeSet<u32> = rows.iter().map(|r| r.episode_number).collect();
        let speakers: BTreeSet<&str> = rows.iter().map(|r| r.speaker.as_str()).collect();
        Self {
            rows: rows.len(),
            episodes: episodes.len(),
            speakers: speakers.len(),
            tokens: rows.iter().map(|r| r.tokens.len()).sum(),
        }
    }
}
