//! Config-driven show definition.
//!
//! [`ShowDefinition`] captures everything site-specific about a script
//! archive: where the index lives, which element holds the script text, the
//! request identity, the speaker cleanup tables and the list of scripts known
//! to defeat the parser. Definitions are plain TOML documents.

use std::collections::{BTreeMap, BTreeSet};

use script_archive_scraper::{FetchConfig, ScrapeError, join_url};
use serde::Deserialize;

use crate::TranscriptError;
use crate::dialogue::TranscriptParser;
use crate::index::IndexParser;
use crate::speakers::SpeakerTable;

/// A complete, config-driven show definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowDefinition {
    /// Unique identifier (e.g., `"seinfeld"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Where and how to fetch pages.
    pub site: SiteConfig,
    /// Speaker normalization tables.
    #[serde(default)]
    pub speakers: SpeakerConfig,
    /// Script URLs whose pages do not follow the expected layout.
    ///
    /// Applied by callers after the dataset is built, never by the parser.
    #[serde(default)]
    pub known_bad_urls: BTreeSet<String>,
}

/// Site layout and request identity.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that relative episode links are joined onto.
    pub base_url: String,
    /// Path of the index page relative to `base_url`.
    pub index_path: String,
    /// CSS selector of the episode page's main content container.
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    /// CSS selector matching the index table rows, in document order.
    #[serde(default = "default_index_row_selector")]
    pub index_row_selector: String,
    /// HTTP headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_content_selector() -> String {
    "#content".to_owned()
}

fn default_index_row_selector() -> String {
    "tr".to_owned()
}

/// Raw speaker tables as written in the TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakerConfig {
    /// Known misspelled or abbreviated labels mapped to canonical names.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Labels that are never speakers (credit blocks, prose false positives).
    #[serde(default)]
    pub blocklist: BTreeSet<String>,
}

impl ShowDefinition {
    /// Returns the unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute index page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidUrl`] if the base URL is malformed.
    pub fn index_url(&self) -> Result<String, ScrapeError> {
        join_url(&self.site.base_url, &self.site.index_path)
    }

    /// Builds the request identity for this site.
    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new().with_headers(
            self.site
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Builds the speaker lookup tables for this show.
    #[must_use]
    pub fn speaker_table(&self) -> SpeakerTable {
        SpeakerTable::new(
            self.speakers.aliases.clone(),
            self.speakers.blocklist.iter().cloned(),
        )
    }

    /// Builds an [`IndexParser`] for this show's index layout.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Scrape`] if the base URL or row selector
    /// is invalid.
    pub fn index_parser(&self) -> Result<IndexParser, TranscriptError> {
        IndexParser::new(&self.site.base_url, &self.site.index_row_selector)
    }

    /// Builds a [`TranscriptParser`] with this show's speaker tables.
    #[must_use]
    pub fn transcript_parser(&self) -> TranscriptParser {
        TranscriptParser::new(self.speaker_table())
    }

    /// Whether `url` is on the known-unparsable list.
    #[must_use]
    pub fn is_known_bad(&self, url: &str) -> bool {
        self.known_bad_urls.contains(url)
    }
}

/// Parses a show definition from a TOML string.
///
/// # Errors
///
/// Returns [`TranscriptError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_show_toml(toml_str: &str) -> Result<ShowDefinition, TranscriptError> {
    toml::de::from_str(toml_str).map_err(|e| TranscriptError::Config(e.to_string()))
}

/// Reads and parses a show definition from a file on disk.
///
/// # Errors
///
/// Returns [`TranscriptError::Io`] if the file cannot be read, or
/// [`TranscriptError::Config`] if it does not parse.
pub fn load_show_file(path: &std::path::Path) -> Result<ShowDefinition, TranscriptError> {
    let contents = std::fs::read_to_string(path)?;
    parse_show_toml(&contents)
}
