#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Plain data types shared across the script archive pipeline.
//!
//! An [`EpisodeRef`] is discovered from the show's index page, each
//! episode's script yields zero or more [`DialogueLine`]s, and the two are
//! joined into [`DatasetRow`]s, which are the unit of persistence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Metadata identifying one episode and where to fetch its script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRef {
    /// Episode title as shown in the index (link text when linked).
    pub title: String,
    /// Absolute script URL. `None` when the index row has no link.
    pub url: Option<String>,
    /// 1-based ordinal in index order, unique across all seasons.
    pub episode_number: u32,
    /// Season number. `0` is reserved for the pilot section.
    pub season: u32,
    /// Year from the season header, stored as January 1st.
    pub season_year: Option<NaiveDate>,
    /// Original airdate parsed from the title cell.
    pub airdate: Option<NaiveDate>,
}

impl EpisodeRef {
    /// Returns the script URL if it is present and non-blank.
    #[must_use]
    pub fn script_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// One speaker-attributed utterance extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Lowercase, normalized speaker name.
    pub speaker: String,
    /// Lowercase word tokens in utterance order.
    pub tokens: Vec<String>,
}

/// A [`DialogueLine`] joined with the metadata of the episode it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    /// Episode title.
    pub title: String,
    /// Episode airdate.
    pub airdate: Option<NaiveDate>,
    /// Episode ordinal.
    pub episode_number: u32,
    /// Season number.
    pub season: u32,
    /// Season premiere year.
    pub season_year: Option<NaiveDate>,
    /// Script URL.
    pub url: Option<String>,
    /// Speaker of this line.
    pub speaker: String,
    /// Tokens of this line.
    pub tokens: Vec<String>,
}

impl DatasetRow {
    /// Joins a parsed line with its owning episode.
    #[must_use]
    pub fn new(episode: &EpisodeRef, line: DialogueLine) -> Self {
        Self {
            title: episode.title.clone(),
            airdate: episode.airdate,
            episode_number: episode.episode_number,
            season: episode.season,
            season_year: episode.season_year,
            url: episode.url.clone(),
            speaker: line.speaker,
            tokens: line.tokens,
        }
    }
}

/// Columns of the persisted dataset, in on-disk order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DatasetColumn {
    Title,
    Airdate,
    EpisodeNumber,
    Season,
    SeasonYear,
    Url,
    Speaker,
    Tokens,
}

impl DatasetColumn {
    /// All columns in on-disk order.
    pub const ALL: &[Self] = &[
        Self::Title,
        Self::Airdate,
        Self::EpisodeNumber,
        Self::Season,
        Self::SeasonYear,
        Self::Url,
        Self::Speaker,
        Self::Tokens,
    ];

    /// `DuckDB` type used for this column.
    #[must_use]
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Title | Self::Speaker => "TEXT NOT NULL",
            Self::Airdate | Self::SeasonYear => "DATE",
            Self::EpisodeNumber | Self::Season => "INTEGER NOT NULL",
            Self::Url => "TEXT",
            Self::Tokens => "VARCHAR[] NOT NULL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> EpisodeRef {
        EpisodeRef {
            title: "The Deal".to_string(),
            url: Some("https://example.com/TheDeal.htm".to_string()),
            episode_number: 27,
            season: 2,
            season_year: NaiveDate::from_ymd_opt(1991, 1, 1),
            airdate: NaiveDate::from_ymd_opt(1991, 5, 2),
        }
    }

    #[test]
    fn row_copies_episode_metadata() {
        let line = DialogueLine {
            speaker: "jerry".to_string(),
            tokens: vec!["hello".to_string(), "there".to_string()],
        };
        let row = DatasetRow::new(&episode(), line);

        assert_eq!(row.title, "The Deal");
        assert_eq!(row.episode_number, 27);
        assert_eq!(row.season, 2);
        assert_eq!(row.airdate, NaiveDate::from_ymd_opt(1991, 5, 2));
        assert_eq!(row.speaker, "jerry");
        assert_eq!(row.tokens, ["hello", "there"]);
    }

    #[test]
    fn blank_url_is_not_a_script_url() {
        let mut ep = episode();
        ep.url = Some("   ".to_string());
        assert_eq!(ep.script_url(), None);
        ep.url = None;
        assert_eq!(ep.script_url(), None);
    }

    #[test]
    fn column_names_are_snake_case() {
        let names: Vec<&str> = DatasetColumn::ALL.iter().map(AsRef::as_ref).collect();
        assert_eq!(
            names,
            [
                "title",
                "airdate",
                "episode_number",
                "season",
                "season_year",
                "url",
                "speaker",
                "tokens"
            ]
        );
    }

    #[test]
    fn episode_serializes_camel_case() {
        let json = serde_json::to_value(episode()).unwrap();
        assert_eq!(json["episodeNumber"], 27);
        assert_eq!(json["airdate"], "1991-05-02");
    }
}
