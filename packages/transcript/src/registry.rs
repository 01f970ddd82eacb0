//! Show registry. Loads all show definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/transcript/shows/` is baked into the
//! binary at compile time via [`include_str!`]. Adding a show means adding a
//! TOML file and listing it below.

use crate::TranscriptError;
use crate::show::{ShowDefinition, parse_show_toml};

/// TOML configs embedded at compile time.
const SHOW_TOMLS: &[(&str, &str)] = &[("seinfeld", include_str!("../shows/seinfeld.toml"))];

/// Identifier of the show used when none is requested.
pub const DEFAULT_SHOW_ID: &str = "seinfeld";

/// Returns all configured show definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the registry tests).
#[must_use]
pub fn all_shows() -> Vec<ShowDefinition> {
    SHOW_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_show_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up an embedded show by identifier.
///
/// # Errors
///
/// Returns [`TranscriptError::UnknownShow`] if no show has that id.
pub fn find_show(id: &str) -> Result<ShowDefinition, TranscriptError> {
    all_shows()
        .into_iter()
        .find(|show| show.id() == id)
        .ok_or_else(|| TranscriptError::UnknownShow(id.to_owned()))
}
