//! Speaker label cleanup.
//!
//! A [`SpeakerTable`] holds two immutable lookups built from a show
//! definition: aliases that correct known typos and OCR artifacts to a
//! canonical name, and a blocklist of words that look like speaker labels
//! but are not (`"CAST:"` credit blocks and similar).

use std::collections::{BTreeMap, BTreeSet};

/// Immutable speaker normalization tables.
///
/// Keys are matched against already-lowercased labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerTable {
    aliases: BTreeMap<String, String>,
    blocklist: BTreeSet<String>,
}

impl SpeakerTable {
    /// Creates a table from an alias map and a blocklist.
    #[must_use]
    pub fn new(
        aliases: BTreeMap<String, String>,
        blocklist: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            aliases,
            blocklist: blocklist.into_iter().collect(),
        }
    }

    /// Returns the canonical name for `label`, or `label` itself when no
    /// alias is known.
    #[must_use]
    pub fn normalize<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map_or(label, String::as_str)
    }

    /// Whether `label` is a known non-speaker word.
    #[must_use]
    pub fn is_blocked(&self, label: &str) -> bool {
        self.blocklist.contains(label)
    }

    /// Resolves a lowercased label to the speaker to emit.
    ///
    /// Returns `None` for blocklisted labels. The blocklist is checked
    /// before aliases are applied.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<String> {
        if self.is_blocked(label) {
            return None;
        }
        Some(self.normalize(label).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SpeakerTable {
        SpeakerTable::new(
            BTreeMap::from([
                ("krame".to_string(), "kramer".to_string()),
                ("je".to_string(), "jerry".to_string()),
            ]),
            ["cast".to_string(), "and".to_string()],
        )
    }

    #[test]
    fn known_variant_is_normalized() {
        assert_eq!(table().normalize("krame"), "kramer");
        assert_eq!(table().normalize("je"), "jerry");
    }

    #[test]
    fn unknown_label_passes_through() {
        assert_eq!(table().normalize("newman"), "newman");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(table().normalize("KRAME"), "KRAME");
    }

    #[test]
    fn blocked_label_resolves_to_none() {
        assert_eq!(table().resolve("cast"), None);
        assert_eq!(table().resolve("krame").as_deref(), Some("kramer"));
    }

    #[test]
    fn empty_table_changes_nothing() {
        let table = SpeakerTable::default();
        assert_eq!(table.resolve("cast").as_deref(), Some("cast"));
    }
}
