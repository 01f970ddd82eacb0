//! Consumer-side filtering of built datasets.
//!
//! Some script pages are known to defeat the transcript parser. They are
//! still fetched, parsed and persisted; callers drop their rows afterwards.

use std::collections::BTreeSet;

use script_archive_transcript_models::DatasetRow;

/// Removes rows whose `url` is in `known_bad`.
///
/// Rows without a URL are kept.
#[must_use]
pub fn exclude_urls(rows: Vec<DatasetRow>, known_bad: &BTreeSet<String>) -> Vec<DatasetRow> {
    let before = rows.len();
    let kept: Vec<DatasetRow> = rows
        .into_iter()
        .filter(|row| row.url.as_ref().is_none_or(|url| !known_bad.contains(url)))
        .collect();

    if kept.len() < before {
        log::info!(
            "Excluded {} rows from {} known-unparsable scripts",
            before - kept.len(),
            known_bad.len()
        );
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: Option<&str>) -> DatasetRow {
        DatasetRow {
            title: "t".to_string(),
            airdate: None,
            episode_number: 1,
            season: 1,
            season_year: None,
            url: url.map(ToString::to_string),
            speaker: "jerry".to_string(),
            tokens: vec!["hi".to_string()],
        }
    }

    #[test]
    fn drops_only_known_bad_urls() {
        let bad = BTreeSet::from(["https://x/TheLimo.html".to_string()]);
        let rows = vec![
            row(Some("https://x/TheLimo.html")),
            row(Some("https://x/TheDeal.htm")),
            row(None),
            row(Some("https://x/TheLimo.html")),
        ];

        let kept = exclude_urls(rows, &bad);
        let urls: Vec<Option<&str>> = kept.iter().map(|r| r.url.as_deref()).collect();
        assert_eq!(urls, [Some("https://x/TheDeal.htm"), None]);
    }

    #[test]
    fn empty_blocklist_keeps_everything() {
        let rows = vec![row(Some("a")), row(Some("b"))];
        assert_eq!(exclude_urls(rows.clone(), &BTreeSet::new()), rows);
    }
}
