//! Index page parsing.
//!
//! The index is a table listing every episode, grouped under season header
//! rows. Rows are scanned top to bottom while tracking the current season
//! and its premiere year. Header rows update that state; episode rows emit
//! an [`EpisodeRef`]; anything else is skipped.

use chrono::NaiveDate;
use script_archive_scraper::html::{inline_text, parse_selector};
use script_archive_scraper::join_url;
use script_archive_transcript_models::EpisodeRef;
use scraper::{ElementRef, Html, Selector};

use crate::TranscriptError;
use crate::parsing::{
    mentions_season_or_pilot, parse_airdate, parse_season_number, parse_season_year,
};

/// Season assigned to the pilot section and to headers without a number.
pub const PILOT_SEASON: u32 = 0;

/// Parses an index page into [`EpisodeRef`]s.
#[derive(Debug, Clone)]
pub struct IndexParser {
    base_url: String,
    row_selector: Selector,
    cell_selector: Selector,
    emphasis_selector: Selector,
    link_selector: Selector,
}

impl IndexParser {
    /// Creates a parser that joins episode links onto `base_url` and scans
    /// the rows matched by `row_selector`.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Scrape`] if `base_url` is not an absolute
    /// URL or a selector is invalid.
    pub fn new(base_url: &str, row_selector: &str) -> Result<Self, TranscriptError> {
        join_url(base_url, "")?;
        Ok(Self {
            base_url: base_url.to_owned(),
            row_selector: parse_selector(row_selector)?,
            cell_selector: parse_selector("td, th")?,
            emphasis_selector: parse_selector("b, strong, em")?,
            link_selector: parse_selector("a[href]")?,
        })
    }

    /// Parses `markup` and returns every episode in document order.
    #[must_use]
    pub fn parse(&self, markup: &str) -> Vec<EpisodeRef> {
        let document = Html::parse_document(markup);
        let episodes: Vec<EpisodeRef> = self.scan(&document).collect();
        log::info!("Index lists {} episodes", episodes.len());
        episodes
    }

    /// Returns a forward-only scan over the episodes in `document`.
    pub fn scan<'p, 'd>(
        &'p self,
        document: &'d Html,
    ) -> IndexScan<'p, impl Iterator<Item = ElementRef<'d>>> {
        IndexScan {
            parser: self,
            rows: document.select(&self.row_selector),
            season: PILOT_SEASON,
            season_year: None,
            counter: 0,
        }
    }

    fn classify<'d>(&self, row: ElementRef<'d>) -> RowKind<'d> {
        let text = inline_text(row);

        if row.select(&self.emphasis_selector).next().is_some() && mentions_season_or_pilot(&text)
        {
            return RowKind::Header(text);
        }

        let cells: Vec<ElementRef<'d>> = row.select(&self.cell_selector).collect();
        if cells.len() >= 2 {
            let first = inline_text(cells[0]);
            if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
                return RowKind::Episode {
                    listed_number: first,
                    title_cell: cells[1],
                };
            }
        }

        RowKind::Other
    }

    fn title_and_url(&self, cell: ElementRef<'_>) -> (String, Option<String>) {
        let Some(link) = cell.select(&self.link_selector).next() else {
            return (inline_text(cell), None);
        };

        let href = link.value().attr("href").unwrap_or_default();
        let url = match join_url(&self.base_url, href) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Dropping unusable episode link '{href}': {e}");
                None
            }
        };

        (inline_text(link), url)
    }
}

enum RowKind<'d> {
    Header(String),
    Episode {
        listed_number: String,
        title_cell: ElementRef<'d>,
    },
    Other,
}

/// Forward-only iterator over the episodes of one index document.
///
/// Holds the running season state; it cannot be restarted.
pub struct IndexScan<'p, I> {
    parser: &'p IndexParser,
    rows: I,
    season: u32,
    season_year: Option<NaiveDate>,
    counter: u32,
}

impl<'d, I> Iterator for IndexScan<'_, I>
where
    I: Iterator<Item = ElementRef<'d>>,
{
    type Item = EpisodeRef;

    fn next(&mut self) -> Option<EpisodeRef> {
        for row in self.rows.by_ref() {
            match self.parser.classify(row) {
                RowKind::Header(text) => {
                    // Headers without "Season N" collapse to the pilot section.
                    self.season = parse_season_number(&text).unwrap_or(PILOT_SEASON);
                    self.season_year = parse_season_year(&text);
                    log::debug!(
                        "Season header '{text}' -> season {} ({:?})",
                        self.season,
                        self.season_year
                    );
                }
                RowKind::Episode {
                    listed_number,
                    title_cell,
                } => {
                    self.counter += 1;
                    let (title, url) = self.parser.title_and_url(title_cell);
                    let airdate = parse_airdate(&inline_text(title_cell));
                    log::trace!(
                        "Episode {} (listed as {listed_number}): {title}",
                        self.counter
                    );
                    return Some(EpisodeRef {
                        title,
                        url,
                        episode_number: self.counter,
                        season: self.season,
                        season_year: self.season_year,
                        airdate,
                    });
                }
                RowKind::Other => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.seinfeldscripts.com/";

    fn parser() -> IndexParser {
        IndexParser::new(BASE, "tr").unwrap()
    }

    const INDEX: &str = r#"<html><body>
        <table border="1">
          <tr><td colspan="2"><b>Pilot (1989)</b></td></tr>
          <tr><td>1</td><td><a href="TheSeinfeldChronicles.htm">The Seinfeld Chronicles</a> (7/5/89)</td></tr>
          <tr><td colspan="2"><b>Season 1 (1990)</b></td></tr>
          <tr><td>2</td><td><a href=" TheStakeout.htm ">The Stakeout</a> (5/31/90)</td></tr>
          <tr><td>3</td><td><a href="TheRobbery.htm">The Robbery</a> (6/7/90)</td></tr>
          <tr><td>Episode</td><td>Title</td></tr>
          <tr><td colspan="2"><b>Season 3 (1991)</b></td></tr>
          <tr><td>17</td><td><a href="TheNote.htm">The Note</a> (9/18/91)</td></tr>
          <tr><td>18</td><td>The Lost Episode</td></tr>
          <tr><td colspan="2"><strong>Season 4</strong></td></tr>
          <tr><td>40</td><td><a href="TheTrip1.htm">The Trip (1)</a> (8/12/92)</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn episode_numbers_are_consecutive_from_one() {
        let episodes = parser().parse(INDEX);
        let numbers: Vec<u32> = episodes.iter().map(|e| e.episode_number).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn pilot_header_sets_season_zero() {
        let episodes = parser().parse(INDEX);
        assert_eq!(episodes[0].season, 0);
        assert_eq!(episodes[0].season_year, NaiveDate::from_ymd_opt(1989, 1, 1));
        assert_eq!(episodes[0].title, "The Seinfeld Chronicles");
    }

    #[test]
    fn season_header_applies_until_next_header() {
        let episodes = parser().parse(INDEX);
        assert_eq!(episodes[1].season, 1);
        assert_eq!(episodes[2].season, 1);

        let note = &episodes[3];
        assert_eq!(note.season, 3);
        assert_eq!(note.season_year, NaiveDate::from_ymd_opt(1991, 1, 1));
        assert_eq!(episodes[4].season, 3);
    }

    #[test]
    fn header_without_year_clears_season_year() {
        let episodes = parser().parse(INDEX);
        assert_eq!(episodes[5].season, 4);
        assert_eq!(episodes[5].season_year, None);
    }

    #[test]
    fn extracts_title_url_and_airdate() {
        let episodes = parser().parse(INDEX);
        let stakeout = &episodes[1];
        assert_eq!(stakeout.title, "The Stakeout");
        assert_eq!(
            stakeout.url.as_deref(),
            Some("https://www.seinfeldscripts.com/TheStakeout.htm")
        );
        assert_eq!(stakeout.airdate, NaiveDate::from_ymd_opt(1990, 5, 31));
    }

    #[test]
    fn unlinked_row_keeps_full_cell_text_and_no_url() {
        let episodes = parser().parse(INDEX);
        let lost = &episodes[4];
        assert_eq!(lost.title, "The Lost Episode");
        assert_eq!(lost.url, None);
        assert_eq!(lost.airdate, None);
    }

    #[test]
    fn ambiguous_header_collapses_to_pilot() {
        let markup = r"<table>
            <tr><td><b>Season 2</b></td></tr>
            <tr><td>1</td><td>A</td></tr>
            <tr><td><b>Pilot season specials</b></td></tr>
            <tr><td>2</td><td>B</td></tr>
        </table>";
        let episodes = parser().parse(markup);
        assert_eq!(episodes[0].season, 2);
        assert_eq!(episodes[1].season, 0);
    }

    #[test]
    fn words_containing_season_or_pilot_are_not_headers() {
        let markup = r"<table>
            <tr><td><b>Season 2</b></td></tr>
            <tr><td>1</td><td>A</td></tr>
            <tr><td><b>Autopilot</b></td></tr>
            <tr><td><b>Seasonal Specials</b></td></tr>
            <tr><td>2</td><td>B</td></tr>
        </table>";
        let episodes = parser().parse(markup);
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[1].season, 2);
    }

    #[test]
    fn non_episode_rows_are_ignored() {
        let markup = r"<table>
            <tr><td>Episode</td><td>Title</td></tr>
            <tr><td>12</td></tr>
            <tr><td>1a</td><td>Bonus</td></tr>
            <tr><td>Season 5</td><td>not bold</td></tr>
        </table>";
        assert!(parser().parse(markup).is_empty());
    }

    #[test]
    fn empty_page_yields_no_episodes() {
        assert!(parser().parse("<html></html>").is_empty());
    }

    #[test]
    fn scan_is_lazy_and_forward_only() {
        let parser = parser();
        let document = Html::parse_document(INDEX);
        let mut scan = parser.scan(&document);
        assert_eq!(scan.next().map(|e| e.episode_number), Some(1));
        assert_eq!(scan.next().map(|e| e.episode_number), Some(2));
        assert_eq!(scan.count(), 4);
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(IndexParser::new("scripts/", "tr").is_err());
    }
}
