//! Cache-first dataset construction.
//!
//! [`DatasetBuilder::load_or_build`] returns the persisted table verbatim
//! when one exists at the target path and never touches the network in that
//! case. Otherwise it walks the index, fetches and parses each episode's
//! script strictly in index order, and persists the concatenated rows before
//! returning them. Any fetch or storage failure aborts the whole build and
//! nothing is written.

use std::path::Path;
use std::sync::Arc;

use script_archive_scraper::html::extract_text;
use script_archive_scraper::{PageFetcher, ScrapeError};
use script_archive_transcript::{IndexParser, ShowDefinition, TranscriptParser};
use script_archive_transcript_models::{DatasetRow, DialogueLine, EpisodeRef};

use crate::progress::{ProgressCallback, null_progress};
use crate::{DatasetError, store};

/// An episode together with its fetched script text.
///
/// Fetching happens once; the text is then reused for every consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeScript {
    /// The episode the script belongs to.
    pub episode: EpisodeRef,
    /// Plain text of the page's content container.
    pub text: String,
}

impl EpisodeScript {
    /// Parses the script into dialogue lines.
    #[must_use]
    pub fn lines(&self, parser: &TranscriptParser) -> Vec<DialogueLine> {
        parser.parse(&self.text)
    }

    /// Parses the script and joins each line with the episode metadata.
    #[must_use]
    pub fn rows(&self, parser: &TranscriptParser) -> Vec<DatasetRow> {
        self.lines(parser)
            .into_iter()
            .map(|line| DatasetRow::new(&self.episode, line))
            .collect()
    }
}

/// Orchestrates fetching, parsing and persistence for one show.
pub struct DatasetBuilder<'a, F> {
    fetcher: &'a F,
    show: &'a ShowDefinition,
    index_parser: IndexParser,
    transcript_parser: TranscriptParser,
    progress: Arc<dyn ProgressCallback>,
}

impl<'a, F: PageFetcher> DatasetBuilder<'a, F> {
    /// Creates a builder for `show` that fetches pages through `fetcher`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Transcript`] if the show's index layout is
    /// misconfigured.
    pub fn new(show: &'a ShowDefinition, fetcher: &'a F) -> Result<Self, DatasetError> {
        Ok(Self {
            fetcher,
            show,
            index_parser: show.index_parser()?,
            transcript_parser: show.transcript_parser(),
            progress: null_progress(),
        })
    }

    /// Reports per-episode progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the persisted dataset at `path`, building it first if absent.
    ///
    /// An existing table is trusted as-is; staleness is never checked.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if reading the cache, any fetch, or the
    /// final write fails.
    pub async fn load_or_build(&self, path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
        if store::exists(path) {
            log::info!("Using cached dataset at {}", path.display());
            return store::read_rows(path);
        }

        let rows = self.build().await?;
        store::write_rows(path, &rows)?;
        Ok(rows)
    }

    /// Fetches and parses the index page.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Scrape`] if the index cannot be fetched.
    pub async fn fetch_episodes(&self) -> Result<Vec<EpisodeRef>, DatasetError> {
        let index_url = self.show.index_url()?;
        log::info!("[{}] Fetching index from {index_url}", self.show.id());
        let markup = self.fetcher.fetch_page(&index_url).await?;
        Ok(self.index_parser.parse(&markup))
    }

    /// Fetches one episode's page and extracts its script text.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MissingUrl`] (wrapped) when the episode has no
    /// link, or any fetch error.
    pub async fn fetch_script(&self, episode: &EpisodeRef) -> Result<EpisodeScript, DatasetError> {
        let url = episode.script_url().ok_or(ScrapeError::MissingUrl)?;
        let text = self.fetch_text(url).await?;
        Ok(EpisodeScript {
            episode: episode.clone(),
            text,
        })
    }

    /// Fetches a script page by URL and parses it into dialogue lines.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Scrape`] if the page cannot be fetched.
    pub async fn fetch_lines(&self, url: &str) -> Result<Vec<DialogueLine>, DatasetError> {
        let text = self.fetch_text(url).await?;
        Ok(self.transcript_parser.parse(&text))
    }

    /// Builds the full dataset from the network without touching the cache.
    ///
    /// Episodes without a script link are skipped before any fetch.
    ///
    /// # Errors
    ///
    /// Returns the first [`DatasetError`] encountered.
    pub async fn build(&self) -> Result<Vec<DatasetRow>, DatasetError> {
        let episodes = self.fetch_episodes().await?;
        self.progress.set_total(episodes.len() as u64);

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for episode in &episodes {
            self.progress.set_message(format!(
                "[{}] {}. {}",
                self.show.id(),
                episode.episode_number,
                episode.title
            ));

            if episode.script_url().is_none() {
                log::warn!(
                    "Skipping episode {} '{}': no script link",
                    episode.episode_number,
                    episode.title
                );
                skipped += 1;
                self.progress.inc(1);
                continue;
            }

            let script = self.fetch_script(episode).await?;
            let episode_rows = script.rows(&self.transcript_parser);
            log::debug!(
                "Episode {} '{}': {} lines",
                episode.episode_number,
                episode.title,
                episode_rows.len()
            );
            rows.extend(episode_rows);
            self.progress.inc(1);
        }

        log::info!(
            "[{}] Built {} rows from {} episodes ({skipped} skipped)",
            self.show.id(),
            rows.len(),
            episodes.len() - skipped
        );
        self.progress.finish(format!(
            "[{}] build complete -- {} rows",
            self.show.id(),
            rows.len()
        ));

        Ok(rows)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, DatasetError> {
        let markup = self.fetcher.fetch_page(url).await?;
        Ok(extract_text(&markup, &self.show.site.content_selector)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use script_archive_transcript::show::parse_show_toml;

    use super::*;

    const SHOW: &str = r#"
        id = "test"
        name = "Test Show"

        [site]
        base_url = "https://scripts.example/"
        index_path = "index.html"

        [speakers]
        blocklist = ["cast"]

        [speakers.aliases]
        "krame" = "kramer"
    "#;

    const INDEX: &str = r#"<html><body><table>
        <tr><td><b>Season 1 (1990)</b></td></tr>
        <tr><td>1</td><td><a href="one.htm">One</a> (5/31/90)</td></tr>
        <tr><td>2</td><td>Unlinked</td></tr>
        <tr><td><b>Season 2 (1991)</b></td></tr>
        <tr><td>3</td><td><a href="two.htm">Two</a> (1/23/91)</td></tr>
    </table></body></html>"#;

    const ONE: &str = r#"<html><body><div id="content">
        <p>CAST: Jerry Seinfeld</p>
        <p>JERRY: Hello there.</p>
        <p>GEORGE: [laughs] Hi!</p>
    </div></body></html>"#;

    const TWO: &str = r#"<html><body><div id="content">
        <p>KRAME: Giddy up.</p>
    </div></body></html>"#;

    /// Serves canned pages and records every requested URL.
    struct StaticFetcher {
        pages: BTreeMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| ((*url).to_string(), (*body).to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
            if url.trim().is_empty() {
                return Err(ScrapeError::MissingUrl);
            }
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn full_site() -> StaticFetcher {
        StaticFetcher::new(&[
            ("https://scripts.example/index.html", INDEX),
            ("https://scripts.example/one.htm", ONE),
            ("https://scripts.example/two.htm", TWO),
        ])
    }

    #[tokio::test]
    async fn builds_rows_in_index_order() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        let rows = DatasetBuilder::new(&show, &fetcher)
            .unwrap()
            .build()
            .await
            .unwrap();

        let summary: Vec<(u32, &str, Vec<&str>)> = rows
            .iter()
            .map(|r| {
                (
                    r.episode_number,
                    r.speaker.as_str(),
                    r.tokens.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                (1, "jerry", vec!["hello", "there"]),
                (1, "george", vec!["hi"]),
                (3, "kramer", vec!["giddy", "up"]),
            ]
        );

        let first = &rows[0];
        assert_eq!(first.title, "One");
        assert_eq!(first.season, 1);
        assert_eq!(first.season_year, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(first.airdate, NaiveDate::from_ymd_opt(1990, 5, 31));
        assert_eq!(first.url.as_deref(), Some("https://scripts.example/one.htm"));
        assert_eq!(rows[2].season, 2);
    }

    #[tokio::test]
    async fn unlinked_episode_is_never_fetched() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        DatasetBuilder::new(&show, &fetcher)
            .unwrap()
            .build()
            .await
            .unwrap();

        let requests = fetcher.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            [
                "https://scripts.example/index.html",
                "https://scripts.example/one.htm",
                "https://scripts.example/two.htm",
            ]
        );
    }

    #[tokio::test]
    async fn second_load_uses_cache_without_network() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        let builder = DatasetBuilder::new(&show, &fetcher).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.duckdb");

        let first = builder.load_or_build(&path).await.unwrap();
        assert_eq!(fetcher.request_count(), 3);
        assert!(store::exists(&path));

        let second = builder.load_or_build(&path).await.unwrap();
        assert_eq!(fetcher.request_count(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn existing_table_is_trusted_verbatim() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.duckdb");
        store::write_rows(&path, &[]).unwrap();

        let rows = DatasetBuilder::new(&show, &fetcher)
            .unwrap()
            .load_or_build(&path)
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_aborts_without_writing() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = StaticFetcher::new(&[
            ("https://scripts.example/index.html", INDEX),
            ("https://scripts.example/one.htm", ONE),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.duckdb");

        let result = DatasetBuilder::new(&show, &fetcher)
            .unwrap()
            .load_or_build(&path)
            .await;

        assert!(matches!(
            result,
            Err(DatasetError::Scrape(ScrapeError::Status { status: 404, .. }))
        ));
        assert!(!store::exists(&path));
    }

    #[tokio::test]
    async fn fetch_script_rejects_missing_url() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        let builder = DatasetBuilder::new(&show, &fetcher).unwrap();
        let episode = EpisodeRef {
            title: "Unlinked".to_string(),
            url: None,
            episode_number: 2,
            season: 1,
            season_year: None,
            airdate: None,
        };

        let result = builder.fetch_script(&episode).await;
        assert!(matches!(
            result,
            Err(DatasetError::Scrape(ScrapeError::MissingUrl))
        ));
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn fetched_script_is_reused_for_lines_and_rows() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = full_site();
        let builder = DatasetBuilder::new(&show, &fetcher).unwrap();
        let episodes = builder.fetch_episodes().await.unwrap();

        let script = builder.fetch_script(&episodes[0]).await.unwrap();
        let parser = show.transcript_parser();
        assert_eq!(script.lines(&parser).len(), 2);
        assert_eq!(script.rows(&parser).len(), 2);
        assert_eq!(fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn page_without_markers_yields_no_rows() {
        let show = parse_show_toml(SHOW).unwrap();
        let fetcher = StaticFetcher::new(&[(
            "https://scripts.example/prose.htm",
            r#"<div id="content">Just a synopsis, no dialogue.</div>"#,
        )]);
        let lines = DatasetBuilder::new(&show, &fetcher)
            .unwrap()
            .fetch_lines("https://scripts.example/prose.htm")
            .await
            .unwrap();
        assert!(lines.is_empty());
    }
}
