//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Instant;

use script_archive_cli_utils::{IndicatifProgress, MultiProgress};
use script_archive_dataset::export::write_csv;
use script_archive_dataset::filter::exclude_urls;
use script_archive_dataset::{DatasetBuilder, DatasetSummary, paths, store};
use script_archive_scraper::http::HttpFetcher;
use script_archive_transcript::{ShowDefinition, all_shows};
use script_archive_transcript_models::DatasetRow;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn fetcher(show: &ShowDefinition) -> CliResult<HttpFetcher> {
    Ok(HttpFetcher::new(&show.fetch_config())?)
}

fn dataset_path(show: &ShowDefinition, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| paths::dataset_path(show.id()))
}

fn apply_known_bad(show: &ShowDefinition, rows: Vec<DatasetRow>, keep: bool) -> Vec<DatasetRow> {
    if keep {
        rows
    } else {
        exclude_urls(rows, &show.known_bad_urls)
    }
}

pub fn list_shows() {
    println!("{:<20} NAME", "ID");
    println!("{}", "-".repeat(50));
    for show in &all_shows() {
        println!("{:<20} {}", show.id(), show.name());
    }
}

pub async fn build(
    show: &ShowDefinition,
    output: Option<PathBuf>,
    force: bool,
    keep_known_bad: bool,
    multi: &MultiProgress,
) -> CliResult {
    let path = dataset_path(show, output);

    if force && store::exists(&path) {
        log::info!("Removing existing dataset at {}", path.display());
        std::fs::remove_file(&path)?;
    }

    let start = Instant::now();
    let fetcher = fetcher(show)?;
    let progress =
        IndicatifProgress::episodes_bar(multi, &format!("[{}] Fetching index", show.id()));
    let rows = DatasetBuilder::new(show, &fetcher)?
        .with_progress(progress)
        .load_or_build(&path)
        .await?;

    let rows = apply_known_bad(show, rows, keep_known_bad);
    let summary = DatasetSummary::of(&rows);

    println!("Dataset:  {}", path.display());
    println!("Rows:     {}", summary.rows);
    println!("Episodes: {}", summary.episodes);
    println!("Speakers: {}", summary.speakers);
    println!("Tokens:   {}", summary.tokens);
    log::info!("Done in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

pub async fn episodes(show: &ShowDefinition, json: bool) -> CliResult {
    let fetcher = fetcher(show)?;
    let episodes = DatasetBuilder::new(show, &fetcher)?.fetch_episodes().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&episodes)?);
        return Ok(());
    }

    println!("{:>4} {:>6} {:<12} TITLE", "#", "SEASON", "AIRDATE");
    println!("{}", "-".repeat(60));
    for episode in &episodes {
        let airdate = episode
            .airdate
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        let marker = if episode.script_url().is_none() {
            " (no script link)"
        } else {
            ""
        };
        println!(
            "{:>4} {:>6} {:<12} {}{marker}",
            episode.episode_number, episode.season, airdate, episode.title
        );
    }

    Ok(())
}

pub async fn script(show: &ShowDefinition, url: &str, json: bool) -> CliResult {
    let fetcher = fetcher(show)?;
    let lines = DatasetBuilder::new(show, &fetcher)?.fetch_lines(url).await?;

    if show.is_known_bad(url) {
        log::warn!("{url} is on the known-unparsable list; output may be wrong");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    for line in &lines {
        println!("{:>12}: {}", line.speaker, line.tokens.join(" "));
    }
    log::info!("{} lines", lines.len());

    Ok(())
}

pub fn export(
    show: &ShowDefinition,
    input: Option<PathBuf>,
    output: &Path,
    keep_known_bad: bool,
) -> CliResult {
    let input = dataset_path(show, input);
    if !store::exists(&input) {
        return Err(format!(
            "No dataset at {}; run `script_archive build` first",
            input.display()
        )
        .into());
    }

    let rows = apply_known_bad(show, store::read_rows(&input)?, keep_known_bad);
    let file = std::fs::File::create(output)?;
    write_csv(std::io::BufWriter::new(file), &rows)?;

    println!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
