//! CSV export of a persisted dataset.
//!
//! Tokens are written as one space-separated cell; dates are ISO-8601 and
//! nulls are empty cells.

use std::io::Write;

use script_archive_transcript_models::{DatasetColumn, DatasetRow};

use crate::DatasetError;

/// Writes `rows` as CSV with a header row to `writer`.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if writing fails.
pub fn write_csv<W: Write>(writer: W, rows: &[DatasetRow]) -> Result<(), DatasetError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(DatasetColumn::ALL.iter().map(AsRef::<str>::as_ref))?;

    for row in rows {
        csv.write_record([
            row.title.clone(),
            row.airdate.map(|d| d.to_string()).unwrap_or_default(),
            row.episode_number.to_string(),
            row.season.to_string(),
            row.season_year.map(|d| d.to_string()).unwrap_or_default(),
            row.url.clone().unwrap_or_default(),
            row.speaker.clone(),
            row.tokens.join(" "),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
