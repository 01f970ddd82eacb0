//! `DuckDB` storage for the dialogue dataset.
//!
//! The dataset is one `dialogue_lines` table in a standalone `DuckDB` file.
//! Tables are written once: rows go into a sibling temporary file which is
//! checkpointed, closed and renamed over the target, so an interrupted
//! build never leaves a partial table at the target path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use duckdb::Connection;
use duckdb::types::Value;
use script_archive_transcript_models::{DatasetColumn, DatasetRow};

use crate::DatasetError;

/// Name of the table holding one row per dialogue line.
pub const TABLE_NAME: &str = "dialogue_lines";

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 1_000;

/// Placeholders for the scalar columns of one row. The `tokens` list is
/// appended per row since its length varies.
const SCALAR_PLACEHOLDERS: &str = "?, CAST(? AS DATE), ?, ?, CAST(? AS DATE), ?, ?";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a persisted table exists at `path`.
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// Writes `rows` as a fresh table at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be created, written or moved
/// into place.
pub fn write_rows(path: &Path, rows: &[DatasetRow]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let tmp = temp_path(path);
    remove_db_files(&tmp)?;

    {
        let conn = Connection::open(&tmp)?;
        create_schema(&conn)?;
        conn.execute_batch("BEGIN TRANSACTION")?;
        insert_rows(&conn, rows)?;
        conn.execute_batch("COMMIT; CHECKPOINT;")?;
    }

    remove_db_files(path)?;
    std::fs::rename(&tmp, path)?;
    remove_db_files(&tmp)?;

    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reads every row from the table at `path`, in insertion order.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened, the table is
/// missing, or a stored value does not fit the row type.
pub fn read_rows(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let conn = Connection::open(path)?;

    let sql = format!(
        "SELECT title, CAST(airdate AS VARCHAR), episode_number, season,
                CAST(season_year AS VARCHAR), url, speaker, tokens
         FROM {TABLE_NAME}
         ORDER BY rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let airdate: Option<String> = row.get(1)?;
        let season_year: Option<String> = row.get(4)?;
        let tokens: Value = row.get(7)?;

        out.push(DatasetRow {
            title: row.get(0)?,
            airdate: parse_date(airdate.as_deref())?,
            episode_number: to_u32(row.get(2)?, DatasetColumn::EpisodeNumber)?,
            season: to_u32(row.get(3)?, DatasetColumn::Season)?,
            season_year: parse_date(season_year.as_deref())?,
            url: row.get(5)?,
            speaker: row.get(6)?,
            tokens: to_tokens(tokens)?,
        });
    }

    log::info!("Read {} rows from {}", out.len(), path.display());
    Ok(out)
}

fn create_schema(conn: &Connection) -> Result<(), DatasetError> {
    let columns = DatasetColumn::ALL
        .iter()
        .map(|col| format!("{} {}", col.as_ref(), col.sql_type()))
        .collect::<Vec<_>>()
        .join(",\n            ");

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
            {columns}
        );"
    ))?;
    Ok(())
}

fn insert_rows(conn: &Connection, rows: &[DatasetRow]) -> Result<(), DatasetError> {
    let column_list = DatasetColumn::ALL
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");

    for chunk in rows.chunks(CHUNK_SIZE) {
        let mut sql = format!("INSERT INTO {TABLE_NAME} ({column_list}) VALUES ");
        for (i, row) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            sql.push_str(SCALAR_PLACEHOLDERS);
            sql.push_str(", ");
            sql.push_str(&tokens_placeholder(row.tokens.len()));
            sql.push(')');
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for row in chunk {
            stmt.raw_bind_parameter(param_idx, &row.title)?;
            stmt.raw_bind_parameter(param_idx + 1, format_date(row.airdate).as_deref())?;
            stmt.raw_bind_parameter(param_idx + 2, i64::from(row.episode_number))?;
            stmt.raw_bind_parameter(param_idx + 3, i64::from(row.season))?;
            stmt.raw_bind_parameter(param_idx + 4, format_date(row.season_year).as_deref())?;
            stmt.raw_bind_parameter(param_idx + 5, row.url.as_deref())?;
            stmt.raw_bind_parameter(param_idx + 6, &row.speaker)?;
            param_idx += 7;

            for token in &row.tokens {
                stmt.raw_bind_parameter(param_idx, token)?;
                param_idx += 1;
            }
        }

        stmt.raw_execute()?;
        log::debug!("Inserted chunk of {} rows", chunk.len());
    }

    Ok(())
}

/// SQL for a `VARCHAR[]` literal with one parameter per token.
fn tokens_placeholder(len: usize) -> String {
    if len == 0 {
        return "[]::VARCHAR[]".to_owned();
    }
    let items = vec!["CAST(? AS VARCHAR)"; len].join(", ");
    format!("list_value({items})")
}

fn to_tokens(value: Value) -> Result<Vec<String>, DatasetError> {
    let items = match value {
        Value::List(items) | Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(DatasetError::Conversion {
                message: format!("tokens column holds {other:?}, expected a list"),
            });
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Text(token) => Ok(token),
            other => Err(DatasetError::Conversion {
                message: format!("token {other:?} is not text"),
            }),
        })
        .collect()
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, DatasetError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| DatasetError::Conversion {
                message: format!("invalid stored date '{s}': {e}"),
            })
        })
        .transpose()
}

fn to_u32(value: i64, column: DatasetColumn) -> Result<u32, DatasetError> {
    u32::try_from(value).map_err(|_| DatasetError::Conversion {
        message: format!("{column} value {value} out of range"),
    })
}

/// Sibling path used while a table is being written.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Removes a database file and its write-ahead log, if present.
fn remove_db_files(path: &Path) -> std::io::Result<()> {
    let mut wal = OsString::from(path.as_os_str());
    wal.push(".wal");

    for file in [path.to_path_buf(), PathBuf::from(wal)] {
        if file.exists() {
            std::fs::remove_file(&file)?;
        }
    }
    Ok(())
}
