//! Default on-disk locations for persisted datasets.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SCRIPT_ARCHIVE_DATA_DIR";

/// Returns the data directory: `$SCRIPT_ARCHIVE_DATA_DIR`, else `./data`.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

/// Returns the default dataset path for a show.
#[must_use]
pub fn dataset_path(show_id: &str) -> PathBuf {
    data_dir().join(format!("{show_id}.duckdb"))
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
