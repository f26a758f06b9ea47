pub mod database;
pub mod migrations;
mod seed;

pub use database::{Database, Stats};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/focusframe[-dev]/` based on FOCUSFRAME_ENV.
///
/// Set FOCUSFRAME_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSFRAME_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusframe-dev")
    } else {
        base_dir.join("focusframe")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
