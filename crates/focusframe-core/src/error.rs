//! Core error types for focusframe-core.
//!
//! Three classes of failure cross the library boundary: storage failures
//! (propagated unresolved, never retried), reveal-selector contract
//! violations (a bug in the caller, not a runtime condition), and input
//! validation on challenge creation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusframe-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence read/write failures
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Reveal selector contract violations
    #[error("Reveal error: {0}")]
    Reveal(#[from] RevealError),

    /// Challenge creation referenced an artwork that does not exist
    #[error("Unknown artwork: {0}")]
    UnknownArtwork(String),

    /// Requested grid is below what the artwork's source image supports
    #[error("Grid size {requested} is below the minimum {min} for artwork '{artwork_id}'")]
    GridTooSmall {
        artwork_id: String,
        requested: u32,
        min: u32,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-layer errors.
///
/// The lifecycle manager does not retry these; they surface to the caller
/// as a failed action.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to prepare the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Reference data seeding failed
    #[error("Database seeding failed: {0}")]
    SeedFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded back into its entity
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// More than one challenge row holds active status
    #[error("Found {count} active challenges, expected at most one")]
    ActiveChallengeConflict { count: usize },
}

/// Contract violations in the reveal selector.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealError {
    /// The complement of the revealed set is empty. The lifecycle manager
    /// never requests a reveal once the grid is full, so hitting this is a
    /// logic error, not a recoverable runtime case.
    #[error("all {total_cells} cells already revealed")]
    Exhausted { total_cells: u32 },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
