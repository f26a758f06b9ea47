//! Database schema migrations for focusframe.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            log::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: initial schema.
///
/// Four named collections plus a join table modeling the multi-entry genre
/// index. Timestamps are RFC 3339 text; revealed cells and the settings row
/// are JSON text.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS artworks (
            id          TEXT PRIMARY KEY,
            artist      TEXT NOT NULL,
            artist_en   TEXT NOT NULL,
            title       TEXT NOT NULL,
            title_en    TEXT NOT NULL,
            era         TEXT NOT NULL,
            image_path  TEXT NOT NULL,
            source_url  TEXT NOT NULL,
            min_grid    INTEGER NOT NULL,
            year        INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS artwork_genres (
            artwork_id  TEXT NOT NULL REFERENCES artworks(id),
            genre       TEXT NOT NULL,
            PRIMARY KEY (artwork_id, genre)
        );

        CREATE TABLE IF NOT EXISTS challenges (
            id             TEXT PRIMARY KEY,
            artwork_id     TEXT NOT NULL REFERENCES artworks(id),
            grid_size      INTEGER NOT NULL,
            revealed_cells TEXT NOT NULL DEFAULT '[]',
            total_cells    INTEGER NOT NULL,
            status         TEXT NOT NULL,
            started_at     TEXT NOT NULL,
            completed_at   TEXT,
            session_count  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id            TEXT PRIMARY KEY,
            challenge_id  TEXT NOT NULL REFERENCES challenges(id),
            started_at    TEXT NOT NULL,
            completed_at  TEXT NOT NULL,
            duration_secs INTEGER NOT NULL,
            cell_index    INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Create indexes for common query patterns
        CREATE INDEX IF NOT EXISTS idx_artworks_artist ON artworks(artist);
        CREATE INDEX IF NOT EXISTS idx_artworks_era ON artworks(era);
        CREATE INDEX IF NOT EXISTS idx_artwork_genres_genre ON artwork_genres(genre);
        CREATE INDEX IF NOT EXISTS idx_challenges_artwork_id ON challenges(artwork_id);
        CREATE INDEX IF NOT EXISTS idx_challenges_status ON challenges(status);
        CREATE INDEX IF NOT EXISTS idx_challenges_started_at ON challenges(started_at);
        CREATE INDEX IF NOT EXISTS idx_sessions_challenge_id ON sessions(challenge_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
    )?;

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;

    tx.commit()?;
    Ok(())
}
