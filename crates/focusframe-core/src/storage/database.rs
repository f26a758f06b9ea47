//! SQLite-backed challenge store.
//!
//! Durable keyed storage for the four entity kinds -- artworks, challenges,
//! sessions, and the settings singleton -- with secondary indexes for the
//! common lookups and the one transactional operation in the system: the
//! combined challenge-update + session-insert write.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::{Artwork, Challenge, ChallengeStatus, Session, Settings};

use super::{data_dir, migrations, seed};

/// Aggregate session statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
    pub completed_challenges: u64,
}

/// SQLite database for challenge storage.
///
/// Owns all persisted state; callers other than the lifecycle manager are
/// expected to stay read-only.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, migrating and seeding as
    /// needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, a migration fails, or
    /// first-time seeding fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open the database at `~/.config/focusframe/focusframe.db`.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(data_dir()?.join("focusframe.db"))
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        seed::seed(&conn).map_err(|e| StorageError::SeedFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Artworks ─────────────────────────────────────────────────────

    pub fn artwork(&self, id: &str) -> Result<Option<Artwork>, StorageError> {
        Ok(self
            .query_artworks("WHERE id = ?1", params![id])?
            .into_iter()
            .next())
    }

    pub fn artworks(&self) -> Result<Vec<Artwork>, StorageError> {
        self.query_artworks("ORDER BY year", [])
    }

    pub fn artworks_by_artist(&self, artist: &str) -> Result<Vec<Artwork>, StorageError> {
        self.query_artworks(
            "WHERE artist = ?1 OR artist_en = ?1 ORDER BY year",
            params![artist],
        )
    }

    pub fn artworks_by_era(&self, era: &str) -> Result<Vec<Artwork>, StorageError> {
        self.query_artworks("WHERE era = ?1 ORDER BY year", params![era])
    }

    pub fn artworks_by_genre(&self, genre: &str) -> Result<Vec<Artwork>, StorageError> {
        self.query_artworks(
            "WHERE id IN (SELECT artwork_id FROM artwork_genres WHERE genre = ?1) ORDER BY year",
            params![genre],
        )
    }

    fn query_artworks<P: rusqlite::Params>(
        &self,
        tail: &str,
        params: P,
    ) -> Result<Vec<Artwork>, StorageError> {
        let sql = format!(
            "SELECT id, artist, artist_en, title, title_en, era, image_path, source_url, min_grid, year
             FROM artworks {tail}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(Artwork {
                id: row.get(0)?,
                artist: row.get(1)?,
                artist_en: row.get(2)?,
                title: row.get(3)?,
                title_en: row.get(4)?,
                genres: Vec::new(),
                era: row.get(5)?,
                image_path: row.get(6)?,
                source_url: row.get(7)?,
                min_grid: row.get(8)?,
                year: row.get(9)?,
            })
        })?;

        let mut artworks = Vec::new();
        for row in rows {
            let mut artwork = row?;
            artwork.genres = self.genres_of(&artwork.id)?;
            artworks.push(artwork);
        }
        Ok(artworks)
    }

    fn genres_of(&self, artwork_id: &str) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT genre FROM artwork_genres WHERE artwork_id = ?1 ORDER BY genre")?;
        let rows = stmt.query_map(params![artwork_id], |row| row.get(0))?;
        let mut genres = Vec::new();
        for genre in rows {
            genres.push(genre?);
        }
        Ok(genres)
    }

    // ── Challenges ───────────────────────────────────────────────────

    pub fn challenge(&self, id: &str) -> Result<Option<Challenge>, StorageError> {
        Ok(self
            .query_challenges("WHERE id = ?1", params![id])?
            .into_iter()
            .next())
    }

    /// The challenge with active status, of which at most one may exist.
    ///
    /// # Errors
    /// Returns [`StorageError::ActiveChallengeConflict`] when more than one
    /// active row is found; the invariant violation is surfaced, never
    /// silently resolved.
    pub fn active_challenge(&self) -> Result<Option<Challenge>, StorageError> {
        let mut rows = self.query_challenges("WHERE status = 'active'", [])?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(StorageError::ActiveChallengeConflict { count }),
        }
    }

    /// Completed challenges, most recently completed first.
    pub fn completed_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        self.query_challenges(
            "WHERE status = 'completed' ORDER BY completed_at DESC",
            [],
        )
    }

    pub fn insert_challenge(&self, challenge: &Challenge) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO challenges
                (id, artwork_id, grid_size, revealed_cells, total_cells, status, started_at, completed_at, session_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                challenge.id,
                challenge.artwork_id,
                challenge.grid_size,
                encode_cells(&challenge.revealed_cells)?,
                challenge.total_cells,
                format_status(challenge.status),
                challenge.started_at.to_rfc3339(),
                challenge.completed_at.map(|t| t.to_rfc3339()),
                challenge.session_count,
            ],
        )?;
        Ok(())
    }

    pub fn update_challenge_status(
        &self,
        id: &str,
        status: ChallengeStatus,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE challenges SET status = ?2 WHERE id = ?1",
            params![id, format_status(status)],
        )?;
        Ok(())
    }

    fn query_challenges<P: rusqlite::Params>(
        &self,
        tail: &str,
        params: P,
    ) -> Result<Vec<Challenge>, StorageError> {
        let sql = format!(
            "SELECT id, artwork_id, grid_size, revealed_cells, total_cells, status, started_at, completed_at, session_count
             FROM challenges {tail}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, u32>(8)?,
            ))
        })?;

        let mut challenges = Vec::new();
        for row in rows {
            let (
                id,
                artwork_id,
                grid_size,
                cells,
                total_cells,
                status,
                started_at,
                completed_at,
                session_count,
            ) = row?;
            challenges.push(Challenge {
                id,
                artwork_id,
                grid_size,
                revealed_cells: decode_cells(&cells)?,
                total_cells,
                status: parse_status(&status)?,
                started_at: parse_datetime(&started_at)?,
                completed_at: completed_at.as_deref().map(parse_datetime).transpose()?,
                session_count,
            });
        }
        Ok(challenges)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn session(&self, id: &str) -> Result<Option<Session>, StorageError> {
        Ok(self
            .query_sessions("WHERE id = ?1", params![id])?
            .into_iter()
            .next())
    }

    /// Sessions applied to one challenge, oldest first.
    pub fn sessions_for_challenge(&self, challenge_id: &str) -> Result<Vec<Session>, StorageError> {
        self.query_sessions(
            "WHERE challenge_id = ?1 ORDER BY completed_at",
            params![challenge_id],
        )
    }

    pub fn insert_session(&self, session: &Session) -> Result<(), StorageError> {
        insert_session_inner(&self.conn, session)?;
        Ok(())
    }

    fn query_sessions<P: rusqlite::Params>(
        &self,
        tail: &str,
        params: P,
    ) -> Result<Vec<Session>, StorageError> {
        let sql = format!(
            "SELECT id, challenge_id, started_at, completed_at, duration_secs, cell_index
             FROM sessions {tail}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, challenge_id, started_at, completed_at, duration_secs, cell_index) = row?;
            sessions.push(Session {
                id,
                challenge_id,
                started_at: parse_datetime(&started_at)?,
                completed_at: parse_datetime(&completed_at)?,
                duration_secs,
                cell_index,
            });
        }
        Ok(sessions)
    }

    // ── The atomic combined write ────────────────────────────────────

    /// Persist one completed focus interval: the updated challenge row and
    /// its session record commit together or not at all.
    ///
    /// # Errors
    /// Any failure rolls the whole write back; a reader never observes the
    /// challenge updated with the session missing, or vice versa.
    pub fn apply_reveal(
        &self,
        challenge: &Challenge,
        session: &Session,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let updated = tx.execute(
            "UPDATE challenges
             SET revealed_cells = ?2, status = ?3, completed_at = ?4, session_count = ?5
             WHERE id = ?1",
            params![
                challenge.id,
                encode_cells(&challenge.revealed_cells)?,
                format_status(challenge.status),
                challenge.completed_at.map(|t| t.to_rfc3339()),
                challenge.session_count,
            ],
        )?;
        if updated != 1 {
            // Dropping the transaction rolls it back.
            return Err(StorageError::QueryFailed(format!(
                "challenge '{}' not found",
                challenge.id
            )));
        }

        insert_session_inner(&tx, session)?;
        tx.commit()?;
        Ok(())
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn settings(&self) -> Result<Settings, StorageError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![seed::SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(v) => serde_json::from_str(&v)
                .map_err(|e| StorageError::Corrupt(format!("settings: {e}"))),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let value = serde_json::to_string(settings)
            .map_err(|e| StorageError::QueryFailed(format!("encode settings: {e}")))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![seed::SETTINGS_KEY, value],
        )?;
        Ok(())
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats(&self) -> Result<Stats, StorageError> {
        let (total_sessions, total_focus_secs): (u64, u64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0) FROM sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let (today_sessions, today_focus_secs): (u64, u64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions WHERE completed_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let completed_challenges: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM challenges WHERE status = 'completed'",
            [],
            |row| row.get(0),
        )?;

        Ok(Stats {
            total_sessions,
            total_focus_min: total_focus_secs / 60,
            today_sessions,
            today_focus_min: today_focus_secs / 60,
            completed_challenges,
        })
    }
}

// === Helper Functions ===

fn insert_session_inner(conn: &Connection, session: &Session) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO sessions (id, challenge_id, started_at, completed_at, duration_secs, cell_index)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            session.id,
            session.challenge_id,
            session.started_at.to_rfc3339(),
            session.completed_at.to_rfc3339(),
            session.duration_secs,
            session.cell_index,
        ],
    )?;
    Ok(())
}

/// Format challenge status for database storage
fn format_status(status: ChallengeStatus) -> &'static str {
    match status {
        ChallengeStatus::Active => "active",
        ChallengeStatus::Completed => "completed",
        ChallengeStatus::Abandoned => "abandoned",
    }
}

/// Parse challenge status from database string
fn parse_status(status_str: &str) -> Result<ChallengeStatus, StorageError> {
    match status_str {
        "active" => Ok(ChallengeStatus::Active),
        "completed" => Ok(ChallengeStatus::Completed),
        "abandoned" => Ok(ChallengeStatus::Abandoned),
        other => Err(StorageError::Corrupt(format!(
            "unknown challenge status '{other}'"
        ))),
    }
}

fn parse_datetime(dt_str: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp '{dt_str}': {e}")))
}

fn encode_cells(cells: &[u32]) -> Result<String, StorageError> {
    serde_json::to_string(cells)
        .map_err(|e| StorageError::QueryFailed(format!("encode revealed cells: {e}")))
}

fn decode_cells(raw: &str) -> Result<Vec<u32>, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(format!("revealed cells: {e}")))
}
