//! Challenge lifecycle orchestration.
//!
//! `ChallengeManager` is the only writer of challenge and session state. It
//! owns the cached active challenge handed to presentation; the cache is
//! re-synchronized from the store on `load()` and after every mutation.
//! Clock completion events arrive here as plain `complete_focus_interval()`
//! calls -- the manager itself holds no timer state.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::error::{CoreError, StorageError};
use crate::model::{Artwork, Challenge, ChallengeStatus, Session};
use crate::reveal;
use crate::storage::Database;

/// Optional artwork filter for the random-pick flow.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub era: Option<String>,
}

impl ArtworkFilter {
    pub fn matches(&self, artwork: &Artwork) -> bool {
        if let Some(artist) = &self.artist {
            if artwork.artist != *artist && artwork.artist_en != *artist {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !artwork.genres.iter().any(|g| g == genre) {
                return false;
            }
        }
        if let Some(era) = &self.era {
            if artwork.era != *era {
                return false;
            }
        }
        true
    }
}

/// Orchestration layer tying the clock engine, reveal selector, and store
/// together.
pub struct ChallengeManager {
    db: Database,
    rng: StdRng,
    challenge: Option<Challenge>,
    artwork: Option<Artwork>,
}

impl ChallengeManager {
    pub fn new(db: Database) -> Self {
        Self::with_rng(db, StdRng::from_entropy())
    }

    /// Inject the random source. Production callers use [`Self::new`]
    /// (entropy-seeded, unpredictable); tests pass a fixed seed.
    pub fn with_rng(db: Database, rng: StdRng) -> Self {
        Self {
            db,
            rng,
            challenge: None,
            artwork: None,
        }
    }

    // ── Cached state ─────────────────────────────────────────────────

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Read-only access to the underlying store, for presentation queries
    /// (collection view, stats) that bypass the cache.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the current active challenge (if any) plus its artwork into
    /// the cache. Idempotent; safe to call repeatedly.
    ///
    /// # Errors
    /// Propagates storage failures, including the multiple-active-rows
    /// conflict.
    pub fn load(&mut self) -> Result<(), StorageError> {
        match self.db.active_challenge()? {
            Some(challenge) => {
                self.artwork = self.db.artwork(&challenge.artwork_id)?;
                self.challenge = Some(challenge);
            }
            None => {
                self.challenge = None;
                self.artwork = None;
            }
        }
        Ok(())
    }

    /// Create and persist a fresh active challenge, which becomes the new
    /// cached state.
    ///
    /// Storage does not enforce that no other challenge is active; callers
    /// following the common flow abandon the prior challenge first.
    ///
    /// # Errors
    /// Fails on an unknown artwork, a grid below the artwork's minimum, or
    /// a storage failure.
    pub fn start_challenge(
        &mut self,
        artwork_id: &str,
        grid_size: u32,
    ) -> Result<Challenge, CoreError> {
        let artwork = self
            .db
            .artwork(artwork_id)?
            .ok_or_else(|| CoreError::UnknownArtwork(artwork_id.to_string()))?;
        if grid_size < artwork.min_grid {
            return Err(CoreError::GridTooSmall {
                artwork_id: artwork_id.to_string(),
                requested: grid_size,
                min: artwork.min_grid,
            });
        }

        let challenge = Challenge::new(artwork_id, grid_size);
        self.db.insert_challenge(&challenge)?;
        self.challenge = Some(challenge.clone());
        self.artwork = Some(artwork);
        Ok(challenge)
    }

    /// Apply one completed focus interval: reveal a cell, record the
    /// session, and update the challenge atomically.
    ///
    /// Returns the revealed cell index for presentation, or `Ok(None)` when
    /// there is no cached active challenge -- completion firing after a
    /// challenge was abandoned is an expected race, not an error.
    ///
    /// # Errors
    /// Propagates storage failures; the cache is left unchanged on failure.
    pub fn complete_focus_interval(&mut self) -> Result<Option<u32>, CoreError> {
        let Some(current) = self.challenge.as_ref() else {
            return Ok(None);
        };
        if current.status != ChallengeStatus::Active {
            return Ok(None);
        }

        let cell_index = reveal::next_cell(&current.revealed_cells, current.total_cells, &mut self.rng)?;

        let mut updated = current.clone();
        updated.revealed_cells.push(cell_index);
        updated.session_count += 1;
        let completed_at = Utc::now();
        if updated.is_fully_revealed() {
            updated.status = ChallengeStatus::Completed;
            updated.completed_at = Some(completed_at);
        }

        let duration_secs = self.db.settings()?.focus_duration_secs;
        let session = Session {
            id: Uuid::new_v4().to_string(),
            challenge_id: updated.id.clone(),
            started_at: completed_at - chrono::Duration::seconds(i64::from(duration_secs)),
            completed_at,
            duration_secs,
            cell_index,
        };

        self.db.apply_reveal(&updated, &session)?;
        self.challenge = Some(updated);
        Ok(Some(cell_index))
    }

    /// Mark the cached active challenge abandoned and clear the cache.
    /// No-op when nothing is active.
    pub fn abandon_challenge(&mut self) -> Result<(), CoreError> {
        let Some(current) = self.challenge.take() else {
            return Ok(());
        };
        self.db
            .update_challenge_status(&current.id, ChallengeStatus::Abandoned)?;
        self.artwork = None;
        Ok(())
    }

    /// Pick uniformly at random among artworks matching `filter`.
    pub fn pick_artwork(&mut self, filter: &ArtworkFilter) -> Result<Option<Artwork>, StorageError> {
        let mut pool = self.db.artworks()?;
        pool.retain(|a| filter.matches(a));
        if pool.is_empty() {
            return Ok(None);
        }
        let index = self.rng.gen_range(0..pool.len());
        Ok(Some(pool.swap_remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ChallengeManager {
        let db = Database::open_in_memory().unwrap();
        ChallengeManager::with_rng(db, StdRng::seed_from_u64(42))
    }

    #[test]
    fn start_challenge_builds_a_fresh_active_record() {
        let mut m = manager();
        let challenge = m.start_challenge("hokusai-great-wave", 8).unwrap();
        assert_eq!(challenge.total_cells, 64);
        assert!(challenge.revealed_cells.is_empty());
        assert_eq!(challenge.status, ChallengeStatus::Active);
        assert_eq!(challenge.session_count, 0);

        // Persisted and cached.
        assert_eq!(m.challenge().unwrap().id, challenge.id);
        assert_eq!(m.artwork().unwrap().id, "hokusai-great-wave");
        assert_eq!(m.database().active_challenge().unwrap().unwrap(), challenge);
    }

    #[test]
    fn start_challenge_rejects_unknown_artwork_and_small_grid() {
        let mut m = manager();
        assert!(matches!(
            m.start_challenge("no-such-artwork", 8),
            Err(CoreError::UnknownArtwork(_))
        ));
        // vermeer-pearl-earring has min_grid 8.
        assert!(matches!(
            m.start_challenge("vermeer-pearl-earring", 5),
            Err(CoreError::GridTooSmall { .. })
        ));
        assert!(m.challenge().is_none());
    }

    #[test]
    fn complete_focus_interval_reveals_and_records() {
        let mut m = manager();
        m.start_challenge("korin-irises", 5).unwrap();

        let cell = m.complete_focus_interval().unwrap().unwrap();
        assert!(cell < 25);

        let cached = m.challenge().unwrap().clone();
        assert_eq!(cached.revealed_cells, vec![cell]);
        assert_eq!(cached.session_count, 1);
        assert_eq!(cached.status, ChallengeStatus::Active);

        // Store agrees with the cache.
        let stored = m.database().challenge(&cached.id).unwrap().unwrap();
        assert_eq!(stored, cached);
        let sessions = m.database().sessions_for_challenge(&cached.id).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].cell_index, cell);
        assert_eq!(sessions[0].duration_secs, 1500);
    }

    #[test]
    fn no_active_challenge_is_a_no_op() {
        let mut m = manager();
        assert_eq!(m.complete_focus_interval().unwrap(), None);
        m.abandon_challenge().unwrap();
    }

    #[test]
    fn final_interval_completes_the_challenge() {
        let mut m = manager();
        let started = m.start_challenge("hokusai-great-wave", 8).unwrap();

        // Fast-forward to 63 of 64 revealed.
        let mut nearly_done = started.clone();
        nearly_done.revealed_cells = (0..63).collect();
        nearly_done.session_count = 63;
        let session = Session {
            id: "seed-session".into(),
            challenge_id: nearly_done.id.clone(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            duration_secs: 1500,
            cell_index: 62,
        };
        m.database().apply_reveal(&nearly_done, &session).unwrap();
        m.load().unwrap();

        let cell = m.complete_focus_interval().unwrap().unwrap();
        assert_eq!(cell, 63); // The only unrevealed cell.

        let done = m.challenge().unwrap().clone();
        assert_eq!(done.status, ChallengeStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.revealed_cells.len(), 64);
        assert_eq!(done.session_count, 64);

        // A completed cached challenge no longer accepts intervals.
        assert_eq!(m.complete_focus_interval().unwrap(), None);

        let collection = m.database().completed_challenges().unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].id, done.id);
    }

    #[test]
    fn load_is_idempotent() {
        let mut m = manager();
        m.load().unwrap();
        assert!(m.challenge().is_none());
        assert!(m.artwork().is_none());

        m.start_challenge("korin-irises", 5).unwrap();
        m.load().unwrap();
        let first = m.challenge().cloned();
        m.load().unwrap();
        assert_eq!(m.challenge().cloned(), first);
    }

    #[test]
    fn abandon_clears_cache_and_store_status() {
        let mut m = manager();
        let challenge = m.start_challenge("korin-irises", 5).unwrap();
        m.abandon_challenge().unwrap();

        assert!(m.challenge().is_none());
        assert!(m.artwork().is_none());
        let stored = m.database().challenge(&challenge.id).unwrap().unwrap();
        assert_eq!(stored.status, ChallengeStatus::Abandoned);

        m.load().unwrap();
        assert!(m.challenge().is_none());
    }

    #[test]
    fn pick_artwork_honors_filters() {
        let mut m = manager();

        let any = m.pick_artwork(&ArtworkFilter::default()).unwrap().unwrap();
        assert!(!any.id.is_empty());

        let filter = ArtworkFilter {
            genre: Some("浮世絵".into()),
            era: Some("江戸時代".into()),
            ..Default::default()
        };
        for _ in 0..20 {
            let picked = m.pick_artwork(&filter).unwrap().unwrap();
            assert!(picked.genres.iter().any(|g| g == "浮世絵"));
            assert_eq!(picked.era, "江戸時代");
        }

        let impossible = ArtworkFilter {
            artist: Some("nobody".into()),
            ..Default::default()
        };
        assert!(m.pick_artwork(&impossible).unwrap().is_none());
    }
}
