//! End-to-end challenge lifecycle against an on-disk database.
//!
//! Exercises the full loop the application runs: seed, start a challenge,
//! feed focus-interval completions through the manager until the grid is
//! fully revealed, then read the collection back.

use rand::rngs::StdRng;
use rand::SeedableRng;

use focusframe_core::{ChallengeManager, ChallengeStatus, Database};

#[test]
fn full_challenge_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("focusframe.db");

    let db = Database::open(&db_path).unwrap();
    let mut manager = ChallengeManager::with_rng(db, StdRng::seed_from_u64(7));
    manager.load().unwrap();
    assert!(manager.challenge().is_none());

    let challenge = manager.start_challenge("hokusai-great-wave", 5).unwrap();
    assert_eq!(challenge.total_cells, 25);

    // One reveal per completed focus interval until the grid is full.
    let mut revealed = Vec::new();
    for _ in 0..25 {
        let cell = manager.complete_focus_interval().unwrap().unwrap();
        assert!(!revealed.contains(&cell));
        revealed.push(cell);
    }

    let done = manager.challenge().unwrap().clone();
    assert_eq!(done.status, ChallengeStatus::Completed);
    assert_eq!(done.session_count, 25);
    assert!(done.completed_at.is_some());

    // Every interval left an immutable session record.
    let sessions = manager.database().sessions_for_challenge(&done.id).unwrap();
    assert_eq!(sessions.len(), 25);

    // A further completion is a stale no-op, never a contract violation.
    assert_eq!(manager.complete_focus_interval().unwrap(), None);

    // Reopen the same file: state survives, seeding does not repeat.
    let done_id = done.id.clone();
    drop(manager);
    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.artworks().unwrap().len(), 6);
    assert!(db.active_challenge().unwrap().is_none());
    let collection = db.completed_challenges().unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].id, done_id);

    let stats = db.stats().unwrap();
    assert_eq!(stats.total_sessions, 25);
    assert_eq!(stats.completed_challenges, 1);
}

#[test]
fn abandoning_frees_the_active_slot() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("focusframe.db")).unwrap();
    let mut manager = ChallengeManager::with_rng(db, StdRng::seed_from_u64(7));

    let first = manager.start_challenge("korin-irises", 5).unwrap();
    manager.complete_focus_interval().unwrap().unwrap();
    manager.abandon_challenge().unwrap();

    let second = manager.start_challenge("hiroshige-ohashi", 5).unwrap();
    assert_ne!(first.id, second.id);

    // The abandoned challenge is retained, not deleted.
    let stored = manager.database().challenge(&first.id).unwrap().unwrap();
    assert_eq!(stored.status, ChallengeStatus::Abandoned);
    assert_eq!(stored.session_count, 1);

    // Only the new challenge is active.
    let active = manager.database().active_challenge().unwrap().unwrap();
    assert_eq!(active.id, second.id);
}
