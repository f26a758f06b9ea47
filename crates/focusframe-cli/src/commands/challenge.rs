use clap::Subcommand;
use focusframe_core::storage::Database;
use focusframe_core::{ArtworkFilter, ChallengeManager};
use serde_json::json;

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Start a new challenge
    Start {
        /// Artwork id; omit to pick randomly among the filter matches
        #[arg(long)]
        artwork: Option<String>,
        /// Random-pick filter: artist (native or transliterated)
        #[arg(long)]
        artist: Option<String>,
        /// Random-pick filter: genre tag
        #[arg(long)]
        genre: Option<String>,
        /// Random-pick filter: era
        #[arg(long)]
        era: Option<String>,
        /// Grid size N (N x N cells); defaults to the configured default
        #[arg(long)]
        grid: Option<u32>,
    },
    /// Show the active challenge
    Status,
    /// Abandon the active challenge
    Abandon,
    /// List completed challenges (the collection)
    List,
}

pub fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_default()?;
    let mut manager = ChallengeManager::new(db);
    manager.load()?;

    match action {
        ChallengeAction::Start {
            artwork,
            artist,
            genre,
            era,
            grid,
        } => {
            if manager.challenge().is_some() {
                return Err(
                    "a challenge is already active; finish it or run `challenge abandon` first"
                        .into(),
                );
            }

            let artwork_id = match artwork {
                Some(id) => id,
                None => {
                    let filter = ArtworkFilter { artist, genre, era };
                    match manager.pick_artwork(&filter)? {
                        Some(picked) => picked.id,
                        None => return Err("no artwork matches the filter".into()),
                    }
                }
            };

            let grid = match grid {
                Some(grid) => grid,
                None => manager.database().settings()?.default_grid_size,
            };

            let challenge = manager.start_challenge(&artwork_id, grid)?;
            println!("{}", serde_json::to_string_pretty(&challenge)?);
        }
        ChallengeAction::Status => match manager.challenge() {
            Some(challenge) => {
                let status = json!({
                    "challenge": challenge,
                    "artwork": manager.artwork(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            None => println!("no active challenge"),
        },
        ChallengeAction::Abandon => {
            if manager.challenge().is_none() {
                println!("no active challenge");
            } else {
                manager.abandon_challenge()?;
                println!("challenge abandoned");
            }
        }
        ChallengeAction::List => {
            let completed = manager.database().completed_challenges()?;
            for challenge in &completed {
                let title = manager
                    .database()
                    .artwork(&challenge.artwork_id)?
                    .map(|a| format!("{} / {}", a.title, a.title_en))
                    .unwrap_or_else(|| challenge.artwork_id.clone());
                let completed_at = challenge
                    .completed_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default();
                println!(
                    "{}  {}x{}  {}  {}",
                    challenge.id, challenge.grid_size, challenge.grid_size, completed_at, title,
                );
            }
            println!("{} completed challenge(s)", completed.len());
        }
    }

    Ok(())
}
