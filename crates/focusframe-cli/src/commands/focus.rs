//! Run countdowns in the foreground.
//!
//! The clock task runs on its own tokio task; this command is just the
//! presentation side of the channel, printing each signal as JSON. On
//! focus completion it applies the reveal through the lifecycle manager.

use clap::Subcommand;
use focusframe_core::storage::Database;
use focusframe_core::{ChallengeManager, ClockSignal, ClockTask};
use serde_json::json;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run one focus interval; completion reveals a cell of the active
    /// challenge
    Run {
        /// Override the configured duration (minutes)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Run a break countdown; no reveal on completion
    Break {
        /// Override the configured duration (minutes)
        #[arg(long)]
        minutes: Option<u64>,
    },
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(action))
}

async fn run_async(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_default()?;

    match action {
        FocusAction::Run { minutes } => {
            let mut manager = ChallengeManager::new(db);
            manager.load()?;
            if manager.challenge().is_none() {
                return Err("no active challenge; start one with `challenge start`".into());
            }

            let settings = manager.database().settings()?;
            let duration_ms = duration_ms(minutes, settings.focus_duration_secs);

            let mut clock = ClockTask::spawn();
            clock.start(duration_ms);
            while let Some(signal) = clock.recv().await {
                println!("{}", serde_json::to_string(&signal)?);
                if matches!(signal, ClockSignal::Complete) {
                    if let Some(cell_index) = manager.complete_focus_interval()? {
                        if let Some(challenge) = manager.challenge() {
                            let summary = json!({
                                "revealedCell": cell_index,
                                "revealed": challenge.revealed_cells.len(),
                                "totalCells": challenge.total_cells,
                                "status": challenge.status,
                            });
                            println!("{}", serde_json::to_string(&summary)?);
                        }
                    }
                    break;
                }
            }
        }
        FocusAction::Break { minutes } => {
            let settings = db.settings()?;
            let duration_ms = duration_ms(minutes, settings.break_duration_secs);

            let mut clock = ClockTask::spawn();
            clock.start(duration_ms);
            while let Some(signal) = clock.recv().await {
                println!("{}", serde_json::to_string(&signal)?);
                if matches!(signal, ClockSignal::Complete) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn duration_ms(minutes_override: Option<u64>, configured_secs: u32) -> u64 {
    match minutes_override {
        Some(minutes) => minutes.saturating_mul(60_000),
        None => u64::from(configured_secs).saturating_mul(1000),
    }
}
