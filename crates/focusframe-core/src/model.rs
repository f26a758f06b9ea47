//! Domain model: artworks, challenges, sessions, and user settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable reference data describing one artwork.
///
/// Seeded on first database initialization and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    /// Artist name in the native script.
    pub artist: String,
    /// Transliterated artist name.
    pub artist_en: String,
    pub title: String,
    pub title_en: String,
    /// Genre tags. Set semantics: order is irrelevant.
    pub genres: Vec<String>,
    pub era: String,
    pub image_path: String,
    pub source_url: String,
    /// Smallest grid size the source image supports.
    pub min_grid: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Abandoned,
}

/// One attempt at revealing an artwork through completed focus intervals.
///
/// Mutated only by the lifecycle manager, one appended cell index and one
/// session-count increment per completed interval. Never deleted; completed
/// challenges feed the collection view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub artwork_id: String,
    /// Grid side length N; the grid has N x N cells.
    pub grid_size: u32,
    /// Cell indices revealed so far, in reveal order.
    /// Unique, each in `[0, total_cells)`.
    pub revealed_cells: Vec<u32>,
    pub total_cells: u32,
    pub status: ChallengeStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Completed focus intervals applied to this challenge.
    pub session_count: u32,
}

impl Challenge {
    /// Build a fresh active challenge over a `grid_size` x `grid_size` grid.
    pub fn new(artwork_id: &str, grid_size: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            artwork_id: artwork_id.to_string(),
            grid_size,
            revealed_cells: Vec::new(),
            total_cells: grid_size.saturating_mul(grid_size),
            status: ChallengeStatus::Active,
            started_at: Utc::now(),
            completed_at: None,
            session_count: 0,
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed_cells.len() as u32 >= self.total_cells
    }
}

/// Immutable audit record of one completed focus interval. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub challenge_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Interval length in seconds; expected to equal the configured focus
    /// duration.
    pub duration_secs: u32,
    /// The cell this interval revealed.
    pub cell_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Singleton user settings, stored as a single keyed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_duration_secs")]
    pub focus_duration_secs: u32,
    #[serde(default = "default_break_duration_secs")]
    pub break_duration_secs: u32,
    #[serde(default = "default_grid_size")]
    pub default_grid_size: u32,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_theme")]
    pub theme: Theme,
}

fn default_focus_duration_secs() -> u32 {
    25 * 60
}
fn default_break_duration_secs() -> u32 {
    5 * 60
}
fn default_grid_size() -> u32 {
    8
}
fn default_true() -> bool {
    true
}
fn default_theme() -> Theme {
    Theme::System
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration_secs: default_focus_duration_secs(),
            break_duration_secs: default_break_duration_secs(),
            default_grid_size: default_grid_size(),
            notifications_enabled: true,
            theme: Theme::System,
        }
    }
}
