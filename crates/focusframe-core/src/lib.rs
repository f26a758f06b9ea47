//! # FocusFrame Core Library
//!
//! This library provides the core business logic for FocusFrame, a Pomodoro
//! timer that rewards each completed focus session by revealing one cell of
//! a pixelated artwork reproduction. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary, with any
//! graphical shell being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Clock Engine**: A wall-clock-based countdown state machine, spawned
//!   onto its own tokio task so a suspended caller cannot stall the
//!   countdown; the caller talks to it over message channels only
//! - **Reveal Selector**: Pure uniform selection of the next grid cell
//! - **Storage**: SQLite-based persistence for artworks, challenges,
//!   sessions, and settings, seeded once on first initialization
//! - **Lifecycle Manager**: The orchestration layer and only writer of
//!   challenge state
//!
//! ## Key Components
//!
//! - [`CountdownEngine`] / [`ClockTask`]: countdown state machine and its
//!   scheduling context
//! - [`reveal::next_cell`]: next-cell selection
//! - [`Database`]: entity persistence and the atomic reveal write
//! - [`ChallengeManager`]: challenge lifecycle orchestration

pub mod challenge;
pub mod error;
pub mod model;
pub mod reveal;
pub mod storage;
pub mod timer;

pub use challenge::{ArtworkFilter, ChallengeManager};
pub use error::{CoreError, RevealError, StorageError};
pub use model::{Artwork, Challenge, ChallengeStatus, Session, Settings, Theme};
pub use storage::{Database, Stats};
pub use timer::{
    ClockCommand, ClockHandle, ClockSignal, ClockState, ClockTask, CountdownEngine,
};
