//! Countdown engine implementation.
//!
//! The engine is a wall-clock-based state machine for a single countdown.
//! It does not use internal threads - the clock task (or a test) is
//! responsible for calling `sample()` periodically. Elapsed time is measured
//! from real timestamps rather than assumed-constant tick intervals, so a
//! delayed sample self-corrects instead of drifting.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Idle
//!              \-> Completed (terminal until the next start)
//! ```
//!
//! Misordered control calls (e.g. `resume` while idle) are ignored rather
//! than raised: the engine and its caller run as separate concurrent
//! contexts and cannot guarantee message ordering relative to caller state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Result of one sampling pass while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub remaining_ms: u64,
    /// Set on exactly one sample per countdown, when remaining hits zero.
    pub completed: bool,
}

/// Core countdown engine.
///
/// Operates on wall-clock deltas -- no internal thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    state: ClockState,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last sample while running.
    /// Used to compute elapsed time between samples.
    #[serde(default)]
    last_sample_epoch_ms: Option<u64>,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            state: ClockState::Idle,
            remaining_ms: 0,
            last_sample_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown from `duration_ms`, discarding any prior countdown.
    pub fn start(&mut self, duration_ms: u64) {
        self.state = ClockState::Running;
        self.remaining_ms = duration_ms;
        self.last_sample_epoch_ms = Some(now_ms());
    }

    /// Halt the countdown, preserving remaining time.
    ///
    /// Returns the remaining milliseconds for acknowledgement, or `None`
    /// when there is nothing running to pause.
    pub fn pause(&mut self) -> Option<u64> {
        if self.state != ClockState::Running {
            return None;
        }
        self.flush_elapsed();
        self.state = ClockState::Paused;
        self.last_sample_epoch_ms = None;
        Some(self.remaining_ms)
    }

    /// Continue a paused countdown from the preserved remaining time.
    /// Ignored unless paused; returns whether the countdown is running.
    pub fn resume(&mut self) -> bool {
        if self.state != ClockState::Paused {
            return false;
        }
        self.state = ClockState::Running;
        self.last_sample_epoch_ms = Some(now_ms());
        true
    }

    /// Halt and discard countdown state. Remaining time is undefined until
    /// the next `start`.
    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.remaining_ms = 0;
        self.last_sample_epoch_ms = None;
    }

    /// Flush real elapsed time since the last sample.
    ///
    /// Returns `None` unless running. Completion is reported on exactly one
    /// sample, after which the engine stops until the next `start`.
    pub fn sample(&mut self) -> Option<Sample> {
        if self.state != ClockState::Running {
            return None;
        }
        self.flush_elapsed();
        if self.remaining_ms == 0 {
            self.state = ClockState::Completed;
            self.last_sample_epoch_ms = None;
            return Some(Sample {
                remaining_ms: 0,
                completed: true,
            });
        }
        Some(Sample {
            remaining_ms: self.remaining_ms,
            completed: false,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_sample_epoch_ms {
            let now = now_ms();
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_sample_epoch_ms = Some(now);
        }
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
