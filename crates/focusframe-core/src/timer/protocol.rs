//! Clock task wire protocol.
//!
//! The one wire-exact contract in the system. Control messages flow from
//! the caller to the clock task; signals flow back. Payloads are copied
//! across the channel -- no shared state. The JSON shapes
//! (`{"type":"START","durationMs":...}`, `{"type":"TICK","remainingMs":...}`)
//! are fixed; field names follow the wire, not Rust convention.

use serde::{Deserialize, Serialize};

/// Control messages accepted by the clock task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClockCommand {
    /// Begin a countdown, resetting any prior one.
    #[serde(rename = "START")]
    Start {
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    /// Halt, preserving remaining time. Acknowledged with `PAUSED`.
    #[serde(rename = "PAUSE")]
    Pause,
    /// Continue from the preserved remaining time. Fire-and-forget.
    #[serde(rename = "RESUME")]
    Resume,
    /// Discard countdown state. Fire-and-forget.
    #[serde(rename = "RESET")]
    Reset,
}

/// Signals emitted by the clock task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClockSignal {
    /// Periodic progress while running, roughly once per second.
    #[serde(rename = "TICK")]
    Tick {
        #[serde(rename = "remainingMs")]
        remaining_ms: u64,
    },
    /// Remaining time reached zero. Sent exactly once per countdown.
    #[serde(rename = "COMPLETE")]
    Complete,
    /// Acknowledgement of `PAUSE`, carrying the preserved remaining time.
    #[serde(rename = "PAUSED")]
    Paused {
        #[serde(rename = "remainingMs")]
        remaining_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_match_wire_shape() {
        assert_eq!(
            serde_json::to_string(&ClockCommand::Start {
                duration_ms: 1_500_000
            })
            .unwrap(),
            "{\"type\":\"START\",\"durationMs\":1500000}"
        );
        assert_eq!(
            serde_json::to_string(&ClockCommand::Pause).unwrap(),
            "{\"type\":\"PAUSE\"}"
        );
        assert_eq!(
            serde_json::to_string(&ClockCommand::Resume).unwrap(),
            "{\"type\":\"RESUME\"}"
        );
        assert_eq!(
            serde_json::to_string(&ClockCommand::Reset).unwrap(),
            "{\"type\":\"RESET\"}"
        );
    }

    #[test]
    fn signals_match_wire_shape() {
        assert_eq!(
            serde_json::to_string(&ClockSignal::Tick { remaining_ms: 999 }).unwrap(),
            "{\"type\":\"TICK\",\"remainingMs\":999}"
        );
        assert_eq!(
            serde_json::to_string(&ClockSignal::Complete).unwrap(),
            "{\"type\":\"COMPLETE\"}"
        );
        assert_eq!(
            serde_json::to_string(&ClockSignal::Paused { remaining_ms: 42 }).unwrap(),
            "{\"type\":\"PAUSED\",\"remainingMs\":42}"
        );
    }

    #[test]
    fn commands_round_trip() {
        let cmd: ClockCommand =
            serde_json::from_str("{\"type\":\"START\",\"durationMs\":60000}").unwrap();
        assert_eq!(
            cmd,
            ClockCommand::Start {
                duration_ms: 60_000
            }
        );
    }
}
