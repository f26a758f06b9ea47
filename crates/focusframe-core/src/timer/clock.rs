//! The clock task: a countdown running on its own scheduling context.
//!
//! The engine lives inside a spawned tokio task so a suspended or busy
//! caller cannot stall or skew the countdown; the task keeps sampling
//! wall-clock time on its own interval. The owning context talks to it
//! exclusively through message channels -- commands in one direction,
//! signals in the other, payloads copied, no shared mutable memory.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::engine::CountdownEngine;
use super::protocol::{ClockCommand, ClockSignal};

/// Cadence of `TICK` signals while running.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Caller-side handle to a spawned clock task.
///
/// Dropping the handle closes the command channel, which ends the task.
pub struct ClockHandle {
    commands: mpsc::UnboundedSender<ClockCommand>,
    signals: mpsc::UnboundedReceiver<ClockSignal>,
}

impl ClockHandle {
    pub fn start(&self, duration_ms: u64) {
        self.send(ClockCommand::Start { duration_ms });
    }

    pub fn pause(&self) {
        self.send(ClockCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(ClockCommand::Resume);
    }

    pub fn reset(&self) {
        self.send(ClockCommand::Reset);
    }

    /// Receive the next signal from the clock task.
    ///
    /// Returns `None` once the task has shut down and all buffered signals
    /// have been drained.
    pub async fn recv(&mut self) -> Option<ClockSignal> {
        self.signals.recv().await
    }

    fn send(&self, command: ClockCommand) {
        // The task only exits when this sender is dropped, so a failed send
        // means the task panicked; there is no one left to deliver to.
        if self.commands.send(command).is_err() {
            log::warn!("clock task is gone; dropping {command:?}");
        }
    }
}

/// Spawner for the clock task.
pub struct ClockTask;

impl ClockTask {
    /// Spawn the clock task on the current tokio runtime.
    pub fn spawn() -> ClockHandle {
        Self::spawn_with_interval(TICK_INTERVAL)
    }

    /// Spawn with a custom sampling interval (shortened in tests).
    pub fn spawn_with_interval(tick: Duration) -> ClockHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (sig_tx, sig_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(cmd_rx, sig_tx, tick));
        ClockHandle {
            commands: cmd_tx,
            signals: sig_rx,
        }
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<ClockCommand>,
    signals: mpsc::UnboundedSender<ClockSignal>,
    tick: Duration,
) {
    let mut engine = CountdownEngine::new();
    let mut ticker = tokio::time::interval(tick);
    // A late wakeup must not be followed by a burst of catch-up ticks; the
    // engine measures real elapsed time per sample, so one corrected tick
    // is enough.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    // Handle dropped; nothing will ever command us again.
                    break;
                };
                match command {
                    ClockCommand::Start { duration_ms } => {
                        engine.start(duration_ms);
                        ticker.reset();
                    }
                    ClockCommand::Pause => {
                        if let Some(remaining_ms) = engine.pause() {
                            let _ = signals.send(ClockSignal::Paused { remaining_ms });
                        }
                    }
                    ClockCommand::Resume => {
                        if engine.resume() {
                            ticker.reset();
                        }
                    }
                    ClockCommand::Reset => engine.reset(),
                }
            }
            _ = ticker.tick(), if engine.is_running() => {
                if let Some(sample) = engine.sample() {
                    let _ = signals.send(ClockSignal::Tick {
                        remaining_ms: sample.remaining_ms,
                    });
                    if sample.completed {
                        let _ = signals.send(ClockSignal::Complete);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const FAST_TICK: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(2);

    async fn next_signal(clock: &mut ClockHandle) -> ClockSignal {
        timeout(WAIT, clock.recv())
            .await
            .expect("timed out waiting for clock signal")
            .expect("clock task ended unexpectedly")
    }

    #[tokio::test]
    async fn countdown_ticks_down_and_completes_once() {
        let mut clock = ClockTask::spawn_with_interval(FAST_TICK);
        clock.start(45);

        let mut last_remaining = u64::MAX;
        let mut completions = 0;
        loop {
            match next_signal(&mut clock).await {
                ClockSignal::Tick { remaining_ms } => {
                    assert!(remaining_ms <= last_remaining);
                    last_remaining = remaining_ms;
                }
                ClockSignal::Complete => {
                    completions += 1;
                    break;
                }
                ClockSignal::Paused { .. } => panic!("unexpected PAUSED"),
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(last_remaining, 0);

        // No further signals after completion.
        assert!(timeout(Duration::from_millis(50), clock.recv())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn pause_is_acknowledged_with_remaining_time() {
        let mut clock = ClockTask::spawn_with_interval(FAST_TICK);
        clock.start(10_000);
        tokio::time::sleep(Duration::from_millis(40)).await;
        clock.pause();

        let remaining_ms = loop {
            match next_signal(&mut clock).await {
                ClockSignal::Paused { remaining_ms } => break remaining_ms,
                ClockSignal::Tick { .. } => continue,
                ClockSignal::Complete => panic!("unexpected COMPLETE"),
            }
        };
        // Remaining reflects real elapsed time, within a sampling interval
        // or two of slack.
        assert!(remaining_ms < 10_000);
        assert!(remaining_ms >= 9_800, "remaining_ms = {remaining_ms}");

        // Paused countdown stays put until resumed.
        assert!(timeout(Duration::from_millis(50), clock.recv())
            .await
            .is_err());
        clock.resume();
        assert!(matches!(
            next_signal(&mut clock).await,
            ClockSignal::Tick { .. }
        ));
    }

    #[tokio::test]
    async fn misordered_commands_are_absorbed_silently() {
        let mut clock = ClockTask::spawn_with_interval(FAST_TICK);
        clock.resume();
        clock.pause();
        clock.reset();
        // Nothing running, nothing to say.
        assert!(timeout(Duration::from_millis(50), clock.recv())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn reset_discards_the_countdown() {
        let mut clock = ClockTask::spawn_with_interval(FAST_TICK);
        clock.start(10_000);
        assert!(matches!(
            next_signal(&mut clock).await,
            ClockSignal::Tick { .. }
        ));
        clock.reset();
        // Drain anything queued before the reset landed, then expect silence.
        while let Ok(signal) = timeout(Duration::from_millis(50), clock.recv()).await {
            assert!(matches!(signal, Some(ClockSignal::Tick { .. })));
        }
    }

    #[tokio::test]
    async fn start_replaces_a_prior_countdown() {
        let mut clock = ClockTask::spawn_with_interval(FAST_TICK);
        clock.start(5);
        clock.start(10_000);
        // The short first countdown was discarded before it could complete.
        for _ in 0..3 {
            match next_signal(&mut clock).await {
                ClockSignal::Tick { remaining_ms } => assert!(remaining_ms > 5_000),
                other => panic!("unexpected signal {other:?}"),
            }
        }
    }
}
