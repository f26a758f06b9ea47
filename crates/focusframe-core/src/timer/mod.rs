mod clock;
mod engine;
pub mod protocol;

pub use clock::{ClockHandle, ClockTask, TICK_INTERVAL};
pub use engine::{ClockState, CountdownEngine, Sample};
pub use protocol::{ClockCommand, ClockSignal};
