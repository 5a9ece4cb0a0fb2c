mod actions;
mod countdown;
mod engine;
mod events;
mod machine;
mod runtime;
#[cfg(test)]
mod tests;
mod types;

pub use actions::{EffectBuffer, SessionApplyStatus, SessionEffect};
pub use countdown::{Countdown, CountdownTick, CountdownTicker};
pub use engine::{SessionApplyResult, SessionEngine};
pub use events::SessionInput;
pub use runtime::{run_countdown, run_session_inputs, SessionInputs};
pub use types::{BreakKind, BreakReason, SessionConfig, SessionPhase, SessionStats};
