use core::ops::ControlFlow;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use log::debug;

use crate::config::{COUNTDOWN_TICK_MS, SESSION_INPUT_QUEUE};
use crate::storage::Persistence;

use super::countdown::{CountdownTick, CountdownTicker};
use super::engine::{SessionApplyResult, SessionEngine};
use super::events::SessionInput;

pub type SessionInputs = Channel<CriticalSectionRawMutex, SessionInput, SESSION_INPUT_QUEUE>;

/// Ticks one armed countdown once a second. On expiry the engine is told
/// through `inputs`; a cancelled countdown ends the task silently.
pub async fn run_countdown(ticker: CountdownTicker, inputs: &SessionInputs) -> CountdownTick {
    loop {
        Timer::after(Duration::from_millis(COUNTDOWN_TICK_MS)).await;
        match ticker.tick() {
            CountdownTick::Running { .. } => {}
            CountdownTick::Expired => {
                inputs
                    .send(SessionInput::CountdownExpired {
                        phase: ticker.phase(),
                        generation: ticker.generation(),
                    })
                    .await;
                return CountdownTick::Expired;
            }
            CountdownTick::Cancelled => {
                debug!(
                    "{} countdown generation {} cancelled",
                    ticker.phase().label(),
                    ticker.generation()
                );
                return CountdownTick::Cancelled;
            }
        }
    }
}

/// Applies queued inputs in arrival order until `on_result` breaks.
pub async fn run_session_inputs<P, F>(
    engine: &mut SessionEngine<P>,
    inputs: &SessionInputs,
    mut on_result: F,
) where
    P: Persistence,
    F: FnMut(&SessionApplyResult) -> ControlFlow<()>,
{
    loop {
        let input = inputs.receive().await;
        let now_ms = Instant::now().as_millis() as i64;
        let result = engine.apply(input, now_ms);
        if on_result(&result).is_break() {
            return;
        }
    }
}
