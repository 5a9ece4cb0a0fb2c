use log::{debug, info, warn};
use statig::blocking::IntoStateMachineExt as _;

use crate::config::UNKNOWN_LOCATION;
use crate::error::TimaError;
use crate::location::{location_name, LocationName};
use crate::loudness::LoudnessTracker;
use crate::motion::MotionAnalyzer;
use crate::sampling::SensorTick;
use crate::storage::{Persistence, StoreError};
use crate::telemetry;

use super::actions::{EffectBuffer, SessionApplyStatus, SessionEffect};
use super::countdown::Countdown;
use super::events::{SessionEvent, SessionInput};
use super::machine::{DispatchContext, SessionMachine};
use super::types::{BreakReason, SessionConfig, SessionPhase, SessionStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionApplyResult {
    pub before: SessionPhase,
    pub after: SessionPhase,
    pub status: SessionApplyStatus,
    pub effects: EffectBuffer,
}

impl SessionApplyResult {
    pub fn changed(&self) -> bool {
        matches!(self.status, SessionApplyStatus::Applied)
    }

    pub fn transitioned(&self) -> bool {
        self.before != self.after
    }
}

/// Owns the session state machine together with everything its entry and
/// exit actions touch: countdowns, analyzers, the current location tag and
/// the store.
pub struct SessionEngine<P> {
    machine: statig::blocking::StateMachine<SessionMachine>,
    store: P,
    config: SessionConfig,
    motion: MotionAnalyzer,
    loudness: LoudnessTracker,
    work_countdown: Countdown,
    break_countdown: Countdown,
    session_started_ms: Option<i64>,
    location: LocationName,
    completed_work_sessions: u32,
    link_connected: bool,
    power_off_latched: bool,
}

impl<P: Persistence> SessionEngine<P> {
    pub fn new(store: P) -> Self {
        let config = SessionConfig::default();
        Self {
            machine: SessionMachine::default().state_machine(),
            store,
            config,
            motion: MotionAnalyzer::with_idle_timeout_ms(config.timeout_ms()),
            loudness: LoudnessTracker::new(),
            work_countdown: Countdown::new(SessionPhase::Working),
            break_countdown: Countdown::new(SessionPhase::Break),
            session_started_ms: None,
            location: location_name(UNKNOWN_LOCATION),
            completed_work_sessions: 0,
            link_connected: false,
            power_off_latched: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.inner().phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    pub fn location(&self) -> &LocationName {
        &self.location
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn link_connected(&self) -> bool {
        self.link_connected
    }

    pub fn countdown(&self, phase: SessionPhase) -> Option<&Countdown> {
        match phase {
            SessionPhase::Working => Some(&self.work_countdown),
            SessionPhase::Break => Some(&self.break_countdown),
            SessionPhase::Init | SessionPhase::Awake => None,
        }
    }

    pub fn apply(&mut self, input: SessionInput, now_ms: i64) -> SessionApplyResult {
        let before = self.phase();
        let mut effects = EffectBuffer::new();
        let status = match input {
            SessionInput::Boot => self.dispatch(SessionEvent::Boot, now_ms, &mut effects),
            SessionInput::PairingConfirmed => {
                self.dispatch(SessionEvent::PairingConfirmed, now_ms, &mut effects)
            }
            SessionInput::ReturnToAwake => {
                self.dispatch(SessionEvent::ReturnToAwake, now_ms, &mut effects)
            }
            SessionInput::BreakRequested => {
                self.dispatch(SessionEvent::BreakRequested, now_ms, &mut effects)
            }
            SessionInput::ResumeRequested => {
                self.dispatch(SessionEvent::ResumeRequested, now_ms, &mut effects)
            }
            SessionInput::CountdownExpired { phase, generation } => {
                if self.is_current_countdown(phase, generation) {
                    self.dispatch(SessionEvent::CountdownExpired, now_ms, &mut effects)
                } else {
                    debug!(
                        "stale {} countdown expiry (generation {generation}) ignored",
                        phase.label()
                    );
                    telemetry::record_stale_expiry();
                    SessionApplyStatus::Unchanged
                }
            }
            SessionInput::LocationResolved(name) => self.set_location(name),
            SessionInput::LinkChanged { connected } => {
                if self.link_connected == connected {
                    SessionApplyStatus::Unchanged
                } else {
                    self.link_connected = connected;
                    info!("link {}", if connected { "up" } else { "down" });
                    effects.push(SessionEffect::LinkChanged { connected });
                    SessionApplyStatus::Applied
                }
            }
        };

        SessionApplyResult {
            before,
            after: self.phase(),
            status,
            effects,
        }
    }

    /// Feeds one sampling step through the analyzers. Classifier hits become
    /// machine events; stillness becomes a one-shot power-off request.
    pub fn on_tick(&mut self, tick: SensorTick) -> SessionApplyResult {
        let before = self.phase();
        let mut effects = EffectBuffer::new();
        let mut status = SessionApplyStatus::Unchanged;

        if before == SessionPhase::Init {
            return SessionApplyResult {
                before,
                after: before,
                status,
                effects,
            };
        }

        if let Some(amplitude) = tick.mic_amplitude {
            if before == SessionPhase::Working {
                self.loudness.is_above_threshold(amplitude, tick.now_ms);
            }
        }

        if let Some(magnitude) = tick.magnitude {
            let walking = self.motion.is_walking(magnitude, tick.now_ms);
            let gesture = self.motion.detect_break_gesture(magnitude, tick.now_ms);
            let auto_off = self.motion.should_auto_off(magnitude, tick.now_ms);

            if auto_off && !self.power_off_latched {
                info!("no movement for {} s; requesting power off", self.config.timeout_seconds);
                effects.push(SessionEffect::PowerOffRequested);
            }
            self.power_off_latched = auto_off;

            if self.phase() == SessionPhase::Working {
                let event = if walking {
                    Some(SessionEvent::WalkingDetected)
                } else if gesture && self.config.break_gesture_enabled {
                    Some(SessionEvent::BreakGestureDetected)
                } else {
                    None
                };
                if let Some(event) = event {
                    status = self.dispatch(event, tick.now_ms, &mut effects);
                }
            }
        }

        SessionApplyResult {
            before,
            after: self.phase(),
            status,
            effects,
        }
    }

    fn dispatch(
        &mut self,
        event: SessionEvent,
        now_ms: i64,
        effects: &mut EffectBuffer,
    ) -> SessionApplyStatus {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        if let Some((from, to)) = context.transition {
            debug!("session {} -> {}", from.label(), to.label());
            self.exit(from, now_ms, effects);
            self.enter(to, context.break_reason, now_ms, effects);
        }
        context.status
    }

    fn is_current_countdown(&self, phase: SessionPhase, generation: u32) -> bool {
        phase == self.phase()
            && self
                .countdown(phase)
                .is_some_and(|countdown| countdown.generation() == generation)
    }

    fn set_location(&mut self, name: LocationName) -> SessionApplyStatus {
        if self.phase() != SessionPhase::Working {
            debug!("location {name} arrived outside a work session");
            return SessionApplyStatus::Unchanged;
        }
        if self.location == name {
            return SessionApplyStatus::Unchanged;
        }
        info!("session location {name}");
        self.location = name;
        SessionApplyStatus::Applied
    }

    fn exit(&mut self, phase: SessionPhase, now_ms: i64, effects: &mut EffectBuffer) {
        match phase {
            SessionPhase::Init => {}
            SessionPhase::Awake => effects.push(SessionEffect::ClosePairingSurface),
            SessionPhase::Working => {
                if self.work_countdown.cancel() {
                    effects.push(SessionEffect::CountdownCancelled { phase });
                }
                self.record_session(now_ms, effects);
            }
            SessionPhase::Break => {
                if self.break_countdown.cancel() {
                    effects.push(SessionEffect::CountdownCancelled { phase });
                }
            }
        }
    }

    fn enter(
        &mut self,
        phase: SessionPhase,
        reason: Option<BreakReason>,
        now_ms: i64,
        effects: &mut EffectBuffer,
    ) {
        match phase {
            SessionPhase::Init => {}
            SessionPhase::Awake => {
                self.load_config(effects);
                effects.push(SessionEffect::OpenPairingSurface);
            }
            SessionPhase::Working => {
                self.load_config(effects);
                self.motion.reset();
                self.loudness.reset();
                self.session_started_ms = Some(now_ms);
                self.location = location_name(UNKNOWN_LOCATION);

                let seconds = u32::from(self.config.work_seconds);
                let ticker = self.work_countdown.arm(seconds);
                effects.push(SessionEffect::CountdownArmed {
                    phase,
                    seconds,
                    generation: ticker.generation(),
                });
                effects.push(SessionEffect::LocationRequested);
            }
            SessionPhase::Break => {
                self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
                let (kind, seconds) = self.config.break_for(self.completed_work_sessions);
                let seconds = u32::from(seconds);
                let ticker = self.break_countdown.arm(seconds);
                info!(
                    "{kind:?} break for {seconds} s after {} work sessions",
                    self.completed_work_sessions
                );
                effects.push(SessionEffect::CountdownArmed {
                    phase,
                    seconds,
                    generation: ticker.generation(),
                });
                effects.push(SessionEffect::BreakStarted {
                    kind,
                    reason: reason.unwrap_or(BreakReason::User),
                });
            }
        }
    }

    fn load_config(&mut self, effects: &mut EffectBuffer) {
        self.config = match self.store.read_config() {
            Ok(config) => config.sanitized(),
            Err(StoreError::NotFound) => {
                let defaults = SessionConfig::default();
                if let Err(err) = self.store.save_config(&defaults) {
                    warn!("default config not saved: {err}");
                }
                defaults
            }
            Err(err) => {
                warn!("config unreadable ({err}); using defaults");
                telemetry::record_config_fallback();
                effects.push(SessionEffect::ConfigFallback(TimaError::from(err)));
                SessionConfig::default()
            }
        };
        self.motion.set_idle_timeout_ms(self.config.timeout_ms());
    }

    fn record_session(&mut self, now_ms: i64, effects: &mut EffectBuffer) {
        let started_ms = self.session_started_ms.take().unwrap_or(now_ms);
        let elapsed_ms = now_ms.saturating_sub(started_ms).max(0);
        let stats = SessionStats {
            session_id: 0,
            duration_seconds: u32::try_from(elapsed_ms / 1_000).unwrap_or(u32::MAX),
            location_name: self.location.clone(),
            mic_level: self.loudness.mic_level(started_ms, now_ms),
        };

        match self.store.append_session(&stats) {
            Ok(session_id) => {
                info!(
                    "session {session_id} recorded: {} s at {} (mic {}%)",
                    stats.duration_seconds, stats.location_name, stats.mic_level
                );
                telemetry::record_session_recorded();
                effects.push(SessionEffect::SessionRecorded { session_id });
            }
            Err(err) => {
                warn!("session stats dropped: {err}");
                telemetry::record_session_dropped();
                effects.push(SessionEffect::StatsDropped(TimaError::from(err)));
            }
        }
    }
}
