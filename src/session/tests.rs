use core::f32::consts::PI;

use crate::config::{GRAVITY_BIAS_G, SAMPLE_RATE_HZ};
use crate::error::TimaError;
use crate::location::location_name;
use crate::sampling::SensorTick;
use crate::storage::{FlashStore, Persistence, RamFlash};

use super::{
    BreakKind, BreakReason, CountdownTick, SessionApplyStatus, SessionConfig, SessionEffect,
    SessionEngine, SessionInput, SessionPhase,
};

type Engine = SessionEngine<FlashStore<RamFlash>>;

fn engine_with(config: Option<SessionConfig>) -> Engine {
    let mut store = FlashStore::at_end(RamFlash::new(4 * 4096));
    if let Some(config) = config {
        store.save_config(&config).unwrap();
    }
    SessionEngine::new(store)
}

fn working(config: Option<SessionConfig>, now_ms: i64) -> Engine {
    let mut engine = engine_with(config);
    engine.apply(SessionInput::Boot, 0);
    let result = engine.apply(SessionInput::PairingConfirmed, now_ms);
    assert_eq!(result.after, SessionPhase::Working);
    engine
}

fn work_generation(engine: &Engine) -> u32 {
    engine.countdown(SessionPhase::Working).unwrap().generation()
}

/// Feeds a sinusoidal magnitude at 100 Hz and returns the first result that
/// left the working phase.
fn sway(
    engine: &mut Engine,
    start_ms: i64,
    freq_hz: f32,
    amplitude: f32,
    seconds: i64,
) -> Option<super::SessionApplyResult> {
    for idx in 0..seconds * 100 {
        let t = idx as f32 / SAMPLE_RATE_HZ;
        let magnitude = GRAVITY_BIAS_G + amplitude * (2.0 * PI * freq_hz * t).sin();
        let result = engine.on_tick(SensorTick::new(start_ms + idx * 10).with_motion(magnitude));
        if result.transitioned() {
            return Some(result);
        }
    }
    None
}

#[test]
fn boot_moves_init_to_awake_and_opens_pairing() {
    let mut engine = engine_with(None);
    assert_eq!(engine.phase(), SessionPhase::Init);

    let result = engine.apply(SessionInput::Boot, 0);
    assert!(result.changed());
    assert_eq!(result.after, SessionPhase::Awake);
    assert!(result.effects.contains(SessionEffect::OpenPairingSurface));
}

#[test]
fn init_rejects_everything_but_boot() {
    let mut engine = engine_with(None);
    for input in [
        SessionInput::PairingConfirmed,
        SessionInput::ReturnToAwake,
        SessionInput::BreakRequested,
        SessionInput::ResumeRequested,
    ] {
        let result = engine.apply(input, 0);
        assert_eq!(result.status, SessionApplyStatus::InvalidTransition);
        assert_eq!(result.after, SessionPhase::Init);
    }
}

#[test]
fn pairing_enters_working_with_work_countdown() {
    let mut engine = engine_with(None);
    engine.apply(SessionInput::Boot, 0);
    let result = engine.apply(SessionInput::PairingConfirmed, 1_000);

    let effects: Vec<SessionEffect> = result.effects.iter().collect();
    assert_eq!(
        effects,
        vec![
            SessionEffect::ClosePairingSurface,
            SessionEffect::CountdownArmed {
                phase: SessionPhase::Working,
                seconds: 25 * 60,
                generation: work_generation(&engine),
            },
            SessionEffect::LocationRequested,
        ]
    );
    let countdown = engine.countdown(SessionPhase::Working).unwrap();
    assert!(countdown.is_armed());
    assert_eq!(countdown.remaining(), 25 * 60);
}

#[test]
fn missing_config_is_seeded_with_defaults() {
    let mut engine = working(None, 0);
    assert_eq!(*engine.config(), SessionConfig::default());
    assert_eq!(engine.store_mut().read_config(), Ok(SessionConfig::default()));
}

#[test]
fn stored_config_drives_countdown() {
    let config = SessionConfig {
        work_seconds: 50 * 60,
        ..SessionConfig::default()
    };
    let engine = working(Some(config), 0);
    assert_eq!(engine.config().work_seconds, 50 * 60);
    assert_eq!(
        engine.countdown(SessionPhase::Working).unwrap().remaining(),
        50 * 60
    );
}

#[test]
fn unreadable_config_falls_back_to_defaults() {
    let mut engine = engine_with(None);
    engine.apply(SessionInput::Boot, 0);
    engine.store_mut().flash_mut().set_fail_reads(true);

    let result = engine.apply(SessionInput::PairingConfirmed, 0);
    assert_eq!(result.after, SessionPhase::Working);
    assert!(result
        .effects
        .contains(SessionEffect::ConfigFallback(TimaError::PersistenceFailure)));
    assert_eq!(*engine.config(), SessionConfig::default());

    let result = engine.apply(SessionInput::BreakRequested, 5_000);
    assert_eq!(result.after, SessionPhase::Break);
    assert!(result
        .effects
        .contains(SessionEffect::StatsDropped(TimaError::PersistenceFailure)));
}

#[test]
fn user_break_records_stats_before_arming_break() {
    let mut engine = working(None, 1_000);
    let resolved = engine.apply(SessionInput::LocationResolved(location_name("Office")), 1_500);
    assert!(resolved.changed());

    engine.on_tick(SensorTick::new(2_000).with_mic(3_000));
    engine.on_tick(SensorTick::new(32_000).with_mic(100));

    let result = engine.apply(SessionInput::BreakRequested, 61_000);
    let effects: Vec<SessionEffect> = result.effects.iter().collect();
    assert_eq!(
        effects,
        vec![
            SessionEffect::CountdownCancelled {
                phase: SessionPhase::Working
            },
            SessionEffect::SessionRecorded { session_id: 1 },
            SessionEffect::CountdownArmed {
                phase: SessionPhase::Break,
                seconds: 5 * 60,
                generation: engine.countdown(SessionPhase::Break).unwrap().generation(),
            },
            SessionEffect::BreakStarted {
                kind: BreakKind::Short,
                reason: BreakReason::User,
            },
        ]
    );

    let sessions = engine.store_mut().list_sessions(10).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, 1);
    assert_eq!(sessions[0].duration_seconds, 60);
    assert_eq!(sessions[0].location_name.as_str(), "Office");
    assert_eq!(sessions[0].mic_level, 50);
}

#[test]
fn leaving_working_for_awake_stops_only_the_work_countdown() {
    let mut engine = working(None, 0);
    let work_ticker = engine
        .countdown(SessionPhase::Working)
        .unwrap()
        .ticker()
        .unwrap();
    work_ticker.tick();
    let break_before = engine.countdown(SessionPhase::Break).unwrap().generation();

    let result = engine.apply(SessionInput::ReturnToAwake, 10_000);
    assert_eq!(result.after, SessionPhase::Awake);
    let effects: Vec<SessionEffect> = result.effects.iter().collect();
    assert_eq!(
        effects,
        vec![
            SessionEffect::CountdownCancelled {
                phase: SessionPhase::Working
            },
            SessionEffect::SessionRecorded { session_id: 1 },
            SessionEffect::OpenPairingSurface,
        ]
    );

    assert_eq!(work_ticker.tick(), CountdownTick::Cancelled);
    let work = engine.countdown(SessionPhase::Working).unwrap();
    assert!(!work.is_armed());
    assert_eq!(work.remaining(), 25 * 60 - 1);
    assert_eq!(
        engine.countdown(SessionPhase::Break).unwrap().generation(),
        break_before
    );
}

#[test]
fn stale_expiry_is_ignored() {
    let mut engine = working(None, 0);
    let stale = work_generation(&engine);
    engine.apply(SessionInput::ReturnToAwake, 1_000);
    engine.apply(SessionInput::PairingConfirmed, 2_000);
    assert_ne!(work_generation(&engine), stale);

    let result = engine.apply(
        SessionInput::CountdownExpired {
            phase: SessionPhase::Working,
            generation: stale,
        },
        3_000,
    );
    assert_eq!(result.status, SessionApplyStatus::Unchanged);
    assert_eq!(result.after, SessionPhase::Working);
    assert!(result.effects.is_empty());

    let result = engine.apply(
        SessionInput::CountdownExpired {
            phase: SessionPhase::Break,
            generation: engine.countdown(SessionPhase::Break).unwrap().generation(),
        },
        3_000,
    );
    assert_eq!(result.status, SessionApplyStatus::Unchanged);

    let current = work_generation(&engine);
    let result = engine.apply(
        SessionInput::CountdownExpired {
            phase: SessionPhase::Working,
            generation: current,
        },
        4_000,
    );
    assert_eq!(result.after, SessionPhase::Break);
    assert!(result.effects.contains(SessionEffect::BreakStarted {
        kind: BreakKind::Short,
        reason: BreakReason::CountdownExpired,
    }));
}

#[test]
fn break_expiry_resumes_work() {
    let mut engine = working(None, 0);
    engine.apply(SessionInput::BreakRequested, 1_000);
    let generation = engine.countdown(SessionPhase::Break).unwrap().generation();

    let result = engine.apply(
        SessionInput::CountdownExpired {
            phase: SessionPhase::Break,
            generation,
        },
        301_000,
    );
    assert_eq!(result.after, SessionPhase::Working);
    assert!(result.effects.contains(SessionEffect::LocationRequested));
    assert!(!engine.countdown(SessionPhase::Break).unwrap().is_armed());
}

#[test]
fn every_nth_break_is_long() {
    let config = SessionConfig {
        sessions_until_long_break: 2,
        ..SessionConfig::default()
    };
    let mut engine = working(Some(config), 0);

    let first = engine.apply(SessionInput::BreakRequested, 1_000);
    assert!(first.effects.contains(SessionEffect::BreakStarted {
        kind: BreakKind::Short,
        reason: BreakReason::User,
    }));
    engine.apply(SessionInput::ResumeRequested, 2_000);

    let second = engine.apply(SessionInput::BreakRequested, 3_000);
    assert!(second.effects.contains(SessionEffect::BreakStarted {
        kind: BreakKind::Long,
        reason: BreakReason::User,
    }));
    assert_eq!(
        engine.countdown(SessionPhase::Break).unwrap().remaining(),
        15 * 60
    );
    assert_eq!(engine.completed_work_sessions(), 2);
}

#[test]
fn commands_outside_their_state_are_invalid() {
    let mut engine = engine_with(None);
    engine.apply(SessionInput::Boot, 0);
    assert_eq!(
        engine.apply(SessionInput::BreakRequested, 0).status,
        SessionApplyStatus::InvalidTransition
    );
    assert_eq!(
        engine.apply(SessionInput::ResumeRequested, 0).status,
        SessionApplyStatus::InvalidTransition
    );
    assert_eq!(
        engine.apply(SessionInput::ReturnToAwake, 0).status,
        SessionApplyStatus::Unchanged
    );

    engine.apply(SessionInput::PairingConfirmed, 0);
    assert_eq!(
        engine.apply(SessionInput::ResumeRequested, 0).status,
        SessionApplyStatus::InvalidTransition
    );
    assert_eq!(
        engine.apply(SessionInput::Boot, 0).status,
        SessionApplyStatus::InvalidTransition
    );
    assert_eq!(engine.phase(), SessionPhase::Working);
}

#[test]
fn walking_starts_a_break() {
    let config = SessionConfig {
        break_gesture_enabled: false,
        ..SessionConfig::default()
    };
    let mut engine = working(Some(config), 0);

    let Some(result) = sway(&mut engine, 0, 1.25, 0.5, 12) else {
        panic!("walking never left the working phase");
    };
    assert_eq!(result.after, SessionPhase::Break);
    assert!(result.effects.contains(SessionEffect::BreakStarted {
        kind: BreakKind::Short,
        reason: BreakReason::Walking,
    }));
}

#[test]
fn shake_gesture_starts_a_break_when_enabled() {
    let mut engine = working(None, 0);
    let Some(result) = sway(&mut engine, 0, 4.0, 1.0, 4) else {
        panic!("gesture never left the working phase");
    };
    assert!(result.effects.contains(SessionEffect::BreakStarted {
        kind: BreakKind::Short,
        reason: BreakReason::Gesture,
    }));
}

#[test]
fn shake_gesture_is_ignored_when_disabled() {
    let config = SessionConfig {
        break_gesture_enabled: false,
        ..SessionConfig::default()
    };
    let mut engine = working(Some(config), 0);
    assert!(sway(&mut engine, 0, 4.0, 1.0, 4).is_none());
    assert_eq!(engine.phase(), SessionPhase::Working);
}

#[test]
fn motion_during_break_does_not_transition() {
    let mut engine = working(None, 0);
    engine.apply(SessionInput::BreakRequested, 0);
    assert!(sway(&mut engine, 0, 4.0, 1.0, 4).is_none());
    assert_eq!(engine.phase(), SessionPhase::Break);
}

#[test]
fn stillness_requests_power_off_once() {
    let mut engine = engine_with(None);
    engine.apply(SessionInput::Boot, 0);
    let still = |ms| SensorTick::new(ms).with_motion(1.0);

    assert!(engine.on_tick(still(0)).effects.is_empty());
    assert!(engine.on_tick(still(299_999)).effects.is_empty());
    assert!(engine
        .on_tick(still(300_000))
        .effects
        .contains(SessionEffect::PowerOffRequested));
    assert!(engine.on_tick(still(300_500)).effects.is_empty());

    engine.on_tick(SensorTick::new(301_000).with_motion(1.6));
    assert!(engine.on_tick(still(301_010)).effects.is_empty());
    assert!(engine
        .on_tick(still(601_000))
        .effects
        .contains(SessionEffect::PowerOffRequested));
    assert_eq!(engine.phase(), SessionPhase::Awake);
}

#[test]
fn awake_uses_stored_idle_timeout_from_boot() {
    let config = SessionConfig {
        timeout_seconds: 60,
        ..SessionConfig::default()
    };
    let mut engine = engine_with(Some(config));
    engine.apply(SessionInput::Boot, 0);
    assert_eq!(engine.config().timeout_seconds, 60);
    let still = |ms| SensorTick::new(ms).with_motion(1.0);

    assert!(engine.on_tick(still(0)).effects.is_empty());
    assert!(engine.on_tick(still(59_999)).effects.is_empty());
    assert!(engine
        .on_tick(still(61_000))
        .effects
        .contains(SessionEffect::PowerOffRequested));
    assert_eq!(engine.phase(), SessionPhase::Awake);
}

#[test]
fn ticks_before_boot_are_ignored() {
    let mut engine = engine_with(None);
    let result = engine.on_tick(SensorTick::new(400_000).with_motion(1.0));
    assert_eq!(result.status, SessionApplyStatus::Unchanged);
    assert!(result.effects.is_empty());
}

#[test]
fn location_only_tags_the_running_session() {
    let mut engine = engine_with(None);
    engine.apply(SessionInput::Boot, 0);
    let early = engine.apply(SessionInput::LocationResolved(location_name("Cafe")), 0);
    assert_eq!(early.status, SessionApplyStatus::Unchanged);

    engine.apply(SessionInput::PairingConfirmed, 0);
    assert_eq!(engine.location().as_str(), "Unknown_Location");
    engine.apply(SessionInput::LocationResolved(location_name("Cafe")), 10);
    assert_eq!(engine.location().as_str(), "Cafe");

    engine.apply(SessionInput::BreakRequested, 20);
    engine.apply(SessionInput::ResumeRequested, 30);
    assert_eq!(engine.location().as_str(), "Unknown_Location");
}

#[test]
fn link_changes_are_tracked_without_transition() {
    let mut engine = working(None, 0);
    let up = engine.apply(SessionInput::LinkChanged { connected: true }, 0);
    assert!(up.changed());
    assert!(!up.transitioned());
    assert!(up
        .effects
        .contains(SessionEffect::LinkChanged { connected: true }));
    assert!(engine.link_connected());

    let again = engine.apply(SessionInput::LinkChanged { connected: true }, 0);
    assert_eq!(again.status, SessionApplyStatus::Unchanged);
}

#[test]
fn full_session_log_drops_stats_but_still_transitions() {
    let mut engine = working(None, 0);
    for _ in 0..crate::config::SESSION_LOG_CAPACITY {
        let stats = crate::session::SessionStats {
            session_id: 0,
            duration_seconds: 1,
            location_name: location_name("x"),
            mic_level: 0,
        };
        engine.store_mut().append_session(&stats).unwrap();
    }

    let result = engine.apply(SessionInput::BreakRequested, 1_000);
    assert_eq!(result.after, SessionPhase::Break);
    assert!(result
        .effects
        .contains(SessionEffect::StatsDropped(TimaError::StorageFull)));
}
