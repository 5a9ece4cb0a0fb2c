use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_BREAK_SECONDS, DEFAULT_LONG_BREAK_SECONDS, DEFAULT_SESSIONS_UNTIL_LONG_BREAK,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_WORK_SECONDS, MIN_PHASE_SECONDS,
};
use crate::location::LocationName;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum SessionPhase {
    #[default]
    Init = 0,
    Awake = 1,
    Working = 2,
    Break = 3,
}

impl SessionPhase {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Awake => "awake",
            Self::Working => "working",
            Self::Break => "break",
        }
    }

    pub const fn has_countdown(self) -> bool {
        matches!(self, Self::Working | Self::Break)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakKind {
    Short,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakReason {
    CountdownExpired,
    Walking,
    Gesture,
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "workTimeSeconds")]
    pub work_seconds: u16,
    #[serde(rename = "breakTimeSeconds")]
    pub break_seconds: u16,
    #[serde(rename = "longBreakTimeSeconds")]
    pub long_break_seconds: u16,
    #[serde(rename = "longBreakSessionCount")]
    pub sessions_until_long_break: u16,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: u16,
    #[serde(rename = "breakGestureEnabled")]
    pub break_gesture_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_seconds: DEFAULT_WORK_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
            long_break_seconds: DEFAULT_LONG_BREAK_SECONDS,
            sessions_until_long_break: DEFAULT_SESSIONS_UNTIL_LONG_BREAK,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            break_gesture_enabled: true,
        }
    }
}

impl SessionConfig {
    pub fn sanitized(self) -> Self {
        Self {
            work_seconds: self.work_seconds.max(MIN_PHASE_SECONDS),
            break_seconds: self.break_seconds.max(MIN_PHASE_SECONDS),
            long_break_seconds: self.long_break_seconds.max(MIN_PHASE_SECONDS),
            timeout_seconds: self.timeout_seconds.max(MIN_PHASE_SECONDS),
            ..self
        }
    }

    /// Long breaks replace every N-th short break; zero disables them.
    pub fn break_for(&self, completed_work_sessions: u32) -> (BreakKind, u16) {
        let every = u32::from(self.sessions_until_long_break);
        if every > 0 && completed_work_sessions > 0 && completed_work_sessions % every == 0 {
            (BreakKind::Long, self.long_break_seconds)
        } else {
            (BreakKind::Short, self.break_seconds)
        }
    }

    pub fn timeout_ms(&self) -> i64 {
        i64::from(self.timeout_seconds) * 1_000
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStats {
    pub session_id: u32,
    pub duration_seconds: u32,
    pub location_name: LocationName,
    pub mic_level: u8,
}
