use crate::config::SESSION_EFFECTS_MAX;
use crate::error::TimaError;

use super::types::{BreakKind, BreakReason, SessionPhase};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionApplyStatus {
    Applied,
    Unchanged,
    InvalidTransition,
}

/// Side effects the caller carries out after an engine step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionEffect {
    OpenPairingSurface,
    ClosePairingSurface,
    CountdownArmed {
        phase: SessionPhase,
        seconds: u32,
        generation: u32,
    },
    CountdownCancelled {
        phase: SessionPhase,
    },
    LocationRequested,
    BreakStarted {
        kind: BreakKind,
        reason: BreakReason,
    },
    SessionRecorded {
        session_id: u32,
    },
    StatsDropped(TimaError),
    ConfigFallback(TimaError),
    PowerOffRequested,
    LinkChanged {
        connected: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectBuffer {
    len: usize,
    slots: [Option<SessionEffect>; SESSION_EFFECTS_MAX],
}

impl EffectBuffer {
    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; SESSION_EFFECTS_MAX],
        }
    }

    pub fn push(&mut self, effect: SessionEffect) {
        if self.len >= SESSION_EFFECTS_MAX {
            return;
        }
        self.slots[self.len] = Some(effect);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SessionEffect> + '_ {
        self.slots[..self.len].iter().filter_map(|effect| *effect)
    }

    pub fn contains(&self, effect: SessionEffect) -> bool {
        self.iter().any(|candidate| candidate == effect)
    }
}

impl Default for EffectBuffer {
    fn default() -> Self {
        Self::new()
    }
}
