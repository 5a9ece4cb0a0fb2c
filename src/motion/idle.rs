use crate::config::{AUTO_OFF_TIMEOUT_MS, MOVEMENT_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdleDetector {
    last_movement_ms: Option<i64>,
    timeout_ms: i64,
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(AUTO_OFF_TIMEOUT_MS)
    }
}

impl IdleDetector {
    pub const fn new(timeout_ms: i64) -> Self {
        Self {
            last_movement_ms: None,
            timeout_ms,
        }
    }

    /// Takes the raw magnitude in g. True while stillness has lasted at least
    /// the timeout; the first sample after a reset only seeds the clock.
    pub fn update(&mut self, magnitude: f32, now_ms: i64) -> bool {
        if (magnitude - 1.0).abs() > MOVEMENT_THRESHOLD {
            self.last_movement_ms = Some(now_ms);
            return false;
        }
        let Some(last) = self.last_movement_ms else {
            self.last_movement_ms = Some(now_ms);
            return false;
        };
        now_ms.saturating_sub(last) >= self.timeout_ms
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: i64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn timeout_ms(&self) -> i64 {
        self.timeout_ms
    }

    pub fn last_movement_ms(&self) -> Option<i64> {
        self.last_movement_ms
    }

    pub fn reset(&mut self) {
        self.last_movement_ms = None;
    }
}
