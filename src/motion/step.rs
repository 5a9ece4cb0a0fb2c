use crate::config::{
    GAIT_MAX_SPAN_MS, GAIT_MIN_SPAN_MS, STEPS_PER_GAIT, STEP_DEBOUNCE_MS, WALKING_THRESHOLD,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepDetector {
    was_stepping: bool,
    last_step_ms: Option<i64>,
    first_step_ms: Option<i64>,
    step_count: u8,
}

impl StepDetector {
    pub const fn new() -> Self {
        Self {
            was_stepping: false,
            last_step_ms: None,
            first_step_ms: None,
            step_count: 0,
        }
    }

    /// Feeds one band-passed sample. Returns true when the last five counted
    /// steps form a walking cadence.
    pub fn update(&mut self, filtered: f32, now_ms: i64) -> bool {
        let stepping = filtered.abs() > WALKING_THRESHOLD;
        if stepping && !self.was_stepping && self.debounce_elapsed(now_ms) {
            self.last_step_ms = Some(now_ms);
            if self.step_count == 0 {
                self.first_step_ms = Some(now_ms);
            }
            self.step_count += 1;
        }
        self.was_stepping = stepping;

        if self.step_count < STEPS_PER_GAIT {
            return false;
        }

        let span_ms = self
            .first_step_ms
            .map_or(0, |first| now_ms.saturating_sub(first));
        self.step_count = 0;
        self.first_step_ms = None;
        (GAIT_MIN_SPAN_MS..=GAIT_MAX_SPAN_MS).contains(&span_ms)
    }

    fn debounce_elapsed(&self, now_ms: i64) -> bool {
        self.last_step_ms
            .is_none_or(|last| now_ms.saturating_sub(last) > STEP_DEBOUNCE_MS)
    }

    pub fn step_count(&self) -> u8 {
        self.step_count
    }

    pub fn first_step_ms(&self) -> Option<i64> {
        self.first_step_ms
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
