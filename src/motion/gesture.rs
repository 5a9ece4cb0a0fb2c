use crate::config::{GESTURE_MIN_PEAKS, GESTURE_PEAK_THRESHOLD, GESTURE_WINDOW_MS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureDetector {
    peak_count: u16,
    first_peak_ms: Option<i64>,
}

impl GestureDetector {
    pub const fn new() -> Self {
        Self {
            peak_count: 0,
            first_peak_ms: None,
        }
    }

    /// Every sample above the peak threshold counts. The window is evaluated
    /// when the first peak past it arrives: enough peaks fire the gesture,
    /// otherwise that peak opens a fresh window.
    pub fn update(&mut self, filtered: f32, now_ms: i64) -> bool {
        if filtered.abs() <= GESTURE_PEAK_THRESHOLD {
            return false;
        }

        let first = *self.first_peak_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(first) <= GESTURE_WINDOW_MS {
            self.peak_count = self.peak_count.saturating_add(1);
            return false;
        }

        if self.peak_count >= GESTURE_MIN_PEAKS {
            self.reset();
            return true;
        }

        self.peak_count = 1;
        self.first_peak_ms = Some(now_ms);
        false
    }

    pub fn peak_count(&self) -> u16 {
        self.peak_count
    }

    pub fn first_peak_ms(&self) -> Option<i64> {
        self.first_peak_ms
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
