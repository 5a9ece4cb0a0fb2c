use crate::config::LOUDNESS_THRESHOLD;

/// Tracks how long the environment stayed above the loudness threshold.
/// Only completed loud intervals are credited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoudnessTracker {
    loud_since_ms: Option<i64>,
    total_loud_ms: i64,
}

impl LoudnessTracker {
    pub const fn new() -> Self {
        Self {
            loud_since_ms: None,
            total_loud_ms: 0,
        }
    }

    pub fn is_above_threshold(&mut self, amplitude: u32, now_ms: i64) -> bool {
        let loud = amplitude > LOUDNESS_THRESHOLD;
        match (loud, self.loud_since_ms) {
            (true, None) => self.loud_since_ms = Some(now_ms),
            (false, Some(since)) => {
                self.total_loud_ms += now_ms.saturating_sub(since).max(0);
                self.loud_since_ms = None;
            }
            _ => {}
        }
        loud
    }

    pub fn loud_percentage(&self, session_start_ms: i64, session_end_ms: i64) -> f32 {
        let span_ms = session_end_ms.saturating_sub(session_start_ms);
        if span_ms <= 0 {
            return 0.0;
        }
        (self.total_loud_ms as f32 * 100.0) / span_ms as f32
    }

    /// Percentage rounded down and clamped into the 0..=100 range used by
    /// session records.
    pub fn mic_level(&self, session_start_ms: i64, session_end_ms: i64) -> u8 {
        self.loud_percentage(session_start_ms, session_end_ms)
            .clamp(0.0, 100.0) as u8
    }

    pub fn currently_loud(&self) -> bool {
        self.loud_since_ms.is_some()
    }

    pub fn total_loud_ms(&self) -> i64 {
        self.total_loud_ms
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Mean absolute value of a PCM block, the amplitude scale the tracker
/// threshold is calibrated against.
pub fn mean_abs_amplitude(samples: &[i16]) -> u32 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u64 = samples
        .iter()
        .map(|&sample| u64::from(sample.unsigned_abs()))
        .sum();
    (sum / samples.len() as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_session_reports_zero_percent() {
        let mut tracker = LoudnessTracker::new();
        tracker.is_above_threshold(9_000, 100);
        tracker.is_above_threshold(0, 900);
        assert_eq!(tracker.total_loud_ms(), 800);
        assert_eq!(tracker.loud_percentage(5_000, 5_000), 0.0);
    }

    #[test]
    fn completed_intervals_are_credited() {
        let mut tracker = LoudnessTracker::new();
        assert!(!tracker.is_above_threshold(1_700, 0));
        assert!(tracker.is_above_threshold(3_000, 1_000));
        assert!(tracker.is_above_threshold(3_200, 1_500));
        assert!(!tracker.is_above_threshold(1_000, 3_000));
        assert!(tracker.is_above_threshold(4_000, 6_000));
        assert!(!tracker.is_above_threshold(2_500, 7_000));

        assert_eq!(tracker.total_loud_ms(), 3_000);
        assert_eq!(tracker.loud_percentage(0, 10_000), 30.0);
        assert_eq!(tracker.mic_level(0, 10_000), 30);
    }

    #[test]
    fn open_interval_is_not_counted() {
        let mut tracker = LoudnessTracker::new();
        tracker.is_above_threshold(5_000, 1_000);
        assert!(tracker.currently_loud());
        assert_eq!(tracker.total_loud_ms(), 0);
        assert_eq!(tracker.loud_percentage(0, 10_000), 0.0);
    }

    #[test]
    fn reset_starts_a_new_session() {
        let mut tracker = LoudnessTracker::new();
        tracker.is_above_threshold(5_000, 0);
        tracker.is_above_threshold(0, 500);
        tracker.reset();
        assert_eq!(tracker.total_loud_ms(), 0);
        assert!(!tracker.currently_loud());
    }

    #[test]
    fn mean_abs_amplitude_ignores_sign() {
        assert_eq!(mean_abs_amplitude(&[]), 0);
        assert_eq!(mean_abs_amplitude(&[-3_000, 3_000, -1_000, 1_000]), 2_000);
        assert_eq!(mean_abs_amplitude(&[i16::MIN]), 32_768);
    }
}
