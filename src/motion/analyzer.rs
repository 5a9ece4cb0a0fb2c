use crate::config::{
    GESTURE_HIGH_PASS_HZ, GESTURE_LOW_PASS_HZ, GRAVITY_BIAS_G, SAMPLE_RATE_HZ,
    WALKING_HIGH_PASS_HZ, WALKING_LOW_PASS_HZ,
};
use crate::filter::BandpassChain;

use super::{GestureDetector, IdleDetector, MotionSample, StepDetector};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionVerdict {
    pub walking: bool,
    pub break_gesture: bool,
    pub auto_off: bool,
}

/// Runs the walking, gesture and stillness classifiers over one
/// accelerometer-magnitude stream. Each classifier keeps its own filter chain.
#[derive(Clone, Copy, Debug)]
pub struct MotionAnalyzer {
    walking_chain: BandpassChain,
    gesture_chain: BandpassChain,
    steps: StepDetector,
    gesture: GestureDetector,
    idle: IdleDetector,
}

impl Default for MotionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionAnalyzer {
    pub fn new() -> Self {
        Self {
            walking_chain: BandpassChain::new(
                WALKING_HIGH_PASS_HZ,
                WALKING_LOW_PASS_HZ,
                SAMPLE_RATE_HZ,
            ),
            gesture_chain: BandpassChain::new(
                GESTURE_HIGH_PASS_HZ,
                GESTURE_LOW_PASS_HZ,
                SAMPLE_RATE_HZ,
            ),
            steps: StepDetector::new(),
            gesture: GestureDetector::new(),
            idle: IdleDetector::default(),
        }
    }

    pub fn with_idle_timeout_ms(timeout_ms: i64) -> Self {
        let mut analyzer = Self::new();
        analyzer.idle.set_timeout_ms(timeout_ms);
        analyzer
    }

    pub fn is_walking(&mut self, magnitude: f32, now_ms: i64) -> bool {
        let filtered = self.walking_chain.apply(magnitude - GRAVITY_BIAS_G);
        self.steps.update(filtered, now_ms)
    }

    pub fn detect_break_gesture(&mut self, magnitude: f32, now_ms: i64) -> bool {
        let filtered = self.gesture_chain.apply(magnitude - GRAVITY_BIAS_G);
        self.gesture.update(filtered, now_ms)
    }

    pub fn should_auto_off(&mut self, magnitude: f32, now_ms: i64) -> bool {
        self.idle.update(magnitude, now_ms)
    }

    pub fn analyze(&mut self, sample: MotionSample) -> MotionVerdict {
        MotionVerdict {
            walking: self.is_walking(sample.magnitude, sample.timestamp_ms),
            break_gesture: self.detect_break_gesture(sample.magnitude, sample.timestamp_ms),
            auto_off: self.should_auto_off(sample.magnitude, sample.timestamp_ms),
        }
    }

    pub fn set_idle_timeout_ms(&mut self, timeout_ms: i64) {
        self.idle.set_timeout_ms(timeout_ms);
    }

    pub fn steps(&self) -> &StepDetector {
        &self.steps
    }

    pub fn gesture(&self) -> &GestureDetector {
        &self.gesture
    }

    pub fn idle(&self) -> &IdleDetector {
        &self.idle
    }

    /// Clears filter histories and detector state; the idle timeout survives.
    pub fn reset(&mut self) {
        self.walking_chain.reset();
        self.gesture_chain.reset();
        self.steps.reset();
        self.gesture.reset();
        self.idle.reset();
    }
}
