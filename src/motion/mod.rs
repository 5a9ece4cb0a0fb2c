mod analyzer;
mod gesture;
mod idle;
mod step;

pub use analyzer::{MotionAnalyzer, MotionVerdict};
pub use gesture::GestureDetector;
pub use idle::IdleDetector;
pub use step::StepDetector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub magnitude: f32,
    pub timestamp_ms: i64,
}

impl MotionSample {
    pub const fn new(magnitude: f32, timestamp_ms: i64) -> Self {
        Self {
            magnitude,
            timestamp_ms,
        }
    }

    pub fn from_axes(x: f32, y: f32, z: f32, timestamp_ms: i64) -> Self {
        Self::new((x * x + y * y + z * z).sqrt(), timestamp_ms)
    }
}
