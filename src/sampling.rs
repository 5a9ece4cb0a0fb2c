use log::debug;

use crate::error::TimaError;
use crate::telemetry;

pub trait MotionSensor {
    /// Accelerometer magnitude in g.
    fn read_magnitude(&mut self) -> Result<f32, TimaError>;
}

pub trait Microphone {
    /// Mean absolute amplitude of the most recent PCM block.
    fn read_amplitude(&mut self) -> Result<u32, TimaError>;
}

/// One 10 ms sampling step. A sensor that produced nothing leaves its field
/// empty and the consumers skip that part of the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorTick {
    pub now_ms: i64,
    pub magnitude: Option<f32>,
    pub mic_amplitude: Option<u32>,
}

impl SensorTick {
    pub const fn new(now_ms: i64) -> Self {
        Self {
            now_ms,
            magnitude: None,
            mic_amplitude: None,
        }
    }

    pub const fn with_motion(mut self, magnitude: f32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub const fn with_mic(mut self, amplitude: u32) -> Self {
        self.mic_amplitude = Some(amplitude);
        self
    }
}

pub fn poll_sensors<M, A>(motion: &mut M, mic: &mut A, now_ms: i64) -> SensorTick
where
    M: MotionSensor,
    A: Microphone,
{
    let magnitude = motion
        .read_magnitude()
        .inspect_err(|err| debug!("motion sample skipped at {now_ms} ms: {err}"))
        .ok();
    let mic_amplitude = mic
        .read_amplitude()
        .inspect_err(|err| debug!("mic sample skipped at {now_ms} ms: {err}"))
        .ok();
    telemetry::record_sample_skipped(magnitude.is_none(), mic_amplitude.is_none());

    SensorTick {
        now_ms,
        magnitude,
        mic_amplitude,
    }
}
