use core::f32::consts::{PI, SQRT_2};

/// Second-order IIR section. Low-pass sections use the full three-tap
/// Butterworth form; high-pass sections use a first-order discretization
/// and leave the unused taps at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biquad {
    a: [f32; 2],
    b: [f32; 3],
    x: [f32; 3],
    y: [f32; 3],
}

impl Biquad {
    pub fn low_pass(cutoff_hz: f32, sample_hz: f32) -> Self {
        let alpha = angular_step(cutoff_hz, sample_hz);
        let alpha_sq = alpha * alpha;
        let denom = alpha_sq + 2.0 * SQRT_2 * alpha + 4.0;
        let b0 = alpha_sq / denom;
        Self::with_coefficients(
            [
                -(2.0 * alpha_sq - 8.0) / denom,
                -(alpha_sq - 2.0 * SQRT_2 * alpha + 4.0) / denom,
            ],
            [b0, 2.0 * b0, b0],
        )
    }

    pub fn high_pass(cutoff_hz: f32, sample_hz: f32) -> Self {
        let half_alpha = angular_step(cutoff_hz, sample_hz) / 2.0;
        let gain = 1.0 / (1.0 + half_alpha);
        Self::with_coefficients([-(half_alpha - 1.0) * gain, 0.0], [gain, -gain, 0.0])
    }

    const fn with_coefficients(a: [f32; 2], b: [f32; 3]) -> Self {
        Self {
            a,
            b,
            x: [0.0; 3],
            y: [0.0; 3],
        }
    }

    pub fn apply(&mut self, input: f32) -> f32 {
        self.x = [input, self.x[0], self.x[1]];
        self.y = [0.0, self.y[0], self.y[1]];

        let output = self.b[0] * self.x[0]
            + self.b[1] * self.x[1]
            + self.b[2] * self.x[2]
            + self.a[0] * self.y[1]
            + self.a[1] * self.y[2];
        self.y[0] = output;
        output
    }

    pub fn reset(&mut self) {
        self.x = [0.0; 3];
        self.y = [0.0; 3];
    }

    pub fn feedback(&self) -> [f32; 2] {
        self.a
    }

    pub fn feedforward(&self) -> [f32; 3] {
        self.b
    }
}

fn angular_step(cutoff_hz: f32, sample_hz: f32) -> f32 {
    2.0 * PI * cutoff_hz / sample_hz
}

/// High-pass then low-pass. The high-pass stage strips the gravity offset
/// before the low-pass stage smooths sensor noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandpassChain {
    high: Biquad,
    low: Biquad,
}

impl BandpassChain {
    pub fn new(high_cut_hz: f32, low_cut_hz: f32, sample_hz: f32) -> Self {
        Self {
            high: Biquad::high_pass(high_cut_hz, sample_hz),
            low: Biquad::low_pass(low_cut_hz, sample_hz),
        }
    }

    pub fn apply(&mut self, input: f32) -> f32 {
        self.low.apply(self.high.apply(input))
    }

    pub fn reset(&mut self) {
        self.high.reset();
        self.low.reset();
    }
}
