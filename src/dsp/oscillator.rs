//! Sine tone oscillator.

use std::f64::consts::PI;

/// A phase-accumulating sine oscillator.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(sample_rate: f64) -> Self {
        Oscillator {
            frequency: 600.0,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Phase increment per sample.
    fn phase_inc(&self) -> f64 {
        self.frequency / self.sample_rate
    }

    /// Generate the next sample in [-1, 1].
    pub fn next_sample(&mut self) -> f64 {
        let sample = (2.0 * PI * self.phase).sin();

        self.phase += self.phase_inc();
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Restart at zero phase so every tone begins without a click.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
