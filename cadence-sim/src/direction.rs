//! Heading offsets blending a Gaussian signal with misinterpretation noise.
use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::gaussian::GaussianSampler;

/// Produces direction offsets (radians) relative to the heading toward the goal.
///
/// `interpretation_percent` of 100 keeps only the Gaussian signal; lower
/// values add uniform noise whose span grows to the full circle at 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionModel {
    interpretation_percent: f64,
}

impl DirectionModel {
    #[must_use]
    pub const fn new(interpretation_percent: f64) -> Self {
        Self {
            interpretation_percent,
        }
    }

    #[must_use]
    pub const fn interpretation_percent(&self) -> f64 {
        self.interpretation_percent
    }

    /// Amplitude of the uniform noise term, in radians.
    #[must_use]
    pub fn noise_span(&self) -> f64 {
        TAU * (1.0 - self.interpretation_percent / 100.0)
    }

    /// Combine a Gaussian signal and a uniform draw into an offset.
    #[must_use]
    pub fn offset_from(&self, signal: f64, uniform: f64) -> f64 {
        signal.mul_add(PI, self.noise_span() * (uniform - 0.5))
    }

    /// Sample the next offset. The uniform term is always drawn, even when
    /// its amplitude is zero.
    pub fn next_offset<R: Rng + ?Sized>(
        &self,
        sampler: &mut GaussianSampler,
        rng: &mut R,
    ) -> f64 {
        let signal = sampler.sample(rng);
        let uniform = rng.r#gen::<f64>();
        self.offset_from(signal, uniform)
    }
}
