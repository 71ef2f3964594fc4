//! Normally distributed samples via the polar Box-Muller transform.
use rand::Rng;

/// Divisor applied to every raw normal deviate before it is returned.
pub const SCALE: f64 = 3.6;

/// Stateful Gaussian generator that caches the second deviate of each pair.
///
/// The random source is supplied per call so the sampler itself only owns
/// the two cached values and the draw/replay toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSampler {
    value0: f64,
    value1: f64,
    generate: bool,
}

impl Default for GaussianSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianSampler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value0: 0.0,
            value1: 0.0,
            generate: true,
        }
    }

    /// Whether the next call will draw a fresh pair.
    #[must_use]
    pub const fn will_generate(&self) -> bool {
        self.generate
    }

    /// Drop the cached deviate so the next call draws.
    pub const fn reset(&mut self) {
        self.value0 = 0.0;
        self.value1 = 0.0;
        self.generate = true;
    }

    /// Produce the next scaled normal sample.
    ///
    /// Draw calls consume at least two uniforms from `rng`; replay calls
    /// consume none.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let result = if self.generate {
            let (x1, x2, w) = loop {
                let x1 = 2.0f64.mul_add(rng.r#gen::<f64>(), -1.0);
                let x2 = 2.0f64.mul_add(rng.r#gen::<f64>(), -1.0);
                let w = x1.mul_add(x1, x2 * x2);
                if w > 0.0 && w < 1.0 {
                    break (x1, x2, w);
                }
            };
            let factor = ((-2.0 * w.ln()) / w).sqrt();
            self.value0 = x1 * factor;
            self.value1 = x2 * factor;
            self.value0
        } else {
            self.value1
        };
        self.generate = !self.generate;
        result / SCALE
    }
}
