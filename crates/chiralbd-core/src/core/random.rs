use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Worker-local pseudo-random stream.
///
/// Each worker seeds its own stream with `seed + rank`, so streams on different
/// workers are independent while a given `(seed, rank)` pair always replays the same
/// sequence of deviates.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: StdRng,
    seed: u64,
}

impl RandomStream {
    pub fn new(seed: u64, rank: u64) -> Self {
        let seed = seed.wrapping_add(rank);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The effective seed after the worker offset was applied.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform deviate in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Standard normal deviate.
    #[inline]
    pub fn gaussian(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    #[inline]
    pub fn gaussian_with(&mut self, mean: f64, stdev: f64) -> f64 {
        mean + stdev * self.gaussian()
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown noise model '{0}', expected one of: gaussian, uniform, none")]
pub struct UnknownNoiseModelError(pub String);

/// Distribution of the unit-variance noise fed into the integrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseModel {
    #[default]
    Gaussian,
    /// Uniform noise rescaled to unit variance.
    Uniform,
    /// No noise at all: every draw returns its mean.
    None,
}

impl NoiseModel {
    /// Draws a unit-variance deviate centred on `mean`.
    #[inline]
    pub fn draw(self, stream: &mut RandomStream, mean: f64) -> f64 {
        match self {
            Self::Gaussian => stream.gaussian_with(mean, 1.0),
            Self::Uniform => mean + 12.0_f64.sqrt() * (stream.uniform() - 0.5),
            Self::None => mean,
        }
    }
}

impl FromStr for NoiseModel {
    type Err = UnknownNoiseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(Self::Gaussian),
            "uniform" => Ok(Self::Uniform),
            "none" => Ok(Self::None),
            _ => Err(UnknownNoiseModelError(s.to_string())),
        }
    }
}
