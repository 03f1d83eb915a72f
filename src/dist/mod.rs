//! Random-variate generators for packet sizes and interarrival times.
//!
//! The engine only sees the [`Variate`] trait; [`Dist`] is the set of
//! families a scenario file can name.

mod internet_mix;

use std::fmt;

use rand::RngCore;
use rand_distr::{Distribution, Exp, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use internet_mix::{INTERNET_MIX_MEAN_BYTES, internet_mix};

/// A source of non-negative real samples.
///
/// Implementations draw from the run's RNG so a run is reproducible from
/// its seed. Validation of the returned value happens at the call site.
pub trait Variate: fmt::Debug + Send {
    fn sample(&mut self, rng: &mut dyn RngCore) -> f64;
}

/// Distribution families understood by scenario files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dist {
    /// `P[x = value] = 1`
    Deterministic { value: f64 },
    /// Exponential with the given rate (mean `1 / rate`).
    Exponential { rate: f64 },
    Uniform { low: f64, high: f64 },
    /// Empirical Internet packet-size mix, mean about 438.5 bytes.
    InternetMix,
}

impl Dist {
    pub fn deterministic(value: f64) -> Self {
        Dist::Deterministic { value }
    }

    pub fn exponential(rate: f64) -> Self {
        Dist::Exponential { rate }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |why: String| Err(ConfigError::InvalidDistribution(why));
        match *self {
            Dist::Deterministic { value } if !(value.is_finite() && value >= 0.0) => {
                bad(format!("deterministic value {value} must be finite and >= 0"))
            }
            Dist::Exponential { rate } if !(rate.is_finite() && rate > 0.0) => {
                bad(format!("exponential rate {rate} must be finite and > 0"))
            }
            Dist::Uniform { low, high }
                if !(low.is_finite() && high.is_finite() && low >= 0.0 && low <= high) =>
            {
                bad(format!("uniform bounds [{low}, {high}] must satisfy 0 <= low <= high"))
            }
            _ => Ok(()),
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Dist::Deterministic { value } => value,
            Dist::Exponential { rate } => 1.0 / rate,
            Dist::Uniform { low, high } => (low + high) / 2.0,
            Dist::InternetMix => INTERNET_MIX_MEAN_BYTES,
        }
    }

    /// Validates the parameters and turns them into a boxed sampler.
    ///
    /// This is the only way to sample a [`Dist`], so a sampler never sees
    /// parameters that `validate` would reject.
    pub fn into_variate(self) -> Result<Box<dyn Variate>, ConfigError> {
        self.validate()?;
        let invalid = |e: &dyn fmt::Display| ConfigError::InvalidDistribution(e.to_string());
        let sampler = match self {
            Dist::Deterministic { value } => Sampler::Constant(value),
            Dist::Exponential { rate } => {
                Sampler::Exponential(Exp::new(rate).map_err(|e| invalid(&e))?)
            }
            Dist::Uniform { low, high } if low == high => Sampler::Constant(low),
            Dist::Uniform { low, high } => Sampler::Uniform(Uniform::new(low, high)),
            Dist::InternetMix => Sampler::InternetMix,
        };
        Ok(Box::new(sampler))
    }
}

/// Validated sampler behind [`Dist::into_variate`].
#[derive(Debug)]
enum Sampler {
    Constant(f64),
    Exponential(Exp<f64>),
    Uniform(Uniform<f64>),
    InternetMix,
}

impl Variate for Sampler {
    fn sample(&mut self, rng: &mut dyn RngCore) -> f64 {
        match self {
            Sampler::Constant(value) => *value,
            Sampler::Exponential(exp) => exp.sample(rng),
            Sampler::Uniform(uniform) => uniform.sample(rng),
            Sampler::InternetMix => internet_mix(rng),
        }
    }
}

/// Adapts any zero-argument closure into a [`Variate`].
///
/// The closure ignores the run RNG, so reproducibility is up to the caller.
pub struct FnVariate<F>(pub F);

impl<F> fmt::Debug for FnVariate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnVariate")
    }
}

impl<F> Variate for FnVariate<F>
where
    F: FnMut() -> f64 + Send,
{
    fn sample(&mut self, _rng: &mut dyn RngCore) -> f64 {
        (self.0)()
    }
}
