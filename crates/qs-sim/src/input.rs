//! Platform acceleration signals fed to the model as the specified input.

use crate::error::{SimError, SimResult};
use qs_core::Real;
use std::f64::consts::PI;

/// A time-indexed scalar input.
pub trait SpecifiedInput {
    /// Input value at time `t` (seconds).
    fn value(&self, t: Real) -> Real;
}

/// No platform motion.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroInput;

impl SpecifiedInput for ZeroInput {
    fn value(&self, _t: Real) -> Real {
        0.0
    }
}

/// Constant platform acceleration.
#[derive(Clone, Copy, Debug)]
pub struct ConstantInput(pub Real);

impl SpecifiedInput for ConstantInput {
    fn value(&self, _t: Real) -> Real {
        self.0
    }
}

/// Pseudo-random platform motion built from a sum of sines.
///
/// Each component has amplitude `magnitude / ω_i` in position, so
///
/// ```text
/// x(t) =  Σ (A/ω_i)      sin(ω_i t + φ_i)
/// v(t) =  Σ  A           cos(ω_i t + φ_i)
/// a(t) = -Σ  A ω_i       sin(ω_i t + φ_i)
/// ```
#[derive(Clone, Debug)]
pub struct SumOfSines {
    magnitude: Real,
    frequencies: Vec<Real>,
    phases: Vec<Real>,
}

impl SumOfSines {
    /// Harmonic numbers of the default 240 s excitation period.
    pub const DEFAULT_HARMONICS: [u32; 12] = [7, 11, 16, 25, 38, 61, 103, 131, 151, 181, 313, 523];

    /// Period (s) the default harmonics are defined over.
    pub const DEFAULT_PERIOD: Real = 240.0;

    /// Sum of sines over explicit angular frequencies (rad/s), zero phase.
    pub fn new(magnitude: Real, frequencies: Vec<Real>) -> SimResult<Self> {
        if !magnitude.is_finite() {
            return Err(SimError::InvalidArg {
                what: "sum of sines magnitude must be finite",
            });
        }
        if frequencies.is_empty() {
            return Err(SimError::InvalidArg {
                what: "sum of sines needs at least one frequency",
            });
        }
        if frequencies.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(SimError::InvalidArg {
                what: "sum of sines frequencies must be positive and finite",
            });
        }
        let phases = vec![0.0; frequencies.len()];
        Ok(Self {
            magnitude,
            frequencies,
            phases,
        })
    }

    /// The default twelve-harmonic excitation.
    pub fn standard(magnitude: Real) -> SimResult<Self> {
        let frequencies = Self::DEFAULT_HARMONICS
            .iter()
            .map(|&n| 2.0 * PI * n as Real / Self::DEFAULT_PERIOD)
            .collect();
        Self::new(magnitude, frequencies)
    }

    /// Replace the phase offsets (rad), one per frequency.
    pub fn with_phases(mut self, phases: Vec<Real>) -> SimResult<Self> {
        if phases.len() != self.frequencies.len() {
            return Err(SimError::InvalidArg {
                what: "one phase per frequency required",
            });
        }
        if phases.iter().any(|p| !p.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "phases must be finite",
            });
        }
        self.phases = phases;
        Ok(self)
    }

    pub fn frequencies(&self) -> &[Real] {
        &self.frequencies
    }

    pub fn position(&self, t: Real) -> Real {
        self.components()
            .map(|(w, p)| self.magnitude / w * (w * t + p).sin())
            .sum()
    }

    pub fn velocity(&self, t: Real) -> Real {
        self.components()
            .map(|(w, p)| self.magnitude * (w * t + p).cos())
            .sum()
    }

    pub fn acceleration(&self, t: Real) -> Real {
        self.components()
            .map(|(w, p)| -self.magnitude * w * (w * t + p).sin())
            .sum()
    }

    fn components(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.phases.iter().copied())
    }
}

impl SpecifiedInput for SumOfSines {
    fn value(&self, t: Real) -> Real {
        self.acceleration(t)
    }
}

/// Piecewise-linear interpolation of a sampled signal.
///
/// Times must be strictly increasing. Outside the sampled range the signal
/// holds its first/last value.
#[derive(Clone, Debug)]
pub struct SampledInput {
    times: Vec<Real>,
    values: Vec<Real>,
}

impl SampledInput {
    pub fn new(times: Vec<Real>, values: Vec<Real>) -> SimResult<Self> {
        if times.len() != values.len() {
            return Err(SimError::InvalidArg {
                what: "sample times and values must have the same length",
            });
        }
        if times.len() < 2 {
            return Err(SimError::InvalidArg {
                what: "at least two samples required",
            });
        }
        if times.iter().chain(&values).any(|v| !v.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "samples must be finite",
            });
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidArg {
                what: "sample times must be strictly increasing",
            });
        }
        Ok(Self { times, values })
    }

    /// Sample `signal` on a uniform grid of `num_samples` points over
    /// `[0, duration]`.
    pub fn from_signal<S: SpecifiedInput>(
        signal: &S,
        duration: Real,
        num_samples: usize,
    ) -> SimResult<Self> {
        if num_samples < 2 || !duration.is_finite() || duration <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "need positive duration and at least two samples",
            });
        }
        let interval = duration / (num_samples - 1) as Real;
        let times: Vec<Real> = (0..num_samples).map(|i| i as Real * interval).collect();
        let values = times.iter().map(|&t| signal.value(t)).collect();
        Self::new(times, values)
    }
}

impl SpecifiedInput for SampledInput {
    fn value(&self, t: Real) -> Real {
        if t.is_nan() {
            return Real::NAN;
        }
        let n = self.times.len();
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[n - 1] {
            return self.values[n - 1];
        }
        // First index with times[hi] > t; 1 <= hi <= n - 1 here.
        let hi = self.times.partition_point(|&x| x <= t);
        let lo = hi - 1;
        let frac = (t - self.times[lo]) / (self.times[hi] - self.times[lo]);
        self.values[lo] + frac * (self.values[hi] - self.values[lo])
    }
}
