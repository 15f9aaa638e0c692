//! Synthetic measurements from a simulated run.
//!
//! The closed-loop trajectory stands in for a recorded experiment. Optional
//! zero-mean Gaussian noise is added independently to joint angles, joint
//! rates, joint torques and the platform acceleration.

use crate::error::{SimError, SimResult};
use crate::input::SpecifiedInput;
use crate::sim::SimRecord;
use crate::standing::QuietStandingModel;
use qs_core::Real;
use qs_dynamics::{NUM_STATES, State};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Standard deviations of the measurement noise, in the units of each
/// signal. All zero means exact measurements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementNoise {
    /// Joint angles (rad)
    pub coordinate_std: Real,
    /// Joint rates (rad/s)
    pub speed_std: Real,
    /// Joint torques (N·m)
    pub torque_std: Real,
    /// Platform acceleration (m/s²)
    pub input_std: Real,
    /// Seed for reproducible noise. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl MeasurementNoise {
    /// Exact measurements.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_exact(&self) -> bool {
        self.coordinate_std == 0.0
            && self.speed_std == 0.0
            && self.torque_std == 0.0
            && self.input_std == 0.0
    }

    fn validate(&self) -> SimResult<()> {
        let stds = [
            self.coordinate_std,
            self.speed_std,
            self.torque_std,
            self.input_std,
        ];
        if stds.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(SimError::InvalidArg {
                what: "noise standard deviations must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Measured signals at the recorded times.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredData {
    pub t: Vec<Real>,
    pub states: Vec<State>,
    /// Ankle and hip torques
    pub torques: Vec<[Real; 2]>,
    /// Platform acceleration
    pub inputs: Vec<Real>,
}

impl MeasuredData {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// States in positional form, as taken by `qs_controls::identify_gains`.
    pub fn state_arrays(&self) -> Vec<[Real; NUM_STATES]> {
        self.states.iter().map(State::to_array).collect()
    }
}

/// Zero-mean normal sample by the Box-Muller transform.
fn gaussian(rng: &mut dyn RngCore, std: Real) -> Real {
    if std == 0.0 {
        return 0.0;
    }
    // u1 in (0, 1] keeps the log finite.
    let u1: Real = 1.0 - rng.gen_range(0.0..1.0);
    let u2: Real = rng.gen_range(0.0..1.0);
    std * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl<I: SpecifiedInput> QuietStandingModel<I> {
    /// Sample the states, the feedback torques and the platform input along
    /// `record`, then corrupt each with `noise`.
    ///
    /// Torques are computed from the true states before noise is added, so
    /// torque noise and state noise are independent.
    pub fn measure(
        &self,
        record: &SimRecord<State>,
        noise: &MeasurementNoise,
    ) -> SimResult<MeasuredData> {
        noise.validate()?;

        let mut torques = self.trajectory_torques(record);
        let mut inputs = self.trajectory_inputs(record);
        let mut states = record.x.clone();

        if !noise.is_exact() {
            let mut rng: Box<dyn RngCore> = match noise.seed {
                Some(seed) => Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
                None => Box::new(rand::thread_rng()),
            };
            for x in &mut states {
                x.theta_a += gaussian(rng.as_mut(), noise.coordinate_std);
                x.theta_h += gaussian(rng.as_mut(), noise.coordinate_std);
                x.omega_a += gaussian(rng.as_mut(), noise.speed_std);
                x.omega_h += gaussian(rng.as_mut(), noise.speed_std);
            }
            for tau in &mut torques {
                for v in tau.iter_mut() {
                    *v += gaussian(rng.as_mut(), noise.torque_std);
                }
            }
            for a in &mut inputs {
                *a += gaussian(rng.as_mut(), noise.input_std);
            }
        }

        Ok(MeasuredData {
            t: record.t.clone(),
            states,
            torques,
            inputs,
        })
    }
}
