//! Joint state and its time derivative.

use qs_core::{QsResult, Real, fixed_len};
use serde::{Deserialize, Serialize};

/// Number of state components.
pub const NUM_STATES: usize = qs_controls::NUM_STATES;

/// Generalized coordinates and speeds of the two joints (rad, rad/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Leg angle from vertical at the ankle
    pub theta_a: Real,
    /// Trunk angle relative to the leg at the hip
    pub theta_h: Real,
    pub omega_a: Real,
    pub omega_h: Real,
}

impl State {
    pub fn new(theta_a: Real, theta_h: Real, omega_a: Real, omega_h: Real) -> Self {
        Self {
            theta_a,
            theta_h,
            omega_a,
            omega_h,
        }
    }

    pub fn from_slice(values: &[Real]) -> QsResult<Self> {
        let v: &[Real; NUM_STATES] = fixed_len(values, "state")?;
        Ok(Self::from(*v))
    }

    pub fn to_array(&self) -> [Real; NUM_STATES] {
        [self.theta_a, self.theta_h, self.omega_a, self.omega_h]
    }
}

impl From<[Real; NUM_STATES]> for State {
    fn from(v: [Real; NUM_STATES]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Time derivative of [`State`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDerivative {
    pub theta_a_dot: Real,
    pub theta_h_dot: Real,
    /// Ankle angular acceleration (rad/s²)
    pub omega_a_dot: Real,
    /// Hip angular acceleration (rad/s²)
    pub omega_h_dot: Real,
}

impl StateDerivative {
    pub fn to_array(&self) -> [Real; NUM_STATES] {
        [
            self.theta_a_dot,
            self.theta_h_dot,
            self.omega_a_dot,
            self.omega_h_dot,
        ]
    }
}

impl From<StateDerivative> for [Real; NUM_STATES] {
    fn from(d: StateDerivative) -> Self {
        d.to_array()
    }
}
