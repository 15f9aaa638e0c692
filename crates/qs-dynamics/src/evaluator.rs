//! Closed-form right-hand side of the controlled double pendulum.
//!
//! Equations of motion in ankle/hip coordinates:
//!
//! ```text
//! M(θh) [ω̇a, ω̇h]ᵀ = [F_a, F_h]ᵀ
//! ```
//!
//! where `F` collects gravity, platform acceleration, velocity coupling and
//! the feedback torques. The 2×2 system is solved by eliminating the ankle
//! row first (Schur complement), then back-substituting.

use crate::constants::Constants;
use crate::error::{DynamicsError, DynamicsResult};
use crate::mass::MassMatrix;
use crate::state::{NUM_STATES, State, StateDerivative};
use qs_core::{Real, fixed_len};
use tracing::{debug, warn};

/// Relative threshold below which the mass matrix is treated as singular.
pub const SINGULARITY_RTOL: Real = 1e-12;

/// Determinant margin (relative) under which construction logs a warning.
const ILL_CONDITIONED_RTOL: Real = 1e-6;

/// Validated constants, ready for repeated evaluation.
///
/// Construction checks the constants once: finiteness, and that the mass
/// matrix stays regular for every hip angle. Evaluation is then pure, holds
/// no mutable state and can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsEvaluator {
    constants: Constants,
}

impl DynamicsEvaluator {
    pub fn new(constants: Constants) -> DynamicsResult<Self> {
        let (det_min, scale) = Self::check(&constants)?;
        let margin = det_min / scale;
        if margin < ILL_CONDITIONED_RTOL {
            warn!(det_min, margin, "mass matrix is nearly singular");
        }
        debug!(det_min, margin, "dynamics evaluator ready");
        Ok(Self { constants })
    }

    fn check(constants: &Constants) -> DynamicsResult<(Real, Real)> {
        constants.ensure_finite()?;
        let (det_min, scale) = MassMatrix::determinant_lower_bound(&constants.physical);
        if det_min.is_nan() || det_min <= SINGULARITY_RTOL * scale {
            return Err(DynamicsError::SingularConfiguration {
                denominator: det_min,
            });
        }
        Ok((det_min, scale))
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Mass matrix at the given relative hip angle.
    pub fn mass_matrix(&self, theta_h: Real) -> MassMatrix {
        MassMatrix::at(&self.constants.physical, theta_h)
    }

    /// Feedback contribution to each joint's generalized force.
    pub fn feedback_bias(&self, state: &State) -> [Real; 2] {
        self.constants.feedback.bias(&state.to_array())
    }

    /// Ankle and hip torques commanded by the feedback law (zero reference).
    pub fn joint_torques(&self, state: &State) -> [Real; 2] {
        self.constants
            .feedback
            .torques(&state.to_array(), &[0.0; NUM_STATES])
    }

    /// Time derivative of `state` under platform acceleration `specified_input`.
    pub fn evaluate(
        &self,
        state: &State,
        specified_input: Real,
    ) -> DynamicsResult<StateDerivative> {
        let p = &self.constants.physical;
        let State {
            theta_a,
            theta_h,
            omega_a,
            omega_h,
        } = *state;
        let a = specified_input;

        let mass = MassMatrix::at(p, theta_h);
        if mass.m11.is_nan() || mass.m11.abs() <= SINGULARITY_RTOL * mass.m22.abs() {
            return Err(DynamicsError::SingularConfiguration {
                denominator: mass.m11,
            });
        }
        let inv_m11 = 1.0 / mass.m11;

        // Gravity and platform acceleration. The trunk's absolute orientation
        // is the sum of both joint angles.
        let trunk = theta_a + theta_h;
        let f_trunk = p.d_t * p.m_t * (a * trunk.cos() + p.g * trunk.sin());
        let f_leg = p.ankle_moment() * (a * theta_a.cos() + p.g * theta_a.sin());

        // Coriolis and centrifugal coupling.
        let coupling = p.d_t * p.l_l * p.m_t * theta_h.sin();

        let [bias_a, bias_h] = self.feedback_bias(state);

        let force_a = bias_a
            + coupling * (2.0 * omega_a * omega_h + omega_h * omega_h)
            + f_trunk
            + f_leg;
        let force_h = bias_h - coupling * omega_a * omega_a + f_trunk;

        let denominator = mass.m22 - mass.m12 * mass.m12 * inv_m11;
        if denominator.is_nan() || denominator.abs() <= SINGULARITY_RTOL * mass.m22.abs() {
            return Err(DynamicsError::SingularConfiguration { denominator });
        }

        let omega_h_dot = (force_h - mass.m12 * inv_m11 * force_a) / denominator;
        let omega_a_dot = inv_m11 * (force_a - mass.m12 * omega_h_dot);

        let d = StateDerivative {
            theta_a_dot: omega_a,
            theta_h_dot: omega_h,
            omega_a_dot,
            omega_h_dot,
        };
        ensure_finite_result(&d)?;
        Ok(d)
    }
}

fn ensure_finite_result(d: &StateDerivative) -> DynamicsResult<()> {
    match d.to_array().iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(DynamicsError::NonFiniteResult { index, value }),
        None => Ok(()),
    }
}

/// Evaluate from positional buffers: `constants[24]`, `state[4]`,
/// `specified[1]`.
///
/// All shapes are checked before any arithmetic, and the constants are
/// validated on every call. Callers evaluating the same constants many
/// times should build a [`DynamicsEvaluator`] once instead.
pub fn evaluate_raw(
    constants: &[Real],
    state: &[Real],
    specified: &[Real],
) -> DynamicsResult<[Real; NUM_STATES]> {
    let constants = Constants::from_slice(constants)?;
    let state = State::from_slice(state)?;
    let [a]: &[Real; 1] = fixed_len(specified, "specified input")?;

    DynamicsEvaluator::check(&constants)?;
    let evaluator = DynamicsEvaluator { constants };
    Ok(evaluator.evaluate(&state, *a)?.to_array())
}

/// [`evaluate_raw`] writing into a caller-owned `out[4]`.
///
/// `out` is only written on success.
pub fn evaluate_into(
    constants: &[Real],
    state: &[Real],
    specified: &[Real],
    out: &mut [Real],
) -> DynamicsResult<()> {
    if out.len() != NUM_STATES {
        return Err(DynamicsError::ShapeMismatch {
            what: "derivative",
            expected: NUM_STATES,
            actual: out.len(),
        });
    }
    let d = evaluate_raw(constants, state, specified)?;
    out.copy_from_slice(&d);
    Ok(())
}
