//! Indirect gain identification by single shooting.
//!
//! Candidate gains are judged by simulating the closed loop from the known
//! initial state under the known platform input and comparing the simulated
//! states with the measured ones. The stacked state error is minimized with
//! Gauss-Newton on a forward-difference Jacobian, each step backtracked
//! until the residual norm drops.
//!
//! Unlike `qs_controls::identify_gains`, only states are needed, and noise
//! on the states does not bias the gains.

use crate::error::{SimError, SimResult};
use crate::input::SpecifiedInput;
use crate::model::TransientModel;
use crate::sim::{SimOptions, run_sim};
use crate::standing::QuietStandingModel;
use nalgebra::{DMatrix, DVector};
use qs_controls::{GainMatrix, NUM_CHANNELS};
use qs_core::Real;
use qs_dynamics::{Constants, DynamicsEvaluator, FeedbackGains, NUM_STATES, State};
use tracing::{debug, warn};

const NUM_GAINS: usize = NUM_CHANNELS * NUM_STATES;

/// Gauss-Newton settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingConfig {
    /// Maximum Gauss-Newton iterations
    pub max_iterations: usize,
    /// Stop once the residual norm falls below this
    pub abs_tol: Real,
    /// Stop once an accepted step lowers the residual norm by less than this fraction
    pub rel_tol: Real,
    /// Relative finite-difference perturbation of each gain
    pub fd_step: Real,
    /// Line search backtracking factor
    pub line_search_beta: Real,
    /// Maximum line search halvings
    pub max_line_search_iters: usize,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            abs_tol: 1e-10,
            rel_tol: 1e-9,
            fd_step: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Outcome of a shooting identification.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingResult {
    /// Identified gains, scales folded in.
    pub gains: GainMatrix,
    /// Euclidean norm of the stacked state error at `gains`.
    pub residual_norm: Real,
    /// Euclidean norm of the stacked state error at the initial guess.
    pub initial_residual_norm: Real,
    pub iterations: usize,
    pub converged: bool,
}

fn to_vector(k: &GainMatrix) -> DVector<Real> {
    DVector::from_column_slice(k.as_flattened())
}

fn to_gains(v: &DVector<Real>) -> GainMatrix {
    let mut k = [[0.0; NUM_STATES]; NUM_CHANNELS];
    k.as_flattened_mut().copy_from_slice(v.as_slice());
    k
}

/// Fit the feedback gains of `template` to a measured state trajectory.
///
/// `template` fixes the physical parameters, the platform input and the
/// initial state; its effective gains are the starting guess. Each residual
/// evaluation runs [`run_sim`] with `opts`, so `measured` must hold one state
/// per record of that run.
///
/// Candidates whose simulation fails (e.g. an unstable loop overflowing) are
/// treated as worse than the current iterate. When the line search cannot
/// reduce the residual, or the iteration limit is hit, the best gains found
/// are returned with `converged == false`.
pub fn identify_gains_shooting<I: SpecifiedInput + Clone>(
    template: &QuietStandingModel<I>,
    measured: &[State],
    opts: &SimOptions,
    config: &ShootingConfig,
) -> SimResult<ShootingResult> {
    if measured.is_empty() {
        return Err(SimError::InvalidArg {
            what: "measured trajectory is empty",
        });
    }

    let physical = template.evaluator().constants().physical;
    let initial = template.initial_state();

    let residual = |v: &DVector<Real>| -> SimResult<DVector<Real>> {
        let feedback = FeedbackGains {
            gains: to_gains(v),
            ..FeedbackGains::zero()
        };
        let evaluator = DynamicsEvaluator::new(Constants::new(physical, feedback))?;
        let mut model =
            QuietStandingModel::new(evaluator, template.input().clone()).with_initial_state(initial);
        let record = run_sim(&mut model, opts)?;
        if record.len() != measured.len() {
            return Err(SimError::InvalidArg {
                what: "measured trajectory must have one state per simulated record",
            });
        }
        let errors = record.x.iter().zip(measured).flat_map(|(sim, meas)| {
            let (sim, meas) = (sim.to_array(), meas.to_array());
            std::array::from_fn::<Real, NUM_STATES, _>(|j| sim[j] - meas[j])
        });
        Ok(DVector::from_iterator(measured.len() * NUM_STATES, errors))
    };

    let mut x = to_vector(&template.evaluator().constants().feedback.effective());
    let mut r = residual(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;
    if !r_norm.is_finite() {
        return Err(SimError::Numeric {
            what: "initial guess gives a non-finite residual".to_string(),
        });
    }

    let finish = |x: &DVector<Real>, r_norm: Real, iterations: usize, converged: bool| {
        debug!(iterations, residual_norm = r_norm, converged, "shooting identification done");
        ShootingResult {
            gains: to_gains(x),
            residual_norm: r_norm,
            initial_residual_norm: r0_norm,
            iterations,
            converged,
        }
    };

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol {
            return Ok(finish(&x, r_norm, iter, true));
        }

        let jac = finite_difference_jacobian(&x, &r, &residual, config.fd_step)?;

        // Least-squares Gauss-Newton step: J dx ≈ -r
        let svd = jac.svd(true, true);
        let eps = Real::EPSILON * r.len().max(NUM_GAINS) as Real * svd.singular_values.max();
        let dx = svd
            .solve(&(-r.clone()), eps)
            .map_err(|e| SimError::Numeric {
                what: format!("Gauss-Newton step failed: {e}"),
            })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if let Ok(r_new) = residual(&x_new) {
                let n = r_new.norm();
                if n < r_norm {
                    accepted = Some((x_new, r_new, n));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, n_new)) = accepted else {
            warn!(iteration = iter, residual_norm = r_norm, "line search stagnated");
            return Ok(finish(&x, r_norm, iter, false));
        };

        let decrease = r_norm - n_new;
        x = x_new;
        r = r_new;
        debug!(iteration = iter, residual_norm = n_new, alpha, "shooting step");

        if n_new < config.abs_tol || decrease <= config.rel_tol * r_norm {
            return Ok(finish(&x, n_new, iter + 1, true));
        }
        r_norm = n_new;
    }

    warn!(
        max_iterations = config.max_iterations,
        residual_norm = r_norm,
        "shooting identification hit the iteration limit"
    );
    Ok(finish(&x, r_norm, config.max_iterations, false))
}

/// Forward differences around `x`, reusing the residual `r_x` already
/// computed there. Each gain is perturbed by `epsilon * max(|x_j|, 1)`.
fn finite_difference_jacobian<F>(
    x: &DVector<Real>,
    r_x: &DVector<Real>,
    f: &F,
    epsilon: Real,
) -> SimResult<DMatrix<Real>>
where
    F: Fn(&DVector<Real>) -> SimResult<DVector<Real>>,
{
    let mut jac = DMatrix::zeros(r_x.len(), x.len());
    for j in 0..x.len() {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;
        let df = (f(&x_perturbed)? - r_x) / dx;
        jac.set_column(j, &df);
    }
    Ok(jac)
}
