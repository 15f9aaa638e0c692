//! Direct identification of the feedback gains from recorded trajectories.
//!
//! For a controller tracking the zero state, each sample satisfies
//! `u = -K x`. Stacking `N` samples gives the overdetermined system
//! `(-X) Kᵀ = U`, solved here in the least-squares sense with an SVD.

use crate::error::{ControlError, ControlResult};
use crate::gains::{GainMatrix, NUM_CHANNELS, NUM_STATES};
use nalgebra::DMatrix;
use qs_core::Real;
use tracing::{debug, warn};

/// Result of a least-squares gain identification.
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    /// Effective gain matrix `K` (scales folded in).
    pub gains: GainMatrix,
    /// Frobenius norm of `(-X) Kᵀ - U`.
    pub residual_norm: Real,
    /// Numerical rank of the state matrix.
    pub rank: usize,
}

/// Estimate the effective gains from `N` state samples and the joint
/// torques measured at the same instants.
///
/// A rank-deficient state history (e.g. one joint never moved) still yields
/// the minimum-norm solution; the rank is reported so callers can decide.
pub fn identify_gains(
    states: &[[Real; NUM_STATES]],
    torques: &[[Real; NUM_CHANNELS]],
) -> ControlResult<Identification> {
    if states.len() != torques.len() {
        return Err(ControlError::InvalidArg {
            what: "states and torques must have the same number of samples",
        });
    }
    if states.len() < NUM_STATES {
        return Err(ControlError::InvalidArg {
            what: "need at least as many samples as state components",
        });
    }

    let n = states.len();
    let a = DMatrix::from_fn(n, NUM_STATES, |r, c| -states[r][c]);
    let b = DMatrix::from_fn(n, NUM_CHANNELS, |r, c| torques[r][c]);

    let svd = a.clone().svd(true, true);
    let eps = Real::EPSILON * n as Real * svd.singular_values.max();
    let rank = svd.rank(eps);
    if rank == 0 {
        return Err(ControlError::Numeric {
            what: "state history is identically zero".to_string(),
        });
    }
    if rank < NUM_STATES {
        warn!(rank, "rank-deficient state history, gains are not unique");
    }

    let solution = svd
        .solve(&b, eps)
        .map_err(|e| ControlError::Numeric {
            what: format!("least-squares solve failed: {e}"),
        })?;

    let residual_norm = (&a * &solution - &b).norm();

    let mut gains = [[0.0; NUM_STATES]; NUM_CHANNELS];
    for (i, row) in gains.iter_mut().enumerate() {
        for (j, k) in row.iter_mut().enumerate() {
            *k = solution[(j, i)];
        }
    }

    debug!(samples = n, rank, residual_norm, "identified feedback gains");

    Ok(Identification {
        gains,
        residual_norm,
        rank,
    })
}
