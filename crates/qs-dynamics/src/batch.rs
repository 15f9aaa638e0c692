//! Batched evaluation over many independent trajectories.
//!
//! Every entry shares one validated [`DynamicsEvaluator`]; entries are
//! evaluated in parallel on the rayon pool. Results are identical to calling
//! [`DynamicsEvaluator::evaluate`] on each entry in turn.

use crate::error::{DynamicsError, DynamicsResult};
use crate::evaluator::DynamicsEvaluator;
use crate::state::{NUM_STATES, State, StateDerivative};
use qs_core::Real;
use rayon::prelude::*;

impl DynamicsEvaluator {
    /// Evaluate `states[i]` under `inputs[i]` for every `i`.
    ///
    /// If any entry fails, one of the failures is returned and no output is
    /// produced.
    pub fn evaluate_batch(
        &self,
        states: &[State],
        inputs: &[Real],
    ) -> DynamicsResult<Vec<StateDerivative>> {
        if states.len() != inputs.len() {
            return Err(DynamicsError::ShapeMismatch {
                what: "specified inputs",
                expected: states.len(),
                actual: inputs.len(),
            });
        }
        states
            .par_iter()
            .zip(inputs.par_iter())
            .map(|(x, &a)| self.evaluate(x, a))
            .collect()
    }

    /// Struct-of-arrays form over flat buffers.
    ///
    /// `states` holds `n` consecutive 4-entry states, `inputs` the `n`
    /// platform accelerations, and `out` receives `n` consecutive
    /// derivatives. Entries of `out` belonging to failed evaluations are
    /// left unspecified.
    pub fn evaluate_flat_batch(
        &self,
        states: &[Real],
        inputs: &[Real],
        out: &mut [Real],
    ) -> DynamicsResult<()> {
        let expected = inputs.len() * NUM_STATES;
        if states.len() != expected {
            return Err(DynamicsError::ShapeMismatch {
                what: "flat states",
                expected,
                actual: states.len(),
            });
        }
        if out.len() != expected {
            return Err(DynamicsError::ShapeMismatch {
                what: "flat derivatives",
                expected,
                actual: out.len(),
            });
        }

        out.par_chunks_exact_mut(NUM_STATES)
            .zip(states.par_chunks_exact(NUM_STATES))
            .zip(inputs.par_iter())
            .try_for_each(|((dst, x), &a)| -> DynamicsResult<()> {
                let x = State::from_slice(x)?;
                dst.copy_from_slice(&self.evaluate(&x, a)?.to_array());
                Ok(())
            })
    }
}
