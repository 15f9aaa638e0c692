//! The full constant set: physical parameters plus the feedback law.

use crate::params::PhysicalParams;
use qs_controls::{FeedbackGains, NUM_CHANNELS, NUM_STATES};
use qs_core::{QsResult, Real, ensure_all_finite, fixed_len};
use serde::{Deserialize, Serialize};

/// Length of the flat constants layout.
pub const NUM_CONSTANTS: usize = 24;

const GAINS_START: usize = PhysicalParams::LEN;
const SCALES_START: usize = GAINS_START + NUM_CHANNELS * NUM_STATES;

/// Everything the evaluator needs besides the state and the input.
///
/// Flat layout (24 entries): physical parameters (8), then gains `k_00..k_13`
/// row-major (8), then scales `s_00..s_13` row-major (8).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub physical: PhysicalParams,
    pub feedback: FeedbackGains,
}

impl Constants {
    pub fn new(physical: PhysicalParams, feedback: FeedbackGains) -> Self {
        Self { physical, feedback }
    }

    /// Physical parameters with the feedback law switched off.
    pub fn open_loop(physical: PhysicalParams) -> Self {
        Self::new(physical, FeedbackGains::zero())
    }

    /// Parse the 24-entry positional layout.
    pub fn from_slice(values: &[Real]) -> QsResult<Self> {
        let values: &[Real; NUM_CONSTANTS] = fixed_len(values, "constants")?;

        let mut physical = [0.0; PhysicalParams::LEN];
        physical.copy_from_slice(&values[..GAINS_START]);

        let mut feedback = FeedbackGains::zero();
        feedback
            .gains
            .as_flattened_mut()
            .copy_from_slice(&values[GAINS_START..SCALES_START]);
        feedback
            .scales
            .as_flattened_mut()
            .copy_from_slice(&values[SCALES_START..]);

        Ok(Self {
            physical: PhysicalParams::from_array(&physical),
            feedback,
        })
    }

    pub fn to_array(&self) -> [Real; NUM_CONSTANTS] {
        let mut out = [0.0; NUM_CONSTANTS];
        out[..GAINS_START].copy_from_slice(&self.physical.to_array());
        out[GAINS_START..SCALES_START].copy_from_slice(self.feedback.gains.as_flattened());
        out[SCALES_START..].copy_from_slice(self.feedback.scales.as_flattened());
        out
    }

    /// Reject NaN or infinite entries anywhere in the set.
    pub fn ensure_finite(&self) -> QsResult<()> {
        self.physical.ensure_finite()?;
        ensure_all_finite(self.feedback.gains.as_flattened(), "feedback gain")?;
        ensure_all_finite(self.feedback.scales.as_flattened(), "feedback scale")?;
        Ok(())
    }
}
