//! Gain and scale matrices of the two-channel state-feedback law.
//!
//! Channel 0 drives the ankle, channel 1 the hip. Columns follow the state
//! ordering `(theta_a, theta_h, omega_a, omega_h)`, so each row holds the
//! proportional and derivative weights on both joints.

use crate::error::ControlResult;
use qs_core::{Real, ensure_all_finite};
use serde::{Deserialize, Serialize};

/// Number of output channels (ankle, hip).
pub const NUM_CHANNELS: usize = 2;
/// Number of state components each channel weights.
pub const NUM_STATES: usize = 4;

/// Row-major `channel × state` matrix.
pub type GainMatrix = [[Real; NUM_STATES]; NUM_CHANNELS];

/// Feedback gains with their paired scale/selector coefficients.
///
/// The weight applied to state `j` in channel `i` is `gains[i][j] * scales[i][j]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackGains {
    /// Primary gains `k_ij`.
    pub gains: GainMatrix,
    /// Scale/selector coefficients `s_ij`.
    pub scales: GainMatrix,
}

impl FeedbackGains {
    /// Create a gain set, rejecting NaN or infinite entries.
    pub fn new(gains: GainMatrix, scales: GainMatrix) -> ControlResult<Self> {
        ensure_all_finite(gains.as_flattened(), "feedback gain")?;
        ensure_all_finite(scales.as_flattened(), "feedback scale")?;
        Ok(Self { gains, scales })
    }

    /// Gains with every scale set to one.
    pub fn unscaled(gains: GainMatrix) -> ControlResult<Self> {
        Self::new(gains, [[1.0; NUM_STATES]; NUM_CHANNELS])
    }

    /// Open loop: all gains zero, all scales one.
    pub fn zero() -> Self {
        Self {
            gains: [[0.0; NUM_STATES]; NUM_CHANNELS],
            scales: [[1.0; NUM_STATES]; NUM_CHANNELS],
        }
    }

    /// Element-wise product `k_ij * s_ij`.
    pub fn effective(&self) -> GainMatrix {
        let mut k = [[0.0; NUM_STATES]; NUM_CHANNELS];
        for (i, row) in k.iter_mut().enumerate() {
            for (j, w) in row.iter_mut().enumerate() {
                *w = self.gains[i][j] * self.scales[i][j];
            }
        }
        k
    }

    /// Same scales, every gain multiplied by `factor`.
    pub fn scaled_by(&self, factor: Real) -> Self {
        let mut gains = self.gains;
        for g in gains.as_flattened_mut() {
            *g *= factor;
        }
        Self {
            gains,
            scales: self.scales,
        }
    }

    /// Generalized-force bias of each channel: `-Σ_j k_ij s_ij x_j`.
    #[inline]
    pub fn bias(&self, x: &[Real; NUM_STATES]) -> [Real; NUM_CHANNELS] {
        [self.channel_bias(0, x), self.channel_bias(1, x)]
    }

    /// Joint torques that track `reference`: `K_eff (reference - x)`.
    ///
    /// With a zero reference this equals [`FeedbackGains::bias`].
    pub fn torques(
        &self,
        x: &[Real; NUM_STATES],
        reference: &[Real; NUM_STATES],
    ) -> [Real; NUM_CHANNELS] {
        let mut err = [0.0; NUM_STATES];
        for (e, (x, r)) in err.iter_mut().zip(x.iter().zip(reference)) {
            *e = x - r;
        }
        self.bias(&err)
    }

    #[inline]
    fn channel_bias(&self, i: usize, x: &[Real; NUM_STATES]) -> Real {
        let k = &self.gains[i];
        let s = &self.scales[i];
        -k[0] * s[0] * x[0] - k[1] * s[1] * x[1] - k[2] * x[2] * s[2] - k[3] * x[3] * s[3]
    }
}

impl Default for FeedbackGains {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlError;

    fn sample() -> FeedbackGains {
        FeedbackGains::new(
            [[950.0, 175.0, 185.0, 50.0], [45.0, 290.0, 60.0, 26.0]],
            [[1.0, 1.0, 0.5, 0.5], [1.0, 0.0, 1.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn zero_gains_give_zero_bias() {
        let fb = FeedbackGains::zero();
        assert_eq!(fb.bias(&[0.3, -0.2, 1.0, 4.0]), [0.0, 0.0]);
    }

    #[test]
    fn effective_is_elementwise_product() {
        let k = sample().effective();
        assert_eq!(k[0], [950.0, 175.0, 92.5, 25.0]);
        assert_eq!(k[1], [45.0, 0.0, 60.0, 26.0]);
    }

    #[test]
    fn bias_is_negative_weighted_sum() {
        let fb = sample();
        let x = [0.01, -0.02, 0.1, 0.05];
        let k = fb.effective();
        for (i, b) in fb.bias(&x).iter().enumerate() {
            let expected: Real = -(0..NUM_STATES).map(|j| k[i][j] * x[j]).sum::<Real>();
            assert!((b - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn selector_zero_disables_term() {
        let fb = sample();
        let a = fb.bias(&[0.0, 0.0, 0.0, 0.0])[1];
        let b = fb.bias(&[0.0, 123.0, 0.0, 0.0])[1];
        assert_eq!(a, b);
    }

    #[test]
    fn torques_track_reference() {
        let fb = sample();
        let x = [0.02, 0.01, -0.1, 0.2];
        assert_eq!(fb.torques(&x, &[0.0; NUM_STATES]), fb.bias(&x));
        assert_eq!(fb.torques(&x, &x), [0.0, 0.0]);
    }

    #[test]
    fn scaled_by_keeps_scales() {
        let fb = sample().scaled_by(2.0);
        assert_eq!(fb.gains[0][0], 1900.0);
        assert_eq!(fb.scales, sample().scales);
    }

    #[test]
    fn non_finite_gains_rejected() {
        let mut gains = [[0.0; NUM_STATES]; NUM_CHANNELS];
        gains[1][2] = Real::NAN;
        let err = FeedbackGains::unscaled(gains).unwrap_err();
        assert!(matches!(
            err,
            ControlError::NonFinite {
                what: "feedback gain",
                ..
            }
        ));
    }

    #[test]
    fn deserializes_from_nested_rows() {
        let json = r#"{
            "gains": [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]],
            "scales": [[1.0, 1.0, 1.0, 1.0], [0.5, 0.5, 0.5, 0.5]]
        }"#;
        let fb: FeedbackGains = serde_json::from_str(json).unwrap();
        assert_eq!(fb.effective()[1], [2.5, 3.0, 3.5, 4.0]);
    }
}
