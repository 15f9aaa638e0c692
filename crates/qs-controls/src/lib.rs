//! Linear state-feedback primitives for the quiet-standing model.
//!
//! The standing controller is two independent channels (ankle and hip), each
//! a weighted sum of the four state components. Every weight is the product
//! of a gain and a paired scale/selector coefficient, so individual terms can
//! be switched off or tuned without touching the gain values.
//!
//! # Architecture
//!
//! - [`FeedbackGains`] holds the 2×4 gain and scale matrices and evaluates the
//!   law (`bias`) or the joint torques it produces (`torques`)
//! - [`identify_gains`] recovers the effective gain matrix from recorded
//!   state/torque trajectories by linear least squares

pub mod error;
pub mod gains;
pub mod identify;

pub use error::{ControlError, ControlResult};
pub use gains::{FeedbackGains, GainMatrix, NUM_CHANNELS, NUM_STATES};
pub use identify::{Identification, identify_gains};
