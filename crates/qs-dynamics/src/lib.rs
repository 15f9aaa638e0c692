//! Right-hand side of the quiet-standing inverted double pendulum.
//!
//! The model is a leg hinged at the ankle on a horizontally accelerating
//! platform, with a trunk hinged at the hip. Two linear state-feedback
//! channels act as ankle and hip torques. The 2×2 mass matrix was inverted
//! symbolically ahead of time, so an evaluation is a fixed sequence of
//! scalar operations with no allocation and no iterative solve.
//!
//! Provides:
//! - typed constants ([`PhysicalParams`] + [`FeedbackGains`]) and state
//! - [`DynamicsEvaluator`]: validated once, evaluated many times
//! - flat-buffer entry points for callers that hold positional arrays
//! - rayon-backed batch evaluation for many independent trajectories

pub mod batch;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod mass;
pub mod params;
pub mod state;

pub use constants::{Constants, NUM_CONSTANTS};
pub use error::{DynamicsError, DynamicsResult};
pub use evaluator::{DynamicsEvaluator, SINGULARITY_RTOL, evaluate_into, evaluate_raw};
pub use mass::MassMatrix;
pub use params::PhysicalParams;
pub use qs_controls::FeedbackGains;
pub use state::{NUM_STATES, State, StateDerivative};
