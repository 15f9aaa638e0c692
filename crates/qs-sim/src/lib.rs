//! Time integration of the quiet-standing model.
//!
//! Provides:
//! - `TransientModel` trait for pluggable dynamic systems
//! - Fixed-step RK4 and forward Euler integrators
//! - Platform acceleration signals (sum of sines, sampled, constant)
//! - Closed-loop quiet-standing model driven by a specified input
//! - Synthetic noisy measurements and indirect (shooting) gain identification

pub mod error;
pub mod input;
pub mod integrator;
pub mod measured;
pub mod model;
pub mod shooting;
pub mod sim;
pub mod standing;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use input::{ConstantInput, SampledInput, SpecifiedInput, SumOfSines, ZeroInput};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use measured::{MeasuredData, MeasurementNoise};
pub use model::TransientModel;
pub use shooting::{ShootingConfig, ShootingResult, identify_gains_shooting};
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim};
pub use standing::QuietStandingModel;
