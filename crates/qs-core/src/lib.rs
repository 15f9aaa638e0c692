//! qs-core: shared foundation for the quiet-standing workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float and slice-shape helpers)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{QsError, QsResult};
pub use numeric::*;
pub use units::*;
