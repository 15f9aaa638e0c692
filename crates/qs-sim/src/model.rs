//! Models the fixed-step runner can advance.

use crate::error::SimResult;

/// A continuous-time system `ẋ = f(t, x)` advanced by [`crate::run_sim`].
///
/// The derivative is returned in the state type itself, so the integrators
/// only need `add` and `scale` to form their stages. For the standing model
/// the state is [`qs_dynamics::State`] and the derivative of a joint angle
/// lands in the angle slot.
pub trait TransientModel {
    type State: Clone;

    /// State at `t = 0`.
    fn initial_state(&self) -> Self::State;

    /// Right-hand side at `(t, x)`.
    ///
    /// Takes `&mut self` so a model can keep per-call bookkeeping. Errors
    /// (a singular mass matrix or a non-finite derivative surfacing as
    /// [`crate::SimError::Dynamics`]) abort the step and the run.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// `a + b`, component-wise.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `scale * a`.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
