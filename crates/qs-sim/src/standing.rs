//! Closed-loop quiet-standing model driven by platform acceleration.

use crate::error::SimResult;
use crate::input::SpecifiedInput;
use crate::model::TransientModel;
use crate::sim::SimRecord;
use qs_core::Real;
use qs_dynamics::{DynamicsEvaluator, State};

/// Leg/trunk pendulum on a moving platform with the feedback law closed.
///
/// The evaluator carries the constants; the input supplies the platform
/// acceleration at each right-hand-side call.
#[derive(Clone, Debug)]
pub struct QuietStandingModel<I> {
    evaluator: DynamicsEvaluator,
    input: I,
    initial: State,
}

impl<I: SpecifiedInput> QuietStandingModel<I> {
    /// Model starting upright and at rest.
    pub fn new(evaluator: DynamicsEvaluator, input: I) -> Self {
        Self {
            evaluator,
            input,
            initial: State::default(),
        }
    }

    pub fn with_initial_state(mut self, initial: State) -> Self {
        self.initial = initial;
        self
    }

    pub fn evaluator(&self) -> &DynamicsEvaluator {
        &self.evaluator
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Joint torques the feedback law applied along a recorded run.
    pub fn trajectory_torques(&self, record: &SimRecord<State>) -> Vec<[Real; 2]> {
        record
            .x
            .iter()
            .map(|x| self.evaluator.joint_torques(x))
            .collect()
    }

    /// Platform acceleration at each recorded time.
    pub fn trajectory_inputs(&self, record: &SimRecord<State>) -> Vec<Real> {
        record.t.iter().map(|&t| self.input.value(t)).collect()
    }
}

impl<I: SpecifiedInput> TransientModel for QuietStandingModel<I> {
    type State = State;

    fn initial_state(&self) -> State {
        self.initial
    }

    fn rhs(&mut self, t: f64, x: &State) -> SimResult<State> {
        let d = self.evaluator.evaluate(x, self.input.value(t))?;
        Ok(State::from(d.to_array()))
    }

    fn add(&self, a: &State, b: &State) -> State {
        State::new(
            a.theta_a + b.theta_a,
            a.theta_h + b.theta_h,
            a.omega_a + b.omega_a,
            a.omega_h + b.omega_h,
        )
    }

    fn scale(&self, a: &State, scale: f64) -> State {
        State::new(
            scale * a.theta_a,
            scale * a.theta_h,
            scale * a.omega_a,
            scale * a.omega_h,
        )
    }
}
