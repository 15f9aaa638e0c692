//! Fixed-step explicit integrators.
//!
//! Both schemes evaluate the right-hand side at the stage times they need
//! and propagate the first model error unchanged. No step-size control: the
//! runner owns `dt`.

use crate::error::SimResult;
use crate::model::TransientModel;

/// One explicit step `x(t) -> x(t + dt)`.
pub trait Integrator {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical fourth-order Runge-Kutta.
///
/// Stages sit at `t`, `t + dt/2` (twice) and `t + dt`, so a time-varying
/// platform input is sampled at the half step as well.
#[derive(Clone, Copy, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let half = 0.5 * dt;

        let k1 = model.rhs(t, x)?;
        let x2 = model.add(x, &model.scale(&k1, half));
        let k2 = model.rhs(t + half, &x2)?;
        let x3 = model.add(x, &model.scale(&k2, half));
        let k3 = model.rhs(t + half, &x3)?;
        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        let inner = model.add(&k2, &k3);
        let weighted = model.add(&model.add(&k1, &k4), &model.scale(&inner, 2.0));
        Ok(model.add(x, &model.scale(&weighted, dt / 6.0)))
    }
}

/// First-order explicit Euler, one right-hand side call per step.
#[derive(Clone, Copy, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}
