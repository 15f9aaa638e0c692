//! Simulation runner and result recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-2,
            t_end: 10.0,
            max_steps: 1_000_000,
            record_every: 1,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }

    /// Steps needed to reach `t_end`, before the `max_steps` cap.
    fn steps_to_end(&self) -> usize {
        // Shave a hair off so t_end = k*dt does not round up to k+1 steps.
        ((self.t_end / self.dt) * (1.0 - 1e-12)).ceil() as usize
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
}

impl<S> SimRecord<S> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Final recorded time and state.
    pub fn last(&self) -> Option<(f64, &S)> {
        self.t.last().copied().zip(self.x.last())
    }
}

/// Run a fixed-step transient simulation from `t = 0`.
///
/// Step `k` lands exactly on `k * dt`. The initial and final states are
/// always recorded; in between every `record_every`-th step is kept.
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    opts.validate()?;

    let wanted = opts.steps_to_end();
    let steps = wanted.min(opts.max_steps);
    if steps < wanted {
        warn!(
            wanted,
            max_steps = opts.max_steps,
            "step limit reached before t_end"
        );
    }
    debug!(
        dt = opts.dt,
        t_end = opts.t_end,
        steps,
        integrator = ?opts.integrator,
        "starting transient run"
    );

    let mut t = 0.0;
    let mut x = model.initial_state();

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];

    for step in 1..=steps {
        x = match opts.integrator {
            IntegratorType::RK4 => RK4.step(model, t, &x, opts.dt),
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, &x, opts.dt),
        }
        .inspect_err(|e| warn!(t, error = %e, "integration step failed"))?;
        t = step as f64 * opts.dt;

        if step % opts.record_every == 0 || step == steps {
            trace!(step, t, "recorded");
            t_record.push(t);
            x_record.push(x.clone());
        }
    }

    debug!(steps, t_final = t, records = t_record.len(), "transient run complete");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}
