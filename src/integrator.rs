//! Fixed-step explicit integration schemes.
//!
//! Both schemes advance all five compartments together with the same step size. Each is a
//! linear combination of derivative evaluations, and every SEIRV derivative sums to zero across
//! compartments, so the total population is conserved up to rounding (before clamping).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::log::trace;
use crate::state::SimulationState;

#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
pub enum IntegrationMethod {
    /// Forward Euler, `y + dt * f(y)`. With `dt = 1` this is the week-by-week difference update.
    #[serde(rename = "euler")]
    #[value(name = "euler")]
    #[strum(to_string = "euler")]
    Euler,
    /// Classic fourth-order Runge-Kutta.
    #[default]
    #[serde(rename = "rk4")]
    #[value(name = "rk4")]
    #[strum(to_string = "rk4")]
    RungeKutta4,
}

/// Advances `state` by `dt` using `method`, where `f` evaluates the derivative at a state.
///
/// The returned state is unclamped; callers decide what to do with negative compartments.
pub fn step<F>(method: IntegrationMethod, state: &SimulationState, dt: f64, f: F) -> SimulationState
where
    F: Fn(&SimulationState) -> SimulationState,
{
    let next = match method {
        IntegrationMethod::Euler => *state + f(state) * dt,
        IntegrationMethod::RungeKutta4 => {
            let k1 = f(state);
            let k2 = f(&(*state + k1 * (0.5 * dt)));
            let k3 = f(&(*state + k2 * (0.5 * dt)));
            let k4 = f(&(*state + k3 * dt));
            *state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
        }
    };
    trace!("{method} step dt={dt}: {state:?} -> {next:?}");
    next
}
