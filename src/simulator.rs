//! Runs the SEIRV model forward from an initial state and collects the trajectory.
//!
//! A run is a pure function of its [`Parameters`]: nothing is shared between runs, so concurrent
//! runs on different threads need no synchronization.

use crate::error::SeirvError;
use crate::integrator;
use crate::log::{debug, info, warn};
use crate::model::SeirvModel;
use crate::numeric::{relative_eq, step_count, CONSERVATION_TOLERANCE};
use crate::parameters::Parameters;
use crate::trajectory::{Trajectory, TrajectoryPoint};

/// Progress callbacks fire every this many steps, and once more after the final step.
pub const PROGRESS_CHUNK_STEPS: usize = 1000;

/// Integrates the SEIRV system described by `parameters`.
///
/// The returned trajectory has `ceil(horizon / dt) + 1` points, the first equal to
/// `parameters.initial` at t = 0 and the last at t = `horizon`. When `horizon` is not a
/// multiple of `dt` the final step is shortened to land exactly on the horizon.
///
/// Compartments pushed below zero by discretization error are clamped to zero. This is logged
/// and counted in [`Trajectory::clamped_steps`] but is not an error.
///
/// # Errors
///
/// - `SeirvError::InvalidParameter` if a rate is negative, `horizon` or `dt` is not positive,
///   the run needs more than [`crate::numeric::MAX_STEPS`] steps, or an initial compartment is
///   negative.
/// - `SeirvError::DegenerateState` if the initial population is zero.
///
/// No integration is attempted when validation fails.
pub fn simulate(parameters: &Parameters) -> Result<Trajectory, SeirvError> {
    simulate_with_progress(parameters, |_, _| {})
}

/// Like [`simulate`], but calls `on_progress(completed_steps, total_steps)` every
/// [`PROGRESS_CHUNK_STEPS`] steps and after the last step.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_with_progress<F>(
    parameters: &Parameters,
    mut on_progress: F,
) -> Result<Trajectory, SeirvError>
where
    F: FnMut(usize, usize),
{
    parameters.validate()?;

    let population = parameters.population();
    let model = SeirvModel::new(parameters.rates, population);
    let steps = step_count(parameters.horizon, parameters.dt)?;
    info!(
        "Simulating {} {} steps of dt={} to t={} (N={}, R0={:.3})",
        steps,
        parameters.method,
        parameters.dt,
        parameters.horizon,
        population,
        parameters.rates.r0()
    );

    let mut points = Vec::with_capacity(steps + 1);
    let mut state = parameters.initial;
    let mut time = 0.0;
    points.push(TrajectoryPoint { time, state });

    let mut clamped_steps = 0;
    for k in 1..=steps {
        #[allow(clippy::cast_precision_loss)]
        let next_time = if k == steps {
            parameters.horizon
        } else {
            k as f64 * parameters.dt
        };
        let dt = next_time - time;
        state = integrator::step(parameters.method, &state, dt, |y| model.derivatives(y));
        time = next_time;

        let clamped = state.clamp_negative();
        if !clamped.is_empty() {
            clamped_steps += 1;
            debug!("Clamped {:?} to zero at t={}", clamped, time);
        }
        points.push(TrajectoryPoint { time, state });

        if k % PROGRESS_CHUNK_STEPS == 0 || k == steps {
            on_progress(k, steps);
        }
    }

    if clamped_steps > 0 {
        warn!(
            "{} of {} steps produced a negative compartment that was clamped to zero; \
             dt={} is too large for these rates",
            clamped_steps, steps, parameters.dt
        );
    }

    let final_population = state.total();
    if !relative_eq(final_population, population, CONSERVATION_TOLERANCE) {
        debug!(
            "Population drifted from {} to {} over the run",
            population, final_population
        );
    }

    Ok(Trajectory::new(points, clamped_steps))
}
