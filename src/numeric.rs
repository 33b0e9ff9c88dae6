//! Floating point comparison helpers, thin wrappers around the `approx` crate.

use approx::AbsDiffEq;

use crate::error::SeirvError;

/// Relative tolerance used when checking that a trajectory conserves its population.
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Tolerance used when deciding whether `horizon / dt` is a whole number of steps.
pub const STEP_RATIO_TOLERANCE: f64 = 1e-9;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}

/// Compares two floats via `approx::relative_eq!` with a maximum relative difference of
/// `max_relative`.
#[must_use]
pub fn relative_eq(a: f64, b: f64, max_relative: f64) -> bool {
    approx::relative_eq!(a, b, max_relative = max_relative)
}

/// Largest number of steps a single run may take. A trajectory point is 48 bytes, so this caps a
/// trajectory at roughly 480 MB.
pub const MAX_STEPS: usize = 10_000_000;

/// Number of fixed steps of size `dt` needed to reach `horizon`, i.e. `ceil(horizon / dt)`.
///
/// Ratios within [`STEP_RATIO_TOLERANCE`] of an integer are rounded to that integer so that
/// e.g. `50.0 / 0.1` yields 500 steps rather than 501.
///
/// # Errors
///
/// Returns `SeirvError::InvalidParameter` if `horizon / dt` is not finite or needs more than
/// [`MAX_STEPS`] steps.
pub fn step_count(horizon: f64, dt: f64) -> Result<usize, SeirvError> {
    let ratio = horizon / dt;
    #[allow(clippy::cast_precision_loss)]
    let max_ratio = MAX_STEPS as f64;
    if !ratio.is_finite() || ratio > max_ratio {
        return Err(SeirvError::InvalidParameter(format!(
            "horizon {horizon} with dt {dt} needs more than {MAX_STEPS} steps"
        )));
    }
    let nearest = ratio.round();
    let steps = if relative_eq(ratio, nearest, STEP_RATIO_TOLERANCE) {
        nearest
    } else {
        ratio.ceil()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = steps as usize;
    Ok(steps.clamp(1, MAX_STEPS))
}
