//! Evenly spaced grids.

use crate::error::{OpsError, OpsResult};

/// Returns `num` evenly spaced values over the closed interval `[start, stop]`.
///
/// The first and last values are exactly `start` and `stop`.
///
/// # Errors
///
/// Returns [`OpsError::TooFewPoints`] when `num < 2`.
pub fn linspace(start: f64, stop: f64, num: usize) -> OpsResult<Vec<f64>> {
    if num < 2 {
        return Err(OpsError::TooFewPoints {
            minimum: 2,
            actual: num,
        });
    }

    let step = (stop - start) / (num - 1) as f64;
    let mut values: Vec<f64> = (0..num).map(|i| (i as f64).mul_add(step, start)).collect();
    // Pin the endpoint so rounding never leaves it short of `stop`
    values[num - 1] = stop;
    Ok(values)
}
