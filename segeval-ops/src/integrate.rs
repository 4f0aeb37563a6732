//! Numerical integration.

use crate::error::{OpsError, OpsResult};

/// Area under `(x, y)` by the trapezoidal rule, in the order the points are given.
///
/// A single point encloses no area and yields `0.0`.
///
/// # Errors
///
/// Returns [`OpsError::LengthMismatch`] if `x` and `y` differ in length and
/// [`OpsError::EmptyInput`] if both are empty.
pub fn trapezoid(x: &[f64], y: &[f64]) -> OpsResult<f64> {
    if x.len() != y.len() {
        return Err(OpsError::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.is_empty() {
        return Err(OpsError::EmptyInput);
    }

    let area = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Ok(area)
}
