//! Piecewise-linear interpolation without extrapolation.

use core::cmp::Ordering;

use crate::error::{OpsError, OpsResult};

/// Checks that `values` is strictly increasing.
///
/// # Errors
///
/// Returns [`OpsError::NotStrictlyIncreasing`] with the first offending index.
pub fn check_strictly_increasing(values: &[f64]) -> OpsResult<()> {
    match values
        .windows(2)
        .position(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less))
    {
        Some(i) => Err(OpsError::NotStrictlyIncreasing { index: i + 1 }),
        None => Ok(()),
    }
}

/// Evaluates the piecewise-linear function through `(xp, fp)` at every point of `x`.
///
/// Points that coincide with a node return the node value exactly.
///
/// # Errors
///
/// - [`OpsError::LengthMismatch`] if `xp` and `fp` differ in length.
/// - [`OpsError::TooFewPoints`] if fewer than two nodes are given.
/// - [`OpsError::NotStrictlyIncreasing`] if `xp` has repeated or decreasing values.
/// - [`OpsError::OutOfDomain`] if any `x` lies outside `[xp[0], xp[last]]`.
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> OpsResult<Vec<f64>> {
    if xp.len() != fp.len() {
        return Err(OpsError::LengthMismatch {
            expected: xp.len(),
            actual: fp.len(),
        });
    }
    if xp.len() < 2 {
        return Err(OpsError::TooFewPoints {
            minimum: 2,
            actual: xp.len(),
        });
    }
    check_strictly_increasing(xp)?;

    let min = xp[0];
    let max = xp[xp.len() - 1];

    x.iter()
        .map(|&value| {
            if !(min..=max).contains(&value) {
                return Err(OpsError::OutOfDomain { value, min, max });
            }

            // First node that is >= value; always exists since value <= max
            let i = xp.partition_point(|&node| node < value);
            if xp[i] == value {
                return Ok(fp[i]);
            }

            let (x0, x1) = (xp[i - 1], xp[i]);
            let (y0, y1) = (fp[i - 1], fp[i]);
            let t = (value - x0) / (x1 - x0);
            Ok(t.mul_add(y1 - y0, y0))
        })
        .collect()
}
