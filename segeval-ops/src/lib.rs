//! Numeric curve operations for segmentation evaluation
//!
//! This crate provides the slice-level operations that precision-recall
//! processing needs but that are not available for plain host buffers:
//! evenly spaced grids, strict linear interpolation, trapezoidal integration,
//! first-occurrence argmax and column-wise running moments.

mod error;
mod grid;
mod integrate;
mod interp;
mod reduce;

// Convenient re-exports
pub use error::{OpsError, OpsResult};
pub use grid::linspace;
pub use integrate::trapezoid;
pub use interp::{check_strictly_increasing, interp};
pub use reduce::{argmax_first, ColumnMoments};

/// Additional operations on `f64` slices.
pub trait SliceCurveOps {
    /// Linearly interpolates `self` (the node values) at `points`, using `nodes` as x-axis.
    fn interp_at(&self, nodes: &[f64], points: &[f64]) -> OpsResult<Vec<f64>>;

    /// Index of the largest value, first occurrence on ties.
    fn argmax_first(&self) -> Option<usize>;
}

impl SliceCurveOps for [f64] {
    fn interp_at(&self, nodes: &[f64], points: &[f64]) -> OpsResult<Vec<f64>> {
        interp(points, nodes, self)
    }

    fn argmax_first(&self) -> Option<usize> {
        argmax_first(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_curve_ops() {
        let precision = vec![1.0, 0.5, 0.0];
        let recall = [0.0, 0.5, 1.0];

        let values = precision.interp_at(&recall, &[0.25, 0.75]).unwrap();
        assert_eq!(values, vec![0.75, 0.25]);
        assert_eq!(precision.argmax_first(), Some(0));
    }
}
