//! Aggregation of many curves onto a shared recall grid.

use segeval_ops::{ColumnMoments, SliceCurveOps};
use serde::{Deserialize, Serialize};

use super::{best_f1_index, f1_scores, Curve, CurvePoint};
use crate::{
    config::GridSpec,
    error::{EvalError, EvalResult},
};

/// Mean curve with its one-standard-deviation band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCurves {
    /// Mean precision, with the best-F1 marker and the averaged binarized marker.
    pub mean: Curve,
    /// Mean minus standard deviation; no markers.
    pub lower: Curve,
    /// Mean plus standard deviation; no markers.
    pub upper: Curve,
}

/// Aggregates `curves` onto a recall grid.
///
/// `grid` is either a point count, materialized as an evenly spaced grid over
/// [0, 1], or an explicit [`RecallGrid`](crate::RecallGrid). Each curve's
/// precision is linearly interpolated at every grid point; the population mean
/// and standard deviation across curves give the three output curves.
///
/// # Errors
///
/// - [`EvalError::EmptyCurveSet`] if `curves` is empty.
/// - [`EvalError::InvalidConfiguration`] for a point count below two.
/// - [`EvalError::Ops`] if a curve's recall is not strictly increasing or
///   does not cover every grid point.
pub fn aggregate(curves: &[Curve], grid: impl Into<GridSpec>) -> EvalResult<AggregateCurves> {
    if curves.is_empty() {
        return Err(EvalError::EmptyCurveSet);
    }
    let grid = grid.into().materialize()?.into_points();
    tracing::trace!(curves = curves.len(), grid = grid.len(), "aggregating curves");

    let mut moments = ColumnMoments::new(grid.len());
    for curve in curves {
        let precision = curve.precision().interp_at(curve.recall(), &grid)?;
        moments.push(&precision)?;
    }
    let mean = moments.mean().to_vec();
    let std = moments.std()?;

    let f1 = f1_scores(&mean, &grid);
    let f1_point = best_f1_index(&f1).map(|best| CurvePoint::new(grid[best], mean[best]));
    let bin_point = mean_point(curves.iter().filter_map(Curve::bin_point));

    let lower = mean.iter().zip(&std).map(|(m, s)| m - s).collect();
    let upper = mean.iter().zip(&std).map(|(m, s)| m + s).collect();

    let mut mean = Curve::new(grid.clone(), mean, None, Some(f1))?.with_bin_point(bin_point);
    if let Some(point) = f1_point {
        mean = mean.with_f1_point(point);
    }

    Ok(AggregateCurves {
        mean,
        lower: Curve::new(grid.clone(), lower, None, None)?,
        upper: Curve::new(grid, upper, None, None)?,
    })
}

/// Running mean of the points, so that identical points average to themselves.
fn mean_point(points: impl Iterator<Item = CurvePoint>) -> Option<CurvePoint> {
    let mut mean: Option<CurvePoint> = None;
    for (i, point) in points.enumerate() {
        let n = (i + 1) as f64;
        let current = mean.get_or_insert(CurvePoint::new(0.0, 0.0));
        current.recall += (point.recall - current.recall) / n;
        current.precision += (point.precision - current.precision) / n;
    }
    mean
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use segeval_ops::OpsError;

    use super::*;
    use crate::config::RecallGrid;

    fn curve(recall: &[f64], precision: &[f64]) -> Curve {
        Curve::new(recall.to_vec(), precision.to_vec(), None, None).unwrap()
    }

    #[test]
    fn point_count_materializes_even_grid() {
        let curves = [curve(&[0.0, 1.0], &[1.0, 0.0])];
        let result = aggregate(&curves, 5).unwrap();

        assert_eq!(result.mean.recall(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_relative_eq!(result.mean.precision()[1], 0.75);
        assert_eq!(result.lower.len(), 5);
        assert!(result.lower.f1_point().is_none());
        assert!(result.upper.bin_point().is_none());
    }

    #[test]
    fn best_f1_is_located_on_mean_curve() {
        let curves = [curve(&[0.0, 1.0], &[1.0, 0.0])];
        let result = aggregate(&curves, 3).unwrap();
        // F1 on the grid: 0, 0.5, 0
        assert_eq!(result.mean.f1_point(), Some(CurvePoint::new(0.5, 0.5)));
        assert_relative_eq!(result.mean.f1()[1], 0.5);
    }

    #[test]
    fn binarized_markers_are_averaged() {
        let curves = [
            curve(&[0.0, 1.0], &[1.0, 0.0]).with_bin_point(Some(CurvePoint::new(0.2, 0.6))),
            curve(&[0.0, 1.0], &[1.0, 0.0]).with_bin_point(Some(CurvePoint::new(0.4, 0.8))),
            curve(&[0.0, 1.0], &[1.0, 0.0]),
        ];
        let marker = aggregate(&curves, 3).unwrap().mean.bin_point().unwrap();
        assert_relative_eq!(marker.recall, 0.3);
        assert_relative_eq!(marker.precision, 0.7);

        let without = [curve(&[0.0, 1.0], &[1.0, 0.0])];
        assert!(aggregate(&without, 3).unwrap().mean.bin_point().is_none());
    }

    #[test]
    fn explicit_grid_is_used_directly() {
        let grid = RecallGrid::from_points(vec![0.1, 0.9]).unwrap();
        let curves = [curve(&[0.0, 1.0], &[1.0, 0.0])];
        let result = aggregate(&curves, grid).unwrap();
        assert_eq!(result.mean.recall(), &[0.1, 0.9]);
        assert_relative_eq!(result.mean.precision()[0], 0.9);
        assert_relative_eq!(result.mean.precision()[1], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn empty_curve_set_is_rejected() {
        assert_eq!(aggregate(&[], 10), Err(EvalError::EmptyCurveSet));
    }

    #[test]
    fn partial_recall_coverage_is_rejected() {
        let curves = [curve(&[0.0, 0.5], &[1.0, 0.5])];
        match aggregate(&curves, 3) {
            Err(EvalError::Ops(OpsError::OutOfDomain { value, .. })) => assert_eq!(value, 1.0),
            _ => panic!("Expected OutOfDomain error"),
        }
    }

    #[test]
    fn repeated_recall_is_rejected() {
        let curves = [curve(&[0.0, 0.5, 0.5, 1.0], &[1.0, 0.8, 0.6, 0.4])];
        assert!(matches!(
            aggregate(&curves, 3),
            Err(EvalError::Ops(OpsError::NotStrictlyIncreasing { index: 2 }))
        ));
    }

    #[test]
    fn too_small_grid_is_rejected() {
        let curves = [curve(&[0.0, 1.0], &[1.0, 0.0])];
        assert!(matches!(
            aggregate(&curves, 1),
            Err(EvalError::InvalidConfiguration { .. })
        ));
    }
}
