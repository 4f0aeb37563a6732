//! Precision-recall curves: the per-sample processor and the aggregator.

mod aggregator;
mod processor;

pub use aggregator::{aggregate, AggregateCurves};
pub use processor::{evaluate, SampleEvaluation};
use segeval_ops::argmax_first;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// A single (recall, precision) operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub recall: f64,
    pub precision: f64,
}

impl CurvePoint {
    pub const fn new(recall: f64, precision: f64) -> Self {
        Self { recall, precision }
    }

    /// Harmonic mean of the two coordinates, `0.0` when both are zero.
    pub fn f1(&self) -> f64 {
        f1_score(self.precision, self.recall)
    }
}

/// A precision-recall curve ordered by recall.
///
/// Recall, precision, F1 and (when present) threshold sequences always have the
/// same length of at least two. A curve is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    recall: Vec<f64>,
    precision: Vec<f64>,
    threshold: Option<Vec<f64>>,
    f1: Vec<f64>,
    f1_point: Option<CurvePoint>,
    bin_point: Option<CurvePoint>,
}

impl Curve {
    /// Builds a curve from its sequences.
    ///
    /// F1 is derived from precision and recall when not supplied. A single-point
    /// curve is repaired to two points so that it always spans a recall range:
    /// a point with non-zero recall gets `(0, 0)` prepended, a point at zero
    /// recall becomes recall `[0, 1]` with precision `[p, 0]`. Thresholds follow
    /// the repair (`1.0` for a prepended point, `0.0` for an appended one) and a
    /// supplied F1 is recomputed.
    ///
    /// # Errors
    ///
    /// - [`EvalError::EmptyInput`] for empty sequences.
    /// - [`EvalError::LengthMismatch`] if the sequences differ in length.
    /// - [`EvalError::NonFiniteValue`] if recall or precision hold NaN or infinity.
    pub fn new(
        recall: Vec<f64>,
        precision: Vec<f64>,
        threshold: Option<Vec<f64>>,
        f1: Option<Vec<f64>>,
    ) -> EvalResult<Self> {
        if recall.is_empty() {
            return Err(EvalError::EmptyInput {
                context: "curve recall",
            });
        }
        check_len("curve precision", recall.len(), precision.len())?;
        if let Some(threshold) = &threshold {
            check_len("curve threshold", recall.len(), threshold.len())?;
        }
        if let Some(f1) = &f1 {
            check_len("curve f1", recall.len(), f1.len())?;
        }
        check_finite("curve recall", &recall)?;
        check_finite("curve precision", &precision)?;

        let (recall, precision, threshold, f1) = if recall.len() == 1 {
            let (recall, precision, threshold) = repair_single_point(recall[0], precision[0], threshold);
            tracing::debug!(?recall, ?precision, "repaired single-point curve");
            (recall, precision, threshold, None)
        } else {
            (recall, precision, threshold, f1)
        };
        let f1 = f1.unwrap_or_else(|| f1_scores(&precision, &recall));

        Ok(Self {
            recall,
            precision,
            threshold,
            f1,
            f1_point: None,
            bin_point: None,
        })
    }

    /// Attaches the best-F1 marker.
    #[must_use]
    pub fn with_f1_point(mut self, point: CurvePoint) -> Self {
        self.f1_point = Some(point);
        self
    }

    /// Attaches the marker of the binarized prediction.
    #[must_use]
    pub fn with_bin_point(mut self, point: Option<CurvePoint>) -> Self {
        self.bin_point = point;
        self
    }

    pub fn recall(&self) -> &[f64] {
        &self.recall
    }

    pub fn precision(&self) -> &[f64] {
        &self.precision
    }

    /// Probability thresholds, for curves built from a prediction.
    pub fn threshold(&self) -> Option<&[f64]> {
        self.threshold.as_deref()
    }

    pub fn f1(&self) -> &[f64] {
        &self.f1
    }

    /// Recall and precision at the best-F1 threshold.
    pub fn f1_point(&self) -> Option<CurvePoint> {
        self.f1_point
    }

    /// Recall and precision achieved by the binarized prediction.
    pub fn bin_point(&self) -> Option<CurvePoint> {
        self.bin_point
    }

    /// Number of points; at least two.
    pub fn len(&self) -> usize {
        self.recall.len()
    }

    /// Always false; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.recall.is_empty()
    }

    /// Iterates the curve as (recall, precision) points.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        self.recall
            .iter()
            .zip(&self.precision)
            .map(|(&recall, &precision)| CurvePoint::new(recall, precision))
    }
}

fn repair_single_point(
    recall: f64,
    precision: f64,
    threshold: Option<Vec<f64>>,
) -> (Vec<f64>, Vec<f64>, Option<Vec<f64>>) {
    if recall != 0.0 {
        let threshold = threshold.map(|t| vec![1.0, t[0]]);
        (vec![0.0, recall], vec![0.0, precision], threshold)
    } else {
        let threshold = threshold.map(|t| vec![t[0], 0.0]);
        (vec![0.0, 1.0], vec![precision, 0.0], threshold)
    }
}

fn check_len(context: &'static str, expected: usize, actual: usize) -> EvalResult<()> {
    if expected != actual {
        return Err(EvalError::LengthMismatch {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_finite(context: &'static str, values: &[f64]) -> EvalResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(EvalError::NonFiniteValue { context, index }),
        None => Ok(()),
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    let denominator = precision + recall;
    if denominator == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / denominator
    }
}

/// Elementwise F1 of aligned precision and recall sequences.
///
/// 0/0 is normalized to `0.0`. Extra elements of the longer sequence are ignored.
pub fn f1_scores(precision: &[f64], recall: &[f64]) -> Vec<f64> {
    precision
        .iter()
        .zip(recall)
        .map(|(&p, &r)| f1_score(p, r))
        .collect()
}

/// Index of the maximum F1, the first one on ties.
pub fn best_f1_index(f1: &[f64]) -> Option<usize> {
    argmax_first(f1)
}
