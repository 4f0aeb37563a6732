//! Per-sample curve processing.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{best_f1_index, f1_scores, Curve, CurvePoint};
use crate::{
    error::{EvalError, EvalResult},
    input::SampleArrays,
    metrics::{BinarizedRecord, MetricRecord, Observation, ProbabilisticRecord},
};

/// Everything [`evaluate`] produces for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEvaluation {
    /// Best-F1 operating point, IoU at that threshold and AUC.
    pub probabilistic: ProbabilisticRecord,
    /// Metrics of the binarized prediction.
    pub binarized: BinarizedRecord,
    /// The deduplicated precision-recall curve with both markers.
    pub curve: Curve,
}

/// Evaluates one sample.
///
/// An all-zero probabilistic prediction has its first pixel set to `0.5` and an
/// all-false binarized prediction has its first pixel set, on local copies, so
/// the curve and IoU are never degenerate. The precision-recall curve is built
/// over every distinct probability plus an endpoint at threshold `1.0`, repeated
/// recall values are collapsed to their highest precision, and the best-F1
/// threshold drives the probabilistic record.
///
/// # Errors
///
/// Only propagates internal contract violations; every [`SampleArrays`] is
/// evaluable.
pub fn evaluate(sample: &SampleArrays) -> EvalResult<SampleEvaluation> {
    let ground_truth = sample.ground_truth();
    let prediction = repaired_prediction(sample.prediction());
    let binarized = repaired_binarized(sample.binarized());
    if matches!(prediction, Cow::Owned(_)) || matches!(binarized, Cow::Owned(_)) {
        tracing::debug!(pixels = sample.len(), "repaired empty prediction");
    }

    let pr = PrCurve::from_prediction(ground_truth, &prediction).deduplicated();
    tracing::trace!(points = pr.recall.len(), "built precision-recall curve");

    let f1 = f1_scores(&pr.precision, &pr.recall);
    let best = best_f1_index(&f1).ok_or(EvalError::EmptyInput {
        context: "precision-recall curve",
    })?;
    let threshold = pr.threshold[best];

    let mut probabilistic = ProbabilisticRecord::new();
    probabilistic.f1score.update(f1[best]);
    probabilistic.precision.update(pr.precision[best]);
    probabilistic.recall.update(pr.recall[best]);
    let at_best: Vec<bool> = prediction
        .iter()
        .map(|&p| f64::from(p) >= threshold)
        .collect();
    probabilistic
        .iou
        .compute_and_update(Observation::masks(ground_truth, &at_best))?;
    probabilistic
        .auc
        .compute_and_update(Observation::curve(&pr.recall, &pr.precision))?;

    let mut binarized_record = BinarizedRecord::new();
    binarized_record.compute_all(Observation::masks(ground_truth, &binarized))?;

    let f1_point = CurvePoint::new(pr.recall[best], pr.precision[best]);
    let bin_point = CurvePoint::new(
        binarized_record.recall.last()?,
        binarized_record.precision.last()?,
    );
    let curve = Curve::new(pr.recall, pr.precision, Some(pr.threshold), Some(f1))?
        .with_f1_point(f1_point)
        .with_bin_point(Some(bin_point));

    Ok(SampleEvaluation {
        probabilistic,
        binarized: binarized_record,
        curve,
    })
}

fn repaired_prediction(prediction: &[f32]) -> Cow<'_, [f32]> {
    if prediction.iter().all(|&p| p == 0.0) {
        let mut repaired = prediction.to_vec();
        if let Some(first) = repaired.first_mut() {
            *first = 0.5;
        }
        Cow::Owned(repaired)
    } else {
        Cow::Borrowed(prediction)
    }
}

fn repaired_binarized(binarized: &[bool]) -> Cow<'_, [bool]> {
    if binarized.iter().all(|&b| !b) {
        let mut repaired = binarized.to_vec();
        if let Some(first) = repaired.first_mut() {
            *first = true;
        }
        Cow::Owned(repaired)
    } else {
        Cow::Borrowed(binarized)
    }
}

/// Aligned precision-recall sequences in ascending-recall order.
#[derive(Debug)]
struct PrCurve {
    recall: Vec<f64>,
    precision: Vec<f64>,
    threshold: Vec<f64>,
}

impl PrCurve {
    /// Sweeps every distinct probability from highest to lowest.
    ///
    /// The first point is the endpoint at threshold `1.0` with recall `0` and
    /// precision `1`. Recall against an empty positive set is `0`.
    fn from_prediction(ground_truth: &[bool], prediction: &[f32]) -> Self {
        let positives = ground_truth.iter().filter(|&&g| g).count();

        let mut ranked: Vec<(f32, bool)> = prediction
            .iter()
            .copied()
            .zip(ground_truth.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut curve = Self {
            recall: vec![0.0],
            precision: vec![1.0],
            threshold: vec![1.0],
        };

        let (mut tp, mut fp) = (0usize, 0usize);
        for (i, &(score, positive)) in ranked.iter().enumerate() {
            if positive {
                tp += 1;
            } else {
                fp += 1;
            }
            // Emit once per distinct score, after its last occurrence
            if ranked.get(i + 1).is_some_and(|next| next.0 == score) {
                continue;
            }
            curve.recall.push(if positives == 0 {
                0.0
            } else {
                tp as f64 / positives as f64
            });
            curve.precision.push(tp as f64 / (tp + fp) as f64);
            curve.threshold.push(f64::from(score));
        }
        curve
    }

    /// Collapses runs of equal recall to the point with the highest precision,
    /// the first one on ties, leaving recall strictly increasing.
    fn deduplicated(self) -> Self {
        let mut out = Self {
            recall: Vec::with_capacity(self.recall.len()),
            precision: Vec::with_capacity(self.recall.len()),
            threshold: Vec::with_capacity(self.recall.len()),
        };

        let mut start = 0;
        while start < self.recall.len() {
            let recall = self.recall[start];
            let mut keep = start;
            let mut end = start + 1;
            while end < self.recall.len() && self.recall[end] == recall {
                if self.precision[end] > self.precision[keep] {
                    keep = end;
                }
                end += 1;
            }
            out.recall.push(recall);
            out.precision.push(self.precision[keep]);
            out.threshold.push(self.threshold[keep]);
            start = end;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample(prediction: &[f32], binarized: &[bool], ground_truth: &[bool]) -> SampleArrays {
        SampleArrays::new(prediction.to_vec(), binarized.to_vec(), ground_truth.to_vec()).unwrap()
    }

    #[test]
    fn pr_curve_sweeps_distinct_scores() {
        let gt = [true, false, true, false];
        let curve = PrCurve::from_prediction(&gt, &[0.9, 0.9, 0.4, 0.1]);

        assert_eq!(curve.threshold, [1.0, f64::from(0.9f32), f64::from(0.4f32), f64::from(0.1f32)]);
        assert_eq!(curve.recall, [0.0, 0.5, 1.0, 1.0]);
        assert_eq!(curve.precision, [1.0, 0.5, 2.0 / 3.0, 0.5]);
    }

    #[test]
    fn deduplication_keeps_highest_precision() {
        let curve = PrCurve {
            recall: vec![0.0, 0.0, 0.5, 1.0, 1.0, 1.0],
            precision: vec![1.0, 0.0, 0.8, 0.6, 0.7, 0.7],
            threshold: vec![1.0, 0.9, 0.7, 0.5, 0.3, 0.1],
        }
        .deduplicated();

        assert_eq!(curve.recall, [0.0, 0.5, 1.0]);
        assert_eq!(curve.precision, [1.0, 0.8, 0.7]);
        assert_eq!(curve.threshold, [1.0, 0.7, 0.3]);
    }

    #[test]
    fn evaluate_does_not_mutate_input() {
        let input = sample(&[0.0; 4], &[false; 4], &[true, false, false, false]);
        let evaluation = evaluate(&input).unwrap();

        assert!(input.prediction().iter().all(|&p| p == 0.0));
        assert!(input.binarized().iter().all(|&b| !b));
        // The repaired pixel is the only positive in both predictions
        assert_eq!(evaluation.probabilistic.iou.mean(), 1.0);
        assert_eq!(evaluation.binarized.dice.mean(), 1.0);
    }

    #[test]
    fn evaluate_records_best_threshold() {
        let input = sample(
            &[0.9, 0.6, 0.7, 0.2],
            &[true, false, true, false],
            &[true, true, false, false],
        );
        let evaluation = evaluate(&input).unwrap();
        let record = &evaluation.probabilistic;

        // Thresholds 0.9 -> (0.5, 1), 0.7 -> (0.5, 0.5), 0.6 -> (1, 2/3), 0.2 -> (1, 0.5)
        assert_relative_eq!(record.f1score.mean(), 0.8);
        assert_relative_eq!(record.precision.mean(), 2.0 / 3.0);
        assert_relative_eq!(record.recall.mean(), 1.0);
        assert_relative_eq!(record.iou.mean(), 2.0 / 3.0);

        let curve = &evaluation.curve;
        assert_eq!(curve.recall(), &[0.0, 0.5, 1.0]);
        assert_eq!(curve.threshold().map(<[f64]>::len), Some(3));
        assert_eq!(curve.f1_point(), Some(CurvePoint::new(1.0, 2.0 / 3.0)));
        assert_eq!(curve.bin_point(), Some(CurvePoint::new(0.5, 0.5)));
    }

    #[test]
    fn auc_uses_deduplicated_curve() {
        let input = sample(
            &[0.9, 0.6, 0.7, 0.2],
            &[true, false, true, false],
            &[true, true, false, false],
        );
        let evaluation = evaluate(&input).unwrap();
        // (0, 1) -> (0.5, 1) -> (1, 2/3)
        assert_relative_eq!(evaluation.probabilistic.auc.mean(), 0.5 + 0.5 * (1.0 + 2.0 / 3.0) / 2.0);
    }
}
