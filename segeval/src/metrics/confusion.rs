//! Binary confusion counts between a predicted mask and ground truth.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Pixel counts of a binary prediction against binary ground truth.
///
/// All ratios return `0.0` when their denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfusion {
    /// Predicted positive and truly positive.
    pub true_positives: usize,
    /// Predicted positive but truly negative.
    pub false_positives: usize,
    /// Predicted negative but truly positive.
    pub false_negatives: usize,
    /// Predicted negative and truly negative.
    pub true_negatives: usize,
}

impl BinaryConfusion {
    /// Counts `prediction` against `ground_truth`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::LengthMismatch`] if the masks differ in length.
    pub fn from_masks(ground_truth: &[bool], prediction: &[bool]) -> EvalResult<Self> {
        if ground_truth.len() != prediction.len() {
            return Err(EvalError::LengthMismatch {
                context: "mask prediction vs ground truth",
                expected: ground_truth.len(),
                actual: prediction.len(),
            });
        }

        let mut counts = Self::default();
        for (&actual, &predicted) in ground_truth.iter().zip(prediction) {
            match (predicted, actual) {
                (true, true) => counts.true_positives += 1,
                (true, false) => counts.false_positives += 1,
                (false, true) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        Ok(counts)
    }

    /// Counts the probabilistic `prediction` binarized at `prediction >= threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::LengthMismatch`] if the arrays differ in length.
    pub fn at_threshold(
        ground_truth: &[bool],
        prediction: &[f32],
        threshold: f64,
    ) -> EvalResult<Self> {
        let binarized: Vec<bool> = prediction
            .iter()
            .map(|&p| f64::from(p) >= threshold)
            .collect();
        Self::from_masks(ground_truth, &binarized)
    }

    /// Total number of pixels counted.
    pub const fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// TP / (TP + FP).
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN).
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// |A ∩ B| / |A ∪ B|.
    pub fn iou(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    /// 2|A ∩ B| / (|A| + |B|), which equals the F1-score of the mask.
    pub fn dice(&self) -> f64 {
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    /// (TP + TN) / total.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
