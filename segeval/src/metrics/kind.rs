//! Metric kinds and the observations they are computed from.

use core::fmt;

use segeval_ops::trapezoid;
use serde::{Deserialize, Serialize};

use super::confusion::BinaryConfusion;
use crate::error::{EvalError, EvalResult};

/// The scalar metrics an accumulator can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    /// Harmonic mean of precision and recall.
    F1,
    /// Fraction of predicted positives that are truly positive.
    Precision,
    /// Fraction of true positives that are predicted positive.
    Recall,
    /// Intersection over union of the positive sets.
    Iou,
    /// Dice coefficient of the positive sets.
    Dice,
    /// Area under the precision-recall curve.
    Auc,
}

/// Data a metric is computed from.
#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    /// A binary prediction against binary ground truth.
    Masks {
        /// Reference mask.
        ground_truth: &'a [bool],
        /// Measured mask.
        prediction: &'a [bool],
    },
    /// A precision-recall curve ordered by recall.
    Curve {
        /// Recall values (x-axis).
        recall: &'a [f64],
        /// Precision values (y-axis).
        precision: &'a [f64],
    },
}

impl<'a> Observation<'a> {
    /// Shorthand for [`Observation::Masks`].
    pub const fn masks(ground_truth: &'a [bool], prediction: &'a [bool]) -> Self {
        Self::Masks {
            ground_truth,
            prediction,
        }
    }

    /// Shorthand for [`Observation::Curve`].
    pub const fn curve(recall: &'a [f64], precision: &'a [f64]) -> Self {
        Self::Curve { recall, precision }
    }
}

impl MetricKind {
    /// Short name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::F1 => "f1score",
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::Iou => "iou",
            Self::Dice => "dice",
            Self::Auc => "auc",
        }
    }

    /// Computes this metric from `observation`.
    ///
    /// Mask observations feed F1, precision, recall, IoU and Dice; curve
    /// observations feed AUC, integrated in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidObservation`] if the observation does not fit
    /// the metric, and length errors for misaligned inputs.
    pub fn compute(self, observation: Observation<'_>) -> EvalResult<f64> {
        match observation {
            Observation::Curve { recall, precision } => match self {
                Self::Auc => Ok(trapezoid(recall, precision)?),
                _ => Err(EvalError::InvalidObservation {
                    metric: self.name(),
                    reason: "mask metrics need a ground truth and a prediction mask".to_owned(),
                }),
            },
            Observation::Masks {
                ground_truth,
                prediction,
            } => {
                let counts = BinaryConfusion::from_masks(ground_truth, prediction)?;
                match self {
                    Self::F1 | Self::Dice => Ok(counts.dice()),
                    Self::Precision => Ok(counts.precision()),
                    Self::Recall => Ok(counts.recall()),
                    Self::Iou => Ok(counts.iou()),
                    Self::Auc => Err(EvalError::InvalidObservation {
                        metric: self.name(),
                        reason: "area under the curve needs a precision-recall curve".to_owned(),
                    }),
                }
            }
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
