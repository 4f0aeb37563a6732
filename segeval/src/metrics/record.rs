//! Evaluation records: fixed, named groups of metric accumulators.
//!
//! A record is created once per evaluated sample and read after it has been
//! populated. The [`MetricRecord`] trait is the shared capability of both
//! modalities: an ordered sequence of named accumulators.

use serde::{Deserialize, Serialize};

use super::{
    accumulator::MetricAccumulator,
    kind::{MetricKind, Observation},
};
use crate::error::EvalResult;

/// An ordered, named collection of metric accumulators.
pub trait MetricRecord {
    /// Name of the evaluation modality this record represents.
    const MODALITY: &'static str;

    /// The accumulators in their fixed order.
    fn metrics(&self) -> Vec<&MetricAccumulator>;

    /// Mutable access to the accumulators, in the same order as [`Self::metrics`].
    fn metrics_mut(&mut self) -> Vec<&mut MetricAccumulator>;

    /// `(name, running mean)` for every accumulator.
    fn means(&self) -> Vec<(&'static str, f64)> {
        self.metrics()
            .into_iter()
            .map(|metric| (metric.name(), metric.mean()))
            .collect()
    }

    /// Computes every accumulator from the same observation.
    ///
    /// # Errors
    ///
    /// Stops at the first accumulator that cannot consume `observation`.
    fn compute_all(&mut self, observation: Observation<'_>) -> EvalResult<()> {
        for metric in self.metrics_mut() {
            metric.compute_and_update(observation)?;
        }
        Ok(())
    }
}

/// Metrics of a probabilistic prediction at its best-F1 operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticRecord {
    /// F1-score at the selected threshold.
    pub f1score: MetricAccumulator,
    /// Precision at the selected threshold.
    pub precision: MetricAccumulator,
    /// Recall at the selected threshold.
    pub recall: MetricAccumulator,
    /// IoU of the prediction binarized at the selected threshold.
    pub iou: MetricAccumulator,
    /// Area under the deduplicated precision-recall curve.
    pub auc: MetricAccumulator,
}

impl ProbabilisticRecord {
    /// Creates an empty record.
    pub const fn new() -> Self {
        Self {
            f1score: MetricAccumulator::new(MetricKind::F1),
            precision: MetricAccumulator::new(MetricKind::Precision),
            recall: MetricAccumulator::new(MetricKind::Recall),
            iou: MetricAccumulator::new(MetricKind::Iou),
            auc: MetricAccumulator::new(MetricKind::Auc),
        }
    }
}

impl Default for ProbabilisticRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRecord for ProbabilisticRecord {
    const MODALITY: &'static str = "probabilistic";

    fn metrics(&self) -> Vec<&MetricAccumulator> {
        vec![
            &self.f1score,
            &self.precision,
            &self.recall,
            &self.iou,
            &self.auc,
        ]
    }

    fn metrics_mut(&mut self) -> Vec<&mut MetricAccumulator> {
        vec![
            &mut self.f1score,
            &mut self.precision,
            &mut self.recall,
            &mut self.iou,
            &mut self.auc,
        ]
    }
}

/// Metrics of a binarized prediction, computed directly against ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinarizedRecord {
    /// Precision of the binary mask.
    pub precision: MetricAccumulator,
    /// Recall of the binary mask.
    pub recall: MetricAccumulator,
    /// IoU of the binary mask.
    pub iou: MetricAccumulator,
    /// Dice coefficient of the binary mask.
    pub dice: MetricAccumulator,
}

impl BinarizedRecord {
    /// Creates an empty record.
    pub const fn new() -> Self {
        Self {
            precision: MetricAccumulator::new(MetricKind::Precision),
            recall: MetricAccumulator::new(MetricKind::Recall),
            iou: MetricAccumulator::new(MetricKind::Iou),
            dice: MetricAccumulator::new(MetricKind::Dice),
        }
    }
}

impl Default for BinarizedRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRecord for BinarizedRecord {
    const MODALITY: &'static str = "binarized";

    fn metrics(&self) -> Vec<&MetricAccumulator> {
        vec![&self.precision, &self.recall, &self.iou, &self.dice]
    }

    fn metrics_mut(&mut self) -> Vec<&mut MetricAccumulator> {
        vec![
            &mut self.precision,
            &mut self.recall,
            &mut self.iou,
            &mut self.dice,
        ]
    }
}
