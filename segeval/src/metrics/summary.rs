//! Per-configuration reduction of per-sample evaluation records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{BinarizedRecord, MetricRecord, ProbabilisticRecord};

/// Per-sample means of every metric of one modality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Metric name to one value per sample, in sample order.
    pub metrics: BTreeMap<String, Vec<f64>>,
}

impl RecordSummary {
    /// Appends the running means of `record` as one more sample.
    pub fn push<R: MetricRecord>(&mut self, record: &R) {
        for (name, mean) in record.means() {
            self.metrics.entry(name.to_owned()).or_default().push(mean);
        }
    }

    /// Values of one metric across samples.
    pub fn values(&self, metric: &str) -> Option<&[f64]> {
        self.metrics.get(metric).map(Vec::as_slice)
    }

    /// Mean of one metric across samples; `None` if unknown or empty.
    pub fn mean(&self, metric: &str) -> Option<f64> {
        let values = self.values(metric)?;
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Mean of every metric across samples.
    pub fn means(&self) -> BTreeMap<String, f64> {
        self.metrics
            .keys()
            .filter_map(|name| Some((name.clone(), self.mean(name)?)))
            .collect()
    }
}

/// Metric values of every sample in one train/test configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Sample identifiers, aligned with every metric vector.
    pub samples: Vec<String>,
    /// Probabilistic-modality metrics.
    pub probabilistic: RecordSummary,
    /// Binarized-modality metrics.
    pub binarized: RecordSummary,
}

impl EvaluationSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluated sample.
    pub fn push(
        &mut self,
        sample: impl Into<String>,
        probabilistic: &ProbabilisticRecord,
        binarized: &BinarizedRecord,
    ) {
        self.samples.push(sample.into());
        self.probabilistic.push(probabilistic);
        self.binarized.push(binarized);
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The summary of one modality by name.
    pub fn modality(&self, name: &str) -> Option<&RecordSummary> {
        if name == ProbabilisticRecord::MODALITY {
            Some(&self.probabilistic)
        } else if name == BinarizedRecord::MODALITY {
            Some(&self.binarized)
        } else {
            None
        }
    }
}
