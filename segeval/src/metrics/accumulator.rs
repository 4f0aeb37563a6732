//! Running statistic for one scalar metric.
//!
//! Uses the incremental mean update so that observations never need to be
//! stored.

use serde::{Deserialize, Serialize};

use super::kind::{MetricKind, Observation};
use crate::error::{EvalError, EvalResult};

/// Running mean and observation count of a single metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAccumulator {
    kind: MetricKind,
    mean: f64,
    count: usize,
    retain_last: bool,
    last: Option<f64>,
}

impl MetricAccumulator {
    /// Creates an accumulator that remembers its most recent observation.
    pub const fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            mean: 0.0,
            count: 0,
            retain_last: true,
            last: None,
        }
    }

    /// Creates an accumulator that keeps only the running mean.
    pub const fn mean_only(kind: MetricKind) -> Self {
        Self {
            retain_last: false,
            ..Self::new(kind)
        }
    }

    /// Folds one observation into the running mean.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
        if self.retain_last {
            self.last = Some(value);
        }
    }

    /// Computes this accumulator's metric from `observation` and folds it in.
    ///
    /// Returns the computed value.
    ///
    /// # Errors
    ///
    /// Propagates [`MetricKind::compute`] errors; the accumulator is left
    /// unchanged on error.
    pub fn compute_and_update(&mut self, observation: Observation<'_>) -> EvalResult<f64> {
        let value = self.kind.compute(observation)?;
        self.update(value);
        Ok(value)
    }

    /// The most recent observation, or the running mean if observations are not retained.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingObservation`] before the first update.
    pub fn last(&self) -> EvalResult<f64> {
        if self.count == 0 {
            return Err(EvalError::MissingObservation {
                metric: self.name(),
            });
        }
        Ok(self.last.unwrap_or(self.mean))
    }

    /// Running mean; `0.0` before the first update.
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Number of observations folded in.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The metric this accumulator computes.
    pub const fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Short metric name.
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Clears all observations.
    pub fn reset(&mut self) {
        self.mean = 0.0;
        self.count = 0;
        self.last = None;
    }
}
