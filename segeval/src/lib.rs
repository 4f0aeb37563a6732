//! # segeval
//!
//! Precision-recall evaluation of image segmentation outputs.
//!
//! Given per-pixel probabilistic predictions, binarized predictions and binary
//! ground truth, this crate builds a deduplicated precision-recall curve per
//! sample, picks the best-F1 operating threshold, and aggregates many curves
//! into a mean curve with standard-deviation bands on a shared recall grid.
//!
//! ## Components
//!
//! - [`MetricAccumulator`]: running mean of one scalar metric
//! - [`ProbabilisticRecord`] / [`BinarizedRecord`]: the two evaluation modalities,
//!   both exposed through the [`MetricRecord`] capability
//! - [`evaluate`]: the curve processor for one sample
//! - [`aggregate`]: the curve aggregator for a train/test configuration
//!
//! ## Usage
//!
//! ```rust
//! use segeval::{aggregate, evaluate, EvaluationConfig, SampleArrays};
//!
//! # fn main() -> segeval::EvalResult<()> {
//! let sample = SampleArrays::new(
//!     vec![0.9, 0.8, 0.1, 0.2],
//!     vec![true, true, false, false],
//!     vec![true, true, false, false],
//! )?;
//! let evaluation = evaluate(&sample)?;
//! assert_eq!(evaluation.probabilistic.f1score.mean(), 1.0);
//!
//! let config = EvaluationConfig::new();
//! let curves = aggregate(&[evaluation.curve], &config)?;
//! assert_eq!(curves.mean.recall().len(), 1000);
//! # Ok(())
//! # }
//! ```
//!
//! All operations are pure functions over in-memory arrays; they hold no shared
//! state and may be called from any number of worker threads at once.

mod config;
mod curve;
mod error;
mod input;
mod metrics;

pub use config::{EvaluationConfig, GridSpec, RecallGrid};
pub use curve::{
    aggregate, best_f1_index, evaluate, f1_scores, AggregateCurves, Curve, CurvePoint,
    SampleEvaluation,
};
pub use error::{EvalError, EvalResult};
pub use input::{SampleArrays, SegmentationInput};
pub use metrics::{
    BinarizedRecord, BinaryConfusion, EvaluationSummary, MetricAccumulator, MetricKind,
    MetricRecord, Observation, ProbabilisticRecord, RecordSummary,
};

#[cfg(test)]
mod tests;
