//! Scalar metrics for segmentation evaluation.
//!
//! This module implements the running metric accumulators and the two
//! evaluation records (probabilistic and binarized) they are grouped into.

// Module declarations
pub mod accumulator;
pub mod confusion;
pub mod kind;
pub mod record;
pub mod summary;

// Re-export main types and traits
pub use accumulator::MetricAccumulator;
pub use confusion::BinaryConfusion;
pub use kind::{MetricKind, Observation};
pub use record::{BinarizedRecord, MetricRecord, ProbabilisticRecord};
pub use summary::{EvaluationSummary, RecordSummary};
