//! Batch evaluation of segmentation predictions.
//!
//! Discovers ground-truth masks, pairs them with every model's probabilistic
//! and binarised predictions, evaluates each sample in parallel and writes one
//! JSON report per (model, train dataset, test dataset).

pub mod config;
pub mod dataset;
pub mod report;
pub mod runner;

pub use config::{RunConfig, TEST_DATASETS, TRAIN_DATASETS};
pub use report::EvaluationReport;
pub use runner::Evaluator;
