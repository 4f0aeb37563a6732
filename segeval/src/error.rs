use segeval_ops::OpsError;
use thiserror::Error;

/// The error type for `segeval` operations.
///
/// Every variant is a caller contract violation. Degenerate-but-valid inputs
/// (all-background predictions, empty ground truth) are repaired instead and
/// never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Error for when two arrays that must be aligned have different lengths.
    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being compared.
        context: &'static str,
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },

    /// Error for when an input array is empty.
    #[error("Empty input: {context}")]
    EmptyInput {
        /// Which input was empty.
        context: &'static str,
    },

    /// Error for when a NaN or infinite value reaches curve construction.
    #[error("Non-finite value in {context} at index {index}")]
    NonFiniteValue {
        /// Which input held the value.
        context: &'static str,
        /// Position of the first non-finite value.
        index: usize,
    },

    /// Error for when aggregation is requested over no curves.
    #[error("Cannot aggregate an empty set of curves")]
    EmptyCurveSet,

    /// Error for when a metric is read before it observed anything.
    #[error("Metric {metric} has no observations")]
    MissingObservation {
        /// The metric name.
        metric: &'static str,
    },

    /// Error for when a metric receives an observation it cannot measure.
    #[error("Metric {metric} cannot consume this observation: {reason}")]
    InvalidObservation {
        /// The metric name.
        metric: &'static str,
        /// Why the observation was rejected.
        reason: String,
    },

    /// Error for when an invalid evaluation configuration is provided.
    #[error("Invalid evaluation configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// Error for when a tensor cannot be read back into host arrays.
    #[error("Tensor conversion failed: {reason}")]
    TensorConversion {
        /// The reason for the failure.
        reason: String,
    },

    /// A numeric contract violation raised by a curve operation.
    #[error(transparent)]
    Ops(#[from] OpsError),
}

/// A specialized `Result` type for `segeval` operations.
pub type EvalResult<T> = Result<T, EvalError>;
