use thiserror::Error;

/// The error type for curve operations.
///
/// Every variant is a contract violation on the caller's side; operations
/// never return a silently degenerate result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Two sequences that must be aligned have different lengths.
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },

    /// An operation received an empty sequence.
    #[error("Empty input")]
    EmptyInput,

    /// A grid or curve needs more points than it was given.
    #[error("Too few points: need at least {minimum}, got {actual}")]
    TooFewPoints {
        /// The minimum number of points.
        minimum: usize,
        /// The number of points given.
        actual: usize,
    },

    /// An interpolation axis is not strictly increasing at `index`.
    #[error("Interpolation nodes are not strictly increasing at index {index}")]
    NotStrictlyIncreasing {
        /// First index whose value is not larger than its predecessor.
        index: usize,
    },

    /// A query point lies outside the interpolation domain.
    #[error("Value {value} is outside the interpolation domain [{min}, {max}]")]
    OutOfDomain {
        /// The query point.
        value: f64,
        /// Smallest node.
        min: f64,
        /// Largest node.
        max: f64,
    },
}

/// A specialized `Result` type for curve operations.
pub type OpsResult<T> = Result<T, OpsError>;
