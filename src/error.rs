//! Error types for dyntree.

use thiserror::Error;

/// Result type alias for dyntree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while building, updating or evaluating a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// An operation was called out of order, e.g. asking for a threshold
    /// before any split search ran.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A parameter setter rejected its value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Rows, labels, types or a query point have inconsistent lengths.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The classifier was used before `fit`.
    #[error("tree wasn't built yet")]
    NotFitted,

    /// A metric has no defined value for the given predictions.
    #[error("undefined metric: {0}")]
    UndefinedMetric(String),

    /// Malformed value in an input file.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
