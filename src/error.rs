//! Error taxonomy for weight modification.
//!
//! Every failure is deterministic for a given input and configuration, so
//! nothing here is retried: a variant surfaces to the caller of the
//! schema or data phase that raised it.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::AttributeKind;

/// Why a weights file could not be used.
#[derive(Error, Debug)]
pub enum SourceProblem {
    #[error("does not exist")]
    Missing,
    #[error("points to a directory")]
    Directory,
    #[error("cannot be read: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Main error type for weight modifiers and their selection utilities.
#[derive(Error, Debug)]
pub enum WeightError {
    /// No dataset was handed to the data phase.
    #[error("No data provided!")]
    NoDataProvided,

    /// Malformed range token or inconsistent span bounds.
    #[error("invalid range '{spec}': {reason}")]
    InvalidRangeSpec { spec: String, reason: String },

    /// Negative bound supplied to range resolution.
    #[error("invalid upper bound: {0}")]
    InvalidUpperBound(i64),

    /// Regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Weights file is missing, a directory, or unreadable.
    #[error("weights file {}: {problem}", .path.display())]
    WeightSource {
        path: PathBuf,
        #[source]
        problem: SourceProblem,
    },

    /// A line in the weights source is not a number.
    #[error("line {line}: '{text}' is not a valid weight")]
    MalformedWeight { line: usize, text: String },

    /// Fewer weights than positions that need one.
    #[error("Not enough weights: {available} < {required}")]
    InsufficientWeights { available: usize, required: usize },

    /// Attribute index does not resolve within the attribute count.
    #[error("attribute index not valid: {index} (dataset has {count} attributes)")]
    InvalidAttributeIndex { index: String, count: usize },

    /// Resolved attribute has a kind the strategy cannot read.
    #[error("attribute {index} is {found}, expected {expected}")]
    AttributeTypeMismatch {
        index: String,
        expected: &'static str,
        found: AttributeKind,
    },

    /// Registry lookup for a modifier name failed.
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),

    /// A row does not line up with the attribute schema.
    #[error("row {row}: {reason}")]
    RowShapeMismatch { row: usize, reason: String },

    /// Data phase produced a schema the schema phase did not announce.
    #[error("output schema of '{modifier}' differs from the announced schema")]
    SchemaDisagreement { modifier: String },
}

/// Type alias for results using [`WeightError`].
pub type Result<T> = std::result::Result<T, WeightError>;

impl WeightError {
    /// Create a range error for `spec` with a reason.
    pub fn range(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRangeSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a weights source error for `path`.
    pub fn weight_source(path: impl Into<PathBuf>, problem: SourceProblem) -> Self {
        Self::WeightSource {
            path: path.into(),
            problem,
        }
    }
}
