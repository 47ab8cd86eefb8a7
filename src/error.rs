//! Error types.
//!
//! Every failure the engine can surface carries enough context (variable
//! name, statistic) for a caller to render a user-facing message. Nothing
//! is silently replaced by a default value.

use thiserror::Error;

/// Errors produced while computing statistics over a [`Dataset`](crate::dataset::Dataset).
#[derive(Debug, Error)]
pub enum StatsError {
    /// A declared numeric variable has no usable (non-null) values.
    #[error("variable '{variable}' has no non-null values")]
    EmptyVariable { variable: String },

    /// Fewer observations than a statistic requires.
    #[error("{statistic} of '{variable}' requires at least {min_required} observations, got {actual}")]
    InsufficientSample {
        variable: String,
        statistic: &'static str,
        min_required: usize,
        actual: usize,
    },

    /// The mean is exactly zero, so a relative measure is undefined.
    #[error("{statistic} of '{variable}' is undefined because the mean is zero")]
    DivisionByZero {
        variable: String,
        statistic: &'static str,
    },

    /// A contingency table cannot support a chi-square test.
    #[error("contingency table '{row_variable}' x '{col_variable}' is degenerate: {reason}")]
    DegenerateTable {
        row_variable: String,
        col_variable: String,
        reason: String,
    },

    /// A referenced column is absent from the dataset.
    #[error("variable '{variable}' is not a column of the dataset")]
    UnknownVariable { variable: String },

    /// A correlation input has zero variance, so the coefficient is undefined.
    #[error("{statistic} is undefined: '{variable}' is constant over the paired observations")]
    ConstantVariable {
        variable: String,
        statistic: &'static str,
    },

    /// A categorical or infinite value was found inside a numeric variable.
    #[error("variable '{variable}' holds a non-numeric value at row {row}")]
    NonNumericValue { variable: String, row: usize },

    /// A record does not share the dataset's column set.
    #[error("record {row} does not match the dataset columns: {reason}")]
    InconsistentRecord { row: usize, reason: String },

    /// The same column name was declared twice.
    #[error("column '{column}' is declared more than once")]
    DuplicateColumn { column: String },

    /// The variable manifest is internally inconsistent.
    #[error("invalid variable manifest: {0}")]
    InvalidManifest(String),

    /// The variable manifest could not be parsed.
    #[error("failed to parse variable manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;
