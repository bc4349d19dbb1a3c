// =============================================================================
// Error Types
// =============================================================================
//
// Every fallible operation in the library returns `Result<T>` with the error
// enum below. Operations either fully succeed or fail with one of these
// variants and leave nothing half-built behind.
//
// Missing values are NOT an error: rows with missing data are dropped from a
// fit and reported through `FitResult::excluded_rows`.
//
// =============================================================================

use thiserror::Error;

/// Errors produced by data generation, model fitting and tabular I/O.
#[derive(Debug, Error)]
pub enum RegSimError {
    /// Generation or fitting parameters are out of range
    /// (e.g. a row count not divisible by the number of groups).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Array shapes disagree (e.g. X has n rows but y has m elements).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A formula or model spec names a field the schema does not have.
    #[error("unknown field '{0}' (expected one of: category_indicator, covariate, outcome)")]
    UnknownField(String),

    /// A formula string could not be parsed.
    #[error("formula error: {0}")]
    FormulaError(String),

    /// The design matrix is not of full column rank.
    #[error("rank deficiency: {0}")]
    RankDeficiency(String),

    /// Not enough usable rows to estimate the model.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A row of an imported table violates the schema or the category coding.
    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Low-level CSV reader/writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegSimError>;
