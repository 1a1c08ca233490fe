//! Unified error types for sparse containers, loaders and splitting
//!
//! # Design
//!
//! - **`SparseError`**: Top-level enum returned by every public operation
//! - **`ValidationError`**: Malformed or non-finite input detected at ingestion
//! - **`IndexError`**: Coordinates outside the declared shape
//! - **`SplitError`**: Bad arguments to the train/test splitter
//!
//! Data errors always carry the location of the offending entry so they can be
//! traced back to the source file or table row.
//!
//! # Examples
//!
//! ```
//! use tenpred_sparse::error::{SparseError, ValidationError};
//!
//! fn validate_shape(shape: &[usize]) -> Result<(), SparseError> {
//!     if shape.is_empty() {
//!         return Err(SparseError::Validation(ValidationError::EmptyShape));
//!     }
//!     Ok(())
//! }
//! assert!(validate_shape(&[]).is_err());
//! ```

use thiserror::Error;

/// Top-level error type for all sparse container operations
#[derive(Error, Debug)]
pub enum SparseError {
    /// Validation errors (shape, coordinates, values)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Train/test split argument errors
    #[error("Bad argument: {0}")]
    Split(#[from] SplitError),

    /// CSR side-information errors
    #[error("CSR error: {0}")]
    Csr(#[from] crate::csr::CsrError),

    /// Malformed coordinate text input
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Underlying reader/writer failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors for container contents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Shape cannot be empty")]
    EmptyShape,

    #[error("Coordinate at position {position} has {got} dimensions, shape has {expected}")]
    ShapeDimsMismatch {
        position: usize,
        expected: usize,
        got: usize,
    },

    #[error("Coordinates and values must have same length: {indices} coordinates vs {values} values")]
    LengthMismatch { indices: usize, values: usize },

    #[error("Duplicate coordinate {coords:?} at positions {first} and {second}")]
    DuplicateCoordinate {
        coords: Vec<usize>,
        first: usize,
        second: usize,
    },

    #[error("Non-finite value {value} at position {position} (coordinate {coords:?})")]
    NonFinite {
        position: usize,
        coords: Vec<usize>,
        value: f64,
    },

    #[error("Table must have exactly 1 value column, found {found}")]
    ValueColumns { found: usize },

    #[error("Table needs at least one index column")]
    NoIndexColumns,

    #[error("Column '{column}' has {got} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Negative index {value} in column '{column}' at row {row}")]
    NegativeIndex {
        column: String,
        row: usize,
        value: i64,
    },
}

/// Index errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Coordinate {index:?} at position {position} exceeds shape {shape:?}")]
    OutOfBounds {
        position: usize,
        index: Vec<usize>,
        shape: Vec<usize>,
    },
}

/// Bad arguments to the train/test splitter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("test amount must be a non-negative number, got {0}")]
    NegativeAmount(f64),

    #[error("test amount must be a number, got NaN")]
    NotANumber,

    #[error("requested {requested} test entries but the source only has {available}")]
    CountExceedsEntries { requested: usize, available: usize },

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
}

/// Result type alias for sparse container operations
pub type SparseResult<T> = Result<T, SparseError>;

impl SparseError {
    /// Create a parse error for a given 1-based line number
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        SparseError::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(position: usize, index: Vec<usize>, shape: Vec<usize>) -> Self {
        SparseError::Index(IndexError::OutOfBounds {
            position,
            index,
            shape,
        })
    }

    /// True when the error stems from a bad caller argument rather than data
    pub fn is_bad_argument(&self) -> bool {
        matches!(self, SparseError::Split(_))
    }
}
