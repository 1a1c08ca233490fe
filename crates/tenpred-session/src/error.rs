//! Error types for prediction sessions and metrics

use scirs2_linalg::LinalgError;
use tenpred_kernels::KernelError;
use tenpred_sparse::SparseError;
use thiserror::Error;

/// Errors raised while building or querying a [`crate::PredictSession`]
#[derive(Error, Debug)]
pub enum SessionError {
    /// The store or sample list is empty
    #[error("No samples found")]
    NoSamples,

    /// A sample disagrees with the model configuration
    #[error("Sample {index} is inconsistent: {reason}")]
    InconsistentSample { index: usize, reason: String },

    /// A named tensor is missing from a stored sample
    #[error("Sample {sample} has no tensor '{name}'")]
    MissingTensor { sample: usize, name: String },

    /// A stored tensor has the wrong kind or shape
    #[error("Tensor '{name}' of sample {sample}: {reason}")]
    InvalidTensor {
        sample: usize,
        name: String,
        reason: String,
    },

    /// Sample selection outside the stored samples
    #[error("Invalid sample selection: {0}")]
    InvalidSelection(String),

    /// Mode index outside the model
    #[error("Mode {mode} out of range for a model with {num_modes} modes")]
    InvalidMode { mode: usize, num_modes: usize },

    /// Request that does not reduce to a single value
    #[error("Expected a scalar prediction, got shape {shape:?}")]
    NotScalar { shape: Vec<usize> },

    /// Too few samples to estimate a posterior precision
    #[error("Posterior precision for mode {mode} needs at least {required} samples, have {available}")]
    InsufficientSamples {
        mode: usize,
        required: usize,
        available: usize,
    },

    /// Operand resolution or contraction error
    #[error("Prediction error: {0}")]
    Kernel(#[from] KernelError),

    /// Test data error
    #[error("Sparse data error: {0}")]
    Sparse(#[from] SparseError),

    /// Metric computation error
    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    /// Linear algebra error
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// Dense tensor assembly error
    #[error("Tensor error: {0}")]
    Tensor(#[from] anyhow::Error),
}

/// Errors raised by accuracy metrics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// No prediction carries a known true value
    #[error("No predictions with a known true value")]
    NoKnownTruth,

    /// AUC needs both classes
    #[error("AUC is undefined with {positives} positives and {negatives} negatives")]
    UndefinedAuc { positives: usize, negatives: usize },

    /// Scores and labels differ in length
    #[error("Length mismatch: {scores} scores but {labels} labels")]
    LengthMismatch { scores: usize, labels: usize },
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for metric computations
pub type MetricResult<T> = Result<T, MetricError>;

impl SessionError {
    /// Create an inconsistent-sample error
    pub fn inconsistent(index: usize, reason: impl Into<String>) -> Self {
        SessionError::InconsistentSample {
            index,
            reason: reason.into(),
        }
    }

    /// True when the request was rejected for an out-of-range index or range
    pub fn is_bounds(&self) -> bool {
        match self {
            SessionError::Kernel(e) => e.is_bounds(),
            SessionError::Sparse(SparseError::Index(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_samples_message() {
        assert_eq!(SessionError::NoSamples.to_string(), "No samples found");
    }

    #[test]
    fn test_kernel_error_conversion() {
        let err: SessionError = KernelError::index_out_of_bounds(0, 9, 3).into();
        assert!(err.is_bounds());
        assert!(err.to_string().starts_with("Prediction error"));
    }

    #[test]
    fn test_undefined_auc_message() {
        let err = MetricError::UndefinedAuc {
            positives: 0,
            negatives: 4,
        };
        assert!(err.to_string().contains("0 positives and 4 negatives"));
    }

    #[test]
    fn test_insufficient_samples_message() {
        let err = SessionError::InsufficientSamples {
            mode: 1,
            required: 4,
            available: 2,
        };
        assert!(err.to_string().contains("at least 4 samples, have 2"));
    }
}
