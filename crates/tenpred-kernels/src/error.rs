//! Error types for prediction kernels
//!
//! Every variant describes a request that cannot be evaluated. They are all
//! raised before any latent data is combined, so a failed request never
//! yields partial output.

use std::fmt;

/// Error type for operand resolution and contraction
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Number of operands differs from the number of modes
    ParameterCount { expected: usize, actual: usize },

    /// Single index outside a mode
    IndexOutOfBounds {
        mode: usize,
        index: usize,
        size: usize,
    },

    /// Contiguous range not contained in a mode
    RangeOutOfBounds {
        mode: usize,
        start: usize,
        count: usize,
        size: usize,
    },

    /// Feature operand whose column count differs from the link matrix
    SideInfoDimension {
        mode: usize,
        expected: usize,
        actual: usize,
    },

    /// Feature operand on a mode without a link matrix
    MissingSideInfo { mode: usize },

    /// Latent dimensionality disagrees between factors
    LatentMismatch {
        operation: String,
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Empty input not allowed
    EmptyInput {
        operation: String,
        parameter: String,
    },

    /// Generic operation error with context
    OperationError { operation: String, message: String },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::ParameterCount { expected, actual } => write!(
                f,
                "Wrong number of parameters: expected one per mode ({}), got {}",
                expected, actual
            ),

            KernelError::IndexOutOfBounds { mode, index, size } => write!(
                f,
                "Index {} out of bounds for mode {} with size {}",
                index, mode, size
            ),

            KernelError::RangeOutOfBounds {
                mode,
                start,
                count,
                size,
            } => write!(
                f,
                "Range {}..{} out of bounds for mode {} with size {}",
                start,
                start.saturating_add(*count),
                mode,
                size
            ),

            KernelError::SideInfoDimension {
                mode,
                expected,
                actual,
            } => write!(
                f,
                "Side info for mode {} must have {} columns, got {}",
                mode, expected, actual
            ),

            KernelError::MissingSideInfo { mode } => {
                write!(f, "Mode {} has no side information", mode)
            }

            KernelError::LatentMismatch {
                operation,
                expected,
                actual,
                context,
            } => write!(
                f,
                "{}: latent dimension mismatch - expected {}, got {}. {}",
                operation, expected, actual, context
            ),

            KernelError::EmptyInput {
                operation,
                parameter,
            } => write!(
                f,
                "{}: empty input not allowed for parameter '{}'",
                operation, parameter
            ),

            KernelError::OperationError { operation, message } => {
                write!(f, "{}: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for KernelError {}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    /// Create a parameter count error
    pub fn parameter_count(expected: usize, actual: usize) -> Self {
        KernelError::ParameterCount { expected, actual }
    }

    /// Create an index bounds error
    pub fn index_out_of_bounds(mode: usize, index: usize, size: usize) -> Self {
        KernelError::IndexOutOfBounds { mode, index, size }
    }

    /// Create a range bounds error
    pub fn range_out_of_bounds(mode: usize, start: usize, count: usize, size: usize) -> Self {
        KernelError::RangeOutOfBounds {
            mode,
            start,
            count,
            size,
        }
    }

    /// Create a side-info dimension error
    pub fn side_info_dimension(mode: usize, expected: usize, actual: usize) -> Self {
        KernelError::SideInfoDimension {
            mode,
            expected,
            actual,
        }
    }

    /// Create a latent mismatch error
    pub fn latent_mismatch(
        operation: impl Into<String>,
        expected: usize,
        actual: usize,
        context: impl Into<String>,
    ) -> Self {
        KernelError::LatentMismatch {
            operation: operation.into(),
            expected,
            actual,
            context: context.into(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        KernelError::EmptyInput {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a generic operation error
    pub fn operation_error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        KernelError::OperationError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by an out-of-range index or range
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            KernelError::IndexOutOfBounds { .. } | KernelError::RangeOutOfBounds { .. }
        )
    }
}
