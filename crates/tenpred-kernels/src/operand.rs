//! Per-mode operands and their resolution
//!
//! A prediction request carries one [`Operand`] per mode. Resolution checks
//! each operand against the mode's size and side-information width and
//! classifies it into a [`Resolved`] operand. No latent data is touched, so a
//! request is rejected before any sample is evaluated.
//!
//! | Operand | Output axis | Contribution |
//! |---------|-------------|--------------|
//! | `Full` | retained, mode size | whole latent matrix |
//! | `Range` | retained, `count` | column slice |
//! | `Single` | dropped | one latent column |
//! | `Feature` | retained, feature rows | `link · Fᵀ + mu` |

use std::ops::{Range, RangeFull};

use scirs2_core::ndarray_ext::{Array1, Array2};
use tenpred_sparse::CsrMatrix;

use crate::error::{KernelError, KernelResult};

/// Side-information rows supplied in place of an index
#[derive(Debug, Clone, PartialEq)]
pub enum SideInfo {
    /// Dense matrix, one entity per row
    Dense(Array2<f64>),
    /// Dense vector, a single entity
    Vector(Array1<f64>),
    /// Sparse matrix, one entity per row
    Sparse(CsrMatrix<f64>),
}

impl SideInfo {
    /// Number of entities (rows)
    pub fn nrows(&self) -> usize {
        match self {
            SideInfo::Dense(m) => m.nrows(),
            SideInfo::Vector(_) => 1,
            SideInfo::Sparse(m) => m.nrows(),
        }
    }

    /// Number of features (columns)
    pub fn ncols(&self) -> usize {
        match self {
            SideInfo::Dense(m) => m.ncols(),
            SideInfo::Vector(v) => v.len(),
            SideInfo::Sparse(m) => m.ncols(),
        }
    }
}

impl From<Array2<f64>> for SideInfo {
    fn from(value: Array2<f64>) -> Self {
        SideInfo::Dense(value)
    }
}

impl From<Array1<f64>> for SideInfo {
    fn from(value: Array1<f64>) -> Self {
        SideInfo::Vector(value)
    }
}

impl From<CsrMatrix<f64>> for SideInfo {
    fn from(value: CsrMatrix<f64>) -> Self {
        SideInfo::Sparse(value)
    }
}

/// What a request asks for along one mode
///
/// ```
/// use tenpred_kernels::Operand;
///
/// assert_eq!(Operand::from(3usize), Operand::Single(3));
/// assert_eq!(Operand::from(2usize..5), Operand::Range { start: 2, count: 3 });
/// assert_eq!(Operand::from(..), Operand::Full);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Every index of the mode
    Full,
    /// `count` consecutive indices from `start`
    Range { start: usize, count: usize },
    /// One index; the axis is dropped from the output
    Single(usize),
    /// Entities described by side information
    Feature(SideInfo),
}

impl Operand {
    /// Contiguous range operand
    pub fn range(start: usize, count: usize) -> Self {
        Operand::Range { start, count }
    }

    /// True for operands that drop their axis
    pub fn is_single(&self) -> bool {
        matches!(self, Operand::Single(_))
    }
}

impl From<usize> for Operand {
    fn from(value: usize) -> Self {
        Operand::Single(value)
    }
}

impl From<Range<usize>> for Operand {
    fn from(value: Range<usize>) -> Self {
        Operand::Range {
            start: value.start,
            count: value.end.saturating_sub(value.start),
        }
    }
}

impl From<RangeFull> for Operand {
    fn from(_: RangeFull) -> Self {
        Operand::Full
    }
}

impl From<SideInfo> for Operand {
    fn from(value: SideInfo) -> Self {
        Operand::Feature(value)
    }
}

impl From<Array2<f64>> for Operand {
    fn from(value: Array2<f64>) -> Self {
        Operand::Feature(SideInfo::Dense(value))
    }
}

impl From<Array1<f64>> for Operand {
    fn from(value: Array1<f64>) -> Self {
        Operand::Feature(SideInfo::Vector(value))
    }
}

impl From<CsrMatrix<f64>> for Operand {
    fn from(value: CsrMatrix<f64>) -> Self {
        Operand::Feature(SideInfo::Sparse(value))
    }
}

/// Static description of a mode used for resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSpec {
    /// Number of entities along the mode
    pub size: usize,
    /// Columns of the link matrix, `None` without side information
    pub feature_dims: Option<usize>,
}

/// A validated operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Full { size: usize },
    Range { start: usize, count: usize },
    Single(usize),
    Feature(&'a SideInfo),
}

impl Resolved<'_> {
    /// Extent of the output axis, `None` when the axis is dropped
    pub fn retained_len(&self) -> Option<usize> {
        match self {
            Resolved::Full { size } => Some(*size),
            Resolved::Range { count, .. } => Some(*count),
            Resolved::Single(_) => None,
            Resolved::Feature(f) => Some(f.nrows()),
        }
    }
}

/// Resolve the operand for one mode
pub fn resolve_operand<'a>(
    mode: usize,
    operand: &'a Operand,
    spec: &ModeSpec,
) -> KernelResult<Resolved<'a>> {
    match operand {
        Operand::Full => Ok(Resolved::Full { size: spec.size }),
        Operand::Range { start, count } => match start.checked_add(*count) {
            Some(end) if end <= spec.size => Ok(Resolved::Range {
                start: *start,
                count: *count,
            }),
            _ => Err(KernelError::range_out_of_bounds(
                mode, *start, *count, spec.size,
            )),
        },
        Operand::Single(index) => {
            if *index < spec.size {
                Ok(Resolved::Single(*index))
            } else {
                Err(KernelError::index_out_of_bounds(mode, *index, spec.size))
            }
        }
        Operand::Feature(features) => {
            let expected = spec
                .feature_dims
                .ok_or(KernelError::MissingSideInfo { mode })?;
            if features.ncols() != expected {
                return Err(KernelError::side_info_dimension(
                    mode,
                    expected,
                    features.ncols(),
                ));
            }
            Ok(Resolved::Feature(features))
        }
    }
}

/// Resolve one operand per mode
///
/// # Errors
///
/// Fails when the operand count differs from the mode count, or on the
/// first operand (in mode order) that does not fit its mode.
///
/// ```
/// use tenpred_kernels::{resolve, output_shape, ModeSpec, Operand};
///
/// let modes = [
///     ModeSpec { size: 4, feature_dims: None },
///     ModeSpec { size: 6, feature_dims: None },
/// ];
/// let ops = [Operand::Single(1), Operand::range(2, 3)];
/// let resolved = resolve(&ops, &modes).unwrap();
/// assert_eq!(output_shape(&resolved), vec![3]);
///
/// assert!(resolve(&[Operand::Single(4), Operand::Full], &modes).is_err());
/// ```
pub fn resolve<'a>(operands: &'a [Operand], modes: &[ModeSpec]) -> KernelResult<Vec<Resolved<'a>>> {
    if operands.len() != modes.len() {
        return Err(KernelError::parameter_count(modes.len(), operands.len()));
    }
    operands
        .iter()
        .zip(modes)
        .enumerate()
        .map(|(mode, (operand, spec))| resolve_operand(mode, operand, spec))
        .collect()
}

/// Output shape of a resolved request: retained axes in mode order
pub fn output_shape(resolved: &[Resolved<'_>]) -> Vec<usize> {
    resolved.iter().filter_map(Resolved::retained_len).collect()
}
