//! COO (Coordinate) sparse tensor container
//!
//! Train/test splits and ground truth are stored as a list of
//! (coordinate, value) pairs over an N-dimensional shape.
//!
//! # Format
//!
//! For an N-dimensional container:
//! - `indices`: `Vec<Vec<usize>>` - Each inner vec is one coordinate \[i₀, i₁, ..., iₙ₋₁\]
//! - `values`: `Vec<T>` - The stored values
//! - `shape`: `Vec<usize>` - The shape of the tensor
//!
//! Every stored entry is explicit: a stored zero is a real observation and is
//! kept. Coordinates are unique and values finite; both are checked when the
//! container is built. The container is immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use tenpred_sparse::coo::CooTensor;
//!
//! let indices = vec![
//!     vec![0, 1],  // (0,1) = 2.5
//!     vec![1, 2],  // (1,2) = 0.0, kept
//!     vec![2, 0],  // (2,0) = 1.5
//! ];
//! let values = vec![2.5, 0.0, 1.5];
//!
//! let coo = CooTensor::new(indices, values, vec![3, 4]).unwrap();
//! assert_eq!(coo.nnz(), 3);
//! assert_eq!(coo.get(&[1, 2]), Some(0.0));
//! assert_eq!(coo.get(&[0, 0]), None);
//! ```

use std::collections::HashMap;

use scirs2_core::numeric::Float;
use tenpred_core::DenseND;

use crate::error::{SparseError, SparseResult, ValidationError};

/// COO (Coordinate) sparse tensor
#[derive(Debug, Clone, PartialEq)]
pub struct CooTensor<T> {
    /// Coordinates of stored entries, each \[i₀, i₁, ..., iₙ₋₁\]
    indices: Vec<Vec<usize>>,

    /// Values at the corresponding coordinates
    values: Vec<T>,

    /// Shape of the tensor
    shape: Vec<usize>,
}

impl<T: Float> CooTensor<T> {
    /// Create a new container from coordinates and values
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The shape is empty
    /// - Indices and values have different lengths
    /// - A coordinate's dimensionality doesn't match the shape
    /// - A coordinate is out of bounds
    /// - A value is NaN or infinite
    /// - A coordinate appears more than once
    pub fn new(indices: Vec<Vec<usize>>, values: Vec<T>, shape: Vec<usize>) -> SparseResult<Self> {
        if shape.is_empty() {
            return Err(ValidationError::EmptyShape.into());
        }
        if indices.len() != values.len() {
            return Err(ValidationError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            }
            .into());
        }

        let mut seen: HashMap<&[usize], usize> = HashMap::with_capacity(indices.len());
        for (position, (idx, value)) in indices.iter().zip(&values).enumerate() {
            Self::check_coordinate(position, idx, &shape)?;

            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    position,
                    coords: idx.clone(),
                    value: value.to_f64().unwrap_or(f64::NAN),
                }
                .into());
            }

            if let Some(first) = seen.insert(idx.as_slice(), position) {
                return Err(ValidationError::DuplicateCoordinate {
                    coords: idx.clone(),
                    first,
                    second: position,
                }
                .into());
            }
        }

        Ok(Self {
            indices,
            values,
            shape,
        })
    }

    /// Create an empty container with the given shape
    pub fn zeros(shape: Vec<usize>) -> SparseResult<Self> {
        Self::new(Vec::new(), Vec::new(), shape)
    }

    fn check_coordinate(position: usize, idx: &[usize], shape: &[usize]) -> SparseResult<()> {
        if idx.len() != shape.len() {
            return Err(ValidationError::ShapeDimsMismatch {
                position,
                expected: shape.len(),
                got: idx.len(),
            }
            .into());
        }
        if idx.iter().zip(shape).any(|(&coord, &size)| coord >= size) {
            return Err(SparseError::out_of_bounds(
                position,
                idx.to_vec(),
                shape.to_vec(),
            ));
        }
        Ok(())
    }

    /// Same entries under a different shape
    ///
    /// # Errors
    ///
    /// Fails when the new shape has a different rank or does not contain
    /// every stored coordinate.
    pub fn with_shape(self, shape: Vec<usize>) -> SparseResult<Self> {
        if shape.is_empty() {
            return Err(ValidationError::EmptyShape.into());
        }
        for (position, idx) in self.indices.iter().enumerate() {
            Self::check_coordinate(position, idx, &shape)?;
        }
        Ok(Self { shape, ..self })
    }

    /// Subset of the stored entries, in the order of `positions`
    ///
    /// Positions must be distinct and in range; the subset inherits
    /// uniqueness and finiteness from `self`.
    pub(crate) fn select(&self, positions: &[usize]) -> Self {
        Self {
            indices: positions.iter().map(|&p| self.indices[p].clone()).collect(),
            values: positions.iter().map(|&p| self.values[p]).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Convert to dense tensor, filling unstored cells with zero
    ///
    /// # Complexity
    ///
    /// Time: O(nnz)
    /// Space: O(∏ᵢ shape\[i\])
    pub fn to_dense(&self) -> anyhow::Result<DenseND<T>> {
        let total_size: usize = self.shape.iter().product();
        let mut data = vec![T::zero(); total_size];

        for (idx, &value) in self.indices.iter().zip(&self.values) {
            let mut linear_idx = 0;
            let mut stride = 1;
            for (dim, &coord) in idx.iter().enumerate().rev() {
                linear_idx += coord * stride;
                stride *= self.shape[dim];
            }
            data[linear_idx] = value;
        }

        DenseND::from_vec(data, &self.shape)
    }

    /// Create a container from a dense tensor
    ///
    /// Every cell becomes an explicit entry, zeros included, in row-major
    /// order.
    ///
    /// # Errors
    ///
    /// Fails on a rank-0 tensor or a non-finite cell.
    ///
    /// ```
    /// use tenpred_core::DenseND;
    /// use tenpred_sparse::coo::CooTensor;
    ///
    /// let dense = DenseND::from_vec(vec![1.0, 0.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// let coo = CooTensor::from_dense(&dense).unwrap();
    /// assert_eq!(coo.nnz(), 4);
    /// assert_eq!(coo.get(&[0, 1]), Some(0.0));
    /// ```
    pub fn from_dense(dense: &DenseND<T>) -> SparseResult<Self> {
        let shape = dense.shape().to_vec();
        let view = dense.view();

        let total_size: usize = shape.iter().product();
        let mut indices = Vec::with_capacity(total_size);
        let mut values = Vec::with_capacity(total_size);

        for flat_idx in 0..total_size {
            let mut multi_idx = vec![0; shape.len()];
            let mut remaining = flat_idx;
            for (dim, &size) in shape.iter().enumerate().rev() {
                multi_idx[dim] = remaining % size;
                remaining /= size;
            }

            values.push(view[&multi_idx[..]]);
            indices.push(multi_idx);
        }

        Self::new(indices, values, shape)
    }
}

impl<T: Copy> CooTensor<T> {
    /// Number of stored (explicit) entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shape of the tensor
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Rank (number of dimensions)
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Get indices
    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    /// Get values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over `(coordinate, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], T)> + '_ {
        self.indices
            .iter()
            .map(Vec::as_slice)
            .zip(self.values.iter().copied())
    }

    /// Value stored at `coord`, if any
    ///
    /// Linear in nnz.
    pub fn get(&self, coord: &[usize]) -> Option<T> {
        self.indices
            .iter()
            .position(|idx| idx.as_slice() == coord)
            .map(|p| self.values[p])
    }

    /// Column of indices along one mode
    ///
    /// # Panics
    ///
    /// Panics if `mode >= self.rank()`.
    pub fn mode_indices(&self, mode: usize) -> Vec<usize> {
        assert!(mode < self.rank(), "mode {} out of range", mode);
        self.indices.iter().map(|idx| idx[mode]).collect()
    }

    /// Compute density (nnz / total_elements)
    ///
    /// Zero for a shape with an empty dimension.
    pub fn density(&self) -> f64 {
        let total: usize = self.shape.iter().product();
        if total == 0 {
            return 0.0;
        }
        self.nnz() as f64 / total as f64
    }

    /// Sort entries in row-major (C-contiguous) coordinate order
    pub fn sort(&mut self) {
        let mut perm: Vec<usize> = (0..self.nnz()).collect();
        perm.sort_by(|&i, &j| self.indices[i].cmp(&self.indices[j]));

        let old_indices = std::mem::take(&mut self.indices);
        let old_values = std::mem::take(&mut self.values);

        self.indices = perm.iter().map(|&p| old_indices[p].clone()).collect();
        self.values = perm.iter().map(|&p| old_values[p]).collect();
    }

    /// Decompose into `(indices, values, shape)`
    pub fn into_parts(self) -> (Vec<Vec<usize>>, Vec<T>, Vec<usize>) {
        (self.indices, self.values, self.shape)
    }
}
