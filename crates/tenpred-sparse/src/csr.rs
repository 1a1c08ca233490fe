//! Row-compressed feature matrices for sparse side information
//!
//! Feature matrices attached to a mode are usually very sparse (fingerprints,
//! one-hot descriptors). Entries are grouped by row so that projecting a
//! matrix through a link only touches what is stored.
//!
//! Matrices are only built from `(row, col, value)` triplets or from a 2-D
//! [`CooTensor`], so the compressed layout is valid by construction.
//!
//! # Examples
//!
//! ```
//! use tenpred_sparse::csr::CsrMatrix;
//!
//! // [1.0  0   2.0  0  ]
//! // [0    3.0 0    0  ]
//! // [4.0  0   0    5.0]
//! let features = CsrMatrix::from_triplets(
//!     &[(2, 3, 5.0), (0, 0, 1.0), (1, 1, 3.0), (0, 2, 2.0), (2, 0, 4.0)],
//!     (3, 4),
//! )
//! .unwrap();
//!
//! assert_eq!(features.nnz(), 5);
//! assert_eq!(features.row(2), Some((&[0usize, 3][..], &[4.0, 5.0][..])));
//! ```

use crate::coo::CooTensor;
use scirs2_core::ndarray_ext::{Array2, ArrayView2, Zip};
use scirs2_core::numeric::Float;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsrError {
    #[error("Feature matrix must have at least one row and one column, got {0}×{1}")]
    EmptyShape(usize, usize),

    #[error("Entry ({row}, {col}) lies outside a {nrows}×{ncols} feature matrix")]
    EntryOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    #[error("Feature matrix needs a 2-D container, got rank {0}")]
    NotAMatrix(usize),

    #[error("Cannot project a {rows}×{cols} feature matrix through {other_rows} link rows")]
    ProductMismatch {
        rows: usize,
        cols: usize,
        other_rows: usize,
    },
}

/// Sparse feature matrix with entries grouped by row
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// `offsets[r]..offsets[r + 1]` spans row `r` in `cols`/`vals`
    offsets: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T> CsrMatrix<T> {
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Stored columns and values of row `r`, in column order
    pub fn row(&self, r: usize) -> Option<(&[usize], &[T])> {
        let span = *self.offsets.get(r)?..*self.offsets.get(r + 1)?;
        Some((&self.cols[span.clone()], &self.vals[span]))
    }

    fn entries(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.nrows).flat_map(move |r| {
            let span = self.offsets[r]..self.offsets[r + 1];
            self.cols[span.clone()]
                .iter()
                .zip(&self.vals[span])
                .map(move |(&c, v)| (r, c, v))
        })
    }
}

impl<T: Float> CsrMatrix<T> {
    /// Build from `(row, col, value)` triplets in any order
    ///
    /// Repeated positions are summed.
    ///
    /// # Errors
    ///
    /// Fails for an empty shape or an entry outside it.
    pub fn from_triplets(
        triplets: &[(usize, usize, T)],
        shape: (usize, usize),
    ) -> Result<Self, CsrError> {
        let (nrows, ncols) = shape;
        if nrows == 0 || ncols == 0 {
            return Err(CsrError::EmptyShape(nrows, ncols));
        }
        if let Some(&(row, col, _)) = triplets.iter().find(|t| t.0 >= nrows || t.1 >= ncols) {
            return Err(CsrError::EntryOutOfBounds {
                row,
                col,
                nrows,
                ncols,
            });
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by_key(|&(r, c, _)| (r, c));

        let mut offsets = vec![0; nrows + 1];
        let mut cols = Vec::with_capacity(sorted.len());
        let mut vals: Vec<T> = Vec::with_capacity(sorted.len());
        let mut previous = None;

        for (r, c, v) in sorted {
            if previous == Some((r, c)) {
                if let Some(last) = vals.last_mut() {
                    *last = *last + v;
                }
                continue;
            }
            offsets[r + 1] += 1;
            cols.push(c);
            vals.push(v);
            previous = Some((r, c));
        }
        for r in 0..nrows {
            offsets[r + 1] += offsets[r];
        }

        Ok(Self {
            offsets,
            cols,
            vals,
            nrows,
            ncols,
        })
    }

    /// Convert from a 2-D coordinate container
    pub fn from_coo(coo: &CooTensor<T>) -> Result<Self, CsrError> {
        if coo.rank() != 2 {
            return Err(CsrError::NotAMatrix(coo.rank()));
        }
        let triplets: Vec<_> = coo.iter().map(|(idx, v)| (idx[0], idx[1], v)).collect();
        Self::from_triplets(&triplets, (coo.shape()[0], coo.shape()[1]))
    }

    pub fn to_array(&self) -> Array2<T> {
        let mut out = Array2::zeros(self.shape());
        for (r, c, &v) in self.entries() {
            out[[r, c]] = v;
        }
        out
    }

    /// Sparse × dense product `self · b`
    ///
    /// Each stored entry `(r, c, v)` adds `v · b[c, ..]` to row `r` of the
    /// result, so the cost is O(nnz × b.ncols()).
    ///
    /// ```
    /// use tenpred_sparse::csr::CsrMatrix;
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// // A = [1 0 2]
    /// //     [0 3 0]
    /// let a = CsrMatrix::from_triplets(&[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)], (2, 3)).unwrap();
    /// let b = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    ///
    /// let c = a.spmm(&b.view()).unwrap();
    /// assert_eq!(c[[0, 0]], 11.0);
    /// assert_eq!(c[[1, 1]], 12.0);
    /// ```
    pub fn spmm(&self, b: &ArrayView2<T>) -> Result<Array2<T>, CsrError> {
        if b.nrows() != self.ncols {
            return Err(CsrError::ProductMismatch {
                rows: self.nrows,
                cols: self.ncols,
                other_rows: b.nrows(),
            });
        }

        let mut out = Array2::zeros((self.nrows, b.ncols()));
        for (r, c, &v) in self.entries() {
            Zip::from(out.row_mut(r))
                .and(b.row(c))
                .for_each(|o, &x| *o = *o + v * x);
        }
        Ok(out)
    }
}
