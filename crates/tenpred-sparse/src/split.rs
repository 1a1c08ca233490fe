//! Train/test splitting
//!
//! A dataset is normalized into a [`CooTensor`] first and its explicit
//! entries are then partitioned under a uniform random permutation. The first
//! `test_count` permuted entries form the test set, the rest the train set.
//!
//! # Test amount
//!
//! - `amount < 1.0`: a fraction of the explicit entries, rounded to the
//!   nearest integer and floored at 1 for a non-empty source
//! - `amount >= 1.0`: an absolute number of entries (rounded)
//!
//! Halfway counts round to the even neighbor, so 0.5 of 5 entries
//! selects 2 and 0.5 of 7 selects 4. A negative or NaN amount is a bad
//! argument.
//!
//! # Dense sources
//!
//! Every cell of a dense array becomes an explicit entry, whatever its rank
//! and whatever its value. Zeros in a dense matrix are therefore split like
//! any other rating and count toward the test amount. Pass a sparse container
//! or a coordinate table to split only the observed entries.
//!
//! # Examples
//!
//! ```
//! use tenpred_core::DenseND;
//! use tenpred_sparse::split::{train_test_split, SplitSource};
//!
//! let y = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let (train, test) = train_test_split(SplitSource::Dense(&y), 0.5, None, Some(1)).unwrap();
//!
//! assert_eq!(train.nnz(), 2);
//! assert_eq!(test.nnz(), 2);
//! assert_eq!(train.shape(), &[2, 2]);
//! ```

use scirs2_core::random::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use tenpred_core::DenseND;

use crate::coo::CooTensor;
use crate::error::{SparseResult, SplitError};
use crate::table::CoordinateTable;

/// Data accepted by [`train_test_split`]
#[derive(Debug, Clone, Copy)]
pub enum SplitSource<'a> {
    /// Dense array, every cell is an explicit entry
    Dense(&'a DenseND<f64>),
    /// Sparse coordinate container
    Sparse(&'a CooTensor<f64>),
    /// Labeled coordinate table
    Table(&'a CoordinateTable),
}

impl<'a> From<&'a DenseND<f64>> for SplitSource<'a> {
    fn from(value: &'a DenseND<f64>) -> Self {
        SplitSource::Dense(value)
    }
}

impl<'a> From<&'a CooTensor<f64>> for SplitSource<'a> {
    fn from(value: &'a CooTensor<f64>) -> Self {
        SplitSource::Sparse(value)
    }
}

impl<'a> From<&'a CoordinateTable> for SplitSource<'a> {
    fn from(value: &'a CoordinateTable) -> Self {
        SplitSource::Table(value)
    }
}

impl SplitSource<'_> {
    /// Normalize into a coordinate container
    pub fn to_coo(&self) -> SparseResult<CooTensor<f64>> {
        match self {
            SplitSource::Dense(dense) => {
                if dense.is_scalar() {
                    return Err(SplitError::UnsupportedSource(
                        "rank-0 dense tensor".to_string(),
                    )
                    .into());
                }
                CooTensor::from_dense(dense)
            }
            SplitSource::Sparse(coo) => Ok((*coo).clone()),
            SplitSource::Table(table) => table.to_coo(None),
        }
    }
}

/// Number of test entries for a given amount over `nnz` explicit entries
///
/// # Errors
///
/// Fails for a negative or NaN amount and for a count above `nnz`.
pub fn test_count(amount: f64, nnz: usize) -> SparseResult<usize> {
    if amount.is_nan() {
        return Err(SplitError::NotANumber.into());
    }
    if amount < 0.0 {
        return Err(SplitError::NegativeAmount(amount).into());
    }
    if nnz == 0 {
        return Ok(0);
    }

    let scaled = if amount < 1.0 {
        nnz as f64 * amount
    } else {
        amount
    };
    let rounded = scaled.round_ties_even();

    if rounded > nnz as f64 {
        return Err(SplitError::CountExceedsEntries {
            requested: rounded as usize,
            available: nnz,
        }
        .into());
    }
    if rounded < 1.0 {
        log::warn!(
            "test amount {} selects no entries out of {}; using 1",
            amount,
            nnz
        );
        return Ok(1);
    }
    Ok(rounded as usize)
}

/// Split a dataset into `(train, test)` containers
///
/// # Arguments
///
/// * `source` - Dense array, sparse container or coordinate table
/// * `amount` - Test fraction (`< 1`) or count (`>= 1`)
/// * `shape` - Shape of both outputs, defaults to the source shape
/// * `seed` - Makes the partition reproducible
///
/// # Errors
///
/// Bad arguments (negative/NaN amount, count above the number of entries,
/// unsupported source) and anything normalizing the source or applying the
/// shape rejects.
pub fn train_test_split<'a>(
    source: impl Into<SplitSource<'a>>,
    amount: f64,
    shape: Option<Vec<usize>>,
    seed: Option<u64>,
) -> SparseResult<(CooTensor<f64>, CooTensor<f64>)> {
    let coo = source.into().to_coo()?;
    let nnz = coo.nnz();
    let ntest = test_count(amount, nnz)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(thread_rng().random::<u64>()),
    };
    let perm = permutation(nnz, &mut rng);

    let test = coo.select(&perm[..ntest]);
    let train = coo.select(&perm[ntest..]);

    let (train, test) = match shape {
        Some(shape) => (train.with_shape(shape.clone())?, test.with_shape(shape)?),
        None => (train, test),
    };

    log::debug!(
        "split {} entries into {} train / {} test (shape {:?})",
        nnz,
        train.nnz(),
        test.nnz(),
        train.shape()
    );
    Ok((train, test))
}

/// Uniform random permutation of `0..n` (Fisher-Yates)
fn permutation(n: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        perm.swap(i, j);
    }
    perm
}
