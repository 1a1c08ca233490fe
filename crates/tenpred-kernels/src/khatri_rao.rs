//! Khatri-Rao product (column-wise Kronecker product)
//!
//! For matrices A (I × K) and B (J × K), the Khatri-Rao product C = A ⊙ B has
//! size (I*J × K). Row `a * J + b` of C is the elementwise product of row `a`
//! of A and row `b` of B, so chaining products over modes enumerates output
//! cells in row-major order with the latent dimension K kept on the columns.

use scirs2_core::ndarray_ext::{Array2, ArrayView2};
use scirs2_core::numeric::Num;

use crate::error::{KernelError, KernelResult};

/// Compute the Khatri-Rao product of two matrices sharing their column count
///
/// # Errors
///
/// Returns a latent mismatch error if the column counts differ.
///
/// # Complexity
///
/// Time: O(I * J * K)
/// Space: O(I * J * K)
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tenpred_kernels::khatri_rao;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];  // 2×2
/// let b = array![[5.0, 6.0], [7.0, 8.0]];  // 2×2
/// let c = khatri_rao(&a.view(), &b.view()).unwrap();  // 4×2
/// assert_eq!(c.shape(), &[4, 2]);
///
/// // First column: [1*5, 1*7, 3*5, 3*7] = [5, 7, 15, 21]
/// assert_eq!(c[[0, 0]], 5.0);
/// assert_eq!(c[[1, 0]], 7.0);
/// assert_eq!(c[[2, 0]], 15.0);
/// assert_eq!(c[[3, 0]], 21.0);
/// ```
pub fn khatri_rao<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> KernelResult<Array2<T>>
where
    T: Clone + Num,
{
    let (i, k1) = (a.shape()[0], a.shape()[1]);
    let (j, k2) = (b.shape()[0], b.shape()[1]);

    if k1 != k2 {
        return Err(KernelError::latent_mismatch(
            "khatri_rao",
            k1,
            k2,
            "Number of columns must match",
        ));
    }

    let mut result = Array2::<T>::zeros((i * j, k1));

    for (row_a_idx, a_row) in a.outer_iter().enumerate() {
        for (row_b_idx, b_row) in b.outer_iter().enumerate() {
            let result_row = row_a_idx * j + row_b_idx;
            for (col_idx, (a_val, b_val)) in a_row.iter().zip(b_row.iter()).enumerate() {
                result[[result_row, col_idx]] = a_val.clone() * b_val.clone();
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_khatri_rao_basic() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[5.0, 6.0], [7.0, 8.0]];
        let c = khatri_rao(&a.view(), &b.view()).unwrap();

        assert_eq!(c.shape(), &[4, 2]);
        assert_eq!(c[[0, 1]], 12.0); // 2*6
        assert_eq!(c[[3, 1]], 32.0); // 4*8
    }

    #[test]
    fn test_khatri_rao_single_row_scales() {
        let scale = array![[2.0, -1.0]];
        let b = array![[1.0, 1.0], [3.0, 0.5], [0.0, 4.0]];
        let c = khatri_rao(&scale.view(), &b.view()).unwrap();

        assert_eq!(c, array![[2.0, -1.0], [6.0, -0.5], [0.0, -4.0]]);
    }

    #[test]
    fn test_khatri_rao_column_mismatch() {
        let a = array![[1.0, 2.0]];
        let b = array![[1.0, 2.0, 3.0]];
        let err = khatri_rao(&a.view(), &b.view()).unwrap_err();
        assert_eq!(
            err,
            KernelError::latent_mismatch("khatri_rao", 2, 3, "Number of columns must match")
        );
    }
}
