//! Multi-linear contraction of per-mode latent contributions
//!
//! Every mode contributes either a latent matrix (num_latent × r) on a
//! retained output axis, or a single latent vector whose axis is dropped.
//! The output is
//!
//! ```text
//! out[i₁..iₖ] = Σ_l  ∏_{single m} v_m[l]  ·  ∏_{retained m} F_m[l, i_m]
//! ```
//!
//! Single vectors are folded into one scaling vector first. Retained factors
//! are then combined in ascending mode order with Khatri-Rao products, and the
//! last retained factor is applied as a matrix product, which also sums over
//! the latent dimension.

use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2, Axis};
use scirs2_core::numeric::Float;
use tenpred_core::DenseND;

use crate::error::{KernelError, KernelResult};
use crate::khatri_rao::khatri_rao;

/// Contribution of one mode to a contraction
#[derive(Debug, Clone, PartialEq)]
pub enum ModeFactor<T> {
    /// Latent matrix (num_latent × r), retained axis of extent r
    Axis(Array2<T>),
    /// Latent vector (num_latent), axis dropped
    Point(Array1<T>),
}

impl<T> ModeFactor<T> {
    /// Latent dimensionality of this contribution
    pub fn num_latent(&self) -> usize {
        match self {
            ModeFactor::Axis(m) => m.nrows(),
            ModeFactor::Point(v) => v.len(),
        }
    }

    /// Extent of the output axis, `None` for a dropped axis
    pub fn retained_len(&self) -> Option<usize> {
        match self {
            ModeFactor::Axis(m) => Some(m.ncols()),
            ModeFactor::Point(_) => None,
        }
    }
}

/// Contract mode contributions into a dense tensor
///
/// The output has one axis per [`ModeFactor::Axis`] in the given order; with
/// only points the result is a rank-0 tensor.
///
/// # Errors
///
/// Fails on an empty factor list or on factors with different latent
/// dimensionality.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tenpred_kernels::{contract, ModeFactor};
///
/// // U = [[2]], V = [[3]]: one latent dimension, point (0, 0)
/// let u = ModeFactor::Point(array![2.0]);
/// let v = ModeFactor::Point(array![3.0]);
/// let out = contract(&[u, v]).unwrap();
/// assert!(out.is_scalar());
/// assert_eq!(out.item(), Some(6.0));
///
/// // Full first mode, point second mode
/// let u = ModeFactor::Axis(array![[1.0, 2.0], [0.5, 0.0]]);
/// let v = ModeFactor::Point(array![4.0, 2.0]);
/// let out = contract(&[u, v]).unwrap();
/// assert_eq!(out.shape(), &[2]);
/// assert_eq!(out.to_vec(), vec![5.0, 8.0]);
/// ```
pub fn contract<T>(factors: &[ModeFactor<T>]) -> KernelResult<DenseND<T>>
where
    T: Float + 'static,
{
    let first = factors
        .first()
        .ok_or_else(|| KernelError::empty_input("contract", "factors"))?;
    let num_latent = first.num_latent();

    for (mode, factor) in factors.iter().enumerate() {
        if factor.num_latent() != num_latent {
            return Err(KernelError::latent_mismatch(
                "contract",
                num_latent,
                factor.num_latent(),
                format!("factor for mode {}", mode),
            ));
        }
    }

    let mut scale = Array1::<T>::ones(num_latent);
    let mut retained: Vec<ArrayView2<'_, T>> = Vec::new();
    for factor in factors {
        match factor {
            ModeFactor::Point(v) => {
                scale.zip_mut_with(v, |s, &x| *s = *s * x);
            }
            ModeFactor::Axis(m) => retained.push(m.view()),
        }
    }

    let shape: Vec<usize> = retained.iter().map(|m| m.ncols()).collect();

    let (last, leading) = match retained.split_last() {
        Some(split) => split,
        None => return Ok(DenseND::scalar(scale.sum())),
    };

    // acc: (cells of leading axes) × num_latent
    let mut acc = scale.insert_axis(Axis(0));
    for factor in leading {
        acc = khatri_rao(&acc.view(), &factor.t())?;
    }
    let out = acc.dot(last);

    DenseND::from_vec(out.iter().copied().collect(), &shape)
        .map_err(|e| KernelError::operation_error("contract", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    /// Direct evaluation of the contraction formula at one output index
    fn brute_force(factors: &[ModeFactor<f64>], index: &[usize]) -> f64 {
        let num_latent = factors[0].num_latent();
        (0..num_latent)
            .map(|l| {
                let mut axis = 0;
                factors
                    .iter()
                    .map(|f| match f {
                        ModeFactor::Point(v) => v[l],
                        ModeFactor::Axis(m) => {
                            let value = m[[l, index[axis]]];
                            axis += 1;
                            value
                        }
                    })
                    .product::<f64>()
            })
            .sum()
    }

    #[test]
    fn test_all_points_scalar() {
        let out = contract(&[
            ModeFactor::Point(array![1.0, 2.0]),
            ModeFactor::Point(array![3.0, 4.0]),
            ModeFactor::Point(array![0.5, 1.0]),
        ])
        .unwrap();
        assert_eq!(out.rank(), 0);
        assert_eq!(out.item(), Some(1.5 + 8.0));
    }

    #[test]
    fn test_full_matrix_is_ut_v() {
        let u = array![[1.0, 2.0, 3.0], [0.0, 1.0, -1.0]];
        let v = array![[2.0, 1.0], [1.0, 0.0]];
        let out = contract(&[ModeFactor::Axis(u.clone()), ModeFactor::Axis(v.clone())]).unwrap();

        let expected = u.t().dot(&v);
        assert_eq!(out.shape(), &[3, 2]);
        assert_eq!(out.to_vec(), expected.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_three_modes_mixed() {
        let factors = vec![
            ModeFactor::Axis(array![[1.0, 2.0], [3.0, -1.0]]),
            ModeFactor::Point(array![0.5, 2.0]),
            ModeFactor::Axis(array![[1.0, 0.0, 2.0], [1.0, 1.0, 0.0]]),
        ];
        let out = contract(&factors).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        for i in 0..2 {
            for k in 0..3 {
                let got = out[&[i, k][..]];
                assert!((got - brute_force(&factors, &[i, k])).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_retained_axis() {
        let out = contract(&[
            ModeFactor::Axis(Array2::<f64>::zeros((2, 0))),
            ModeFactor::Axis(array![[1.0], [1.0]]),
        ])
        .unwrap();
        assert_eq!(out.shape(), &[0, 1]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_latent_mismatch() {
        let err = contract(&[
            ModeFactor::Point(array![1.0, 2.0]),
            ModeFactor::Point(array![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, KernelError::LatentMismatch { .. }));
    }

    #[test]
    fn test_empty_factors() {
        assert!(contract::<f64>(&[]).is_err());
    }
}
