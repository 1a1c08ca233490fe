//! Latent vectors derived from side information
//!
//! For a mode with a link matrix `B` (num_latent × num_features) and prior
//! mean `mu` (num_latent), the latent vector of an entity with feature row
//! `f` is `B · fᵀ + mu`. Applied to a feature matrix `F` (rows × features)
//! this gives a latent matrix of shape (num_latent × rows), laid out like a
//! stored latent matrix so it can take part in contraction unchanged.

use scirs2_core::ndarray_ext::{Array2, ArrayView1, ArrayView2, Axis};
use scirs2_core::numeric::Float;

use crate::error::{KernelError, KernelResult};
use crate::operand::SideInfo;

/// Derive latent vectors from dense features
///
/// # Errors
///
/// Fails if `features` and `link` disagree on the feature count or `mu`
/// has the wrong length.
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tenpred_kernels::latent_from_dense;
///
/// let link = array![[1.0, 0.0], [0.0, 2.0]];   // 2 latent × 2 features
/// let mu = array![0.5, -1.0];
/// let features = array![[1.0, 1.0], [3.0, 0.0], [0.0, 0.0]];
///
/// let latent = latent_from_dense(&features.view(), &link.view(), Some(&mu.view())).unwrap();
/// assert_eq!(latent.shape(), &[2, 3]);
/// assert_eq!(latent.column(0).to_vec(), vec![1.5, 1.0]);
/// assert_eq!(latent.column(2).to_vec(), vec![0.5, -1.0]);
/// ```
pub fn latent_from_dense<T>(
    features: &ArrayView2<T>,
    link: &ArrayView2<T>,
    mu: Option<&ArrayView1<T>>,
) -> KernelResult<Array2<T>>
where
    T: Float + 'static,
{
    check_link(features.ncols(), link, mu)?;
    let mut latent = link.dot(&features.t());
    add_prior_mean(&mut latent, mu);
    Ok(latent)
}

/// Derive latent vectors from any side-information operand
///
/// A vector operand yields a single latent column.
pub fn latent_from_features(
    features: &SideInfo,
    link: &ArrayView2<f64>,
    mu: Option<&ArrayView1<f64>>,
) -> KernelResult<Array2<f64>> {
    match features {
        SideInfo::Dense(f) => latent_from_dense(&f.view(), link, mu),
        SideInfo::Vector(v) => {
            let row = v.view().insert_axis(Axis(0));
            latent_from_dense(&row, link, mu)
        }
        SideInfo::Sparse(f) => {
            check_link(f.ncols(), link, mu)?;
            // (F · Bᵀ)ᵀ touches only stored entries of F
            let projected = f
                .spmm(&link.t())
                .map_err(|e| KernelError::operation_error("latent_from_features", e.to_string()))?;
            let mut latent = projected.reversed_axes();
            add_prior_mean(&mut latent, mu);
            Ok(latent)
        }
    }
}

fn check_link<T>(num_features: usize, link: &ArrayView2<T>, mu: Option<&ArrayView1<T>>) -> KernelResult<()> {
    if link.ncols() != num_features {
        return Err(KernelError::operation_error(
            "latent_from_features",
            format!(
                "features have {} columns but the link matrix expects {}",
                num_features,
                link.ncols()
            ),
        ));
    }
    if let Some(mu) = mu {
        if mu.len() != link.nrows() {
            return Err(KernelError::latent_mismatch(
                "latent_from_features",
                link.nrows(),
                mu.len(),
                "prior mean length must equal the link matrix row count",
            ));
        }
    }
    Ok(())
}

fn add_prior_mean<T: Float>(latent: &mut Array2<T>, mu: Option<&ArrayView1<T>>) {
    if let Some(mu) = mu {
        for mut column in latent.axis_iter_mut(Axis(1)) {
            for (value, &m) in column.iter_mut().zip(mu.iter()) {
                *value = *value + m;
            }
        }
    }
}
