//! Per-sample prediction
//!
//! Turns resolved operands into mode contributions for one posterior sample
//! and contracts them. The sample is seen through [`ModeModel`] views, one
//! per mode, so any storage of latent and link matrices can be used.

use scirs2_core::ndarray_ext::{s, Array1, ArrayView1, ArrayView2};
use tenpred_core::DenseND;

use crate::contraction::{contract, ModeFactor};
use crate::error::{KernelError, KernelResult};
use crate::latent::latent_from_features;
use crate::operand::Resolved;

/// Borrowed model parameters of one mode in one sample
#[derive(Debug, Clone, Copy)]
pub struct ModeModel<'a> {
    /// Latent matrix (num_latent × size)
    pub latent: ArrayView2<'a, f64>,
    /// Link matrix (num_latent × num_features), side-info modes only
    pub link: Option<ArrayView2<'a, f64>>,
    /// Prior mean (num_latent)
    pub mu: Option<ArrayView1<'a, f64>>,
}

impl<'a> ModeModel<'a> {
    /// Mode without side information
    pub fn new(latent: ArrayView2<'a, f64>) -> Self {
        Self {
            latent,
            link: None,
            mu: None,
        }
    }

    /// Attach a link matrix and optional prior mean
    pub fn with_link(mut self, link: ArrayView2<'a, f64>, mu: Option<ArrayView1<'a, f64>>) -> Self {
        self.link = Some(link);
        self.mu = mu;
        self
    }
}

/// Contribution of one mode for a resolved operand
pub fn mode_factor(
    mode: usize,
    model: &ModeModel<'_>,
    operand: &Resolved<'_>,
) -> KernelResult<ModeFactor<f64>> {
    let latent = &model.latent;
    let factor = match *operand {
        Resolved::Full { .. } => ModeFactor::Axis(latent.to_owned()),
        Resolved::Range { start, count } => {
            ModeFactor::Axis(latent.slice(s![.., start..start + count]).to_owned())
        }
        Resolved::Single(index) => ModeFactor::Point(latent.column(index).to_owned()),
        Resolved::Feature(features) => {
            let link = model.link.as_ref().ok_or(KernelError::MissingSideInfo { mode })?;
            ModeFactor::Axis(latent_from_features(features, link, model.mu.as_ref())?)
        }
    };
    Ok(factor)
}

/// Predict a resolved request for one sample
///
/// # Errors
///
/// Fails if the number of mode models differs from the number of operands
/// or the sample's latent matrices disagree in dimensionality.
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tenpred_kernels::{predict_sample, resolve, ModeModel, ModeSpec, Operand};
///
/// let u = array![[2.0]];
/// let v = array![[3.0]];
/// let models = [ModeModel::new(u.view()), ModeModel::new(v.view())];
/// let specs = [ModeSpec { size: 1, feature_dims: None }; 2];
///
/// let ops = [Operand::Single(0), Operand::Single(0)];
/// let resolved = resolve(&ops, &specs).unwrap();
/// let out = predict_sample(&models, &resolved).unwrap();
/// assert_eq!(out.item(), Some(6.0));
/// ```
pub fn predict_sample(models: &[ModeModel<'_>], resolved: &[Resolved<'_>]) -> KernelResult<DenseND<f64>> {
    if models.len() != resolved.len() {
        return Err(KernelError::parameter_count(models.len(), resolved.len()));
    }
    let factors = models
        .iter()
        .zip(resolved)
        .enumerate()
        .map(|(mode, (model, operand))| mode_factor(mode, model, operand))
        .collect::<KernelResult<Vec<_>>>()?;
    contract(&factors)
}

/// Predict a single cell for one sample
///
/// Equivalent to [`predict_sample`] with a `Single` operand on every mode,
/// without building intermediate factors.
///
/// # Errors
///
/// Fails on a coordinate of the wrong length or outside a mode, and on
/// latent matrices that disagree in dimensionality.
pub fn predict_point(models: &[ModeModel<'_>], coord: &[usize]) -> KernelResult<f64> {
    if models.len() != coord.len() {
        return Err(KernelError::parameter_count(models.len(), coord.len()));
    }
    let num_latent = models.first().map_or(0, |m| m.latent.nrows());

    let mut scale = Array1::<f64>::ones(num_latent);
    for (mode, (model, &index)) in models.iter().zip(coord).enumerate() {
        if index >= model.latent.ncols() {
            return Err(KernelError::index_out_of_bounds(
                mode,
                index,
                model.latent.ncols(),
            ));
        }
        if model.latent.nrows() != num_latent {
            return Err(KernelError::latent_mismatch(
                "predict_point",
                num_latent,
                model.latent.nrows(),
                format!("latent matrix for mode {}", mode),
            ));
        }
        scale.zip_mut_with(&model.latent.column(index), |s, &x| *s = *s * x);
    }
    Ok(scale.sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{resolve, ModeSpec, Operand};
    use scirs2_core::ndarray_ext::{array, Array2};

    struct Fixture {
        u: Array2<f64>,
        v: Array2<f64>,
        link: Array2<f64>,
    }

    fn fixture() -> Fixture {
        Fixture {
            // 2 latent × 3 users
            u: array![[1.0, 0.0, 2.0], [1.0, 1.0, -1.0]],
            // 2 latent × 4 items
            v: array![[1.0, 2.0, 0.0, 1.0], [0.5, 0.0, 1.0, 3.0]],
            // 2 latent × 2 user features
            link: array![[1.0, 0.0], [0.0, 1.0]],
        }
    }

    fn specs() -> Vec<ModeSpec> {
        vec![
            ModeSpec {
                size: 3,
                feature_dims: Some(2),
            },
            ModeSpec {
                size: 4,
                feature_dims: None,
            },
        ]
    }

    fn run(f: &Fixture, ops: &[Operand]) -> DenseND<f64> {
        let models = [
            ModeModel::new(f.u.view()).with_link(f.link.view(), None),
            ModeModel::new(f.v.view()),
        ];
        let resolved = resolve(ops, &specs()).unwrap();
        predict_sample(&models, &resolved).unwrap()
    }

    #[test]
    fn test_full_prediction_shape() {
        let f = fixture();
        let out = run(&f, &[Operand::Full, Operand::Full]);
        assert_eq!(out.shape(), &[3, 4]);
        // user 2, item 3: 2*1 + (-1)*3
        assert_eq!(out[&[2usize, 3][..]], -1.0);
    }

    #[test]
    fn test_single_equals_range_of_one() {
        let f = fixture();
        let single = run(&f, &[Operand::Single(1), Operand::Full]);
        let range = run(&f, &[Operand::range(1, 1), Operand::Full]);
        assert_eq!(single.shape(), &[4]);
        assert_eq!(range.shape(), &[1, 4]);
        assert_eq!(single.to_vec(), range.to_vec());
    }

    #[test]
    fn test_range_slice() {
        let f = fixture();
        let full = run(&f, &[Operand::Full, Operand::Full]);
        let part = run(&f, &[Operand::range(1, 2), Operand::range(2, 2)]);
        assert_eq!(part.shape(), &[2, 2]);
        assert_eq!(part[&[0usize, 0][..]], full[&[1usize, 2][..]]);
        assert_eq!(part[&[1usize, 1][..]], full[&[2usize, 3][..]]);
    }

    #[test]
    fn test_feature_matches_latent_column() {
        // identity link: features equal to a stored latent column reproduce it
        let f = fixture();
        let by_index = run(&f, &[Operand::Single(2), Operand::Full]);
        let by_features = run(&f, &[Operand::from(array![[2.0, -1.0]]), Operand::Full]);
        assert_eq!(by_features.shape(), &[1, 4]);
        assert_eq!(by_index.to_vec(), by_features.to_vec());
    }

    #[test]
    fn test_point_matches_single_operands() {
        let f = fixture();
        let models = [ModeModel::new(f.u.view()), ModeModel::new(f.v.view())];
        let via_operands = run(&f, &[Operand::Single(2), Operand::Single(1)]);
        let point = predict_point(&models, &[2, 1]).unwrap();
        assert_eq!(via_operands.item(), Some(point));
        assert_eq!(point, 2.0 * 2.0 + (-1.0) * 0.0);
    }

    #[test]
    fn test_point_bounds() {
        let f = fixture();
        let models = [ModeModel::new(f.u.view()), ModeModel::new(f.v.view())];
        assert!(predict_point(&models, &[3, 0]).unwrap_err().is_bounds());
        assert!(predict_point(&models, &[0]).is_err());
    }

    #[test]
    fn test_model_count_mismatch() {
        let f = fixture();
        let models = [ModeModel::new(f.u.view())];
        let ops = [Operand::Full, Operand::Full];
        let resolved = resolve(&ops, &specs()).unwrap();
        assert!(predict_sample(&models, &resolved).is_err());
    }
}
