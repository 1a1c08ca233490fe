//! Combining per-sample tensors

use super::types::DenseND;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Stack equally shaped tensors along a new leading axis
    ///
    /// The result has shape `[tensors.len(), ...shape]`. Used to gather the
    /// per-sample outputs of one prediction request into a single tensor.
    ///
    /// # Errors
    ///
    /// Fails on an empty list or on differing shapes.
    ///
    /// ```
    /// use tenpred_core::DenseND;
    ///
    /// let a = DenseND::from_vec(vec![1.0, 2.0], &[2]).unwrap();
    /// let b = DenseND::from_vec(vec![3.0, 4.0], &[2]).unwrap();
    /// let s = DenseND::stack(&[a, b]).unwrap();
    /// assert_eq!(s.shape(), &[2, 2]);
    /// assert_eq!(s[&[1usize, 0][..]], 3.0);
    /// ```
    pub fn stack(tensors: &[Self]) -> anyhow::Result<Self> {
        let first = match tensors.first() {
            Some(t) => t,
            None => anyhow::bail!("Cannot stack empty tensor list"),
        };

        let reference_shape = first.shape();
        for (i, tensor) in tensors.iter().enumerate().skip(1) {
            if tensor.shape() != reference_shape {
                anyhow::bail!(
                    "Tensor {} has shape {:?}, expected {:?}",
                    i,
                    tensor.shape(),
                    reference_shape
                );
            }
        }

        let mut shape = Vec::with_capacity(reference_shape.len() + 1);
        shape.push(tensors.len());
        shape.extend_from_slice(reference_shape);

        let mut data = Vec::with_capacity(first.len() * tensors.len());
        for tensor in tensors {
            data.extend(tensor.data.iter().cloned());
        }

        Self::from_vec(data, &shape)
    }
}
