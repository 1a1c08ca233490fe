//! Dense tensor type definition and basic accessors

use scirs2_core::ndarray_ext::{Array, ArrayView, IxDyn};
use scirs2_core::numeric::Num;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// Prediction outputs are always C-contiguous (row-major). A rank-0 tensor
/// holds exactly one element and represents a point prediction.
///
/// # Examples
///
/// ```
/// use tenpred_core::dense::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseND<T> {
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Wrap an existing dynamic-dimension array
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::{Array, IxDyn};
    /// use tenpred_core::DenseND;
    ///
    /// let arr = Array::<f64, _>::zeros(IxDyn(&[2, 3]));
    /// let tensor = DenseND::from_array(arr);
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// ```
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from row-major data
    ///
    /// # Errors
    ///
    /// Fails if `vec.len()` is not the product of `shape`.
    ///
    /// ```
    /// use tenpred_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// assert!(DenseND::from_vec(vec![1.0, 2.0], &[3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self { data: array })
    }

    /// Tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// Tensor filled with `value`
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Rank-0 tensor holding a single value
    pub fn scalar(value: T) -> Self {
        Self::from_elem(&[], value)
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Extent of every dimension
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when some dimension has extent zero
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for rank-0 tensors
    pub fn is_scalar(&self) -> bool {
        self.rank() == 0
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Borrow the underlying array by reference
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Consume the tensor and return the underlying array
    pub fn into_array(self) -> Array<T, IxDyn> {
        self.data
    }

    /// Elements in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}
