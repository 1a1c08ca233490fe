//! Element access for dense tensors

use super::types::DenseND;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Get a reference to an element without panicking
    ///
    /// Returns `None` when the index has the wrong rank or lies outside the
    /// tensor. An empty index addresses the value of a scalar tensor.
    ///
    /// ```
    /// use tenpred_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(tensor.get(&[0, 1]), Some(&2.0));
    /// assert_eq!(tensor.get(&[2, 0]), None);
    /// assert_eq!(tensor.get(&[0]), None);
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }
        if index.iter().zip(self.shape()).any(|(&i, &n)| i >= n) {
            return None;
        }
        self.data.get(index)
    }

    /// Get an element, failing with a descriptive error when out of range
    pub fn get_checked(&self, index: &[usize]) -> anyhow::Result<&T> {
        if index.len() != self.rank() {
            anyhow::bail!(
                "Index has {} dimensions but tensor has rank {}",
                index.len(),
                self.rank()
            );
        }
        for (axis, (&i, &n)) in index.iter().zip(self.shape()).enumerate() {
            if i >= n {
                anyhow::bail!(
                    "Index {} is out of bounds for dimension {} with size {}",
                    i,
                    axis,
                    n
                );
            }
        }
        self.get(index)
            .ok_or_else(|| anyhow::anyhow!("Index {:?} not addressable", index))
    }

    /// The single value of a scalar or one-element tensor
    ///
    /// ```
    /// use tenpred_core::DenseND;
    ///
    /// assert_eq!(DenseND::scalar(2.5).item(), Some(2.5));
    /// assert_eq!(DenseND::from_vec(vec![7.0], &[1, 1]).unwrap().item(), Some(7.0));
    /// assert_eq!(DenseND::<f64>::zeros(&[2]).item(), None);
    /// ```
    pub fn item(&self) -> Option<T> {
        if self.len() == 1 {
            self.data.iter().next().cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scalar_with_empty_index() {
        let t = DenseND::scalar(4.0);
        assert_eq!(t.get(&[]), Some(&4.0));
    }

    #[test]
    fn test_get_checked_reports_axis() {
        let t = DenseND::<f64>::zeros(&[2, 3]);
        let err = t.get_checked(&[1, 3]).unwrap_err();
        assert!(err.to_string().contains("dimension 1 with size 3"));
    }

    #[test]
    fn test_get_checked_rank() {
        let t = DenseND::<f64>::zeros(&[2, 3]);
        assert!(t.get_checked(&[1]).is_err());
        assert_eq!(*t.get_checked(&[1, 2]).unwrap(), 0.0);
    }
}
