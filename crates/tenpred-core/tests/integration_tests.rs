//! Integration tests for tenpred-core
//!
//! These tests exercise DenseND as the prediction output type: scalar
//! results, sub-tensors and per-sample stacks.

use scirs2_core::ndarray_ext::{Array, IxDyn};
use tenpred_core::DenseND;

#[test]
fn test_scalar_prediction_output() {
    let point = DenseND::scalar(6.0);
    assert_eq!(point.rank(), 0);
    assert_eq!(point.shape(), &[] as &[usize]);
    assert_eq!(point.len(), 1);
    assert_eq!(point.get(&[]), Some(&6.0));
    assert_eq!(point.item(), Some(6.0));
}

#[test]
fn test_row_major_addressing() {
    let t = DenseND::from_vec((0..24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
    assert_eq!(t[&[1usize, 2, 3][..]], 23.0);
    assert_eq!(t[&[0usize, 1, 0][..]], 4.0);
    assert_eq!(t.get(&[2, 0, 0]), None);
    assert!(t.get_checked(&[0, 3, 0]).is_err());
}

#[test]
fn test_stack_per_sample_outputs() {
    let samples: Vec<DenseND<f64>> = (0..3)
        .map(|s| DenseND::from_elem(&[2, 2], s as f64))
        .collect();
    let stacked = DenseND::stack(&samples).unwrap();
    assert_eq!(stacked.shape(), &[3, 2, 2]);
    assert_eq!(stacked[&[2usize, 1, 1][..]], 2.0);

    let scalars = [DenseND::scalar(1.0), DenseND::scalar(2.0)];
    let stacked = DenseND::stack(&scalars).unwrap();
    assert_eq!(stacked.shape(), &[2]);
    assert_eq!(stacked.to_vec(), vec![1.0, 2.0]);
}

#[test]
fn test_stack_rejects_mixed_shapes() {
    let a = DenseND::<f64>::zeros(&[2]);
    let b = DenseND::<f64>::zeros(&[3]);
    assert!(DenseND::stack(&[a, b]).is_err());
    assert!(DenseND::<f64>::stack(&[]).is_err());
}

#[test]
fn test_array_round_trip() {
    let arr = Array::from_shape_fn(IxDyn(&[2, 3]), |ix| (ix[0] * 10 + ix[1]) as f64);
    let t = DenseND::from_array(arr.clone());
    assert_eq!(t.as_array(), &arr);
    assert_eq!(t.view().shape(), &[2, 3]);
    assert_eq!(t.into_array(), arr);
}

#[test]
fn test_index_mut() {
    let mut t = DenseND::<f64>::zeros(&[2, 2]);
    t[&[0usize, 1][..]] = 5.0;
    assert_eq!(t.to_vec(), vec![0.0, 5.0, 0.0, 0.0]);
    assert!(!t.is_empty());
    assert!(DenseND::<f64>::zeros(&[0, 3]).is_empty());
}
