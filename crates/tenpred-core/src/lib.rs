//! # tenpred-core
//!
//! Dense tensor type used for the outputs of TenPred posterior predictions.
//!
//! A prediction request against a factorization sample yields a scalar, a
//! sub-tensor or the full reconstructed tensor depending on how each mode was
//! addressed. All three are represented by [`DenseND`], a thin wrapper around a
//! dynamic-dimensionality array from `scirs2_core`:
//!
//! - rank-0 tensors hold a single scalar prediction ([`DenseND::scalar`], [`DenseND::item`])
//! - higher-rank tensors hold one prediction per retained output axis position
//! - [`DenseND::stack`] gathers per-sample outputs into a `[samples, ...]` tensor
//!
//! ## Quick Start
//!
//! ```
//! use tenpred_core::DenseND;
//!
//! let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! assert_eq!(tensor.shape(), &[2, 2]);
//! assert_eq!(tensor.get(&[1, 0]), Some(&3.0));
//!
//! let point = DenseND::scalar(6.0);
//! assert!(point.is_scalar());
//! assert_eq!(point.item(), Some(6.0));
//! ```
//!
//! ## SciRS2 Integration
//!
//! All array storage goes through `scirs2_core::ndarray_ext`.
//! Direct use of `ndarray` is avoided so the whole workspace shares one array stack.

pub mod dense;


pub use dense::DenseND;
