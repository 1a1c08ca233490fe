//! # tenpred-kernels
//!
//! Prediction kernels for Bayesian tensor factorization samples.
//!
//! ## Overview
//!
//! A request names one operand per mode: the whole mode, a contiguous range,
//! a single index, or side-information rows that stand in for entities not
//! seen during training. The kernels in this crate
//!
//! - resolve operands against mode sizes and side-info widths ([`resolve`]),
//! - derive latent vectors from side information ([`latent_from_features`]),
//! - contract the per-mode contributions over the latent dimension
//!   ([`contract`], [`predict_sample`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use scirs2_core::ndarray_ext::array;
//! use tenpred_kernels::{output_shape, predict_sample, resolve, ModeModel, ModeSpec, Operand};
//!
//! // 2 latent dimensions, 3 users × 2 items
//! let users = array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];
//! let items = array![[1.0, 3.0], [2.0, 0.0]];
//! let models = [ModeModel::new(users.view()), ModeModel::new(items.view())];
//! let specs = [
//!     ModeSpec { size: 3, feature_dims: None },
//!     ModeSpec { size: 2, feature_dims: None },
//! ];
//!
//! let ops = [Operand::Full, Operand::Single(1)];
//! let resolved = resolve(&ops, &specs).unwrap();
//! assert_eq!(output_shape(&resolved), vec![3]);
//!
//! let out = predict_sample(&models, &resolved).unwrap();
//! assert_eq!(out.to_vec(), vec![3.0, 0.0, 6.0]);
//! ```

pub mod contraction;
pub mod error;
pub mod khatri_rao;
pub mod latent;
pub mod operand;
pub mod predict;


// Re-exports
pub use contraction::*;
pub use error::{KernelError, KernelResult};
pub use khatri_rao::*;
pub use latent::*;
pub use operand::*;
pub use predict::*;
