//! # tenpred-sparse
//!
//! Sparse containers and data preparation for tenpred.
//!
//! This crate provides:
//! - COO (Coordinate) container for train/test data and ground truth
//! - CSR (Compressed Sparse Row) matrices for sparse side information
//! - Labeled coordinate tables
//! - N-dimensional coordinate text reader/writer
//! - Reproducible train/test splitting

pub mod coo;
pub mod csr;
pub mod error;
pub mod io;
pub mod split;
pub mod table;

// Re-exports
pub use coo::*;
pub use csr::*;
pub use error::*;
pub use split::{train_test_split, SplitSource};
pub use table::CoordinateTable;
