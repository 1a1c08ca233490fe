//! Dense tensor implementation
//!
//! Organized into a type definition plus small operation modules.

pub mod types;

mod combining;
mod indexing;

pub mod densend_traits;

pub use types::DenseND;
