//! # TenPred - Posterior Prediction for Bayesian Tensor Factorization
//!
//! This is the **meta crate** that re-exports all TenPred components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use tenpred::prelude::*;
//! use scirs2_core::ndarray_ext::array;
//!
//! // One posterior sample of a rank-1 model: U = [[2]], V = [[3]]
//! let sample = Sample::new(0, vec![array![[2.0]], array![[3.0]]])?;
//! let session = PredictSession::new(vec![sample])?;
//!
//! assert_eq!(session.predict_at_coordinates(&[0, 0])?, vec![6.0]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Dense Tensors ([`core`])
//!
//! `DenseND`, the dense N-dimensional output of a prediction request.
//!
//! ### Sparse Data ([`sparse`])
//!
//! Coordinate containers for train/test data and ground truth, CSR side
//! information, the train/test splitter and a coordinate text format.
//!
//! ```
//! use tenpred::prelude::*;
//!
//! let y = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])?;
//! let (train, test) = train_test_split(&y, 0.5, None, Some(1))?;
//! assert_eq!(train.nnz() + test.nnz(), 4);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Prediction Kernels ([`kernels`])
//!
//! Operand resolution, side-information projection and the multi-linear
//! contraction of per-mode latent contributions.
//!
//! ### Sessions ([`session`])
//!
//! Sample storage, aggregation across samples, metrics and reports.
//!
//! ## Feature Flags
//!
//! - `parallel` (default): evaluate samples in parallel
//! - `serde`: serialization of store metadata, reports and summaries

// Re-export all components
pub use tenpred_core as core;
pub use tenpred_kernels as kernels;
pub use tenpred_session as session;
pub use tenpred_sparse as sparse;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use tenpred::prelude::*;
    //!
    //! let ops = [Operand::Full, Operand::Single(3)];
    //! assert!(ops[1].is_single());
    //! ```

    // Core types
    pub use crate::core::DenseND;

    // Sparse data
    pub use crate::sparse::{train_test_split, CooTensor, CoordinateTable, CsrMatrix, SplitSource};

    // Kernels
    pub use crate::kernels::{ModeSpec, Operand, SideInfo};

    // Sessions
    pub use crate::session::{
        EvalReport, MemoryStore, PredictConfig, PredictSession, Prediction, PredictionStats,
        Sample, SampleSelection, SampleStore, StoreMetadata,
    };
}
