//! # tenpred-session
//!
//! Posterior prediction sessions over stored Bayesian tensor factorization
//! samples.
//!
//! A [`PredictSession`] loads every sample of a model from a [`SampleStore`],
//! evaluates prediction requests on each sample and aggregates the results
//! into [`Prediction`]s with a running mean and variance. Accuracy against
//! known values is reported through [`metrics`] and [`EvalReport`].
//!
//! ## Quick Start
//!
//! ```rust
//! use scirs2_core::ndarray_ext::array;
//! use tenpred_session::{PredictSession, Sample};
//! use tenpred_sparse::CooTensor;
//!
//! let samples = vec![
//!     Sample::new(0, vec![array![[2.0]], array![[3.0]]]).unwrap(),
//!     Sample::new(1, vec![array![[2.0]], array![[3.5]]]).unwrap(),
//! ];
//! let session = PredictSession::new(samples).unwrap();
//!
//! let test = CooTensor::new(vec![vec![0, 0]], vec![6.5], vec![1, 1]).unwrap();
//! let predictions = session.predict_for_sparse_container(&test).unwrap();
//! assert_eq!(predictions[0].mean(), 6.5);
//! assert_eq!(predictions[0].last(), Some(7.0));
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): evaluate samples in parallel, see [`PredictConfig`]
//! - `serde`: serialization of metadata, reports and summaries

pub mod config;
pub mod error;
pub mod metrics;
pub mod prediction;
pub mod report;
pub mod sample;
pub mod session;
pub mod stats;
pub mod store;


// Re-exports
pub use config::PredictConfig;
pub use error::{MetricError, MetricResult, SessionError, SessionResult};
pub use metrics::{auc, auc_last, rmse, rmse_last};
pub use prediction::Prediction;
pub use report::{EvalReport, SessionSummary};
pub use sample::{LinkModel, PredictionStats, Sample};
pub use session::{PredictSession, SampleSelection};
pub use stats::RunningStats;
pub use store::{MemoryStore, SampleStore, StoreMetadata, StoredTensor};
