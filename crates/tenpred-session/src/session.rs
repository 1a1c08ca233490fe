//! Prediction sessions over stored posterior samples
//!
//! A [`PredictSession`] owns every sample of one model, ordered by sample
//! index. Each request is resolved once against the model's mode sizes and
//! side-information widths, then evaluated per sample. Resolution failures
//! are reported before any sample is evaluated.
//!
//! # Access paths
//!
//! - [`PredictSession::predict`]: arbitrary operands, one dense tensor per
//!   selected sample
//! - [`PredictSession::predict_all`]: the full tensor, stacked over samples
//! - [`PredictSession::predict_at_coordinates`]: one cell, one value per sample
//! - [`PredictSession::predict_for_sparse_container`]: every stored coordinate
//!   of a test container, aggregated into [`Prediction`]s
//!
//! All paths evaluate a cell with the same arithmetic, so they agree exactly.

use std::fmt;
use std::ops::Range;

use scirs2_core::ndarray_ext::Array2;
use scirs2_linalg::inv;
use tenpred_core::DenseND;
use tenpred_kernels::{
    output_shape, predict_point, predict_sample, resolve, KernelError, ModeSpec, Operand,
};
use tenpred_sparse::CooTensor;

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;

use crate::config::PredictConfig;
use crate::error::{SessionError, SessionResult};
use crate::metrics::{auc, auc_last, rmse, rmse_last};
use crate::prediction::Prediction;
use crate::report::{EvalReport, SessionSummary};
use crate::sample::{PredictionStats, Sample};
use crate::store::SampleStore;

/// Which samples a request is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleSelection {
    /// Every sample
    #[default]
    All,
    /// Positions `start..end` of the ordered sample list, every `step`-th
    Range { start: usize, end: usize, step: usize },
}

impl SampleSelection {
    /// Contiguous positions `start..end`
    pub fn range(start: usize, end: usize) -> Self {
        SampleSelection::Range {
            start,
            end,
            step: 1,
        }
    }

    /// Every `step`-th position in `start..end`
    pub fn strided(start: usize, end: usize, step: usize) -> Self {
        SampleSelection::Range { start, end, step }
    }

    /// Positions selected from `count` ordered samples
    ///
    /// # Errors
    ///
    /// Fails on a zero step or an empty range, or one reaching past `count`.
    pub fn positions(&self, count: usize) -> SessionResult<Vec<usize>> {
        match *self {
            SampleSelection::All => Ok((0..count).collect()),
            SampleSelection::Range { start, end, step } => {
                if step == 0 {
                    return Err(SessionError::InvalidSelection(
                        "step must be positive".to_string(),
                    ));
                }
                if start >= end || end > count {
                    return Err(SessionError::InvalidSelection(format!(
                        "samples {}..{} not a non-empty part of 0..{}",
                        start, end, count
                    )));
                }
                Ok((start..end).step_by(step).collect())
            }
        }
    }
}

impl From<Range<usize>> for SampleSelection {
    fn from(value: Range<usize>) -> Self {
        SampleSelection::range(value.start, value.end)
    }
}

/// Posterior predictions over all stored samples of one model
#[derive(Debug, Clone)]
pub struct PredictSession {
    samples: Vec<Sample>,
    config: PredictConfig,
    num_latent: usize,
    data_shape: Vec<usize>,
    feature_dims: Vec<Option<usize>>,
}

impl PredictSession {
    /// Create a session from loaded samples
    ///
    /// Samples are ordered by index.
    ///
    /// # Errors
    ///
    /// Fails on an empty sample list, repeated sample indices, or samples
    /// that disagree on modes, sizes, latent dimensionality or side
    /// information.
    pub fn new(mut samples: Vec<Sample>) -> SessionResult<Self> {
        samples.sort_by_key(Sample::index);

        let first = samples.first().ok_or(SessionError::NoSamples)?;
        let num_latent = first.num_latent();
        let data_shape = first.shape();
        let feature_dims = first.feature_dims();

        for pair in samples.windows(2) {
            if pair[0].index() == pair[1].index() {
                return Err(SessionError::inconsistent(
                    pair[1].index(),
                    "sample index appears more than once",
                ));
            }
        }
        for sample in &samples[1..] {
            if sample.shape() != data_shape {
                return Err(SessionError::inconsistent(
                    sample.index(),
                    format!("shape {:?}, expected {:?}", sample.shape(), data_shape),
                ));
            }
            if sample.num_latent() != num_latent {
                return Err(SessionError::inconsistent(
                    sample.index(),
                    format!("num_latent {}, expected {}", sample.num_latent(), num_latent),
                ));
            }
            if sample.feature_dims() != feature_dims {
                return Err(SessionError::inconsistent(
                    sample.index(),
                    format!(
                        "side information {:?}, expected {:?}",
                        sample.feature_dims(),
                        feature_dims
                    ),
                ));
            }
        }

        log::info!(
            "PredictSession: {} samples, shape {:?}, num_latent {}",
            samples.len(),
            data_shape,
            num_latent
        );

        Ok(Self {
            samples,
            config: PredictConfig::default(),
            num_latent,
            data_shape,
            feature_dims,
        })
    }

    /// Create a session from every sample in a store
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSamples`] on an empty store, or on the
    /// first sample that cannot be loaded.
    pub fn from_store<S: SampleStore + ?Sized>(store: &S) -> SessionResult<Self> {
        let indices = store.sample_indices();
        if indices.is_empty() {
            return Err(SessionError::NoSamples);
        }
        log::debug!("Loading {} samples from store", indices.len());
        let samples = indices
            .into_iter()
            .map(|index| store.load_sample(index))
            .collect::<SessionResult<Vec<_>>>()?;
        Self::new(samples)
    }

    /// Replace the evaluation configuration
    pub fn with_config(mut self, config: PredictConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PredictConfig {
        &self.config
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn num_modes(&self) -> usize {
        self.data_shape.len()
    }

    pub fn num_latent(&self) -> usize {
        self.num_latent
    }

    pub fn data_shape(&self) -> &[usize] {
        &self.data_shape
    }

    /// Side-information width per mode
    pub fn feature_dims(&self) -> &[Option<usize>] {
        &self.feature_dims
    }

    /// Samples in index order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The highest-index sample
    pub fn last_sample(&self) -> &Sample {
        // non-empty since construction
        &self.samples[self.samples.len() - 1]
    }

    /// Resolution input for each mode
    pub fn mode_specs(&self) -> Vec<ModeSpec> {
        self.data_shape
            .iter()
            .zip(&self.feature_dims)
            .map(|(&size, &feature_dims)| ModeSpec { size, feature_dims })
            .collect()
    }

    /// Evaluate `f` on the samples at `positions`, keeping their order
    fn map_samples<R, F>(&self, positions: &[usize], f: F) -> SessionResult<Vec<R>>
    where
        R: Send,
        F: Fn(&Sample) -> SessionResult<R> + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        let results = if self.config.should_use_parallel(positions.len()) {
            positions
                .par_iter()
                .map(|&p| f(&self.samples[p]))
                .collect::<SessionResult<Vec<_>>>()
        } else {
            positions
                .iter()
                .map(|&p| f(&self.samples[p]))
                .collect::<SessionResult<Vec<_>>>()
        };

        #[cfg(not(feature = "parallel"))]
        let results = positions
            .iter()
            .map(|&p| f(&self.samples[p]))
            .collect::<SessionResult<Vec<_>>>();

        results
    }

    fn check_coordinate(&self, coord: &[usize]) -> SessionResult<()> {
        if coord.len() != self.num_modes() {
            return Err(KernelError::parameter_count(self.num_modes(), coord.len()).into());
        }
        for (mode, (&index, &size)) in coord.iter().zip(&self.data_shape).enumerate() {
            if index >= size {
                return Err(KernelError::index_out_of_bounds(mode, index, size).into());
            }
        }
        Ok(())
    }

    /// Predict a request on the selected samples
    ///
    /// Returns one tensor per selected sample, in sample order. Every tensor
    /// has one axis per non-`Single` operand, in mode order.
    ///
    /// # Errors
    ///
    /// Fails on an invalid selection or an operand that does not fit its
    /// mode; no sample is evaluated in that case.
    pub fn predict(
        &self,
        operands: &[Operand],
        selection: SampleSelection,
    ) -> SessionResult<Vec<DenseND<f64>>> {
        let resolved = resolve(operands, &self.mode_specs())?;
        let positions = selection.positions(self.samples.len())?;
        log::debug!(
            "Predicting shape {:?} on {} samples",
            output_shape(&resolved),
            positions.len()
        );

        self.map_samples(&positions, |sample| {
            Ok(predict_sample(&sample.mode_models(), &resolved)?)
        })
    }

    /// Predict the full tensor for every sample
    ///
    /// The result has a leading sample axis: `[num_samples, ...data_shape]`.
    pub fn predict_all(&self) -> SessionResult<DenseND<f64>> {
        let operands = vec![Operand::Full; self.num_modes()];
        let per_sample = self.predict(&operands, SampleSelection::All)?;
        Ok(DenseND::stack(&per_sample)?)
    }

    /// Predict one cell for every sample
    ///
    /// # Errors
    ///
    /// Fails on a coordinate of the wrong length or outside the data shape.
    pub fn predict_at_coordinates(&self, coord: &[usize]) -> SessionResult<Vec<f64>> {
        self.check_coordinate(coord)?;
        let positions = (0..self.samples.len()).collect::<Vec<_>>();
        self.map_samples(&positions, |sample| {
            Ok(predict_point(&sample.mode_models(), coord)?)
        })
    }

    /// Aggregate a request that reduces to one value
    ///
    /// Every operand must select a single entity: an index, a range of one,
    /// or one row of side information.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotScalar`] when the request spans more
    /// than one cell.
    pub fn predict_one(&self, operands: &[Operand], truth: Option<f64>) -> SessionResult<Prediction> {
        let resolved = resolve(operands, &self.mode_specs())?;
        let shape = output_shape(&resolved);
        if shape.iter().product::<usize>() != 1 {
            return Err(SessionError::NotScalar { shape });
        }

        let coords = operands
            .iter()
            .map(|op| match op {
                Operand::Single(i) => Some(*i),
                Operand::Range { start, .. } => Some(*start),
                _ => None,
            })
            .collect::<Option<Vec<usize>>>();

        let positions = (0..self.samples.len()).collect::<Vec<_>>();
        let values = self.map_samples(&positions, |sample| {
            let out = predict_sample(&sample.mode_models(), &resolved)?;
            out.item().ok_or_else(|| SessionError::NotScalar {
                shape: out.shape().to_vec(),
            })
        })?;

        let mut prediction = Prediction::new(coords, truth);
        for value in values {
            prediction.add_sample(value);
        }
        Ok(prediction)
    }

    /// Per-sample predictions at every coordinate of `test`
    ///
    /// Returns the predicted values as `[sample][entry]`, in sample order and
    /// in the container's entry order.
    fn predict_entries(&self, test: &CooTensor<f64>) -> SessionResult<Vec<Vec<f64>>> {
        for coord in test.indices() {
            self.check_coordinate(coord)?;
        }
        let positions = (0..self.samples.len()).collect::<Vec<_>>();
        self.map_samples(&positions, |sample| {
            let models = sample.mode_models();
            test.indices()
                .iter()
                .map(|coord| Ok(predict_point(&models, coord)?))
                .collect::<SessionResult<Vec<_>>>()
        })
    }

    /// Aggregated predictions for every stored coordinate of `test`
    ///
    /// The stored values are the true values. Predictions follow the
    /// container's entry order.
    ///
    /// # Errors
    ///
    /// Fails when a coordinate does not fit the model; no sample is
    /// evaluated in that case.
    pub fn predict_for_sparse_container(&self, test: &CooTensor<f64>) -> SessionResult<Vec<Prediction>> {
        let per_sample = self.predict_entries(test)?;
        log::debug!(
            "Predicted {} entries on {} samples",
            test.nnz(),
            per_sample.len()
        );

        let mut predictions: Vec<Prediction> = test
            .iter()
            .map(|(coord, truth)| Prediction::new(Some(coord.to_vec()), Some(truth)))
            .collect();
        for values in &per_sample {
            for (prediction, &value) in predictions.iter_mut().zip(values) {
                prediction.add_sample(value);
            }
        }
        Ok(predictions)
    }

    /// One container per sample with its prediction at every coordinate of `test`
    pub fn predict_sparse_samples(&self, test: &CooTensor<f64>) -> SessionResult<Vec<CooTensor<f64>>> {
        let per_sample = self.predict_entries(test)?;
        per_sample
            .into_iter()
            .map(|values| {
                CooTensor::new(test.indices().to_vec(), values, test.shape().to_vec())
                    .map_err(SessionError::from)
            })
            .collect()
    }

    /// Accuracy on a test container
    ///
    /// AUC is computed only when a `threshold` separating positive from
    /// negative true values is given.
    ///
    /// # Errors
    ///
    /// Fails on coordinates outside the model, on an empty test set, and on
    /// a threshold that leaves one class empty.
    pub fn evaluate(&self, test: &CooTensor<f64>, threshold: Option<f64>) -> SessionResult<EvalReport> {
        let predictions = self.predict_for_sparse_container(test)?;
        let (auc_avg, auc_1sample) = match threshold {
            Some(t) => (Some(auc(&predictions, t)?), Some(auc_last(&predictions, t)?)),
            None => (None, None),
        };
        let report = EvalReport {
            nsamples: self.samples.len(),
            npredictions: predictions.len(),
            rmse_avg: rmse(&predictions)?,
            rmse_1sample: rmse_last(&predictions)?,
            auc_avg,
            auc_1sample,
        };
        log::info!("{}", report);
        Ok(report)
    }

    /// Prediction statistics recorded with the last sample
    pub fn prediction_stats(&self) -> Option<&PredictionStats> {
        self.last_sample().stats()
    }

    /// Recorded mean predictions on the sampler's test set
    pub fn test_predictions(&self) -> Option<&CooTensor<f64>> {
        self.prediction_stats()?.pred_avg.as_ref()
    }

    /// Recorded prediction variances on the sampler's test set
    pub fn test_variances(&self) -> Option<&CooTensor<f64>> {
        self.prediction_stats()?.pred_var.as_ref()
    }

    /// Posterior mean and per-entity precision of a mode's latent vectors
    ///
    /// The mean is the element-wise average of the mode's latent matrices
    /// over samples (num_latent × size). For each entity the precision is
    /// the inverse of the sample covariance of its latent vector across
    /// samples (num_latent × num_latent).
    ///
    /// # Errors
    ///
    /// Fails for an unknown mode, with fewer than `num_latent + 1` samples,
    /// or when a covariance is singular.
    pub fn posterior_mean_precision(&self, mode: usize) -> SessionResult<(Array2<f64>, Vec<Array2<f64>>)> {
        if mode >= self.num_modes() {
            return Err(SessionError::InvalidMode {
                mode,
                num_modes: self.num_modes(),
            });
        }
        let n = self.samples.len();
        let k = self.num_latent;
        if n < k + 1 {
            return Err(SessionError::InsufficientSamples {
                mode,
                required: k + 1,
                available: n,
            });
        }

        let size = self.data_shape[mode];
        let mut mean = Array2::<f64>::zeros((k, size));
        for sample in &self.samples {
            mean += &sample.latents()[mode];
        }
        mean.mapv_inplace(|x| x / n as f64);

        let precision = (0..size)
            .map(|entity| {
                let mut centered = Array2::<f64>::zeros((n, k));
                for (row, sample) in self.samples.iter().enumerate() {
                    let column = sample.latents()[mode].column(entity);
                    for l in 0..k {
                        centered[[row, l]] = column[l] - mean[[l, entity]];
                    }
                }
                let covariance = centered.t().dot(&centered) / (n - 1) as f64;
                Ok(inv(&covariance.view(), None)?)
            })
            .collect::<SessionResult<Vec<_>>>()?;

        Ok((mean, precision))
    }

    /// Sample count, shape and latent dimensionality
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            num_samples: self.samples.len(),
            data_shape: self.data_shape.clone(),
            feature_dims: self.feature_dims.clone(),
            num_latent: self.num_latent,
        }
    }
}

impl fmt::Display for PredictSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary().fmt(f)
    }
}
