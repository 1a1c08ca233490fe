//! Sample storage interface
//!
//! A sampler persists each posterior draw as a set of named tensors keyed by
//! sample index:
//!
//! | Name | Kind | Shape |
//! |------|------|-------|
//! | `latents_{m}` | matrix | num_latent × size_m |
//! | `link_matrix_{m}` | matrix | num_latent × feature_dims_m (side-info modes) |
//! | `mu_{m}` | vector | num_latent (side-info modes, optional) |
//!
//! plus an optional prediction-statistics block. [`SampleStore`] abstracts
//! the backing storage; [`MemoryStore`] keeps everything in memory.

use std::collections::{BTreeMap, HashMap};

use scirs2_core::ndarray_ext::{Array1, Array2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};
use crate::sample::{PredictionStats, Sample};

/// Model-wide metadata shared by every stored sample
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreMetadata {
    pub num_modes: usize,
    pub num_latent: usize,
    /// Entities per mode
    pub data_shape: Vec<usize>,
    /// Link matrix width per mode, `None` without side information
    pub feature_dims: Vec<Option<usize>>,
}

impl StoreMetadata {
    /// Metadata of a model without side information
    pub fn new(num_latent: usize, data_shape: Vec<usize>) -> Self {
        Self {
            num_modes: data_shape.len(),
            num_latent,
            feature_dims: vec![None; data_shape.len()],
            data_shape,
        }
    }

    /// Declare side information of `dims` features on a mode
    pub fn with_features(mut self, mode: usize, dims: usize) -> Self {
        if let Some(slot) = self.feature_dims.get_mut(mode) {
            *slot = Some(dims);
        }
        self
    }

    /// Metadata describing an existing sample
    pub fn of_sample(sample: &Sample) -> Self {
        Self {
            num_modes: sample.num_modes(),
            num_latent: sample.num_latent(),
            data_shape: sample.shape(),
            feature_dims: sample.feature_dims(),
        }
    }
}

/// A stored named tensor
#[derive(Debug, Clone, PartialEq)]
pub enum StoredTensor {
    Matrix(Array2<f64>),
    Vector(Array1<f64>),
}

impl StoredTensor {
    fn kind(&self) -> &'static str {
        match self {
            StoredTensor::Matrix(_) => "matrix",
            StoredTensor::Vector(_) => "vector",
        }
    }
}

impl From<Array2<f64>> for StoredTensor {
    fn from(value: Array2<f64>) -> Self {
        StoredTensor::Matrix(value)
    }
}

impl From<Array1<f64>> for StoredTensor {
    fn from(value: Array1<f64>) -> Self {
        StoredTensor::Vector(value)
    }
}

/// Name of the latent matrix of a mode
pub fn latents_name(mode: usize) -> String {
    format!("latents_{}", mode)
}

/// Name of the link matrix of a mode
pub fn link_name(mode: usize) -> String {
    format!("link_matrix_{}", mode)
}

/// Name of the prior mean of a mode
pub fn mu_name(mode: usize) -> String {
    format!("mu_{}", mode)
}

/// Read access to stored posterior samples
pub trait SampleStore: Send + Sync {
    /// Model-wide metadata
    fn metadata(&self) -> &StoreMetadata;

    /// Indices of the stored samples
    fn sample_indices(&self) -> Vec<usize>;

    /// A named tensor of a sample, `None` when absent
    fn tensor(&self, sample: usize, name: &str) -> Option<StoredTensor>;

    /// The prediction-statistics block of a sample, if recorded
    fn prediction_stats(&self, sample: usize) -> Option<PredictionStats>;

    /// Load and validate one sample against the metadata
    ///
    /// # Errors
    ///
    /// Fails on a missing latent or link matrix, a tensor of the wrong kind,
    /// or shapes that disagree with the metadata.
    fn load_sample(&self, index: usize) -> SessionResult<Sample> {
        let meta = self.metadata();
        if meta.data_shape.len() != meta.num_modes || meta.feature_dims.len() != meta.num_modes {
            return Err(SessionError::inconsistent(
                index,
                format!(
                    "metadata declares {} modes but {} sizes and {} feature dims",
                    meta.num_modes,
                    meta.data_shape.len(),
                    meta.feature_dims.len()
                ),
            ));
        }

        let mut latents = Vec::with_capacity(meta.num_modes);
        for (mode, &size) in meta.data_shape.iter().enumerate() {
            let latent = load_matrix(self, index, &latents_name(mode))?;
            check_shape(index, &latents_name(mode), &latent, meta.num_latent, size)?;
            latents.push(latent);
        }

        let mut sample = Sample::new(index, latents)?;
        for (mode, dims) in meta.feature_dims.iter().enumerate() {
            let Some(dims) = *dims else { continue };
            let link = load_matrix(self, index, &link_name(mode))?;
            check_shape(index, &link_name(mode), &link, meta.num_latent, dims)?;
            let mu = match self.tensor(index, &mu_name(mode)) {
                None => None,
                Some(StoredTensor::Vector(v)) => Some(v),
                Some(other) => {
                    return Err(SessionError::InvalidTensor {
                        sample: index,
                        name: mu_name(mode),
                        reason: format!("expected a vector, found a {}", other.kind()),
                    })
                }
            };
            sample = sample.with_link(mode, link, mu)?;
        }

        if let Some(stats) = self.prediction_stats(index) {
            sample = sample.with_stats(stats);
        }
        Ok(sample)
    }
}

fn load_matrix<S: SampleStore + ?Sized>(
    store: &S,
    sample: usize,
    name: &str,
) -> SessionResult<Array2<f64>> {
    match store.tensor(sample, name) {
        Some(StoredTensor::Matrix(m)) => Ok(m),
        Some(other) => Err(SessionError::InvalidTensor {
            sample,
            name: name.to_string(),
            reason: format!("expected a matrix, found a {}", other.kind()),
        }),
        None => Err(SessionError::MissingTensor {
            sample,
            name: name.to_string(),
        }),
    }
}

fn check_shape(
    sample: usize,
    name: &str,
    matrix: &Array2<f64>,
    rows: usize,
    cols: usize,
) -> SessionResult<()> {
    if matrix.dim() != (rows, cols) {
        return Err(SessionError::InvalidTensor {
            sample,
            name: name.to_string(),
            reason: format!("expected shape {}x{}, found {:?}", rows, cols, matrix.shape()),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct StoredSample {
    tensors: HashMap<String, StoredTensor>,
    stats: Option<PredictionStats>,
}

/// In-memory sample store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    metadata: StoreMetadata,
    samples: BTreeMap<usize, StoredSample>,
}

impl MemoryStore {
    /// Empty store for a model
    pub fn new(metadata: StoreMetadata) -> Self {
        Self {
            metadata,
            samples: BTreeMap::new(),
        }
    }

    /// Store built from already-assembled samples
    ///
    /// Metadata is taken from the first sample; an empty list gives an empty
    /// store for a two-mode model.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let metadata = samples
            .first()
            .map(StoreMetadata::of_sample)
            .unwrap_or_else(|| StoreMetadata::new(0, vec![0, 0]));
        let mut store = Self::new(metadata);
        for sample in samples {
            store.insert_sample(sample);
        }
        store
    }

    /// Store a named tensor of a sample
    pub fn insert(&mut self, sample: usize, name: impl Into<String>, tensor: impl Into<StoredTensor>) {
        self.samples
            .entry(sample)
            .or_default()
            .tensors
            .insert(name.into(), tensor.into());
    }

    /// Store the prediction statistics of a sample
    pub fn insert_stats(&mut self, sample: usize, stats: PredictionStats) {
        self.samples.entry(sample).or_default().stats = Some(stats);
    }

    /// Store every tensor of an assembled sample under the standard names
    pub fn insert_sample(&mut self, sample: &Sample) {
        let index = sample.index();
        for (mode, latent) in sample.latents().iter().enumerate() {
            self.insert(index, latents_name(mode), latent.clone());
            if let Some(link) = sample.link(mode) {
                self.insert(index, link_name(mode), link.link.clone());
                if let Some(mu) = &link.mu {
                    self.insert(index, mu_name(mode), mu.clone());
                }
            }
        }
        if let Some(stats) = sample.stats() {
            self.insert_stats(index, stats.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleStore for MemoryStore {
    fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    fn sample_indices(&self) -> Vec<usize> {
        self.samples.keys().copied().collect()
    }

    fn tensor(&self, sample: usize, name: &str) -> Option<StoredTensor> {
        self.samples.get(&sample)?.tensors.get(name).cloned()
    }

    fn prediction_stats(&self, sample: usize) -> Option<PredictionStats> {
        self.samples.get(&sample)?.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    fn side_info_store() -> MemoryStore {
        let meta = StoreMetadata::new(1, vec![2, 3]).with_features(0, 2);
        let mut store = MemoryStore::new(meta);
        store.insert(4, "latents_0", array![[1.0, 2.0]]);
        store.insert(4, "latents_1", array![[1.0, 0.0, -1.0]]);
        store.insert(4, "link_matrix_0", array![[0.5, 0.25]]);
        store.insert(4, "mu_0", array![0.1]);
        store
    }

    #[test]
    fn test_load_sample() {
        let store = side_info_store();
        assert_eq!(store.sample_indices(), vec![4]);

        let sample = store.load_sample(4).unwrap();
        assert_eq!(sample.index(), 4);
        assert_eq!(sample.shape(), vec![2, 3]);
        assert_eq!(sample.feature_dims(), vec![Some(2), None]);
        assert_eq!(sample.link(0).and_then(|l| l.mu.clone()), Some(array![0.1]));
    }

    #[test]
    fn test_missing_latent() {
        let mut store = MemoryStore::new(StoreMetadata::new(1, vec![2, 3]));
        store.insert(0, "latents_0", array![[1.0, 2.0]]);
        let err = store.load_sample(0).unwrap_err();
        assert!(matches!(err, SessionError::MissingTensor { sample: 0, ref name } if name == "latents_1"));
    }

    #[test]
    fn test_missing_link() {
        let mut store = side_info_store();
        store.insert(5, "latents_0", array![[1.0, 2.0]]);
        store.insert(5, "latents_1", array![[1.0, 0.0, -1.0]]);
        assert!(matches!(
            store.load_sample(5).unwrap_err(),
            SessionError::MissingTensor { .. }
        ));
    }

    #[test]
    fn test_wrong_shape_and_kind() {
        let mut store = MemoryStore::new(StoreMetadata::new(1, vec![2, 3]));
        store.insert(0, "latents_0", array![[1.0, 2.0, 3.0]]);
        store.insert(0, "latents_1", array![[1.0, 0.0, -1.0]]);
        assert!(matches!(
            store.load_sample(0).unwrap_err(),
            SessionError::InvalidTensor { .. }
        ));

        store.insert(0, "latents_0", array![1.0, 2.0]);
        let err = store.load_sample(0).unwrap_err();
        assert!(err.to_string().contains("expected a matrix"));
    }

    #[test]
    fn test_round_trip_through_store() {
        let sample = Sample::new(7, vec![array![[1.0, 2.0]], array![[3.0]]])
            .unwrap()
            .with_link(1, array![[2.0, 0.0]], None)
            .unwrap()
            .with_stats(PredictionStats::new().with_scalar("rmse_avg", 0.3));
        let store = MemoryStore::from_samples(std::slice::from_ref(&sample));
        assert_eq!(store.len(), 1);
        assert_eq!(store.load_sample(7).unwrap(), sample);
    }
}
