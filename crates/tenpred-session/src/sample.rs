//! One posterior sample of a factorization model

use std::collections::BTreeMap;

use scirs2_core::ndarray_ext::{Array1, Array2};
use tenpred_kernels::ModeModel;
use tenpred_sparse::CooTensor;

use crate::error::{SessionError, SessionResult};

/// Linear link from side information to latent space for one mode
#[derive(Debug, Clone, PartialEq)]
pub struct LinkModel {
    /// Link matrix (num_latent × num_features)
    pub link: Array2<f64>,
    /// Prior mean (num_latent)
    pub mu: Option<Array1<f64>>,
}

/// Prediction statistics recorded by the sampler for its test set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionStats {
    /// Named scalar statistics (`rmse_avg`, `auc_1sample`, ...)
    pub scalars: BTreeMap<String, f64>,
    /// Mean prediction at each test coordinate
    pub pred_avg: Option<CooTensor<f64>>,
    /// Prediction variance at each test coordinate
    pub pred_var: Option<CooTensor<f64>>,
}

impl PredictionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named scalar
    pub fn with_scalar(mut self, name: impl Into<String>, value: f64) -> Self {
        self.scalars.insert(name.into(), value);
        self
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    pub fn rmse_avg(&self) -> Option<f64> {
        self.scalar("rmse_avg")
    }

    pub fn rmse_1sample(&self) -> Option<f64> {
        self.scalar("rmse_1sample")
    }

    pub fn auc_avg(&self) -> Option<f64> {
        self.scalar("auc_avg")
    }

    pub fn auc_1sample(&self) -> Option<f64> {
        self.scalar("auc_1sample")
    }
}

/// One posterior draw: per-mode latent matrices and link models
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    index: usize,
    latents: Vec<Array2<f64>>,
    links: Vec<Option<LinkModel>>,
    stats: Option<PredictionStats>,
}

impl Sample {
    /// Create a sample from its latent matrices (num_latent × size, one per mode)
    ///
    /// # Errors
    ///
    /// Fails with fewer than two modes or latent matrices with different
    /// numbers of rows.
    pub fn new(index: usize, latents: Vec<Array2<f64>>) -> SessionResult<Self> {
        if latents.len() < 2 {
            return Err(SessionError::inconsistent(
                index,
                format!("expected at least 2 modes, got {}", latents.len()),
            ));
        }
        let num_latent = latents[0].nrows();
        if let Some((mode, m)) = latents
            .iter()
            .enumerate()
            .find(|(_, m)| m.nrows() != num_latent)
        {
            return Err(SessionError::inconsistent(
                index,
                format!(
                    "latent matrix for mode {} has {} rows, expected {}",
                    mode,
                    m.nrows(),
                    num_latent
                ),
            ));
        }
        let links = vec![None; latents.len()];
        Ok(Self {
            index,
            latents,
            links,
            stats: None,
        })
    }

    /// Attach a link matrix (num_latent × num_features) and prior mean to a mode
    ///
    /// # Errors
    ///
    /// Fails for an unknown mode or when the link or prior mean does not
    /// match the latent dimensionality.
    pub fn with_link(
        mut self,
        mode: usize,
        link: Array2<f64>,
        mu: Option<Array1<f64>>,
    ) -> SessionResult<Self> {
        if mode >= self.latents.len() {
            return Err(SessionError::inconsistent(
                self.index,
                format!("link for mode {} but only {} modes", mode, self.latents.len()),
            ));
        }
        let num_latent = self.num_latent();
        if link.nrows() != num_latent {
            return Err(SessionError::inconsistent(
                self.index,
                format!(
                    "link matrix for mode {} has {} rows, expected {}",
                    mode,
                    link.nrows(),
                    num_latent
                ),
            ));
        }
        if let Some(mu) = &mu {
            if mu.len() != num_latent {
                return Err(SessionError::inconsistent(
                    self.index,
                    format!(
                        "prior mean for mode {} has length {}, expected {}",
                        mode,
                        mu.len(),
                        num_latent
                    ),
                ));
            }
        }
        self.links[mode] = Some(LinkModel { link, mu });
        Ok(self)
    }

    /// Attach the sampler's prediction statistics
    pub fn with_stats(mut self, stats: PredictionStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn num_modes(&self) -> usize {
        self.latents.len()
    }

    pub fn num_latent(&self) -> usize {
        self.latents[0].nrows()
    }

    /// Entities per mode
    pub fn shape(&self) -> Vec<usize> {
        self.latents.iter().map(|m| m.ncols()).collect()
    }

    pub fn latent(&self, mode: usize) -> Option<&Array2<f64>> {
        self.latents.get(mode)
    }

    pub fn latents(&self) -> &[Array2<f64>] {
        &self.latents
    }

    pub fn link(&self, mode: usize) -> Option<&LinkModel> {
        self.links.get(mode).and_then(Option::as_ref)
    }

    pub fn stats(&self) -> Option<&PredictionStats> {
        self.stats.as_ref()
    }

    /// Link matrix width per mode, `None` for modes without side information
    pub fn feature_dims(&self) -> Vec<Option<usize>> {
        self.links
            .iter()
            .map(|l| l.as_ref().map(|l| l.link.ncols()))
            .collect()
    }

    /// Borrowed per-mode views for the prediction kernels
    pub fn mode_models(&self) -> Vec<ModeModel<'_>> {
        self.latents
            .iter()
            .zip(&self.links)
            .map(|(latent, link)| match link {
                Some(l) => ModeModel::new(latent.view())
                    .with_link(l.link.view(), l.mu.as_ref().map(|m| m.view())),
                None => ModeModel::new(latent.view()),
            })
            .collect()
    }
}
