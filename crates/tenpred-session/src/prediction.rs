//! Aggregated prediction for one cell

use std::fmt;

use crate::stats::RunningStats;

/// Prediction for one cell aggregated over posterior samples
///
/// Holds the queried coordinate (`None` for side-information requests), the
/// true value (NaN when unknown) and the per-sample predictions in sample
/// order.
///
/// ```
/// use tenpred_session::Prediction;
///
/// let mut p = Prediction::new(Some(vec![0, 1]), Some(2.0));
/// p.add_sample(1.0);
/// p.add_sample(3.0);
/// assert_eq!(p.mean(), 2.0);
/// assert_eq!(p.variance(), 1.0);
/// assert_eq!(p.last(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    coords: Option<Vec<usize>>,
    truth: f64,
    history: Vec<f64>,
    stats: RunningStats,
}

impl Prediction {
    pub fn new(coords: Option<Vec<usize>>, truth: Option<f64>) -> Self {
        Self {
            coords,
            truth: truth.unwrap_or(f64::NAN),
            history: Vec::new(),
            stats: RunningStats::new(),
        }
    }

    /// Record the prediction of the next sample
    pub fn add_sample(&mut self, value: f64) {
        self.history.push(value);
        self.stats.push(value);
    }

    pub fn coords(&self) -> Option<&[usize]> {
        self.coords.as_deref()
    }

    /// True value, NaN when unknown
    pub fn truth(&self) -> f64 {
        self.truth
    }

    pub fn has_truth(&self) -> bool {
        !self.truth.is_nan()
    }

    /// Mean over samples, NaN without samples
    pub fn mean(&self) -> f64 {
        self.stats.mean()
    }

    /// Population variance over samples
    pub fn variance(&self) -> f64 {
        self.stats.variance()
    }

    /// Prediction of the highest-index sample
    pub fn last(&self) -> Option<f64> {
        self.history.last().copied()
    }

    pub fn nsamples(&self) -> usize {
        self.history.len()
    }

    /// Per-sample predictions in sample order
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coords {
            Some(c) => write!(f, "{:?}", c)?,
            None => write!(f, "<features>")?,
        }
        write!(
            f,
            ": {:.4} | {} samples | mean = {:.4} | var = {:.4}",
            self.truth,
            self.nsamples(),
            self.mean(),
            self.variance()
        )
    }
}
