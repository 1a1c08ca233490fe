//! Evaluation reports and session summaries

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accuracy of a session on a test set
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvalReport {
    /// Samples aggregated into every prediction
    pub nsamples: usize,
    /// Test entries evaluated
    pub npredictions: usize,
    /// RMSE of the mean over samples
    pub rmse_avg: f64,
    /// RMSE of the last sample
    pub rmse_1sample: f64,
    /// AUC of the mean over samples, when a threshold was given
    pub auc_avg: Option<f64>,
    /// AUC of the last sample, when a threshold was given
    pub auc_1sample: Option<f64>,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3} samples, {} entries RMSE: {:.2} (1samp: {:.2})",
            self.nsamples, self.npredictions, self.rmse_avg, self.rmse_1sample
        )?;
        if let (Some(avg), Some(one)) = (self.auc_avg, self.auc_1sample) {
            write!(f, " AUC: {:.2} (1sample: {:.2})", avg, one)?;
        }
        Ok(())
    }
}

/// Human-readable description of a session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionSummary {
    pub num_samples: usize,
    pub data_shape: Vec<usize>,
    /// Side-information width per mode
    pub feature_dims: Vec<Option<usize>>,
    pub num_latent: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let beta: Vec<String> = self
            .feature_dims
            .iter()
            .map(|d| d.map_or_else(|| "-".to_string(), |d| d.to_string()))
            .collect();
        writeln!(f, "PredictSession with {} samples", self.num_samples)?;
        writeln!(f, "  Data shape = {:?}", self.data_shape)?;
        writeln!(f, "  Beta shape = [{}]", beta.join(", "))?;
        write!(f, "  Num latent = {}", self.num_latent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_auc() {
        let report = EvalReport {
            nsamples: 10,
            npredictions: 40,
            rmse_avg: 0.5,
            rmse_1sample: 0.754,
            auc_avg: None,
            auc_1sample: None,
        };
        assert_eq!(report.to_string(), " 10 samples, 40 entries RMSE: 0.50 (1samp: 0.75)");
    }

    #[test]
    fn test_report_with_auc() {
        let report = EvalReport {
            nsamples: 2,
            npredictions: 4,
            rmse_avg: 1.0,
            rmse_1sample: 1.0,
            auc_avg: Some(0.75),
            auc_1sample: Some(0.5),
        };
        assert!(report.to_string().ends_with("AUC: 0.75 (1sample: 0.50)"));
    }

    #[test]
    fn test_summary_display() {
        let summary = SessionSummary {
            num_samples: 3,
            data_shape: vec![4, 5],
            feature_dims: vec![Some(7), None],
            num_latent: 2,
        };
        assert_eq!(
            summary.to_string(),
            "PredictSession with 3 samples\n  Data shape = [4, 5]\n  Beta shape = [7, -]\n  Num latent = 2"
        );
    }
}
