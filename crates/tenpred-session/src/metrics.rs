//! Accuracy metrics over aggregated predictions
//!
//! Predictions without a known true value are ignored by every metric.

use crate::error::{MetricError, MetricResult};
use crate::prediction::Prediction;

/// Root mean squared error of the mean predictions
///
/// # Errors
///
/// Fails when no prediction has a known true value.
pub fn rmse(predictions: &[Prediction]) -> MetricResult<f64> {
    rmse_by(predictions, Prediction::mean)
}

/// Root mean squared error of the last-sample predictions
pub fn rmse_last(predictions: &[Prediction]) -> MetricResult<f64> {
    rmse_by(predictions, |p| p.last().unwrap_or(f64::NAN))
}

fn rmse_by(predictions: &[Prediction], estimate: impl Fn(&Prediction) -> f64) -> MetricResult<f64> {
    let (count, sum) = predictions
        .iter()
        .filter(|p| p.has_truth())
        .fold((0usize, 0.0f64), |(n, s), p| {
            let err = p.truth() - estimate(p);
            (n + 1, s + err * err)
        });
    if count == 0 {
        return Err(MetricError::NoKnownTruth);
    }
    Ok((sum / count as f64).sqrt())
}

/// Area under the ROC curve of the mean predictions
///
/// A prediction is positive when its true value exceeds `threshold`.
///
/// # Errors
///
/// Fails when no prediction has a known true value, or when all known
/// values fall in one class.
pub fn auc(predictions: &[Prediction], threshold: f64) -> MetricResult<f64> {
    auc_by(predictions, threshold, Prediction::mean)
}

/// Area under the ROC curve of the last-sample predictions
pub fn auc_last(predictions: &[Prediction], threshold: f64) -> MetricResult<f64> {
    auc_by(predictions, threshold, |p| p.last().unwrap_or(f64::NAN))
}

fn auc_by(
    predictions: &[Prediction],
    threshold: f64,
    estimate: impl Fn(&Prediction) -> f64,
) -> MetricResult<f64> {
    let (scores, labels): (Vec<f64>, Vec<bool>) = predictions
        .iter()
        .filter(|p| p.has_truth())
        .map(|p| (estimate(p), p.truth() > threshold))
        .unzip();
    if scores.is_empty() {
        return Err(MetricError::NoKnownTruth);
    }
    auc_from_scores(&scores, &labels)
}

/// AUC from raw scores and binary labels (Mann-Whitney rank sum)
///
/// Tied scores receive their average rank.
///
/// ```
/// use tenpred_session::metrics::auc_from_scores;
///
/// let auc = auc_from_scores(&[0.1, 0.4, 0.35, 0.8], &[false, false, true, true]).unwrap();
/// assert_eq!(auc, 0.75);
/// ```
pub fn auc_from_scores(scores: &[f64], labels: &[bool]) -> MetricResult<f64> {
    if scores.len() != labels.len() {
        return Err(MetricError::LengthMismatch {
            scores: scores.len(),
            labels: labels.len(),
        });
    }
    let n = scores.len();
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricError::UndefinedAuc {
            positives: n_pos,
            negatives: n_neg,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum_pos = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && scores[order[j]] == scores[order[i]] {
            j += 1;
        }
        // ranks i+1..=j share their average
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        rank_sum_pos += avg_rank * order[i..j].iter().filter(|&&k| labels[k]).count() as f64;
        i = j;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}
