//! Integration tests for tenpred-session
//!
//! These tests build sessions from stores and sample lists, and drive them
//! through the splitter, the prediction paths and the metrics.

use scirs2_core::ndarray_ext::{array, Array2};
use tenpred_core::DenseND;
use tenpred_kernels::Operand;
use tenpred_session::*;
use tenpred_sparse::{train_test_split, CooTensor, CsrMatrix};

fn sequential() -> PredictConfig {
    PredictConfig::new().enable_parallel(false)
}

/// Exact rank-2 factors of a 3 × 4 matrix
fn exact_factors() -> (Array2<f64>, Array2<f64>) {
    let u = array![[1.0, 0.5, -1.0], [0.0, 2.0, 1.0]];
    let v = array![[1.0, 2.0, 0.0, -1.0], [0.5, 0.0, 1.0, 1.0]];
    (u, v)
}

fn truth_container(u: &Array2<f64>, v: &Array2<f64>) -> CooTensor<f64> {
    let y = u.t().dot(v);
    let dense = DenseND::from_vec(y.iter().copied().collect(), &[y.nrows(), y.ncols()]).unwrap();
    CooTensor::from_dense(&dense).unwrap()
}

#[test]
fn test_rank_one_point_through_store() {
    let mut store = MemoryStore::new(StoreMetadata::new(1, vec![1, 1]));
    store.insert(0, "latents_0", array![[2.0]]);
    store.insert(0, "latents_1", array![[3.0]]);

    let session = PredictSession::from_store(&store).unwrap();
    assert_eq!(session.predict_at_coordinates(&[0, 0]).unwrap(), vec![6.0]);

    let out = session
        .predict(&[Operand::Single(0), Operand::Single(0)], SampleSelection::All)
        .unwrap();
    assert!(out[0].is_scalar());
    assert_eq!(out[0].item(), Some(6.0));
}

#[test]
fn test_empty_store_has_no_samples() {
    let store = MemoryStore::new(StoreMetadata::new(2, vec![3, 3]));
    let err = PredictSession::from_store(&store).unwrap_err();
    assert!(matches!(err, SessionError::NoSamples));
    assert_eq!(err.to_string(), "No samples found");
}

#[test]
fn test_store_samples_loaded_in_index_order() {
    let mut store = MemoryStore::new(StoreMetadata::new(1, vec![1, 2]));
    for (index, scale) in [(5usize, 1.0), (1, 2.0), (3, 3.0)] {
        store.insert(index, "latents_0", array![[scale]]);
        store.insert(index, "latents_1", array![[1.0, 2.0]]);
    }
    let session = PredictSession::from_store(&store).unwrap();
    let indices: Vec<usize> = session.samples().iter().map(Sample::index).collect();
    assert_eq!(indices, vec![1, 3, 5]);
    assert_eq!(session.predict_at_coordinates(&[0, 1]).unwrap(), vec![4.0, 6.0, 2.0]);
}

#[test]
fn test_exact_factorization_rmse() {
    let (u, v) = exact_factors();
    let test = truth_container(&u, &v);

    // symmetric perturbations of the first mode average out exactly
    let samples: Vec<Sample> = [0.9, 1.1, 0.8, 1.2]
        .iter()
        .enumerate()
        .map(|(i, &s)| Sample::new(i, vec![&u * s, v.clone()]).unwrap())
        .collect();
    let session = PredictSession::new(samples).unwrap().with_config(sequential());

    let report = session.evaluate(&test, None).unwrap();
    assert_eq!(report.nsamples, 4);
    assert_eq!(report.npredictions, 12);
    assert!(report.rmse_avg < 1e-12);
    assert!(report.rmse_1sample > 0.1);
    assert!(report.auc_avg.is_none());
}

#[test]
fn test_rmse_decreases_as_samples_accumulate() {
    let (u, v) = exact_factors();
    let test = truth_container(&u, &v);
    let samples: Vec<Sample> = [1.5, 0.5, 1.25, 0.75]
        .iter()
        .enumerate()
        .map(|(i, &s)| Sample::new(i, vec![&u * s, v.clone()]).unwrap())
        .collect();

    let one = PredictSession::new(samples[..1].to_vec()).unwrap();
    let all = PredictSession::new(samples).unwrap();

    let rmse_one = rmse(&one.predict_for_sparse_container(&test).unwrap()).unwrap();
    let rmse_all = rmse(&all.predict_for_sparse_container(&test).unwrap()).unwrap();
    assert!(rmse_all < 1e-12);
    assert!(rmse_one > rmse_all);
}

#[test]
fn test_inverted_predictions_complement_auc() {
    let (u, v) = exact_factors();
    let test = truth_container(&u, &v);
    let threshold = 0.0;

    let noisy = |sign: f64| {
        let samples = vec![
            Sample::new(0, vec![u.clone(), &v * sign]).unwrap(),
            Sample::new(1, vec![&u * 0.5, &v * sign]).unwrap(),
        ];
        PredictSession::new(samples).unwrap()
    };

    let straight = noisy(1.0).evaluate(&test, Some(threshold)).unwrap();
    let inverted = noisy(-1.0).evaluate(&test, Some(threshold)).unwrap();

    let a = straight.auc_avg.unwrap();
    let b = inverted.auc_avg.unwrap();
    assert_eq!(a, 1.0);
    assert!((a + b - 1.0).abs() < 1e-12);
    assert!(straight.to_string().contains("AUC: 1.00"));
}

#[test]
fn test_auc_undefined_for_one_class() {
    let (u, v) = exact_factors();
    let test = truth_container(&u, &v);
    let session = PredictSession::new(vec![Sample::new(0, vec![u, v]).unwrap()]).unwrap();
    let err = session.evaluate(&test, Some(100.0)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Metric(MetricError::UndefinedAuc { positives: 0, .. })
    ));
}

#[test]
fn test_split_then_evaluate() {
    let y = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    let (train, test) = train_test_split(&y, 0.5, None, Some(1)).unwrap();
    assert_eq!(train.nnz(), 2);
    assert_eq!(test.nnz(), 2);

    let (train2, test2) = train_test_split(&y, 0.5, None, Some(1)).unwrap();
    assert_eq!(train, train2);
    assert_eq!(test, test2);

    // seed 1 holds out the first row
    assert_eq!(test.indices(), &[vec![0, 0], vec![0, 1]]);
    assert_eq!(test.values(), &[1.0, 2.0]);
    assert_eq!(train.indices(), &[vec![1, 0], vec![1, 1]]);
    assert_eq!(train.values(), &[3.0, 4.0]);

    // predictions keep the container's coordinates and stored values
    let session = PredictSession::new(vec![Sample::new(
        0,
        vec![array![[1.0, 3.0]], array![[1.0, 1.0]]],
    )
    .unwrap()])
    .unwrap();
    let predictions = session.predict_for_sparse_container(&test).unwrap();
    assert_eq!(predictions.len(), 2);
    for (p, (coord, truth)) in predictions.iter().zip(test.iter()) {
        assert_eq!(p.coords(), Some(coord));
        assert_eq!(p.truth(), truth);
    }
}

#[test]
fn test_container_outside_model_rejected() {
    let (u, v) = exact_factors();
    let session = PredictSession::new(vec![Sample::new(0, vec![u, v]).unwrap()]).unwrap();

    let outside = CooTensor::new(vec![vec![3, 0]], vec![1.0], vec![4, 4]).unwrap();
    let err = session.predict_for_sparse_container(&outside).unwrap_err();
    assert!(err.is_bounds());

    let wrong_rank = CooTensor::new(vec![vec![0, 0, 0]], vec![1.0], vec![1, 1, 1]).unwrap();
    assert!(session.predict_sparse_samples(&wrong_rank).is_err());
}

#[test]
fn test_side_info_prediction() {
    let meta = StoreMetadata::new(2, vec![2, 3]).with_features(0, 3);
    let mut store = MemoryStore::new(meta);
    for (index, shift) in [(0usize, 0.0), (1, 1.0)] {
        store.insert(index, "latents_0", array![[1.0, 0.0], [0.0, 1.0]]);
        store.insert(index, "latents_1", array![[1.0, 2.0, 0.0], [shift, 0.0, 1.0]]);
        store.insert(index, "link_matrix_0", array![[1.0, 0.0, 0.0], [0.0, 1.0, 1.0]]);
        store.insert(index, "mu_0", array![0.0, 0.5]);
    }
    let session = PredictSession::from_store(&store).unwrap();
    assert_eq!(session.feature_dims(), &[Some(3), None]);

    let dense = array![[2.0, 0.0, 1.0]];
    let sparse = CsrMatrix::from_triplets(&[(0, 0, 2.0), (0, 2, 1.0)], (1, 3)).unwrap();

    let a = session
        .predict(&[Operand::from(dense.clone()), Operand::Full], SampleSelection::All)
        .unwrap();
    let b = session
        .predict(&[Operand::from(sparse), Operand::Full], SampleSelection::All)
        .unwrap();
    assert_eq!(a[0].shape(), &[1, 3]);
    for (x, y) in a.iter().zip(&b) {
        for (p, q) in x.to_vec().iter().zip(y.to_vec()) {
            assert!((p - q).abs() < 1e-12);
        }
    }

    // latent = [2, 0 + 1 + 0.5]; sample 1, item 0 = [1, 1]
    let one = session
        .predict_one(&[Operand::from(array![2.0, 0.0, 1.0]), Operand::Single(0)], None)
        .unwrap();
    assert_eq!(one.coords(), None);
    assert_eq!(one.history(), &[2.0, 3.5]);

    let err = session
        .predict(&[Operand::from(array![[1.0, 2.0]]), Operand::Full], SampleSelection::All)
        .unwrap_err();
    assert!(matches!(err, SessionError::Kernel(_)));
}

#[test]
fn test_posterior_precision() {
    let base = array![[1.0, 0.0], [0.0, 1.0]];
    let offsets = [
        array![[0.1, 0.0], [0.0, 0.2]],
        array![[-0.1, 0.3], [0.1, -0.2]],
        array![[0.0, -0.3], [-0.2, 0.1]],
        array![[0.2, 0.1], [0.3, 0.0]],
    ];
    let samples: Vec<Sample> = offsets
        .iter()
        .enumerate()
        .map(|(i, d)| Sample::new(i, vec![&base + d, base.clone()]).unwrap())
        .collect();

    let few = PredictSession::new(samples[..2].to_vec()).unwrap();
    assert!(matches!(
        few.posterior_mean_precision(0),
        Err(SessionError::InsufficientSamples {
            mode: 0,
            required: 3,
            available: 2
        })
    ));

    let session = PredictSession::new(samples).unwrap();
    let (mean, precision) = session.posterior_mean_precision(0).unwrap();
    assert_eq!(mean.dim(), (2, 2));
    assert!((mean[[0, 0]] - 1.05).abs() < 1e-12);
    assert_eq!(precision.len(), 2);
    for p in &precision {
        assert_eq!(p.dim(), (2, 2));
        assert!((p[[0, 1]] - p[[1, 0]]).abs() < 1e-8);
        assert!(p[[0, 0]] > 0.0 && p[[1, 1]] > 0.0);
    }
}

#[test]
fn test_recorded_prediction_stats() {
    let pred_avg = CooTensor::new(vec![vec![0, 1]], vec![2.5], vec![2, 2]).unwrap();
    let stats = PredictionStats {
        pred_avg: Some(pred_avg.clone()),
        ..PredictionStats::new().with_scalar("rmse_avg", 0.25)
    };
    let samples = vec![
        Sample::new(0, vec![array![[1.0, 2.0]], array![[1.0, 1.0]]]).unwrap(),
        Sample::new(1, vec![array![[1.0, 2.0]], array![[1.0, 1.0]]])
            .unwrap()
            .with_stats(stats),
    ];
    let session = PredictSession::new(samples).unwrap();
    assert_eq!(session.prediction_stats().and_then(|s| s.rmse_avg()), Some(0.25));
    assert_eq!(session.test_predictions(), Some(&pred_avg));
    assert_eq!(session.test_variances(), None);
}

#[test]
fn test_parallel_matches_sequential() {
    let (u, v) = exact_factors();
    let test = truth_container(&u, &v);
    let samples: Vec<Sample> = (0..12)
        .map(|i| Sample::new(i, vec![&u * (1.0 + i as f64 / 10.0), v.clone()]).unwrap())
        .collect();

    let seq = PredictSession::new(samples.clone()).unwrap().with_config(sequential());
    let par = PredictSession::new(samples)
        .unwrap()
        .with_config(PredictConfig::new().min_samples_for_parallel(0));

    assert_eq!(
        seq.predict_for_sparse_container(&test).unwrap(),
        par.predict_for_sparse_container(&test).unwrap()
    );
    assert_eq!(seq.predict_all().unwrap(), par.predict_all().unwrap());
}

#[test]
fn test_summary() {
    let (u, v) = exact_factors();
    let session = PredictSession::new(vec![Sample::new(0, vec![u, v]).unwrap()]).unwrap();
    let summary = session.summary();
    assert_eq!(summary.num_samples, 1);
    assert_eq!(summary.data_shape, vec![3, 4]);
    assert_eq!(summary.num_latent, 2);
    assert!(session.to_string().contains("Data shape = [3, 4]"));
}
