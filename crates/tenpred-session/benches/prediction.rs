//! Performance benchmarks for tenpred-session
//!
//! Run with: cargo bench -p tenpred-session
//!
//! Benchmarks cover:
//! - Test-set prediction, sequential and parallel across samples
//! - Full-tensor prediction stacked over samples

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scirs2_core::ndarray_ext::Array2;
use tenpred_session::{PredictConfig, PredictSession, Sample};
use tenpred_sparse::CooTensor;

fn latent(num_latent: usize, size: usize, shift: usize) -> Array2<f64> {
    Array2::<f64>::from_shape_fn((num_latent, size), |(l, i)| {
        ((l * 7 + i * 3 + shift) % 11) as f64 * 0.1
    })
}

fn session(num_samples: usize, num_latent: usize, rows: usize, cols: usize) -> PredictSession {
    let samples = (0..num_samples)
        .map(|s| {
            Sample::new(s, vec![latent(num_latent, rows, s), latent(num_latent, cols, 2 * s)]).unwrap()
        })
        .collect();
    PredictSession::new(samples).unwrap()
}

fn test_set(rows: usize, cols: usize, nnz: usize) -> CooTensor<f64> {
    let indices: Vec<Vec<usize>> = (0..nnz)
        .map(|k| vec![(k * 31) % rows, (k * 17 + k / rows) % cols])
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let values = vec![1.0; indices.len()];
    CooTensor::new(indices, values, vec![rows, cols]).unwrap()
}

fn bench_sparse_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_sparse_container");
    let test = test_set(500, 400, 5000);

    for &num_samples in [10, 50].iter() {
        let base = session(num_samples, 16, 500, 400);
        for (name, config) in [
            ("sequential", PredictConfig::new().enable_parallel(false)),
            ("parallel", PredictConfig::new().min_samples_for_parallel(0)),
        ] {
            let s = base.clone().with_config(config);
            group.throughput(Throughput::Elements((test.nnz() * num_samples) as u64));
            group.bench_with_input(
                BenchmarkId::new(name, num_samples),
                &num_samples,
                |bencher, _| {
                    bencher.iter(|| black_box(s.predict_for_sparse_container(&test).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_predict_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_all");

    for &size in [50, 200].iter() {
        let s = session(20, 16, size, size);
        group.throughput(Throughput::Elements((20 * size * size) as u64));
        group.bench_with_input(BenchmarkId::new("square", size), &size, |bencher, _| {
            bencher.iter(|| black_box(s.predict_all().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sparse_container, bench_predict_all);
criterion_main!(benches);
