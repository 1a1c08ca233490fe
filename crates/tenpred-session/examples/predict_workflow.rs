//! End-to-end prediction workflow
//!
//! Splits a small ratings matrix, fills a store with posterior samples of a
//! rank-2 model, then predicts and evaluates on the held-out entries.
//!
//! Run with: cargo run --example predict_workflow -p tenpred-session

use anyhow::Result;
use scirs2_core::ndarray_ext::{array, Array2};
use scirs2_core::random::{rngs::StdRng, Rng, SeedableRng};
use tenpred_core::DenseND;
use tenpred_kernels::Operand;
use tenpred_session::{MemoryStore, PredictSession, SampleSelection, StoreMetadata};
use tenpred_sparse::train_test_split;

fn main() -> Result<()> {
    println!("=== TenPred Prediction Workflow ===\n");

    // Ground-truth factors: 2 latent dimensions, 4 users × 5 items
    let users = array![[1.0, 0.5, -0.5, 2.0], [0.5, 1.5, 1.0, 0.0]];
    let items = array![[1.0, 0.0, 2.0, -1.0, 0.5], [0.5, 2.0, 0.0, 1.0, 1.0]];
    let ratings: Array2<f64> = users.t().dot(&items);
    let dense = DenseND::from_vec(ratings.iter().copied().collect(), &[4, 5])?;

    // 1. Train/test split
    println!("1. Splitting {} ratings", dense.len());
    let (train, test) = train_test_split(&dense, 0.25, None, Some(42))?;
    println!("   train: {} entries, test: {} entries\n", train.nnz(), test.nnz());

    // 2. Posterior samples: noisy copies of the true factors
    println!("2. Storing posterior samples");
    let mut rng = StdRng::seed_from_u64(7);
    let mut store = MemoryStore::new(StoreMetadata::new(2, vec![4, 5]));
    for index in 0..20 {
        let noisy_users = users.mapv(|x| x + 0.1 * (rng.random::<f64>() - 0.5));
        let noisy_items = items.mapv(|x| x + 0.1 * (rng.random::<f64>() - 0.5));
        store.insert(index, "latents_0", noisy_users);
        store.insert(index, "latents_1", noisy_items);
    }
    let session = PredictSession::from_store(&store)?;
    println!("{}\n", session);

    // 3. Evaluate on the held-out entries
    println!("3. Evaluating on the test set");
    let report = session.evaluate(&test, Some(1.0))?;
    println!("   {}\n", report);

    for prediction in session.predict_for_sparse_container(&test)?.iter().take(3) {
        println!("   {}", prediction);
    }

    // 4. Slices of the predicted tensor
    println!("\n4. Predicting user 2 for items 1..4 on the last 5 samples");
    let slices = session.predict(
        &[Operand::Single(2), Operand::range(1, 3)],
        SampleSelection::range(15, 20),
    )?;
    for (i, slice) in slices.iter().enumerate() {
        println!("   sample {}: {:?}", 15 + i, slice.to_vec());
    }

    println!("\n=== Done ===");
    Ok(())
}
