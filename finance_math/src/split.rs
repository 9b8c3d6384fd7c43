//! Reproducible shuffled train/test partitioning

use crate::{MathError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices assigned to each side of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Rows used for fitting
    pub train: Vec<usize>,
    /// Rows withheld for scoring
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and withhold `ceil(test_size * n)` rows.
///
/// The same `n`, `test_size` and `seed` always produce the same partition.
/// The held-out rows are the first ones of the permutation.
pub fn shuffled_split(n: usize, test_size: f64, seed: u64) -> Result<Partition> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "test_size must be between 0 and 1 (exclusive), got {}",
            test_size
        )));
    }
    if n == 0 {
        return Err(MathError::InsufficientData(
            "Cannot split an empty set of rows".to_string(),
        ));
    }

    let n_test = ((test_size * n as f64).ceil() as usize).min(n);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);

    Ok(Partition {
        train,
        test: indices,
    })
}
