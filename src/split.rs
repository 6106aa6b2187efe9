//! Seeded train/test split over row indices

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::Result;
use crate::error::SkycastError;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    /// Indices of training rows
    pub train: Vec<usize>,
    /// Indices of held-out test rows
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with the given seed and carve off `test_fraction`
/// of the rows (rounded up) as the test set.
///
/// The same seed always yields the identical split. Fails if the fraction
/// is not strictly between 0 and 1, or if either partition would be empty.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(SkycastError::validation(format!(
            "test fraction must be strictly between 0 and 1, got {test_fraction}"
        )));
    }

    let n_test = (n_rows as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(SkycastError::validation(format!(
            "cannot split {n_rows} rows into non-empty train and test partitions"
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_sizes() {
        let split = train_test_split(1827, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 366); // ceil(1827 * 0.2)
        assert_eq!(split.train.len(), 1461);
    }

    #[test]
    fn test_partitions_are_disjoint_and_cover() {
        let split = train_test_split(100, 0.2, 42).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = train_test_split(500, 0.2, 42).unwrap();
        let b = train_test_split(500, 0.2, 42).unwrap();
        assert_eq!(a, b);

        let c = train_test_split(500, 0.2, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_fraction_is_rejected() {
        assert!(train_test_split(100, 0.0, 42).is_err());
        assert!(train_test_split(100, 1.0, 42).is_err());
        assert!(train_test_split(100, f64::NAN, 42).is_err());
    }

    #[test]
    fn test_too_few_rows_is_rejected() {
        assert!(train_test_split(1, 0.2, 42).is_err());
        assert!(train_test_split(0, 0.2, 42).is_err());
    }
}
