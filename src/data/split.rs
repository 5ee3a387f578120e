//! Randomized train / hand / machine split

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CytologyError, Result};

/// Row indices of one randomized split.
///
/// The held-out part is halved: `hand` rows feed the ensemble vote and the
/// reported metrics, `machine` rows score each feature subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutSplit {
    pub train: Vec<usize>,
    pub hand: Vec<usize>,
    pub machine: Vec<usize>,
}

impl HoldoutSplit {
    /// Shuffle `0..n_samples` and carve off `ceil(test_size * n_samples)` rows
    /// for testing; the first half of those become `hand`, the rest `machine`.
    pub fn generate<R: Rng + ?Sized>(n_samples: usize, test_size: f64, rng: &mut R) -> Result<Self> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(CytologyError::InvalidParameter {
                name: "test_size".to_string(),
                value: test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }

        let n_test = (test_size * n_samples as f64).ceil() as usize;
        if n_test < 2 {
            return Err(CytologyError::ValidationError(format!(
                "test split of {n_test} rows cannot be halved into hand and machine parts \
                 (n_samples = {n_samples}, test_size = {test_size})"
            )));
        }
        if n_test >= n_samples {
            return Err(CytologyError::ValidationError(format!(
                "test split takes all {n_samples} rows, nothing left to train on"
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(rng);

        let train = indices.split_off(n_test);
        let machine = indices.split_off(n_test / 2);
        let hand = indices;

        Ok(Self { train, hand, machine })
    }

    pub fn n_test(&self) -> usize {
        self.hand.len() + self.machine.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_split_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let split = HoldoutSplit::generate(95, 0.1, &mut rng).unwrap();

        // ceil(9.5) = 10 test rows
        assert_eq!(split.n_test(), 10);
        assert_eq!(split.hand.len(), 5);
        assert_eq!(split.machine.len(), 5);
        assert_eq!(split.train.len(), 85);
    }

    #[test]
    fn test_odd_test_size_gives_machine_the_extra_row() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let split = HoldoutSplit::generate(6, 0.5, &mut rng).unwrap();
        assert_eq!(split.hand.len(), 1);
        assert_eq!(split.machine.len(), 2);
    }

    #[test]
    fn test_split_is_a_partition() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let split = HoldoutSplit::generate(50, 0.3, &mut rng).unwrap();

        let mut all: Vec<usize> = split
            .train
            .iter()
            .chain(&split.hand)
            .chain(&split.machine)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = HoldoutSplit::generate(40, 0.25, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = HoldoutSplit::generate(40, 0.25, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(HoldoutSplit::generate(10, 0.0, &mut rng).is_err());
        assert!(HoldoutSplit::generate(10, 1.0, &mut rng).is_err());
        // a single test row cannot be halved
        assert!(HoldoutSplit::generate(10, 0.1, &mut rng).is_err());
        // nothing left to train on
        assert!(HoldoutSplit::generate(2, 0.9, &mut rng).is_err());
    }
}
