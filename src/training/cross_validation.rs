//! Cross-validation fold generation

use crate::error::{EvalError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-validation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CVStrategy {
    /// K-Fold; contiguous groups unless `shuffle`
    KFold { n_splits: usize, shuffle: bool },
    /// Stratified K-Fold (each fold keeps the class distribution)
    StratifiedKFold { n_splits: usize, shuffle: bool },
}

impl Default for CVStrategy {
    fn default() -> Self {
        CVStrategy::KFold { n_splits: 5, shuffle: false }
    }
}

impl CVStrategy {
    pub fn n_splits(&self) -> usize {
        match self {
            CVStrategy::KFold { n_splits, .. } | CVStrategy::StratifiedKFold { n_splits, .. } => *n_splits,
        }
    }
}

/// A single train/test split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Cross-validation splitter
#[derive(Debug, Clone)]
pub struct CrossValidator {
    strategy: CVStrategy,
    random_state: Option<u64>,
}

impl CrossValidator {
    /// Create a new cross-validator
    pub fn new(strategy: CVStrategy) -> Self {
        Self {
            strategy,
            random_state: None,
        }
    }

    /// Contiguous, unshuffled K-Fold
    pub fn k_fold(n_splits: usize) -> Self {
        Self::new(CVStrategy::KFold { n_splits, shuffle: false })
    }

    /// Set random state for reproducibility
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn strategy(&self) -> &CVStrategy {
        &self.strategy
    }

    pub fn n_splits(&self) -> usize {
        self.strategy.n_splits()
    }

    /// Check the fold count against the number of samples
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        let n_splits = self.n_splits();
        if n_splits < 2 {
            return Err(EvalError::InvalidConfiguration(format!(
                "number of folds must be at least 2, got {}",
                n_splits
            )));
        }
        if n_splits > n_samples {
            return Err(EvalError::InvalidConfiguration(format!(
                "number of folds ({}) exceeds number of samples ({})",
                n_splits, n_samples
            )));
        }
        Ok(())
    }

    /// Generate train/test splits, in fold order
    pub fn split(&self, labels: &[usize]) -> Result<Vec<CVSplit>> {
        let n_samples = labels.len();
        self.validate(n_samples)?;

        let folds = match &self.strategy {
            CVStrategy::KFold { n_splits, shuffle } => self.k_fold_groups(n_samples, *n_splits, *shuffle),
            CVStrategy::StratifiedKFold { n_splits, shuffle } => {
                self.stratified_groups(labels, *n_splits, *shuffle)
            }
        };

        Ok(folds_to_splits(folds))
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    fn k_fold_groups(&self, n_samples: usize, n_splits: usize, shuffle: bool) -> Vec<Vec<usize>> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        if shuffle {
            indices.shuffle(&mut self.rng());
        }

        // The first n_samples % n_splits folds take one extra sample
        let base = n_samples / n_splits;
        let remainder = n_samples % n_splits;
        let mut folds = Vec::with_capacity(n_splits);
        let mut current = 0;
        for fold_idx in 0..n_splits {
            let fold_size = if fold_idx < remainder { base + 1 } else { base };
            folds.push(indices[current..current + fold_size].to_vec());
            current += fold_size;
        }
        folds
    }

    /// Deal samples class by class round-robin, continuing the rotation across classes
    /// so fold sizes differ by at most one
    fn stratified_groups(&self, labels: &[usize], n_splits: usize, shuffle: bool) -> Vec<Vec<usize>> {
        let mut class_indices: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in labels.iter().enumerate() {
            class_indices.entry(label).or_default().push(idx);
        }

        if shuffle {
            let mut rng = self.rng();
            for indices in class_indices.values_mut() {
                indices.shuffle(&mut rng);
            }
        }

        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); n_splits];
        let mut next = 0;
        for indices in class_indices.values() {
            for &idx in indices {
                folds[next % n_splits].push(idx);
                next += 1;
            }
        }
        for fold in &mut folds {
            fold.sort_unstable();
        }
        folds
    }
}

fn folds_to_splits(folds: Vec<Vec<usize>>) -> Vec<CVSplit> {
    (0..folds.len())
        .map(|fold_idx| {
            let train_indices: Vec<usize> = folds
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != fold_idx)
                .flat_map(|(_, f)| f.iter().copied())
                .collect();
            CVSplit {
                train_indices,
                test_indices: folds[fold_idx].clone(),
                fold_idx,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_fold() {
        let cv = CrossValidator::k_fold(5);
        assert_eq!(cv.strategy(), &CVStrategy::KFold { n_splits: 5, shuffle: false });
        let splits = cv.split(&vec![0; 100]).unwrap();

        assert_eq!(splits.len(), 5);
        for split in &splits {
            assert_eq!(split.test_indices.len(), 20);
            assert_eq!(split.train_indices.len(), 80);
        }

        let mut all_test: Vec<usize> = splits.iter().flat_map(|s| s.test_indices.clone()).collect();
        all_test.sort();
        assert_eq!(all_test, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_k_fold_contiguous_uneven() {
        let cv = CrossValidator::k_fold(5);
        let splits = cv.split(&vec![0; 112]).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test_indices.len()).collect();
        assert_eq!(sizes, vec![23, 23, 22, 22, 22]);
        assert_eq!(splits[1].test_indices, (23..46).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffled_is_seeded() {
        let strategy = CVStrategy::KFold { n_splits: 4, shuffle: true };
        let a = CrossValidator::new(strategy.clone()).with_random_state(9).split(&vec![0; 40]).unwrap();
        let b = CrossValidator::new(strategy).with_random_state(9).split(&vec![0; 40]).unwrap();
        assert_eq!(a[0].test_indices, b[0].test_indices);
        assert_ne!(a[0].test_indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_k_fold() {
        let y = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let cv = CrossValidator::new(CVStrategy::StratifiedKFold { n_splits: 5, shuffle: false });
        let splits = cv.split(&y).unwrap();

        assert_eq!(splits.len(), 5);
        for split in &splits {
            assert_eq!(split.test_indices.len(), 2);
            let classes: Vec<usize> = split.test_indices.iter().map(|&i| y[i]).collect();
            assert!(classes.contains(&0) && classes.contains(&1));
        }
    }

    #[test]
    fn test_stratified_no_empty_fold() {
        let y = vec![0, 1, 2, 3];
        let cv = CrossValidator::new(CVStrategy::StratifiedKFold { n_splits: 4, shuffle: false });
        let splits = cv.split(&y).unwrap();
        assert!(splits.iter().all(|s| s.test_indices.len() == 1));
    }

    #[test]
    fn test_fold_count_bounds() {
        assert!(matches!(
            CrossValidator::k_fold(1).split(&[0, 1, 0]),
            Err(EvalError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            CrossValidator::k_fold(4).split(&[0, 1, 0]),
            Err(EvalError::InvalidConfiguration(_))
        ));
        assert_eq!(CrossValidator::k_fold(3).split(&[0, 1, 0]).unwrap().len(), 3);
    }
}
