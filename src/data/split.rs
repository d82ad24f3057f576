//! Seeded train/test partitioning

use super::Dataset;
use crate::error::{EvalError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Train/test split configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of samples held out for testing, exclusive range (0, 1)
    pub test_fraction: f64,
    /// Seed for the shuffle; `None` draws from entropy
    pub random_state: Option<u64>,
    /// Shuffle before splitting; otherwise the tail becomes the test set
    pub shuffle: bool,
    /// Keep class proportions in both subsets
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            random_state: Some(0),
            shuffle: true,
            stratify: false,
        }
    }
}

impl SplitConfig {
    pub fn new(test_fraction: f64) -> Self {
        Self {
            test_fraction,
            ..Default::default()
        }
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.stratify = stratify;
        self
    }

    /// Check the fraction and return `(n_train, n_test)` for `n_samples`
    pub fn sizes(&self, n_samples: usize) -> Result<(usize, usize)> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(EvalError::InvalidConfiguration(format!(
                "test fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        let n_test = (self.test_fraction * n_samples as f64).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(EvalError::InvalidConfiguration(format!(
                "test fraction {} leaves an empty subset for {} samples",
                self.test_fraction, n_samples
            )));
        }
        Ok((n_train, n_test))
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Disjoint train and test subsets covering the source dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Source row of each training example
    pub train_indices: Vec<usize>,
    /// Source row of each test example
    pub test_indices: Vec<usize>,
}

/// Partition a dataset into train and test subsets
pub fn train_test_split(dataset: &Dataset, config: &SplitConfig) -> Result<Split> {
    let (n_train, n_test) = config.sizes(dataset.n_samples())?;

    let (train_indices, test_indices) = if config.stratify {
        stratified_indices(dataset.labels(), n_test, config)
    } else {
        let mut indices: Vec<usize> = (0..dataset.n_samples()).collect();
        if config.shuffle {
            indices.shuffle(&mut config.rng());
        }
        let test = indices.split_off(n_train);
        (indices, test)
    };

    Ok(Split {
        train: dataset.select(&train_indices)?,
        test: dataset.select(&test_indices)?,
        train_indices,
        test_indices,
    })
}

/// Allocate `n_test` across classes by largest remainder, then draw within each class
fn stratified_indices(labels: &[usize], n_test: usize, config: &SplitConfig) -> (Vec<usize>, Vec<usize>) {
    let n_samples = labels.len();
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(idx);
    }

    let mut quotas: Vec<(usize, usize, f64)> = by_class
        .iter()
        .map(|(&class, members)| {
            let exact = members.len() as f64 * n_test as f64 / n_samples as f64;
            (class, exact.floor() as usize, exact - exact.floor())
        })
        .collect();

    let allocated: usize = quotas.iter().map(|q| q.1).sum();
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| {
        quotas[b].2
            .partial_cmp(&quotas[a].2)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for &i in order.iter().cycle().take(n_test.saturating_sub(allocated)) {
        quotas[i].1 += 1;
    }

    let mut rng = config.rng();
    let mut train = Vec::with_capacity(n_samples - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (class, quota, _) in quotas {
        let mut members = by_class.remove(&class).unwrap_or_default();
        if config.shuffle {
            members.shuffle(&mut rng);
        }
        let quota = quota.min(members.len());
        let held_out = members.split_off(members.len() - quota);
        train.extend(members);
        test.extend(held_out);
    }

    if config.shuffle {
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);
    } else {
        train.sort_unstable();
        test.sort_unstable();
    }
    (train, test)
}
