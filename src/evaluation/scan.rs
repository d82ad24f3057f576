//! Accuracy as a function of the held-out fraction

use super::metrics::accuracy;
use crate::data::{train_test_split, Dataset, SplitConfig};
use crate::error::Result;
use crate::training::Trainer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Held-out fractions swept by default
pub const DEFAULT_SCAN_FRACTIONS: [f64; 10] = [0.01, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// One point of a split-fraction scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitScanPoint {
    pub test_fraction: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

/// Train and score a fresh model for each held-out fraction.
///
/// Every fraction is checked against the dataset size before any training; the
/// remaining split options come from `base`. Points are returned in input order.
pub fn scan_split_fractions<T: Trainer>(
    trainer: &T,
    dataset: &Dataset,
    fractions: &[f64],
    base: &SplitConfig,
) -> Result<Vec<SplitScanPoint>> {
    let configs = fractions
        .iter()
        .map(|&fraction| {
            let config = SplitConfig {
                test_fraction: fraction,
                ..base.clone()
            };
            config.sizes(dataset.n_samples())?;
            Ok(config)
        })
        .collect::<Result<Vec<_>>>()?;
    info!(points = configs.len(), samples = dataset.n_samples(), "scanning split fractions");

    configs
        .iter()
        .map(|config| {
            let split = train_test_split(dataset, config)?;
            let model = trainer.train_on(&split.train)?;
            let point = SplitScanPoint {
                test_fraction: config.test_fraction,
                n_train: split.train.n_samples(),
                n_test: split.test.n_samples(),
                train_accuracy: accuracy(&model, split.train.features(), split.train.labels())?,
                test_accuracy: accuracy(&model, split.test.features(), split.test.labels())?,
            };
            debug!(fraction = point.test_fraction, test_accuracy = point.test_accuracy, "scan point");
            Ok(point)
        })
        .collect()
}
