//! Labeled data: containers, built-in datasets, loading and partitioning
//!
//! - [`Dataset`] - feature matrix paired with integer class labels
//! - [`iris`] - the 150-sample Iris dataset
//! - [`load_csv`] - read a CSV file through polars
//! - [`train_test_split`] - seeded, optionally stratified train/test partition

mod dataset;
mod iris;
mod loader;
mod split;

pub use dataset::Dataset;
pub use iris::{iris, CLASS_NAMES as IRIS_CLASS_NAMES, FEATURE_NAMES as IRIS_FEATURE_NAMES};
pub use loader::{dataset_from_frame, load_csv};
pub use split::{train_test_split, Split, SplitConfig};
