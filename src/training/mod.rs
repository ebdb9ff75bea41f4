//! Offline training stage.
//!
//! Runs once as a batch job: load the labelled CSV, fit the scaler and the
//! forest, persist both. It never serves predictions.

pub mod dataset;
pub mod pipeline;

pub use dataset::{load_csv, normalize_column_name, parse_csv, Dataset};
pub use pipeline::{fit, run, TrainingOptions, TrainingReport};
