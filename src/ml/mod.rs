//! Model fitting and inference primitives.
//!
//! Pure CPU code with no native dependencies: a standardization scaler, a
//! CART decision tree and a random forest built on it. Everything here works
//! on plain `f64` slices; feature meaning lives in `crate::schema`.

pub mod forest;
pub mod metrics;
pub mod scaler;
pub mod tree;

pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use metrics::ConfusionMatrix;
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, Node, TreeParams};

use crate::error::Result;

/// A fitted binary classifier.
pub trait Classifier {
    /// Width of the input vectors the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predict a label in `{0, 1}`.
    fn predict(&self, x: &[f64]) -> Result<u8>;
}
