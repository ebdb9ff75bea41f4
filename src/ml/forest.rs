//! Random forest: bootstrap-aggregated CART trees with per-split feature
//! subsampling, combined by majority vote.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tree::{DecisionTree, TreeParams};
use super::Classifier;
use crate::error::{GuardianError, Result};

/// How many features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => *k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters.
///
/// `Default` is the fixed configuration used for the published model:
/// 100 trees, unlimited depth, split needs 2 samples, leaves hold at least
/// 1, `sqrt(n_features)` candidates per split, bootstrap on, seed 42.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.n_trees == 0 {
            errors.push("n_trees must be > 0".to_string());
        }
        if self.min_samples_split < 2 {
            errors.push("min_samples_split must be >= 2".to_string());
        }
        if self.min_samples_leaf == 0 {
            errors.push("min_samples_leaf must be >= 1".to_string());
        }
        if let MaxFeatures::Count(0) = self.max_features {
            errors.push("max_features count must be > 0".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub params: ForestParams,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on rows `x` with binary labels `y`.
    ///
    /// Tree `i` draws from its own `ChaCha8Rng` seeded with `seed + i`, so
    /// the same data and params always give the same forest.
    pub fn fit(x: &[Vec<f64>], y: &[u8], params: ForestParams) -> Result<Self> {
        params
            .validate()
            .map_err(|errs| GuardianError::Validation(errs.join("; ")))?;
        if x.is_empty() {
            return Err(GuardianError::Dataset(
                "cannot fit forest on zero rows".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(GuardianError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if let Some(bad) = y.iter().find(|l| **l > 1) {
            return Err(GuardianError::Validation(format!(
                "labels must be 0 or 1, found {bad}"
            )));
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().find(|r| r.len() != n_features) {
            return Err(GuardianError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: params.max_features.resolve(n_features),
        };

        let n = x.len();
        let mut trees = Vec::with_capacity(params.n_trees);
        for t in 0..params.n_trees {
            let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(t as u64));
            let indices: Vec<usize> = if params.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let tree = DecisionTree::fit(x, y, &indices, &tree_params, &mut rng)?;
            debug!(
                tree = t,
                nodes = tree.nodes.len(),
                depth = tree.depth(),
                "grew tree"
            );
            trees.push(tree);
        }

        Ok(Self {
            params,
            n_features,
            trees,
        })
    }

    fn votes(&self, x: &[f64]) -> Result<usize> {
        if x.len() != self.n_features {
            return Err(GuardianError::DimensionMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        let mut votes = 0;
        for tree in &self.trees {
            votes += usize::from(tree.predict(x)? == 1);
        }
        Ok(votes)
    }

    /// Mean leaf probability of class 1 across trees.
    pub fn mean_probability(&self, x: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_proba(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.n_features == 0 {
            return Err("forest n_features must be > 0".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features != self.n_features {
                return Err(format!(
                    "tree {i} expects {} features, forest expects {}",
                    tree.n_features, self.n_features
                ));
            }
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Majority vote; an exact tie falls back to the mean leaf probability,
    /// and a tie there to class 0.
    fn predict(&self, x: &[f64]) -> Result<u8> {
        let votes = self.votes(x)?;
        let against = self.trees.len() - votes;
        let label = match votes.cmp(&against) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => 0,
            std::cmp::Ordering::Equal => u8::from(self.mean_probability(x)? > 0.5),
        };
        Ok(label)
    }
}
