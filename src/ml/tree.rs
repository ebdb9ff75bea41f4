//! CART decision tree for binary classification (Gini impurity).
//!
//! Nodes live in a flat arena so arbitrarily deep trees serialize without
//! nested JSON.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{GuardianError, Result};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split before settling for the best found.
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Fraction of class 1 among the training samples reaching this leaf.
        p_positive: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        /// Samples with `x[feature] <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity; lower is better.
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree on the rows selected by `indices` (may contain repeats).
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[u8],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GuardianError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if indices.is_empty() {
            return Err(GuardianError::Dataset(
                "cannot grow a tree on zero samples".to_string(),
            ));
        }
        let n_features = x[indices[0]].len();
        if n_features == 0 {
            return Err(GuardianError::Dataset(
                "cannot grow a tree on zero features".to_string(),
            ));
        }

        let mut tree = Self {
            n_features,
            nodes: Vec::new(),
        };
        let mut work = indices.to_vec();
        tree.grow(x, y, &mut work, 0, params, rng);
        Ok(tree)
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        x: &[Vec<f64>],
        y: &[u8],
        indices: &mut [usize],
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let positives = indices.iter().filter(|&&i| y[i] == 1).count();
        let n = indices.len();
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            p_positive: positives as f64 / n as f64,
            samples: n,
        });

        let pure = positives == 0 || positives == n;
        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || n < params.min_samples_split.max(2) {
            return id;
        }

        let Some(split) = self.best_split(x, y, indices, params, rng) else {
            return id;
        };

        // Partition in place: left block first.
        let mut mid = 0;
        for k in 0..n {
            if x[indices[k]][split.feature] <= split.threshold {
                indices.swap(k, mid);
                mid += 1;
            }
        }
        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.grow(x, y, left_idx, depth + 1, params, rng);
        let right = self.grow(x, y, right_idx, depth + 1, params, rng);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Search features in random order. Keeps going past `max_features` until
    /// at least one valid split has been seen.
    fn best_split<R: Rng + ?Sized>(
        &self,
        x: &[Vec<f64>],
        y: &[u8],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);

        let min_leaf = params.min_samples_leaf.max(1);
        let n = indices.len();
        let total_pos = indices.iter().filter(|&&i| y[i] == 1).count();
        let mut best: Option<SplitCandidate> = None;
        let mut sorted: Vec<(f64, u8)> = Vec::with_capacity(n);

        for (visited, &feature) in features.iter().enumerate() {
            if visited >= params.max_features.max(1) && best.is_some() {
                break;
            }

            sorted.clear();
            sorted.extend(indices.iter().map(|&i| (x[i][feature], y[i])));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_pos = 0usize;
            for k in 0..n - 1 {
                if sorted[k].1 == 1 {
                    left_pos += 1;
                }
                let left_n = k + 1;
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }
                let (lo, hi) = (sorted[k].0, sorted[k + 1].0);
                if hi <= lo {
                    continue;
                }

                let impurity = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(total_pos - left_pos, right_n))
                    / n as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    // Midpoint can round up to `hi` for adjacent floats.
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }

    /// Probability of class 1 at the leaf reached by `x`.
    pub fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.n_features {
            return Err(GuardianError::DimensionMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        let mut id = 0;
        // Bounded walk; a malformed arena must not loop forever.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(id) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if x[*feature] <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { p_positive, .. }) => return Ok(*p_positive),
                None => break,
            }
        }
        Err(GuardianError::Internal(format!(
            "decision tree walk escaped the node arena at {id}"
        )))
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes.get(id) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { p_positive, .. } => {
                    if !(0.0..=1.0).contains(p_positive) {
                        return Err(format!("node {id} has probability {p_positive}"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(format!("node {id} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {id} has non-finite threshold"));
                    }
                    // Children are always pushed after their parent.
                    if *left <= id
                        || *right <= id
                        || *left >= self.nodes.len()
                        || *right >= self.nodes.len()
                    {
                        return Err(format!("node {id} has invalid children"));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Classifier for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &[f64]) -> Result<u8> {
        Ok(u8::from(self.predict_proba(x)? > 0.5))
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
