//! Binary classification scores.

use serde::Serialize;

use super::Classifier;
use crate::error::{GuardianError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, actual: u8, predicted: u8) {
        match (actual, predicted) {
            (1, 1) => self.true_positive += 1,
            (0, 0) => self.true_negative += 1,
            (0, _) => self.false_positive += 1,
            _ => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Sensitivity: share of actual positives that were flagged.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Score `model` on already-scaled rows.
pub fn evaluate<C: Classifier + ?Sized>(
    model: &C,
    x: &[Vec<f64>],
    y: &[u8],
) -> Result<ConfusionMatrix> {
    if x.len() != y.len() {
        return Err(GuardianError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let mut cm = ConfusionMatrix::default();
    for (row, actual) in x.iter().zip(y) {
        cm.record(*actual, model.predict(row)?);
    }
    Ok(cm)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold;

    impl Classifier for Threshold {
        fn n_features(&self) -> usize {
            1
        }

        fn predict(&self, x: &[f64]) -> Result<u8> {
            Ok(u8::from(x[0] > 0.0))
        }
    }

    #[test]
    fn scores_a_simple_model() {
        let x = vec![vec![1.0], vec![-1.0], vec![2.0], vec![-2.0], vec![0.5]];
        let y = vec![1, 0, 0, 1, 1];
        let cm = evaluate(&Threshold, &x, &y).unwrap();

        assert_eq!(cm.true_positive, 2);
        assert_eq!(cm.true_negative, 1);
        assert_eq!(cm.false_positive, 1);
        assert_eq!(cm.false_negative, 1);
        assert_eq!(cm.total(), 5);
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.specificity() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix_scores_zero() {
        let cm = ConfusionMatrix::default();
        assert_eq!(cm.accuracy(), 0.0);
        assert_eq!(cm.recall(), 0.0);
    }
}
