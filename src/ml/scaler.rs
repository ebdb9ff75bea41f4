//! Per-feature standardization (z-score).

use serde::{Deserialize, Serialize};

use crate::error::{GuardianError, Result};

/// Fitted standardization: `(x - mean) / scale`.
///
/// `variance` is the population variance of each training column and
/// `scale` its square root, except that near-constant columns get a scale
/// of 1.0 so they pass through centered instead of exploding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
    pub scale: Vec<f64>,
    pub n_samples: usize,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(GuardianError::Dataset(
                "cannot fit scaler on zero rows".to_string(),
            ));
        };
        let n_features = first.len();
        if n_features == 0 {
            return Err(GuardianError::Dataset(
                "cannot fit scaler on zero features".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0_f64; n_features];
        for row in rows {
            if row.len() != n_features {
                return Err(GuardianError::DimensionMismatch {
                    expected: n_features,
                    actual: row.len(),
                });
            }
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = vec![0.0_f64; n_features];
        for row in rows {
            for ((var, v), m) in variance.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *var += d * d;
            }
        }
        for var in &mut variance {
            *var /= n;
        }

        let scale = variance
            .iter()
            .map(|v| {
                let s = v.sqrt();
                if s < 10.0 * f64::EPSILON {
                    1.0
                } else {
                    s
                }
            })
            .collect();

        let scaler = Self {
            mean,
            variance,
            scale,
            n_samples: rows.len(),
        };
        scaler.validate().map_err(GuardianError::Dataset)?;
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let n = self.mean.len();
        if n == 0 {
            return Err("scaler has no features".to_string());
        }
        if self.variance.len() != n || self.scale.len() != n {
            return Err(format!(
                "scaler length mismatch: mean {}, variance {}, scale {}",
                n,
                self.variance.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err("scaler mean contains non-finite values".to_string());
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("scaler scale must be finite and > 0".to_string());
        }
        Ok(())
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.n_features() {
            return Err(GuardianError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.len(),
            });
        }
        Ok(x
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}
