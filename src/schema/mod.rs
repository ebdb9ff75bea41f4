//! Shared feature schema.
//!
//! Training and inference both import this module: feature order, dataset
//! column aliases and categorical codes live here and nowhere else. Artifacts
//! record `SCHEMA_VERSION` and `FEATURE_NAMES` so a model trained against a
//! different layout is refused at load time.

pub mod categorical;
pub mod form;
pub mod input;

use serde::{Deserialize, Serialize};

use crate::error::{GuardianError, Result};

pub use categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
};
pub use form::{field, form_fields, FieldKind, FormField, Section};
pub use input::PatientInput;

/// Bump whenever feature order, names or categorical codes change.
pub const SCHEMA_VERSION: u32 = 1;

pub const FEATURE_COUNT: usize = 11;

/// One encoded patient record, in `FEATURE_NAMES` order.
pub type FeatureVector = [f64; FEATURE_COUNT];

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_bp",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_angina",
    "oldpeak",
    "st_slope",
];

pub const TARGET_COLUMN: &str = "target";

/// Alternative (already normalized) column names seen in published copies
/// of the dataset.
pub fn column_aliases(feature: &str) -> &'static [&'static str] {
    match feature {
        "chest_pain_type" => &["chest_pain"],
        "resting_bp" => &["resting_bp_s", "restingbp"],
        "fasting_blood_sugar" => &["fasting_bs", "fastingbs"],
        "max_heart_rate" => &["max_hr", "maxhr"],
        "st_slope" => &["st_slope_type"],
        _ => &[],
    }
}

/// Schema fingerprint stored inside every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub feature_names: Vec<String>,
}

impl FeatureSchema {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Fails unless `self` describes exactly the compiled-in layout.
    pub fn ensure_current(&self) -> Result<()> {
        if self.version != SCHEMA_VERSION {
            return Err(GuardianError::SchemaMismatch(format!(
                "artifact schema version {} != supported version {}",
                self.version, SCHEMA_VERSION
            )));
        }
        let expected = Self::current();
        if self.feature_names != expected.feature_names {
            return Err(GuardianError::SchemaMismatch(format!(
                "artifact features {:?} != expected {:?}",
                self.feature_names, expected.feature_names
            )));
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_schema_is_accepted() {
        assert!(FeatureSchema::current().ensure_current().is_ok());
    }

    #[test]
    fn version_bump_is_rejected() {
        let mut schema = FeatureSchema::current();
        schema.version += 1;
        assert!(matches!(
            schema.ensure_current(),
            Err(GuardianError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn reordered_features_are_rejected() {
        let mut schema = FeatureSchema::current();
        schema.feature_names.swap(0, 1);
        assert!(schema.ensure_current().is_err());
    }

    #[test]
    fn aliases_never_shadow_canonical_names() {
        for name in FEATURE_NAMES {
            for alias in column_aliases(name) {
                assert!(!FEATURE_NAMES.contains(alias), "{alias} is a canonical name");
            }
        }
    }
}
