use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::outcome::RiskOutcome;
use crate::error::{GuardianError, Result};
use crate::ml::{metrics, Classifier, ConfusionMatrix, RandomForest, StandardScaler};
use crate::persistence::{ArtifactBundle, ArtifactMetadata, ArtifactPaths};
use crate::schema::{FeatureVector, PatientInput};

/// Result of one screening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: u8,
    pub outcome: RiskOutcome,
    /// Encoded, unscaled features that were fed to the scaler.
    pub features: FeatureVector,
}

/// Load-once holder of the fitted scaler and classifier.
///
/// Cheap to clone; all clones share the same read-only model.
#[derive(Debug, Clone)]
pub struct InferenceService {
    scaler: Arc<StandardScaler>,
    classifier: Arc<RandomForest>,
    metadata: Arc<ArtifactMetadata>,
}

impl InferenceService {
    /// Read and verify artifacts. Callers treat failure as fatal.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let bundle = ArtifactBundle::load(paths)?;
        let service = Self::from_bundle(bundle);
        info!(
            model_id = %service.metadata.model_id,
            trained_at = %service.metadata.trained_at,
            trees = service.classifier.trees.len(),
            schema_version = service.metadata.schema.version,
            "inference service ready"
        );
        Ok(service)
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self {
            scaler: Arc::new(bundle.scaler.scaler),
            classifier: Arc::new(bundle.classifier.model),
            metadata: Arc::new(bundle.classifier.metadata),
        }
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Encode → scale → classify → outcome.
    pub fn predict(&self, input: &PatientInput) -> Result<Prediction> {
        self.predict_features(&input.encode())
    }

    /// Same as `predict`, starting from an already encoded vector.
    pub fn predict_features(&self, features: &FeatureVector) -> Result<Prediction> {
        if let Some(i) = features.iter().position(|v| !v.is_finite()) {
            return Err(GuardianError::Validation(format!(
                "feature {i} is not a finite number"
            )));
        }
        let scaled = self.scaler.transform(features)?;
        let label = self.classifier.predict(&scaled)?;
        let outcome = RiskOutcome::from_label(label)?;
        debug!(label, outcome = ?outcome, "prediction");
        Ok(Prediction {
            label,
            outcome,
            features: *features,
        })
    }

    /// Score the loaded model against labelled, unscaled rows.
    pub fn evaluate(&self, x: &[Vec<f64>], y: &[u8]) -> Result<ConfusionMatrix> {
        let scaled = self.scaler.transform_rows(x)?;
        metrics::evaluate(self.classifier.as_ref(), &scaled, y)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ml::{ForestParams, MaxFeatures};
    use crate::persistence::{ClassifierArtifact, ScalerArtifact};
    use crate::schema::{
        ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope, FEATURE_COUNT,
    };

    /// Service trained on a rule: asymptomatic chest pain with exercise
    /// angina is risky.
    pub(crate) fn rule_service() -> InferenceService {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..80u32 {
            let risky = i % 2 == 0;
            let mut input = PatientInput {
                age: 30 + (i / 2 % 50) as i64,
                cholesterol: 150 + (i / 2 * 3 % 200) as i64,
                ..PatientInput::default()
            };
            if risky {
                input.chest_pain_type = ChestPainType::Asymptomatic;
                input.exercise_angina = ExerciseAngina::Yes;
                input.st_slope = StSlope::Flat;
            }
            x.push(input.encode().to_vec());
            y.push(u8::from(risky));
        }
        let scaler = StandardScaler::fit(&x).unwrap();
        let model = RandomForest::fit(
            &scaler.transform_rows(&x).unwrap(),
            &y,
            ForestParams {
                n_trees: 9,
                max_features: MaxFeatures::All,
                ..ForestParams::default()
            },
        )
        .unwrap();
        let metadata = ArtifactMetadata::new(x.len());
        let bundle = ArtifactBundle::new(
            ClassifierArtifact {
                metadata: metadata.clone(),
                model,
            },
            ScalerArtifact { metadata, scaler },
        )
        .unwrap();
        InferenceService::from_bundle(bundle)
    }

    #[test]
    fn flags_risky_profile() {
        let service = rule_service();
        let risky = PatientInput {
            sex: Sex::Male,
            chest_pain_type: ChestPainType::Asymptomatic,
            exercise_angina: ExerciseAngina::Yes,
            st_slope: StSlope::Flat,
            ..PatientInput::default()
        };
        let p = service.predict(&risky).unwrap();
        assert_eq!(p.label, 1);
        assert_eq!(p.outcome, RiskOutcome::RiskIndicators);

        let healthy = service.predict(&PatientInput::default()).unwrap();
        assert_eq!(healthy.outcome, RiskOutcome::NoRiskIndicators);
    }

    #[test]
    fn every_in_bounds_combination_yields_a_binary_label() {
        let service = rule_service();
        for age in [18, 45, 120] {
            for bp in [80, 200] {
                for chol in [100, 600] {
                    for hr in [60, 220] {
                        for oldpeak in [0.0, 10.0] {
                            for (sex, cp, fbs, ecg, ang, slope) in [
                                (
                                    Sex::Female,
                                    ChestPainType::TypicalAngina,
                                    FastingBloodSugar::No,
                                    RestingEcg::Normal,
                                    ExerciseAngina::No,
                                    StSlope::Upward,
                                ),
                                (
                                    Sex::Male,
                                    ChestPainType::AtypicalAngina,
                                    FastingBloodSugar::Yes,
                                    RestingEcg::StTWaveAbnormality,
                                    ExerciseAngina::Yes,
                                    StSlope::Flat,
                                ),
                                (
                                    Sex::Male,
                                    ChestPainType::NonAnginalPain,
                                    FastingBloodSugar::No,
                                    RestingEcg::LeftVentricularHypertrophy,
                                    ExerciseAngina::No,
                                    StSlope::Downward,
                                ),
                                (
                                    Sex::Female,
                                    ChestPainType::Asymptomatic,
                                    FastingBloodSugar::Yes,
                                    RestingEcg::Normal,
                                    ExerciseAngina::Yes,
                                    StSlope::Downward,
                                ),
                            ] {
                                let input = PatientInput {
                                    age,
                                    sex,
                                    chest_pain_type: cp,
                                    resting_bp: bp,
                                    cholesterol: chol,
                                    fasting_blood_sugar: fbs,
                                    resting_ecg: ecg,
                                    max_heart_rate: hr,
                                    exercise_angina: ang,
                                    oldpeak,
                                    st_slope: slope,
                                };
                                let p = service.predict(&input).unwrap();
                                assert!(p.label <= 1);
                                assert_eq!(p.outcome.label(), p.label);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_values_are_scaled_as_is() {
        let service = rule_service();
        let extreme = PatientInput {
            age: 500,
            cholesterol: -20,
            ..PatientInput::default()
        };
        assert!(service.predict(&extreme).is_ok());
    }

    #[test]
    fn non_finite_features_are_rejected() {
        let service = rule_service();
        let mut features = PatientInput::default().encode();
        features[9] = f64::INFINITY;
        let err = service.predict_features(&features).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(features.len(), FEATURE_COUNT);
    }

    #[test]
    fn evaluates_labelled_rows() {
        let service = rule_service();
        let risky = PatientInput {
            chest_pain_type: ChestPainType::Asymptomatic,
            exercise_angina: ExerciseAngina::Yes,
            st_slope: StSlope::Flat,
            ..PatientInput::default()
        };
        let x = vec![
            risky.encode().to_vec(),
            PatientInput::default().encode().to_vec(),
        ];
        let cm = service.evaluate(&x, &[1, 0]).unwrap();
        assert_eq!(cm.total(), 2);
        assert_eq!(cm.accuracy(), 1.0);
    }

    #[test]
    fn clones_share_the_model() {
        let a = rule_service();
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.classifier, &b.classifier));
        assert_eq!(a.metadata().model_id, b.metadata().model_id);
    }
}
