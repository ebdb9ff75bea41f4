use serde::{Deserialize, Serialize};

use super::categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
};
use super::FeatureVector;

/// One patient's measurements as entered on the form.
///
/// Numeric fields are in human units (years, mmHg, mg/dL, bpm, mm of ST
/// depression). Categorical fields carry their typed option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub age: i64,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_bp: i64,
    pub cholesterol: i64,
    pub fasting_blood_sugar: FastingBloodSugar,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: i64,
    pub exercise_angina: ExerciseAngina,
    pub oldpeak: f64,
    pub st_slope: StSlope,
}

impl PatientInput {
    /// Encode into the raw (unscaled) feature vector.
    pub fn encode(&self) -> FeatureVector {
        [
            self.age as f64,
            self.sex.code() as f64,
            self.chest_pain_type.code() as f64,
            self.resting_bp as f64,
            self.cholesterol as f64,
            self.fasting_blood_sugar.code() as f64,
            self.resting_ecg.code() as f64,
            self.max_heart_rate as f64,
            self.exercise_angina.code() as f64,
            self.oldpeak,
            self.st_slope.code() as f64,
        ]
    }
}

impl Default for PatientInput {
    /// The form's initial values.
    fn default() -> Self {
        Self {
            age: 45,
            sex: Sex::Female,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: FastingBloodSugar::No,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::No,
            oldpeak: 1.0,
            st_slope: StSlope::Upward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_patient_in_schema_order() {
        let input = PatientInput {
            age: 45,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::Asymptomatic,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: FastingBloodSugar::No,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::No,
            oldpeak: 1.0,
            st_slope: StSlope::Upward,
        };

        assert_eq!(
            input.encode(),
            [45.0, 1.0, 4.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn deserializes_option_labels() {
        let json = r#"{
            "age": 61,
            "sex": "Female",
            "chest_pain_type": "Non-anginal Pain",
            "resting_bp": 140,
            "cholesterol": 260,
            "fasting_blood_sugar": "Yes",
            "resting_ecg": "ST-T Wave Abnormality",
            "max_heart_rate": 120,
            "exercise_angina": "Yes",
            "oldpeak": 2.5,
            "st_slope": "Flat"
        }"#;
        let input: PatientInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input.encode(),
            [61.0, 0.0, 3.0, 140.0, 260.0, 1.0, 1.0, 120.0, 1.0, 2.5, 2.0]
        );
    }

    #[test]
    fn rejects_unknown_option_label() {
        let json = serde_json::to_value(PatientInput::default()).unwrap();
        let mut obj = json.as_object().unwrap().clone();
        obj.insert("st_slope".into(), serde_json::json!("Sideways"));
        let res: Result<PatientInput, _> = serde_json::from_value(obj.into());
        assert!(res.is_err());
    }
}
