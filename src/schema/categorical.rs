//! Categorical fields and their stable integer codes.
//!
//! The codes here are the ones the training dataset uses. Training reads the
//! codes straight from the CSV and inference produces them from these tables,
//! so both stages agree by construction.

use serde::{Deserialize, Serialize};

/// A categorical input with a fixed option table.
///
/// `OPTIONS` lists every variant with its user-facing label and dataset code.
/// Labels and codes are each unique within a table.
pub trait Categorical: Copy + PartialEq + Sized + 'static {
    /// Feature name this category encodes.
    const FIELD: &'static str;
    const OPTIONS: &'static [(Self, &'static str, u8)];

    fn code(self) -> u8 {
        Self::OPTIONS
            .iter()
            .find(|(v, _, _)| *v == self)
            .map(|(_, _, c)| *c)
            .unwrap_or_default()
    }

    fn label(self) -> &'static str {
        Self::OPTIONS
            .iter()
            .find(|(v, _, _)| *v == self)
            .map(|(_, l, _)| *l)
            .unwrap_or_default()
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(v, _, _)| *v)
    }

    /// Exact label match; labels are what the form submits.
    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .find(|(_, l, _)| *l == label.trim())
            .map(|(v, _, _)| *v)
    }

    fn labels() -> Vec<&'static str> {
        Self::OPTIONS.iter().map(|(_, l, _)| *l).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Categorical for Sex {
    const FIELD: &'static str = "sex";
    const OPTIONS: &'static [(Self, &'static str, u8)] =
        &[(Sex::Female, "Female", 0), (Sex::Male, "Male", 1)];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestPainType {
    #[serde(rename = "Typical Angina")]
    TypicalAngina,
    #[serde(rename = "Atypical Angina")]
    AtypicalAngina,
    #[serde(rename = "Non-anginal Pain")]
    NonAnginalPain,
    Asymptomatic,
}

impl Categorical for ChestPainType {
    const FIELD: &'static str = "chest_pain_type";
    const OPTIONS: &'static [(Self, &'static str, u8)] = &[
        (ChestPainType::TypicalAngina, "Typical Angina", 1),
        (ChestPainType::AtypicalAngina, "Atypical Angina", 2),
        (ChestPainType::NonAnginalPain, "Non-anginal Pain", 3),
        (ChestPainType::Asymptomatic, "Asymptomatic", 4),
    ];
}

/// Fasting blood sugar above 120 mg/dL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FastingBloodSugar {
    No,
    Yes,
}

impl Categorical for FastingBloodSugar {
    const FIELD: &'static str = "fasting_blood_sugar";
    const OPTIONS: &'static [(Self, &'static str, u8)] = &[
        (FastingBloodSugar::No, "No", 0),
        (FastingBloodSugar::Yes, "Yes", 1),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    #[serde(rename = "ST-T Wave Abnormality")]
    StTWaveAbnormality,
    #[serde(rename = "Left Ventricular Hypertrophy")]
    LeftVentricularHypertrophy,
}

impl Categorical for RestingEcg {
    const FIELD: &'static str = "resting_ecg";
    const OPTIONS: &'static [(Self, &'static str, u8)] = &[
        (RestingEcg::Normal, "Normal", 0),
        (RestingEcg::StTWaveAbnormality, "ST-T Wave Abnormality", 1),
        (
            RestingEcg::LeftVentricularHypertrophy,
            "Left Ventricular Hypertrophy",
            2,
        ),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseAngina {
    No,
    Yes,
}

impl Categorical for ExerciseAngina {
    const FIELD: &'static str = "exercise_angina";
    const OPTIONS: &'static [(Self, &'static str, u8)] = &[
        (ExerciseAngina::No, "No", 0),
        (ExerciseAngina::Yes, "Yes", 1),
    ];
}

/// Slope of the ST segment at peak exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSlope {
    Upward,
    Flat,
    Downward,
}

impl Categorical for StSlope {
    const FIELD: &'static str = "st_slope";
    const OPTIONS: &'static [(Self, &'static str, u8)] = &[
        (StSlope::Upward, "Upward", 1),
        (StSlope::Flat, "Flat", 2),
        (StSlope::Downward, "Downward", 3),
    ];
}
