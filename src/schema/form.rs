//! Declarative description of the screening form.
//!
//! The HTML page, the `/api/schema` endpoint and server-side bound checks are
//! all generated from `form_fields()`.

use serde::Serialize;

use super::categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInformation,
    BloodMetrics,
    HeartActivity,
    ExerciseFactors,
    Symptoms,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::PersonalInformation,
        Section::BloodMetrics,
        Section::HeartActivity,
        Section::ExerciseFactors,
        Section::Symptoms,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::PersonalInformation => "Personal Information",
            Section::BloodMetrics => "Blood Metrics",
            Section::HeartActivity => "Heart Activity",
            Section::ExerciseFactors => "Exercise Factors",
            Section::Symptoms => "Symptoms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Integer {
        min: i64,
        max: i64,
        default: i64,
    },
    Decimal {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Choice {
        options: Vec<&'static str>,
        default: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Matches the feature name and the form/JSON key.
    pub name: &'static str,
    pub label: &'static str,
    pub help: &'static str,
    pub section: Section,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FormField {
    fn integer(
        name: &'static str,
        label: &'static str,
        help: &'static str,
        section: Section,
        (min, max, default): (i64, i64, i64),
    ) -> Self {
        Self {
            name,
            label,
            help,
            section,
            kind: FieldKind::Integer { min, max, default },
        }
    }

    fn choice<C: Categorical>(
        label: &'static str,
        help: &'static str,
        section: Section,
        default: C,
    ) -> Self {
        Self {
            name: C::FIELD,
            label,
            help,
            section,
            kind: FieldKind::Choice {
                options: C::labels(),
                default: default.label(),
            },
        }
    }
}

/// All form fields in display order.
pub fn form_fields() -> Vec<FormField> {
    use Section::*;

    vec![
        FormField::integer(
            "age",
            "Age (years)",
            "Enter your current age",
            PersonalInformation,
            (18, 120, 45),
        ),
        FormField::choice(
            "Gender",
            "Biological sex is an important factor in heart health",
            PersonalInformation,
            Sex::Female,
        ),
        FormField::integer(
            "resting_bp",
            "Resting Blood Pressure (mmHg)",
            "Measured at rest, in millimeters of mercury",
            BloodMetrics,
            (80, 200, 120),
        ),
        FormField::integer(
            "cholesterol",
            "Cholesterol Level (mg/dL)",
            "Your total serum cholesterol level",
            BloodMetrics,
            (100, 600, 200),
        ),
        FormField::choice(
            "Fasting Blood Sugar > 120 mg/dL",
            "High fasting blood sugar indicates diabetes risk",
            BloodMetrics,
            FastingBloodSugar::No,
        ),
        FormField::integer(
            "max_heart_rate",
            "Maximum Heart Rate (bpm)",
            "Highest heart rate achieved during exercise",
            HeartActivity,
            (60, 220, 150),
        ),
        FormField::choice(
            "Resting ECG Results",
            "Results from your last electrocardiogram",
            HeartActivity,
            RestingEcg::Normal,
        ),
        FormField::choice(
            "ST Segment Slope",
            "Slope of ST segment during peak exercise",
            HeartActivity,
            StSlope::Upward,
        ),
        FormField::choice(
            "Exercise-Induced Chest Pain",
            "Chest pain during physical activity",
            ExerciseFactors,
            ExerciseAngina::No,
        ),
        FormField {
            name: "oldpeak",
            label: "Old peak",
            help: "ST segment depression induced by exercise relative to rest",
            section: ExerciseFactors,
            kind: FieldKind::Decimal {
                min: 0.0,
                max: 10.0,
                step: 0.1,
                default: 1.0,
            },
        },
        FormField::choice(
            "Chest Pain Type",
            "Description of any chest pain experienced",
            Symptoms,
            ChestPainType::TypicalAngina,
        ),
    ]
}

/// Look up one field by feature name.
pub fn field(name: &str) -> Option<FormField> {
    form_fields().into_iter().find(|f| f.name == name)
}
