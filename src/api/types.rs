use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::inference::{Prediction, RiskOutcome, DISCLAIMER};
use crate::schema::{FormField, Section};
use crate::services::MetricsSnapshot;

// ============================================================================
// Prediction Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub label: u8,
    pub outcome: RiskOutcome,
    pub headline: String,
    pub message: String,
    pub advice: String,
    pub disclaimer: String,
    pub model_id: Uuid,
}

impl PredictResponse {
    pub fn new(prediction: &Prediction, model_id: Uuid) -> Self {
        let outcome = prediction.outcome;
        Self {
            label: prediction.label,
            outcome,
            headline: outcome.headline().to_string(),
            message: outcome.summary().to_string(),
            advice: outcome.advice().to_string(),
            disclaimer: DISCLAIMER.to_string(),
            model_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

// ============================================================================
// Schema Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub schema_version: u32,
    pub feature_names: Vec<&'static str>,
    pub sections: Vec<SectionSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSchema {
    pub id: Section,
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub schema_version: u32,
    pub trees: usize,
    pub metrics: MetricsSnapshot,
}
