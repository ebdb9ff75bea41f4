use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::api::{state::AppState, types::*};
use crate::schema::{form_fields, Section, FEATURE_NAMES, SCHEMA_VERSION};

/// GET /healthz -- liveness probe
pub async fn liveness() -> &'static str {
    "ok"
}

/// GET /health -- model identity and counters
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let metadata = state.service.metadata();
    Json(HealthResponse {
        status: "ok".to_string(),
        model_id: metadata.model_id,
        trained_at: metadata.trained_at,
        schema_version: metadata.schema.version,
        trees: state.service.classifier().trees.len(),
        metrics: state.metrics.snapshot(),
    })
}

/// GET /api/schema
pub async fn get_schema() -> Json<SchemaResponse> {
    let fields = form_fields();
    let sections = Section::ALL
        .iter()
        .map(|section| SectionSchema {
            id: *section,
            title: section.title(),
            fields: fields
                .iter()
                .filter(|f| f.section == *section)
                .cloned()
                .collect(),
        })
        .collect();

    Json(SchemaResponse {
        schema_version: SCHEMA_VERSION,
        feature_names: FEATURE_NAMES.to_vec(),
        sections,
    })
}

/// GET /metrics -- Prometheus text format
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.prometheus(),
    )
}
