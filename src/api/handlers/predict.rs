use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{error, warn};

use crate::api::{state::AppState, types::*};
use crate::schema::PatientInput;
use crate::validation::validate_patient;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /api/predict
pub async fn predict_json(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PatientInput>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        state.metrics.inc_rejected();
        warn!(error = %rejection.body_text(), "malformed prediction request");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(
                "invalid request body",
                vec![rejection.body_text()],
            )),
        )
    })?;

    if let Err(details) = validate_patient(&input) {
        state.metrics.inc_rejected();
        warn!(errors = details.len(), "prediction input out of bounds");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("validation failed", details)),
        ));
    }

    let prediction = state.service.predict(&input).map_err(|e| {
        if e.is_client_error() {
            state.metrics.inc_rejected();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new("validation failed", vec![e.to_string()])),
            )
        } else {
            state.metrics.inc_failures();
            error!(error = %e, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("prediction failed", Vec::new())),
            )
        }
    })?;

    state.metrics.record_prediction(prediction.outcome);
    Ok(Json(PredictResponse::new(
        &prediction,
        state.service.metadata().model_id,
    )))
}
