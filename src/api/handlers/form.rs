use axum::{extract::State, http::StatusCode, response::Html, Form};
use std::collections::HashMap;
use tracing::{error, warn};

use crate::api::{render, state::AppState};
use crate::validation::parse_form;

/// GET /
pub async fn index() -> Html<String> {
    Html(render::page(&render::default_values(), None, &[]))
}

/// POST /predict -- urlencoded form submission
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let input = match parse_form(&form) {
        Ok(input) => input,
        Err(errors) => {
            state.metrics.inc_rejected();
            warn!(errors = errors.len(), "form submission rejected");
            let page = render::page(&render::submitted_values(&form), None, &errors);
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page));
        }
    };

    match state.service.predict(&input) {
        Ok(prediction) => {
            state.metrics.record_prediction(prediction.outcome);
            let page = render::page(&render::input_values(&input), Some(prediction.outcome), &[]);
            (StatusCode::OK, Html(page))
        }
        Err(e) if e.is_client_error() => {
            state.metrics.inc_rejected();
            let page = render::page(&render::input_values(&input), None, &[e.to_string()]);
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page))
        }
        Err(e) => {
            state.metrics.inc_failures();
            error!(error = %e, "prediction failed");
            let page = render::page(
                &render::input_values(&input),
                None,
                &["The assessment could not be completed. Please try again later.".to_string()],
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page))
        }
    }
}
