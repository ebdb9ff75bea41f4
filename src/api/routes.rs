use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Form pages
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::submit_form))
        // JSON API
        .route("/api/predict", post(handlers::predict_json))
        .route("/api/schema", get(handlers::get_schema))
        // System endpoints
        .route("/healthz", get(handlers::liveness))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        // Add state, tracing and CORS
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::service::tests::rule_service;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::new(rule_service());
        (create_router(state.clone()), state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn risky_json() -> Value {
        json!({
            "age": 58,
            "sex": "Male",
            "chest_pain_type": "Asymptomatic",
            "resting_bp": 140,
            "cholesterol": 260,
            "fasting_blood_sugar": "No",
            "resting_ecg": "Normal",
            "max_heart_rate": 120,
            "exercise_angina": "Yes",
            "oldpeak": 2.0,
            "st_slope": "Flat"
        })
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let (app, _) = app();
        let (status, body) = send(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form method=\"post\" action=\"/predict\">"));
        assert!(body.contains("Personal Information"));
    }

    #[tokio::test]
    async fn api_predict_returns_outcome() {
        let (app, state) = app();
        let (status, body) = send(app, post_json("/api/predict", &risky_json())).await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["label"], 1);
        assert_eq!(v["outcome"], "risk_indicators");
        assert_eq!(v["headline"], "Potential Risk Detected");
        assert_eq!(
            v["model_id"],
            state.service.metadata().model_id.to_string()
        );
        assert!(v["disclaimer"].as_str().unwrap().contains("not medical diagnoses"));
        assert_eq!(state.metrics.snapshot().risk_predictions, 1);
    }

    #[tokio::test]
    async fn api_predict_rejects_out_of_bounds() {
        let (app, state) = app();
        let mut body = risky_json();
        body["age"] = json!(12);
        body["oldpeak"] = json!(11.5);
        let (status, text) = send(app, post_json("/api/predict", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["error"], "validation failed");
        assert_eq!(v["details"].as_array().unwrap().len(), 2);
        assert_eq!(state.metrics.snapshot().rejected_inputs, 1);
        assert_eq!(state.metrics.snapshot().predictions, 0);
    }

    #[tokio::test]
    async fn api_predict_rejects_unknown_option() {
        let (app, _) = app();
        let mut body = risky_json();
        body["chest_pain_type"] = json!("Sharp");
        let (status, text) = send(app, post_json("/api/predict", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["error"], "invalid request body");
    }

    #[tokio::test]
    async fn form_submission_renders_result() {
        let (app, _) = app();
        let body = "age=45&sex=Female&chest_pain_type=Typical+Angina&resting_bp=120&cholesterol=200\
                    &fasting_blood_sugar=No&resting_ecg=Normal&max_heart_rate=150\
                    &exercise_angina=No&oldpeak=1.0&st_slope=Upward";
        let (status, html) = send(app, post_form(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Healthy Heart Indicators"));
        assert!(html.contains("Heart Health Tips"));
    }

    #[tokio::test]
    async fn invalid_form_is_a_422_page() {
        let (app, _) = app();
        let body = "age=abc&sex=Other&chest_pain_type=Typical+Angina&resting_bp=300&cholesterol=200\
                    &fasting_blood_sugar=No&resting_ecg=Normal&max_heart_rate=150\
                    &exercise_angina=No&oldpeak=1.0&st_slope=Upward";
        let (status, html) = send(app, post_form(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Please correct the following"));
        assert!(html.contains("age must be a whole number"));
        assert!(html.contains("value=\"abc\""));
        assert!(!html.contains("class=\"result"));
    }

    #[tokio::test]
    async fn schema_lists_sections_and_fields() {
        let (app, _) = app();
        let (status, body) = send(app, get("/api/schema")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["schema_version"], 1);
        assert_eq!(v["feature_names"].as_array().unwrap().len(), 11);
        assert_eq!(v["sections"].as_array().unwrap().len(), 5);
        assert_eq!(v["sections"][0]["fields"][0]["name"], "age");
        assert_eq!(v["sections"][0]["fields"][0]["type"], "integer");
    }

    #[tokio::test]
    async fn health_reports_model_and_counters() {
        let (app, state) = app();
        let (status, body) = send(app.clone(), get("/healthz")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

        send(app.clone(), post_json("/api/predict", &risky_json())).await;
        let (status, body) = send(app.clone(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["trees"], 9);
        assert_eq!(v["schema_version"], 1);
        assert_eq!(v["metrics"]["predictions"], 1);
        assert!(v["metrics"]["uptime_seconds"].as_i64().unwrap() >= 0);
        assert_eq!(v["model_id"], state.service.metadata().model_id.to_string());

        let (_, text) = send(app, get("/metrics")).await;
        assert!(text.contains("heartguard_predictions_total 1"));
    }
}
