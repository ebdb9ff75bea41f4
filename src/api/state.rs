use std::sync::Arc;

use crate::inference::InferenceService;
use crate::services::Metrics;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub service: InferenceService,

    /// Prediction counters and the service clock
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(service: InferenceService) -> Self {
        Self {
            service,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
