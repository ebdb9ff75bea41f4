//! Online inference stage: encode → scale → classify → outcome.

pub mod outcome;
pub mod service;

pub use outcome::{RiskOutcome, DISCLAIMER, FOOTER, HEALTH_TIPS};
pub use service::{InferenceService, Prediction};
