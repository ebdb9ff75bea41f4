pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod ml;
pub mod persistence;
pub mod schema;
pub mod services;
pub mod training;
pub mod validation;

pub use config::AppConfig;
pub use error::{GuardianError, Result};
pub use inference::{InferenceService, Prediction, RiskOutcome};
pub use ml::{ForestParams, RandomForest, StandardScaler};
pub use persistence::{ArtifactBundle, ArtifactMetadata, ArtifactPaths};
pub use schema::{FeatureSchema, PatientInput, FEATURE_NAMES, SCHEMA_VERSION};
pub use services::Metrics;
pub use training::{Dataset, TrainingOptions, TrainingReport};
