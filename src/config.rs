use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ml::ForestParams;
use crate::persistence::ArtifactPaths;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the screening service
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory holding both artifacts
    pub dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            model_file: "heart_model.json".to_string(),
            scaler_file: "scaler.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// CSV with the 11 predictors and `target`
    pub dataset: PathBuf,
    #[serde(default)]
    pub forest: ForestParams,
    /// Fraction of rows held out for scoring (0.0 = none)
    #[serde(default)]
    pub holdout: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("heart_statlog_cleveland_hungary_final.csv"),
            forest: ForestParams::default(),
            holdout: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("artifacts.dir", ".")?
            .set_default("artifacts.model_file", "heart_model.json")?
            .set_default("artifacts.scaler_file", "scaler.json")?
            .set_default("training.dataset", "heart_statlog_cleveland_hungary_final.csv")?
            .set_default("training.holdout", 0.0)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HEARTGUARD_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HEARTGUARD_SERVER__PORT, etc.)
            // HEARTGUARD_ENV and HEARTGUARD_LOG_DIR land on top-level keys no
            // section reads, so they pass through harmlessly.
            .add_source(
                Environment::with_prefix("HEARTGUARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Built-in configuration, used when no config directory is present
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            artifacts: ArtifactsConfig::default(),
            training: TrainingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            &self.artifacts.dir,
            &self.artifacts.model_file,
            &self.artifacts.scaler_file,
        )
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        if self.server.port == 0 {
            errors.push("server.port must be > 0".to_string());
        }

        if self.artifacts.model_file.trim().is_empty() {
            errors.push("artifacts.model_file must not be empty".to_string());
        }
        if self.artifacts.scaler_file.trim().is_empty() {
            errors.push("artifacts.scaler_file must not be empty".to_string());
        }
        if self.artifacts.model_file == self.artifacts.scaler_file {
            errors.push("artifacts.model_file and artifacts.scaler_file must differ".to_string());
        }

        if !(0.0..1.0).contains(&self.training.holdout) {
            errors.push(format!(
                "training.holdout must be in [0, 1), got {}",
                self.training.holdout
            ));
        }
        if let Err(forest) = self.training.forest.validate() {
            errors.extend(forest.into_iter().map(|e| format!("training.forest: {e}")));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => errors.push(format!("logging.level '{other}' is not a log level")),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
