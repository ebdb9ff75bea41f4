//! Model artifacts on disk.
//!
//! Training writes two JSON documents, the classifier and the scaler. Both
//! carry the same metadata block (model id, schema fingerprint) so inference
//! can refuse a mismatched or stale pair at startup.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{GuardianError, Result};
use crate::ml::{RandomForest, StandardScaler};
use crate::schema::{FeatureSchema, FEATURE_COUNT};

/// Provenance shared by both artifacts of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub schema: FeatureSchema,
    /// Rows the artifacts were fitted on.
    pub n_samples: usize,
}

impl ArtifactMetadata {
    pub fn new(n_samples: usize) -> Self {
        Self {
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            schema: FeatureSchema::current(),
            n_samples,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub metadata: ArtifactMetadata,
    pub model: RandomForest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub metadata: ArtifactMetadata,
    pub scaler: StandardScaler,
}

/// Where the pair lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl AsRef<Path>, model_file: &str, scaler_file: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(model_file),
            scaler: dir.join(scaler_file),
        }
    }

    pub fn exist(&self) -> bool {
        self.model.exists() && self.scaler.exists()
    }
}

/// A classifier and scaler that passed every compatibility check.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub classifier: ClassifierArtifact,
    pub scaler: ScalerArtifact,
}

impl ArtifactBundle {
    pub fn new(classifier: ClassifierArtifact, scaler: ScalerArtifact) -> Result<Self> {
        let bundle = Self { classifier, scaler };
        bundle.check()?;
        Ok(bundle)
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.classifier.metadata
    }

    fn check(&self) -> Result<()> {
        let cm = &self.classifier.metadata;
        let sm = &self.scaler.metadata;
        cm.schema.ensure_current()?;
        sm.schema.ensure_current()?;

        if cm.model_id != sm.model_id {
            return Err(GuardianError::SchemaMismatch(format!(
                "classifier {} and scaler {} come from different training runs",
                cm.model_id, sm.model_id
            )));
        }

        self.classifier
            .model
            .validate()
            .map_err(GuardianError::SchemaMismatch)?;
        self.scaler
            .scaler
            .validate()
            .map_err(GuardianError::SchemaMismatch)?;

        let (model_dim, scaler_dim) = (
            self.classifier.model.n_features,
            self.scaler.scaler.n_features(),
        );
        if model_dim != FEATURE_COUNT || scaler_dim != FEATURE_COUNT {
            return Err(GuardianError::SchemaMismatch(format!(
                "artifact widths classifier={model_dim} scaler={scaler_dim}, schema={FEATURE_COUNT}"
            )));
        }
        Ok(())
    }

    /// Stage both files, then rename them into place.
    ///
    /// Both documents are serialized before touching disk and written to
    /// `*.tmp` siblings. If only the model rename lands, the directory holds
    /// a pair with mismatched model ids, which `load` rejects.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        let model_body = serde_json::to_vec(&self.classifier)?;
        let scaler_body = serde_json::to_vec_pretty(&self.scaler)?;

        for path in [&paths.model, &paths.scaler] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let model_tmp = tmp_path(&paths.model);
        let scaler_tmp = tmp_path(&paths.scaler);
        let staged = std::fs::write(&model_tmp, &model_body)
            .and_then(|_| std::fs::write(&scaler_tmp, &scaler_body));
        if let Err(e) = staged {
            let _ = std::fs::remove_file(&model_tmp);
            let _ = std::fs::remove_file(&scaler_tmp);
            return Err(e.into());
        }

        if let Err(e) = std::fs::rename(&model_tmp, &paths.model) {
            let _ = std::fs::remove_file(&model_tmp);
            let _ = std::fs::remove_file(&scaler_tmp);
            return Err(e.into());
        }
        // The new model stays in place; its model id no longer matches the
        // old scaler, so `load` refuses the pair until a retrain succeeds.
        if let Err(e) = std::fs::rename(&scaler_tmp, &paths.scaler) {
            let _ = std::fs::remove_file(&scaler_tmp);
            return Err(e.into());
        }

        info!(
            model_id = %self.metadata().model_id,
            model = %paths.model.display(),
            scaler = %paths.scaler.display(),
            bytes = model_body.len() + scaler_body.len(),
            "saved artifacts"
        );
        Ok(())
    }

    /// Load and cross-check a pair. Any failure is fatal for the caller.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let classifier: ClassifierArtifact = read_json(&paths.model)?;
        let scaler: ScalerArtifact = read_json(&paths.scaler)?;
        debug!(
            model_id = %classifier.metadata.model_id,
            trees = classifier.model.trees.len(),
            "loaded artifacts"
        );
        Self::new(classifier, scaler)
            .map_err(|e| GuardianError::artifact(&paths.model, e.to_string()))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GuardianError::artifact(path, format!("cannot read: {e}")))?;
    serde_json::from_str(&content)
        .map_err(|e| GuardianError::artifact(path, format!("cannot parse: {e}")))
}
