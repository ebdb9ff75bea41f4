//! Offline training: dataset → scaler → forest → artifacts.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::dataset::{self, Dataset};
use crate::error::{GuardianError, Result};
use crate::ml::{metrics, ConfusionMatrix, ForestParams, RandomForest, StandardScaler};
use crate::persistence::{
    ArtifactBundle, ArtifactMetadata, ArtifactPaths, ClassifierArtifact, ScalerArtifact,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    pub params: ForestParams,
    /// Fraction of rows held out for scoring; 0.0 fits on everything.
    pub holdout: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            params: ForestParams::default(),
            holdout: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_id: Uuid,
    pub rows: usize,
    pub train_rows: usize,
    pub holdout_rows: usize,
    pub positives: usize,
    pub trees: usize,
    pub train_accuracy: f64,
    pub holdout: Option<ConfusionMatrix>,
    pub model_path: Option<PathBuf>,
    pub scaler_path: Option<PathBuf>,
}

/// Fit scaler and forest on an in-memory dataset. Nothing touches disk.
pub fn fit(
    dataset: &Dataset,
    options: &TrainingOptions,
) -> Result<(ArtifactBundle, TrainingReport)> {
    if !(0.0..1.0).contains(&options.holdout) {
        return Err(GuardianError::Validation(format!(
            "holdout must be in [0, 1), got {}",
            options.holdout
        )));
    }

    let (train_idx, holdout_idx) =
        split_indices(dataset.len(), options.holdout, options.params.seed);
    if train_idx.is_empty() {
        return Err(GuardianError::Dataset(
            "holdout leaves no rows to train on".to_string(),
        ));
    }
    let (train_x, train_y) = dataset.subset(&train_idx);

    let scaler = StandardScaler::fit(&train_x)?;
    let scaled = scaler.transform_rows(&train_x)?;
    let model = RandomForest::fit(&scaled, &train_y, options.params)?;
    let train_accuracy = metrics::evaluate(&model, &scaled, &train_y)?.accuracy();

    let holdout = if holdout_idx.is_empty() {
        None
    } else {
        let (hx, hy) = dataset.subset(&holdout_idx);
        let hx = scaler.transform_rows(&hx)?;
        let cm = metrics::evaluate(&model, &hx, &hy)?;
        info!(
            rows = cm.total(),
            accuracy = cm.accuracy(),
            recall = cm.recall(),
            "holdout evaluation"
        );
        Some(cm)
    };

    let metadata = ArtifactMetadata::new(train_idx.len());
    let report = TrainingReport {
        model_id: metadata.model_id,
        rows: dataset.len(),
        train_rows: train_idx.len(),
        holdout_rows: holdout_idx.len(),
        positives: dataset.positives(),
        trees: model.trees.len(),
        train_accuracy,
        holdout,
        model_path: None,
        scaler_path: None,
    };
    let bundle = ArtifactBundle::new(
        ClassifierArtifact {
            metadata: metadata.clone(),
            model,
        },
        ScalerArtifact { metadata, scaler },
    )?;
    Ok((bundle, report))
}

/// Load `dataset_path`, fit, and write both artifacts.
///
/// Any dataset or fitting error aborts before the artifact directory is
/// touched.
pub fn run(
    dataset_path: &Path,
    paths: &ArtifactPaths,
    options: &TrainingOptions,
) -> Result<TrainingReport> {
    info!(
        dataset = %dataset_path.display(),
        trees = options.params.n_trees,
        seed = options.params.seed,
        holdout = options.holdout,
        "starting training"
    );
    let dataset = dataset::load_csv(dataset_path)?;
    let (bundle, mut report) = fit(&dataset, options)?;

    if paths.exist() {
        warn!(model = %paths.model.display(), "overwriting existing artifacts");
    }
    bundle.save(paths)?;

    report.model_path = Some(paths.model.clone());
    report.scaler_path = Some(paths.scaler.clone());
    info!(
        model_id = %report.model_id,
        rows = report.train_rows,
        train_accuracy = report.train_accuracy,
        "training complete"
    );
    Ok(report)
}

/// Seeded shuffle, then the first `round(n * holdout)` rows are held out.
/// Without a holdout the original row order is kept.
fn split_indices(n: usize, holdout: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let n_holdout = (n as f64 * holdout).round() as usize;
    if n_holdout == 0 {
        return (idx, Vec::new());
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    idx.shuffle(&mut rng);
    let train = idx.split_off(n_holdout);
    (train, idx)
}
