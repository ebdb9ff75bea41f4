//! One-shot command implementations.

use anyhow::{bail, Context};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use super::output::{percent, print_items, print_summary, OutputMode, SummaryRow};
use super::{PatientArgs, TrainArgs};
use crate::api::types::PredictResponse;
use crate::config::AppConfig;
use crate::inference::InferenceService;
use crate::ml::ConfusionMatrix;
use crate::persistence::ArtifactPaths;
use crate::schema::{field, FieldKind, FEATURE_NAMES, SCHEMA_VERSION};
use crate::training::{self, TrainingOptions, TrainingReport};
use crate::validation::parse_form;

/// Fold CLI overrides into the configured training setup.
pub fn training_setup(
    config: &AppConfig,
    args: &TrainArgs,
) -> (std::path::PathBuf, ArtifactPaths, TrainingOptions) {
    let dataset = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.training.dataset.clone());

    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.artifacts.dir.clone());
    let paths = ArtifactPaths::new(
        dir,
        &config.artifacts.model_file,
        &config.artifacts.scaler_file,
    );

    let mut options = TrainingOptions {
        params: config.training.forest,
        holdout: config.training.holdout,
    };
    if let Some(trees) = args.trees {
        options.params.n_trees = trees;
    }
    if args.max_depth.is_some() {
        options.params.max_depth = args.max_depth;
    }
    if let Some(seed) = args.seed {
        options.params.seed = seed;
    }
    if let Some(holdout) = args.holdout {
        options.holdout = holdout;
    }
    (dataset, paths, options)
}

pub fn run_train(config: &AppConfig, args: &TrainArgs) -> anyhow::Result<TrainingReport> {
    let (dataset, paths, options) = training_setup(config, args);
    let report = training::run(&dataset, &paths, &options)
        .with_context(|| format!("training on {} failed", dataset.display()))?;

    let mut rows = vec![
        SummaryRow::new("model id", report.model_id),
        SummaryRow::new("rows", report.rows),
        SummaryRow::new("positives", report.positives),
        SummaryRow::new("train rows", report.train_rows),
        SummaryRow::new("trees", report.trees),
        SummaryRow::new("train accuracy", percent(report.train_accuracy)),
    ];
    if let Some(cm) = &report.holdout {
        rows.push(SummaryRow::new("holdout rows", report.holdout_rows));
        rows.extend(confusion_rows("holdout", cm));
    }
    rows.push(SummaryRow::new("model", paths.model.display()));
    rows.push(SummaryRow::new("scaler", paths.scaler.display()));

    print_summary(&report, &rows, OutputMode::from_json_flag(args.json))?;
    Ok(report)
}

pub fn run_predict(
    config: &AppConfig,
    patient: &PatientArgs,
    json: bool,
) -> anyhow::Result<PredictResponse> {
    let input = match parse_form(&patient.to_form()) {
        Ok(input) => input,
        Err(errors) => bail!("invalid patient data:\n  {}", errors.join("\n  ")),
    };
    let service = InferenceService::load(&config.artifact_paths())?;
    let prediction = service.predict(&input)?;
    let response = PredictResponse::new(&prediction, service.metadata().model_id);

    let rows = vec![
        SummaryRow::new("result", &response.headline),
        SummaryRow::new("summary", &response.message),
        SummaryRow::new("advice", &response.advice),
        SummaryRow::new("note", &response.disclaimer),
    ];
    print_summary(&response, &rows, OutputMode::from_json_flag(json))?;
    Ok(response)
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub model_id: Uuid,
    pub dataset: String,
    pub rows: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub confusion: ConfusionMatrix,
}

pub fn run_evaluate(
    config: &AppConfig,
    dataset: Option<&std::path::Path>,
    json: bool,
) -> anyhow::Result<EvaluationReport> {
    let path = dataset.unwrap_or(config.training.dataset.as_path());
    let service = InferenceService::load(&config.artifact_paths())?;
    let data = training::load_csv(path)?;
    let cm = service.evaluate(&data.features, &data.targets)?;

    let report = EvaluationReport {
        model_id: service.metadata().model_id,
        dataset: path.display().to_string(),
        rows: cm.total(),
        accuracy: cm.accuracy(),
        precision: cm.precision(),
        recall: cm.recall(),
        specificity: cm.specificity(),
        confusion: cm,
    };

    let mut rows = vec![
        SummaryRow::new("model id", report.model_id),
        SummaryRow::new("dataset", &report.dataset),
        SummaryRow::new("rows", report.rows),
    ];
    rows.extend(confusion_rows("", &cm));
    print_summary(&report, &rows, OutputMode::from_json_flag(json))?;
    Ok(report)
}

/// One form field as printed by `heartguard schema`.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Feature")]
    pub name: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "Allowed")]
    pub allowed: String,
    #[tabled(rename = "Default")]
    pub default: String,
}

pub fn schema_rows() -> Vec<FieldRow> {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .filter_map(|(index, name)| field(name).map(|f| (index, f)))
        .map(|(index, f)| {
            let (allowed, default) = match &f.kind {
                FieldKind::Integer { min, max, default } => {
                    (format!("{min}..={max}"), default.to_string())
                }
                FieldKind::Decimal {
                    min,
                    max,
                    step,
                    default,
                } => (
                    format!("{min:.1}..={max:.1} step {step}"),
                    format!("{default:.1}"),
                ),
                FieldKind::Choice { options, default } => {
                    (options.join(" | "), default.to_string())
                }
            };
            FieldRow {
                index,
                name: f.name.to_string(),
                label: f.label.to_string(),
                section: f.section.title().to_string(),
                allowed,
                default,
            }
        })
        .collect()
}

pub fn run_schema(json: bool) -> anyhow::Result<()> {
    let mode = OutputMode::from_json_flag(json);
    if mode == OutputMode::Table {
        println!("Feature schema v{SCHEMA_VERSION} (model input order)");
    }
    print_items(&schema_rows(), mode)
}

fn confusion_rows(prefix: &str, cm: &ConfusionMatrix) -> Vec<SummaryRow> {
    let name = |m: &str| {
        if prefix.is_empty() {
            m.to_string()
        } else {
            format!("{prefix} {m}")
        }
    };
    [
        ("accuracy", percent(cm.accuracy())),
        ("precision", percent(cm.precision())),
        ("recall", percent(cm.recall())),
        ("specificity", percent(cm.specificity())),
        (
            "tp / fp / tn / fn",
            format!(
                "{} / {} / {} / {}",
                cm.true_positive, cm.false_positive, cm.true_negative, cm.false_negative
            ),
        ),
    ]
    .into_iter()
    .map(|(m, v)| SummaryRow::new(&name(m), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_overrides_win_over_config() {
        let mut config = AppConfig::default_config();
        config.training.forest.n_trees = 300;
        config.training.holdout = 0.1;

        let args = TrainArgs {
            dataset: Some(PathBuf::from("other.csv")),
            out_dir: Some(PathBuf::from("/tmp/models")),
            seed: Some(7),
            ..TrainArgs::default()
        };
        let (dataset, paths, options) = training_setup(&config, &args);
        assert_eq!(dataset, PathBuf::from("other.csv"));
        assert_eq!(paths.model, PathBuf::from("/tmp/models/heart_model.json"));
        assert_eq!(options.params.n_trees, 300);
        assert_eq!(options.params.seed, 7);
        assert_eq!(options.holdout, 0.1);
    }

    #[test]
    fn schema_rows_follow_feature_order() {
        let rows = schema_rows();
        assert_eq!(rows.len(), FEATURE_NAMES.len());
        for (row, name) in rows.iter().zip(FEATURE_NAMES) {
            assert_eq!(row.name, name);
        }
        assert_eq!(rows[0].allowed, "18..=120");
        assert_eq!(rows[9].default, "1.0");
        assert!(rows[2].allowed.contains("Asymptomatic"));
    }

    #[test]
    fn confusion_rows_are_prefixed() {
        let cm = ConfusionMatrix {
            true_positive: 3,
            true_negative: 5,
            false_positive: 1,
            false_negative: 1,
        };
        let rows = confusion_rows("holdout", &cm);
        assert_eq!(rows[0].metric, "holdout accuracy");
        assert_eq!(rows[0].value, "80.0%");
        assert_eq!(rows[4].value, "3 / 1 / 5 / 1");
    }
}
