//! Heart Health Guardian CLI
//!
//! Commands:
//! - `heartguard train` - Fit the scaler and forest, write artifacts
//! - `heartguard serve` - Run the screening web service
//! - `heartguard predict` - Screen one patient from the command line
//! - `heartguard evaluate` - Score saved artifacts on a labelled dataset
//! - `heartguard schema` - Show the form and feature schema

pub mod commands;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

pub use commands::{run_evaluate, run_predict, run_schema, run_train};
pub use output::OutputMode;

/// Heart disease risk screening
#[derive(Parser, Debug)]
#[command(name = "heartguard")]
#[command(author, version, about = "Heart Health Guardian: risk screening service and trainer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, default_value = "config", global = true)]
    pub config_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the scaler and random forest and write both artifacts
    Train(TrainArgs),
    /// Serve the screening form and JSON API
    Serve {
        /// Bind host (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Screen one patient with the saved artifacts
    Predict {
        #[command(flatten)]
        patient: PatientArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Score saved artifacts against a labelled dataset
    Evaluate {
        /// Labelled CSV (defaults to training.dataset)
        #[arg(short, long)]
        dataset: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the feature schema and form fields
    Schema {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TrainArgs {
    /// Training CSV (overrides training.dataset)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,
    /// Artifact directory (overrides artifacts.dir)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
    /// Number of trees
    #[arg(long)]
    pub trees: Option<usize>,
    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Random seed for bootstrap and feature sampling
    #[arg(long)]
    pub seed: Option<u64>,
    /// Fraction of rows held out for scoring (e.g. 0.2)
    #[arg(long)]
    pub holdout: Option<f64>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Patient measurements, using the same labels as the web form.
#[derive(Args, Debug, Clone)]
pub struct PatientArgs {
    /// Age in years
    #[arg(long, default_value = "45")]
    pub age: String,
    /// Female or Male
    #[arg(long, default_value = "Female")]
    pub sex: String,
    /// Typical Angina, Atypical Angina, Non-anginal Pain or Asymptomatic
    #[arg(long, default_value = "Typical Angina")]
    pub chest_pain_type: String,
    /// Resting blood pressure (mmHg)
    #[arg(long, default_value = "120")]
    pub resting_bp: String,
    /// Serum cholesterol (mg/dL)
    #[arg(long, default_value = "200")]
    pub cholesterol: String,
    /// Fasting blood sugar > 120 mg/dL: No or Yes
    #[arg(long, default_value = "No")]
    pub fasting_blood_sugar: String,
    /// Normal, ST-T Wave Abnormality or Left Ventricular Hypertrophy
    #[arg(long, default_value = "Normal")]
    pub resting_ecg: String,
    /// Maximum heart rate achieved (bpm)
    #[arg(long, default_value = "150")]
    pub max_heart_rate: String,
    /// Exercise-induced chest pain: No or Yes
    #[arg(long, default_value = "No")]
    pub exercise_angina: String,
    /// ST depression induced by exercise
    #[arg(long, default_value = "1.0")]
    pub oldpeak: String,
    /// Upward, Flat or Downward
    #[arg(long, default_value = "Upward")]
    pub st_slope: String,
}

impl PatientArgs {
    /// The arguments as form fields, so the CLI goes through the same
    /// parsing and bound checks as the web form.
    pub fn to_form(&self) -> HashMap<String, String> {
        [
            ("age", &self.age),
            ("sex", &self.sex),
            ("chest_pain_type", &self.chest_pain_type),
            ("resting_bp", &self.resting_bp),
            ("cholesterol", &self.cholesterol),
            ("fasting_blood_sugar", &self.fasting_blood_sugar),
            ("resting_ecg", &self.resting_ecg),
            ("max_heart_rate", &self.max_heart_rate),
            ("exercise_angina", &self.exercise_angina),
            ("oldpeak", &self.oldpeak),
            ("st_slope", &self.st_slope),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChestPainType, PatientInput, Sex};
    use crate::validation::parse_form;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_defaults_match_form_defaults() {
        let cli = Cli::try_parse_from(["heartguard", "predict"]).unwrap();
        let Commands::Predict { patient, json } = cli.command else {
            panic!("expected predict");
        };
        assert!(!json);
        assert_eq!(parse_form(&patient.to_form()).unwrap(), PatientInput::default());
    }

    #[test]
    fn predict_flags_use_form_labels() {
        let cli = Cli::try_parse_from([
            "heartguard",
            "predict",
            "--sex",
            "Male",
            "--chest-pain-type",
            "Asymptomatic",
            "--age",
            "61",
        ])
        .unwrap();
        let Commands::Predict { patient, .. } = cli.command else {
            panic!("expected predict");
        };
        let input = parse_form(&patient.to_form()).unwrap();
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.chest_pain_type, ChestPainType::Asymptomatic);
        assert_eq!(input.age, 61);
    }

    #[test]
    fn train_overrides_parse() {
        let cli = Cli::try_parse_from([
            "heartguard",
            "--config-dir",
            "/etc/heartguard",
            "train",
            "--dataset",
            "data.csv",
            "--trees",
            "50",
            "--holdout",
            "0.2",
        ])
        .unwrap();
        assert_eq!(cli.config_dir, PathBuf::from("/etc/heartguard"));
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.dataset, Some(PathBuf::from("data.csv")));
        assert_eq!(args.trees, Some(50));
        assert_eq!(args.holdout, Some(0.2));
        assert_eq!(args.seed, None);
    }
}
