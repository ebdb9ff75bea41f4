mod main_runtime;

use anyhow::Context;
use clap::Parser;
use heartguard::api::{self, AppState};
use heartguard::cli::{self, Cli, Commands};
use heartguard::config::AppConfig;
use heartguard::inference::InferenceService;
use main_runtime::{init_logging, init_logging_simple};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match &cli.command {
        Commands::Train(args) => {
            init_logging(&config.logging);
            cli::run_train(&config, args)?;
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            init_logging(&config.logging);
            run_serve(&config).await?;
        }
        Commands::Predict { patient, json } => {
            init_logging_simple();
            cli::run_predict(&config, patient, *json)?;
        }
        Commands::Evaluate { dataset, json } => {
            init_logging_simple();
            cli::run_evaluate(&config, dataset.as_deref(), *json)?;
        }
        Commands::Schema { json } => {
            init_logging_simple();
            cli::run_schema(*json)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("failed to load config from {}", cli.config_dir.display()))?;
    if let Err(errors) = config.validate() {
        anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

async fn run_serve(config: &AppConfig) -> anyhow::Result<()> {
    let paths = config.artifact_paths();
    // No fallback model: missing or incompatible artifacts stop startup.
    let service = match InferenceService::load(&paths) {
        Ok(service) => service,
        Err(e) => {
            error!(
                error = %e,
                model = %paths.model.display(),
                scaler = %paths.scaler.display(),
                "cannot start without trained artifacts; run `heartguard train` first"
            );
            return Err(e.into());
        }
    };

    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting screening service"
    );
    api::start_server(&config.server, AppState::new(service)).await?;
    Ok(())
}
