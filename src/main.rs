//! authgate - authentication, RBAC and rate limiting service

#![allow(missing_docs)]

use anyhow::Context;
use authgate::config::LoggingConfig;
use authgate::{Config, server};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "authgate", version, about)]
struct Cli {
    /// Configuration file; defaults and environment overrides are used when it is absent
    #[arg(short, long, env = "AUTHGATE_CONFIG", default_value = "config/authgate.yaml")]
    config: PathBuf,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .init();
    }
}

async fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))
    } else {
        Config::from_env().context("loading configuration from environment")
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config).await?;
    init_tracing(config.logging());

    server::run_server(config).await.context("server failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display with causes, not Debug
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
