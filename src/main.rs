//! payroll-ledger server binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::config::ConfigLoader;
use payroll_ledger::ledger::Ledger;
use payroll_ledger::store::{Backend, WorkRecordStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payroll-ledger", about = "Payroll ledger for hourly and piece-rate work")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config/ledger.yaml")]
    config: PathBuf,
    /// Address to listen on, overriding the configuration file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backend = Backend::open(config.store(), config.default_settings())?;
    if backend.is_fallback() {
        warn!("Running on a local-only dataset; changes will be lost on restart");
    }
    let store_name = backend.name();
    let ledger = Ledger::load(backend).await.context("loading ledger")?;

    let bind = cli.bind.unwrap_or_else(|| config.server().bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {}", bind))?;

    info!(bind = %bind, store = store_name, "Payroll ledger listening");
    axum::serve(listener, create_router(AppState::new(ledger))).await?;
    Ok(())
}
