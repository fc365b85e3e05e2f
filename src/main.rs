//! SalaryScope - salary transparency dashboard API
//!
//! Serves public-sector salary records with descriptive statistics,
//! agency rankings and side-by-side comparisons.
//!
//! Exit codes:
//!   0 - Clean shutdown (or dry run completed)
//!   1 - Startup error (bad arguments, config, store, bind failure)

mod analysis;
mod api;
mod cli;
mod config;
mod filter;
mod models;
mod presentation;
mod store;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use std::sync::Arc;
use store::RecordStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("SalaryScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Startup failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salaryscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Supply credentials through SUPABASE_URL and SUPABASE_KEY.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the verbosity flags.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Resolve configuration, open the store and serve until shutdown.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let store = store::from_config(&config.store)?;
    info!("Record store: {}", store.describe());

    if args.dry_run {
        return handle_dry_run(store.as_ref()).await;
    }

    let state = api::AppState::new(store, api::ApiSettings::from(&config));
    info!(
        "Environment: {}, numeric filters: {:?}",
        config.server.environment, config.analysis.numeric_filters
    );

    api::serve(state, &config.server.host, config.server.port).await
}

/// Handle --dry-run: query every record once, log the overall summary, exit.
async fn handle_dry_run(store: &dyn RecordStore) -> Result<()> {
    info!("Dry run: fetching all records once");

    let records = store
        .fetch(&[], &[])
        .await
        .context("Failed to fetch salary data")?;

    let salaries: Vec<f64> = records.iter().map(|r| r.salary).collect();
    let stats = analysis::compute_statistics(&salaries);

    info!(
        "{} records across {} agencies",
        stats.count,
        analysis::distinct_agency_count(&records)
    );
    info!(
        "min {} / median {} / avg {} / max {}",
        presentation::format_currency(stats.min),
        presentation::format_currency(stats.median),
        presentation::format_currency(stats.avg),
        presentation::format_currency(stats.max)
    );

    info!("Dry run complete. No server was started.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
