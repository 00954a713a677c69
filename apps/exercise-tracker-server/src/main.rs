use std::net::ToSocketAddrs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use exercise_tracker::{config::ExerciseTrackerConfig, module::Storage, ExerciseTracker};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use tokio_util::sync::CancellationToken;

mod db;
mod shutdown;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const EXERCISE_TRACKER_MODULE: &str = "exercise_tracker";
const API_INGRESS_MODULE: &str = "api_ingress";

/// Exercise Tracker Server - users and their exercise logs over HTTP
#[derive(Parser)]
#[command(name = "exercise-tracker-server")]
#[command(about = "Exercise Tracker Server - users and their exercise logs over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep users in memory, ignoring any database section
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity / mock storage)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Exercise Tracker Server starting");
    tracing::debug!("Effective server configuration: {:?}", config.server);

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Ingress settings: the module section, completed from the `server` section.
fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(API_INGRESS_MODULE)?;
    if cfg.bind_addr.trim().is_empty() {
        cfg.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    }
    if config.server.timeout_sec > 0 {
        cfg.request_timeout_secs = config.server.timeout_sec;
    }
    if cfg.static_dir.is_none() {
        cfg.static_dir = config.static_dir();
    }
    Ok(cfg)
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let tracker_cfg: ExerciseTrackerConfig = config.module_config(EXERCISE_TRACKER_MODULE)?;
    let ingress_cfg = ingress_config(&config)?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);
    let storage = match &config.database {
        Some(db_config) => Storage::Database(db::connect(db_config, &base_dir).await?),
        None => {
            tracing::warn!("No database configuration found, keeping users in memory");
            Storage::InMemory
        }
    };

    let tracker = ExerciseTracker::default();
    tracker
        .init(tracker_cfg, storage)
        .await
        .context("Failed to initialize exercise_tracker")?;

    let ingress = ApiIngress::new(ingress_cfg);
    let router = ingress.build_router(tracker.register_rest(axum::Router::new())?);

    let cancel = CancellationToken::new();
    let signals = shutdown::cancel_on_signal(cancel.clone());

    let result = ingress.serve(router, cancel).await;
    signals.abort();
    tracing::info!("Exercise Tracker Server stopped");
    result
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    let _: ExerciseTrackerConfig = config.module_config(EXERCISE_TRACKER_MODULE)?;
    let ingress = ingress_config(&config)?;
    ingress
        .bind_addr
        .to_socket_addrs()
        .with_context(|| format!("Invalid bind address '{}'", ingress.bind_addr))?;
    if let Some(db_config) = &config.database {
        db::absolutize_sqlite_dsn(&db_config.url, Path::new(&config.server.home_dir), false)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
