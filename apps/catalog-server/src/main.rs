use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use catalog::{Catalog, CatalogConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use tokio_util::sync::CancellationToken;

mod shutdown;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Catalog Server - read-only query API over block, item and recipe data
#[derive(Parser)]
#[command(name = "catalog-server")]
#[command(about = "Catalog Server - read-only query API over block, item and recipe data")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding items.json, blocks.json and recipes.json (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and data files
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        data_dir: cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!(home_dir = %config.server.home_dir, "Catalog Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
    }
}

/// HTTP host settings: `modules.api_ingress`, with the server section
/// supplying the bind address and a non-zero timeout.
fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    if ingress.bind_addr.is_none() {
        ingress.bind_addr = Some(format!("{}:{}", config.server.host, config.server.port));
    }
    if config.server.timeout_sec > 0 {
        ingress.timeout_sec = config.server.timeout_sec;
    }
    Ok(ingress)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let catalog_cfg: CatalogConfig = config.module_config("catalog")?;
    tracing::info!(data_dir = %catalog_cfg.data_dir.display(), preload = catalog_cfg.preload, "Initializing catalog");

    let catalog = Catalog::new();
    catalog
        .init(&catalog_cfg)
        .await
        .context("catalog initialization failed")?;

    let ingress = ApiIngress::new(ingress_config(&config)?);
    ingress.register(|router| catalog.register_rest(router))?;

    let listener = ingress.bind().await?;
    let cancel = CancellationToken::new();
    shutdown::cancel_on_signal(cancel.clone());

    ingress.serve(listener, cancel).await?;
    tracing::info!("Catalog Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    ingress_config(&config)?;
    let mut catalog_cfg: CatalogConfig = config.module_config("catalog")?;
    // Loading every collection is the check.
    catalog_cfg.preload = true;
    Catalog::new()
        .init(&catalog_cfg)
        .await
        .with_context(|| format!("data check failed in {}", catalog_cfg.data_dir.display()))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
