//! Gallery-Harvester main entry point
//!
//! This is the command-line interface for the gallery harvester and the
//! scrape proxy.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gallery_harvester::config::{load_config_with_hash, Config};
use gallery_harvester::crawler::{Fetcher, HttpFetcher};
use gallery_harvester::harvester::Harvester;
use gallery_harvester::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Gallery-Harvester: brute-force gallery downloader and scrape proxy
#[derive(Parser, Debug)]
#[command(name = "gallery-harvester")]
#[command(version)]
#[command(about = "Brute-force gallery downloader and on-demand scrape proxy", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Route outbound requests through the local Tor SOCKS5 proxy
    #[arg(long, global = true)]
    tor: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk random galleries and download every page until interrupted
    Harvest {
        /// Override the download root directory
        #[arg(long, value_name = "DIR")]
        download_root: Option<PathBuf>,
    },

    /// Run the scrape proxy HTTP server
    Serve {
        /// Override the listen address, e.g. 127.0.0.1:7171
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },
}

/// Default Tor Browser SOCKS5 endpoint
const TOR_PROXY: &str = "socks5h://127.0.0.1:9150";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.tor {
        config.fetcher.proxy = Some(TOR_PROXY.to_string());
    }

    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(&config.fetcher).context("Failed to build HTTP client")?);

    match cli.command {
        Command::Harvest { download_root } => {
            if let Some(root) = download_root {
                config.harvester.download_root = root;
            }
            handle_harvest(config, fetcher).await
        }
        Command::Serve { listen } => {
            if let Some(addr) = listen {
                config.scraper.listen_addr = addr;
            }
            handle_serve(config, fetcher).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gallery_harvester=info,warn"),
            1 => EnvFilter::new("gallery_harvester=debug,info"),
            2 => EnvFilter::new("gallery_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels `token` on Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
        }
        token.cancel();
    });
}

/// Handles the `harvest` subcommand
async fn handle_harvest(config: Config, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<()> {
    let mut harvester = Harvester::new(config.harvester, fetcher)
        .await
        .context("Error setting up download directory")?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let stats = harvester.run_until_cancelled(&cancel).await;
    tracing::info!(
        "Saved {} pages from {} galleries in {:?}",
        stats.pages_saved,
        stats.galleries_found,
        stats.elapsed()
    );

    Ok(())
}

/// Handles the `serve` subcommand
async fn handle_serve(config: Config, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.scraper.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.scraper.listen_addr))?;

    tracing::info!("Public base URL: {}", config.scraper.public_base_url);

    let state = AppState::new(&config.scraper, fetcher);
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    server::serve(listener, state, async move { cancel.cancelled().await })
        .await
        .context("Server error")
}
