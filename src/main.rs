//! Power+ server.
//!
//! Single-binary Tokio application that:
//! 1. Loads the persisted leaderboard snapshot
//! 2. Serves Power+ queries over HTTP
//! 3. Refetches the Baseball Savant leaderboard when the snapshot goes stale
//! 4. Falls back to the last good snapshot when the refetch fails

mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use common::ServerConfig;
use refresh::{CacheStore, DataService, CACHE_TTL};
use savant_client::SavantClient;

/// Power+ leaderboard server
#[derive(Parser)]
#[command(name = "power-plus-server", about = "Serves Power+ bat-tracking metrics")]
struct Cli {
    /// Run one forced refresh, print the summary, then exit.
    #[arg(long)]
    once: bool,

    /// Listen port (overrides PORT and config.toml).
    #[arg(long)]
    port: Option<u16>,
}

fn build_service(cfg: &ServerConfig) -> Arc<DataService> {
    let client = SavantClient::new(&cfg.source);
    let timeout = client.timeout();
    let cache = Arc::new(CacheStore::open(&cfg.cache_file, CACHE_TTL));
    Arc::new(DataService::new(
        cache,
        Arc::new(client),
        cfg.source.season,
        timeout,
    ))
}

async fn run_once(service: &DataService) -> common::Result<()> {
    let snapshot = service.force_refresh().await?;
    info!(
        "Snapshot: {} players from {} ({:?})",
        snapshot.data().len(),
        snapshot.timestamp(),
        snapshot.origin
    );

    match power_plus::query::summarize(snapshot.data(), snapshot.timestamp()) {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => warn!("Snapshot is empty; nothing to summarize"),
    }
    Ok(())
}

async fn serve(cfg: &ServerConfig, service: Arc<DataService>) -> common::Result<()> {
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| common::Error::Config(format!("Invalid listen address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, routes::router(service))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "power_plus_server=info,savant_client=info,power_plus=info,refresh=info,tower_http=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("Power+ server starting up...");

    // Load configuration.
    let mut cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    info!(
        "Source: {} (season {}, minSwings {}, timeout {}s)",
        cfg.source.url, cfg.source.season, cfg.source.min_swings, cfg.source.timeout_secs
    );
    info!(
        "Cache: {} (ttl {}h)",
        cfg.cache_file.display(),
        CACHE_TTL.as_secs() / 3600
    );

    let service = build_service(&cfg);

    // ── One-shot mode ────────────────────────────────────────────────
    if cli.once {
        if let Err(e) = run_once(&service).await {
            error!("Refresh failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = serve(&cfg, service).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
    info!("Power+ server shut down.");
}
