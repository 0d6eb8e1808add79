//! Sample services entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecs_sample::api::{self, AppState};
use ecs_sample::config::Config;
use ecs_sample::metrics;
use ecs_sample::status::{self, PeerClient, StatusState};
use ecs_sample::store::{self, DynamoStore, InMemoryStore, ItemStore};
use ecs_sample::utils::shutdown_signal;

/// Sample container services.
#[derive(Parser, Debug)]
#[command(name = "ecs-sample")]
#[command(about = "DynamoDB-backed item API and status page for container deployments")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true, env = "LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the item API (default).
    Backend {
        /// Listen port, overrides PORT_IN.
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep items in memory instead of DynamoDB.
        #[arg(long)]
        memory_store: bool,

        /// Exit if the item store fails its startup check.
        #[arg(long, env = "REQUIRE_STORE")]
        require_store: bool,
    },

    /// Run the status page.
    Frontend {
        /// Listen port, overrides PORT_IN.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("ecs_sample=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (plain, json) = if args.json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .with(filter)
        .init();

    match args.command {
        Some(Command::Backend {
            port,
            memory_store,
            require_store,
        }) => cmd_backend(port, memory_store, require_store).await,
        Some(Command::Frontend { port }) => cmd_frontend(port).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        None => cmd_backend(None, false, false).await,
    }
}

/// Load and validate configuration.
fn load_config() -> ecs_sample::Result<Config> {
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Build the peer client if a peer is configured.
fn build_peer(config: &Config) -> ecs_sample::Result<Option<PeerClient>> {
    match config.peer_url()? {
        Some(url) => {
            info!("Peer: {} (timeout {:?})", url, config.peer_timeout());
            Ok(Some(PeerClient::new(url, config.peer_timeout())?))
        }
        None => {
            info!("Peer: disabled");
            Ok(None)
        }
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ECS SAMPLE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Table: {}", config.ddb_table);
    println!(
        "  Endpoint: {}",
        config.ddb_endpoint_url.as_deref().unwrap_or("AWS default")
    );
    println!("  Port: {}", config.port_in);
    println!("  App Name: {}", config.app_name);
    println!("  Platform: {}", config.container_service);
    println!("  Infra Version: {}", config.infra_version);
    match config.peer_url.as_deref().filter(|s| !s.is_empty()) {
        Some(url) => println!("  Peer: {} ({}ms timeout)", url, config.peer_timeout_ms),
        None => println!("  Peer: disabled"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Install the Prometheus recorder, serving without `/metrics` data on failure.
fn install_metrics() -> Option<PrometheusHandle> {
    match metrics::install_prometheus_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder not installed: {}", e);
            None
        }
    }
}

/// Run the item API.
async fn cmd_backend(
    port_override: Option<u16>,
    memory_store: bool,
    require_store: bool,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port_in);

    let metrics_handle = install_metrics();

    let store: Arc<dyn ItemStore> = if memory_store {
        warn!("Using in-memory store, items are lost on restart");
        Arc::new(InMemoryStore::new(&config.ddb_table))
    } else {
        info!("Connecting to DynamoDB table {}...", config.ddb_table);
        Arc::new(
            DynamoStore::connect(&config.ddb_table, config.ddb_endpoint_url.as_deref()).await,
        )
    };

    store::startup_check(store.as_ref(), require_store).await?;

    let state = AppState::new(store).with_metrics(metrics_handle);
    serve(api::create_router(state), port).await
}

/// Run the status page.
async fn cmd_frontend(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port_in);

    let metrics_handle = install_metrics();

    let peer = build_peer(&config)?;
    let state = StatusState::new(peer).with_metrics(metrics_handle);
    serve(status::create_router(state), port).await
}

/// Serve a router until a shutdown signal arrives.
async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
