//! Laserkongen storefront API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 API PROXY                    │
//!     Browser request    │  ┌────────┐   ┌──────────┐   ┌───────────┐  │
//!     ───────────────────┼─▶│  http  │──▶│ routing  │──▶│   proxy   │──┼──▶ Backend
//!                        │  │ server │   │  table   │   │  handler  │  │    service
//!     JSON response      │  └────────┘   └──────────┘   └─────┬─────┘  │
//!     ◀──────────────────┼──────────── response rules ◀───────┘        │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use laserkongen_proxy::lifecycle::{signals, startup};
use laserkongen_proxy::observability::{logging, metrics};
use laserkongen_proxy::routing;
use laserkongen_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "laserkongen-proxy")]
#[command(about = "API proxy between the laserkongen storefront and its backend", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the route table and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_routes {
        print_routes();
        return Ok(());
    }

    let config = startup::resolve_config(cli.config.as_deref())?;
    logging::init_tracing(&config.observability)?;

    tracing::info!("laserkongen-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        backend_timeout_secs = config.backend.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes() {
    for route in routing::routes() {
        let methods = route
            .allowed_methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<32} {:<14} {:<40} -> {}",
            route.name,
            methods,
            route.path,
            route.backend_path
        );
    }
}
