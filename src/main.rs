//! Badge attester service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                BADGE ATTESTER                 │
//!                      │                                               │
//!   GET /api/...       │  ┌────────┐    ┌──────────┐    ┌───────────┐  │
//!   ───────────────────┼─▶│  http  │───▶│  badges  │───▶│    eas    │  │
//!                      │  │ server │    │ registry │    │ delegated │  │
//!                      │  └────────┘    │ + rules  │    │  signing  │  │
//!                      │                └──────────┘    └─────┬─────┘  │
//!                      │                                      │        │
//!   { tx: {to, data} } │                                      ▼        │
//!   ◀──────────────────┼──────────────────────────────  proxy domain   │
//!                      │                                (pinned / RPC) │
//!                      │                                               │
//!                      │  config · observability · lifecycle · chain   │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! The claimer submits the returned transaction itself; this service never
//! broadcasts.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use badge_attester::config::load_config;
use badge_attester::http::HttpServer;
use badge_attester::lifecycle::{build_state, signals, Shutdown};
use badge_attester::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "badge-attester")]
#[command(about = "Signs delegated EAS badge attestations", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "BADGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(
        &config.observability.log_level,
        config.observability.json_logs,
    );
    tracing::info!("badge-attester v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address(),
        rpc_url = %config.chain.rpc_url,
        badges = config.badges.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if let Some(metrics_address) = &config.observability.metrics_address {
        match metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = build_state(&config).await?;

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stop = shutdown.signalled();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::new(config.server.clone(), state);
    server.run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
