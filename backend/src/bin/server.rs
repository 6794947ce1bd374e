//! Traffic Twin HTTP Server Binary
//!
//! Loads both simulation runs once, then serves the comparative views over
//! a JSON API.
//!
//! # Usage
//!
//! ```bash
//! # Read traffic_twin.toml from the working directory
//! cargo run --bin traffic-twin-server
//!
//! # Or name every input on the command line
//! cargo run --bin traffic-twin-server -- \
//!   --edgedata-without edgedata_0.csv --edgedata-with edgedata_1.csv \
//!   --tripinfo-without tripinfo_0.csv --tripinfo-with tripinfo_1.csv \
//!   --road-network network.geojson
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 127.0.0.1)
//! - `PORT`: Server port (default: 8050)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use traffic_twin::config::{AppConfig, ConfigOverrides};
use traffic_twin::http::{create_router, AppState};
use traffic_twin::services::Session;

#[derive(Debug, Parser)]
#[command(name = "traffic-twin-server", version, about = "Comparative traffic simulation API")]
struct Args {
    /// Configuration file (defaults to traffic_twin.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge export of the baseline run; repeat for several files
    #[arg(long = "edgedata-without")]
    edgedata_without: Vec<PathBuf>,

    /// Edge export of the perturbed run; repeat for several files
    #[arg(long = "edgedata-with")]
    edgedata_with: Vec<PathBuf>,

    #[arg(long = "tripinfo-without")]
    tripinfo_without: Option<PathBuf>,

    #[arg(long = "tripinfo-with")]
    tripinfo_with: Option<PathBuf>,

    /// GeoJSON road network
    #[arg(long = "road-network")]
    road_network: Option<PathBuf>,

    #[arg(long, env = "HOST")]
    host: Option<String>,

    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            edgedata_without: args.edgedata_without,
            edgedata_with: args.edgedata_with,
            tripinfo_without: args.tripinfo_without,
            tripinfo_with: args.tripinfo_with,
            road_network: args.road_network,
            host: args.host,
            port: args.port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Traffic Twin HTTP Server");

    let mut args = Args::parse();
    let mut config = match args.config.take() {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::from_default_location()?.unwrap_or_default(),
    };
    config.apply(args.into());

    // Loading and alignment are CPU bound; keep them off the runtime threads
    let session = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Session::from_config(&config)).await??
    };
    info!(
        "Dataset {} loaded ({} features)",
        session.dataset().fingerprint,
        session.network().len()
    );

    let state = AppState::new(Arc::new(session));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
