//! kairos-graph - builds time-series queries and serves chart data.

use kairos_graph::config::ServerConfig;
use kairos_graph::web::Server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("kairos_graph=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting kairos-graph on port {}...", cfg.http_port);
    tracing::info!("Using time-series service at {}", cfg.kairosdb_url);

    // Start web server
    let server = Server::new(cfg);
    server.start().await?;

    Ok(())
}
