//! Web server module.

mod handlers;
mod page;

pub use handlers::*;
pub use page::*;

use crate::chart::Renderer;
use crate::client::KairosClient;
use crate::config::ServerConfig;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub client: Arc<KairosClient>,
    pub renderer: Arc<Renderer>,
}

/// Web server for kairos-graph.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server talking to the configured time-series service.
    pub fn new(config: ServerConfig) -> Self {
        let client = Arc::new(KairosClient::new(&config.kairosdb_url));
        let renderer = Arc::new(Renderer::new(config.confirm_threshold));
        Self {
            state: AppState {
                config,
                client,
                renderer,
            },
        }
    }

    /// Build the router with all routes.
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::handle_health))
            // Query builder
            .route("/api/form", get(handlers::handle_new_form).post(handlers::handle_form_op))
            .route("/api/chart", post(handlers::handle_chart))
            .route("/api/plot", post(handlers::handle_plot))
            // Chart interaction
            .route("/api/hover", post(handlers::handle_hover))
            .route("/api/zoom", post(handlers::handle_zoom))
            .route("/api/reset", post(handlers::handle_reset_zoom))
            // Autocomplete sources
            .route("/api/metricnames", get(handlers::handle_metric_names))
            .route("/api/tagnames", get(handlers::handle_tag_names))
            .route("/api/tagvalues", get(handlers::handle_tag_values))
            .route("/api/version", get(handlers::handle_version))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
