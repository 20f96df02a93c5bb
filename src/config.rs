//! Configuration module for kairos-graph.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::chart::DEFAULT_CONFIRM_THRESHOLD;
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8090)
    pub http_port: u16,
    /// Base URL of the time-series service (default: "http://localhost:8080")
    pub kairosdb_url: String,
    /// Point count above which plotting needs confirmation (default: 20000)
    pub confirm_threshold: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8090,
            kairosdb_url: "http://localhost:8080".to_string(),
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `KAIROS_GRAPH_HTTP_PORT`: HTTP port (default: 8090)
    /// - `KAIROS_GRAPH_KAIROSDB_URL`: service base URL (default: "http://localhost:8080")
    /// - `KAIROS_GRAPH_CONFIRM_THRESHOLD`: large plot threshold (default: 20000)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(port) = lookup("KAIROS_GRAPH_HTTP_PORT").and_then(|s| s.parse().ok()) {
            cfg.http_port = port;
        }

        if let Some(url) = lookup("KAIROS_GRAPH_KAIROSDB_URL") {
            cfg.kairosdb_url = url;
        }

        if let Some(threshold) = lookup("KAIROS_GRAPH_CONFIRM_THRESHOLD").and_then(|s| s.parse().ok()) {
            cfg.confirm_threshold = threshold;
        }

        cfg
    }
}
