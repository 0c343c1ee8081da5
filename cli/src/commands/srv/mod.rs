//! # Helpdesk HTTP API Server
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! This module serves the response registry over HTTP so web front-ends and
//! other services can talk to it with JSON. See `routes.rs` for the endpoint
//! list.
//!
//! ## Architecture
//!
//! - `config.rs`: Merges command-line flags with the `[server]` config section
//! - `routes.rs`: Endpoint handlers and JSON error mapping
//! - `server_logic.rs`: Port selection, middleware, and the serve loop
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default 127.0.0.1:5000
//! helpdesk srv
//!
//! # Listen on every interface, port 8080
//! helpdesk srv --host 0.0.0.0 --port 8080
//!
//! curl -s -X POST localhost:5000/chat \
//!      -H 'Content-Type: application/json' -d '{"message": "loan"}'
//! ```
//!
use crate::core::error::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

/// Merges CLI flags with the file configuration.
pub mod config;

/// Endpoint handlers.
pub mod routes;

/// Contains the core Axum-based HTTP server implementation.
pub mod server_logic;

/// # Handle Server Command (`handle_srv`)
///
/// Loads configuration, builds the shared registry, resolves the bind
/// settings, and runs the server until shutdown.
pub async fn handle_srv(args: SrvArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let (cfg, registry) = super::load_registry(config_path)?;
    let config = config::ServerConfig::resolve(&args, &cfg.server);
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config, Arc::new(registry)).await?;
    Ok(())
}
