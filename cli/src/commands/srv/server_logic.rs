//! # Helpdesk HTTP Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! Runs the JSON API for `helpdesk srv`:
//! - Port availability checking with automatic fallback
//! - Request tracing and optional CORS middleware
//! - Graceful shutdown on Ctrl+C or SIGTERM
//!
//! ## Architecture
//!
//! 1. Find an available port if the requested one is in use
//! 2. Wrap the routes from `routes.rs` in tracing and CORS layers
//! 3. Serve until a shutdown signal arrives
//!
use super::config::ServerConfig;
use super::routes::{self, AppState};
use crate::core::error::{HelpdeskError, Result};
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// # Run HTTP Server (`run_server`)
///
/// Binds the first available port at or after `config.port`, prints where
/// the API is reachable, and serves `registry` until shutdown.
///
/// ## Process
///
/// 1. Bind a listener with `find_available_port`, moving to the next port
///    while the requested one is taken.
/// 2. Build the app with `create_app`.
/// 3. Print the startup banner.
/// 4. Serve on the bound listener until `shutdown_signal` resolves.
///
/// ## Arguments
///
/// * `config`: Bind address, port search limit and CORS setting.
/// * `registry`: The response table shared by every request.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` after a graceful shutdown.
///
/// ## Errors
///
/// Returns an error if no port in range can be bound or the server fails.
pub async fn run_server(config: ServerConfig, registry: AppState) -> Result<()> {
    let listener =
        find_available_port(config.host, config.port, config.max_port_attempts).await?;
    let addr = listener
        .local_addr()
        .context("Failed to read the bound server address")?;
    let entry_count = registry.list().len();
    let app = create_app(&config, registry);

    println!("\n=================================================================");
    println!("🤖 Helpdesk API listening on http://{}", addr);
    println!("💬 Chat endpoint:     POST http://{}/chat", addr);
    println!("📋 Responses loaded:  {}", entry_count);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting server on {} with {} responses", addr, entry_count);
    println!("Server starting! Press Ctrl+C to stop.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves once Ctrl+C or (on Unix) SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries to bind `start_port` and then each following port, `max_attempts`
/// ports in total. The listener that succeeds is returned as is, so the
/// server keeps the socket it was given.
///
/// ## Arguments
///
/// * `req_host`: The address to bind on.
/// * `start_port`: The first port to try.
/// * `max_attempts`: How many consecutive ports to try, counting `start_port`.
///
/// ## Returns
///
/// * `Result<TcpListener>`: The first listener that could be bound.
///
/// ## Errors
///
/// Returns `HelpdeskError::Server` if every attempt fails.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<TcpListener> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}).",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    Err(HelpdeskError::Server(format!(
        "Could not find an available port on host {} starting from port {} after trying {} port(s).",
        req_host, start_port, max_attempts
    ))
    .into())
}

/// # Create Axum Application (`create_app`)
///
/// Wraps the API routes in request tracing and, when enabled, permissive CORS.
///
/// ## Arguments
///
/// * `config`: Only `enable_cors` is read here.
/// * `registry`: Handed to `routes::router` as shared state.
///
/// ## Returns
///
/// * `Router`: The application with its middleware stack applied.
fn create_app(config: &ServerConfig, registry: AppState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    routes::router(registry).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ResponseRegistry;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config(enable_cors: bool) -> ServerConfig {
        ServerConfig {
            port: 0,
            host: Ipv4Addr::LOCALHOST.into(),
            enable_cors,
            max_port_attempts: 1,
        }
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 50100;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;
        assert_eq!(addr.port(), start_port);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51100;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;
        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_single_attempt_fails_when_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 52100;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let err = find_available_port(host, start_port, 1).await.unwrap_err();
        assert!(err.to_string().contains("Could not find an available port"));
        Ok(())
    }

    #[tokio::test]
    async fn test_found_port_stays_bound() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 53100;

        let listener = find_available_port(host, start_port, 1).await?;
        // The returned listener still owns the port.
        assert!(TcpListener::bind(SocketAddr::new(host, start_port)).await.is_err());
        drop(listener);
        assert!(TcpListener::bind(SocketAddr::new(host, start_port)).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_app_adds_cors_headers() {
        let app = create_app(&test_config(true), Arc::new(ResponseRegistry::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_create_app_without_cors() {
        let app = create_app(&test_config(false), Arc::new(ResponseRegistry::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_shutdown_signal_creation() {
        let shutdown_future = shutdown_signal();
        drop(shutdown_future);
    }
}
