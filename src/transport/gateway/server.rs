use super::handlers::{handle_creator_command, handle_health, handle_logs, handle_status};
use super::users::{create_user, delete_user, get_user, list_users, update_user};
use super::websocket::ws_handler;
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS};

use crate::config::{Config, GatewayConfig};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;

/// Run the HTTP gateway on `gateway.host:gateway.port`.
pub async fn run_gateway(config: Arc<Config>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("get gateway listener local address")?;

    let state = AppState::build(Arc::clone(&config)).context("build gateway services")?;

    print_gateway_banner(&local_addr.to_string(), &config);
    state.logger.record(
        "system",
        "startup",
        LogLevel::Success,
        "Self-Building Site API started successfully",
        None,
    );

    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

fn print_gateway_banner(display_addr: &str, config: &Config) {
    println!("Gateway listening on {display_addr}");
    println!("  GET  /api/health");
    println!("  GET  /api/status");
    println!("  GET  /api/logs");
    println!("  *    /api/users");
    println!("  POST /api/creator/command");
    println!("  GET  /ws/creator -> WebSocket");
    println!(
        "  Static bundle: {}",
        config.frontend.static_dir.display()
    );
}

fn cors_layer(gateway: &GatewayConfig) -> CorsLayer {
    if gateway.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = gateway
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Assemble the router with all middleware applied.
pub fn build_app(state: AppState) -> Router {
    let static_dir = state.config.frontend.static_dir.clone();
    let cors = cors_layer(&state.config.gateway);

    let api = Router::new()
        .route("/health", get(handle_health))
        .route("/status", get(handle_status))
        .route("/logs", get(handle_logs))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/creator/command", post(handle_creator_command));

    let frontend =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .route("/ws/creator", get(ws_handler))
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback_service(frontend)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(cors)
}
