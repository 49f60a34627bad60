//! Axum-based HTTP front door: REST endpoints under `/api`, the
//! `/ws/creator` WebSocket, and the static frontend bundle as fallback.
//!
//! - Request body size limits (64KB max)
//! - Request timeouts (30s)
//! - CORS open to any origin unless `gateway.cors_origins` lists them

mod handlers;
mod server;
mod users;
mod websocket;

pub use server::{build_app, run_gateway, run_gateway_with_listener};

use crate::config::Config;
use crate::error::SiteError;
use crate::logging::AgentLogger;
use crate::messenger::Messenger;
use crate::users::UserStore;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s) -- prevents slow-loris attacks
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub logger: Arc<AgentLogger>,
    pub messenger: Arc<Messenger>,
    pub users: Arc<UserStore>,
}

impl AppState {
    /// Construct every service from config.
    pub fn build(config: Arc<Config>) -> Result<Self, SiteError> {
        config.validate()?;
        let logger = Arc::new(AgentLogger::new(config.logging.dir.clone())?);
        let messenger = Arc::new(Messenger::new(Arc::clone(&logger)));

        Ok(Self {
            config,
            logger,
            messenger,
            users: Arc::new(UserStore::new()),
        })
    }
}

/// Error body shared by every REST endpoint: `{"detail": "..."}`.
pub(crate) fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response {
    let body = serde_json::json!({ "detail": detail.into() });
    (status, Json(body)).into_response()
}
