use super::{AppState, detail_response};
use crate::logging::LogLevel;
use crate::messenger::RawCommand;
use axum::{
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// GET /api/health
pub(super) async fn handle_health(State(state): State<AppState>) -> Response {
    state.logger.record(
        "system",
        "health_check",
        LogLevel::Info,
        "Health check requested",
        None,
    );
    Json(json!({
        "status": "healthy",
        "message": "Self-Building Site API is running",
    }))
    .into_response()
}

/// GET /api/status
pub(super) async fn handle_status(State(state): State<AppState>) -> Response {
    state.logger.record(
        "orchestrator",
        "status_check",
        LogLevel::Info,
        "System status requested",
        None,
    );

    let system = state.messenger.get_state();
    Json(json!({
        "status": system.status,
        "paused": system.paused,
        "agents": {
            "orchestrator": "ready",
            "builder": "ready",
            "tester": "ready",
            "critic": "ready",
        },
        "version": env!("CARGO_PKG_VERSION"),
        "last_checkpoint": system.last_checkpoint,
        "current_task": system.current_task,
    }))
    .into_response()
}

/// GET /api/logs?limit=N
pub(super) async fn handle_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return detail_response(rejection.status(), rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(state.config.logging.default_limit);

    match state.logger.recent(limit) {
        Ok(logs) => Json(json!({ "logs": logs })).into_response(),
        Err(error) => {
            state.logger.record(
                "system",
                "get_logs",
                LogLevel::Error,
                &format!("Failed to retrieve logs: {error}"),
                None,
            );
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve logs")
        }
    }
}

/// POST /api/creator/command: REST fallback for creators without a socket
pub(super) async fn handle_creator_command(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(command) = match body {
        Ok(body) => body,
        Err(rejection) => return detail_response(rejection.status(), rejection.body_text()),
    };

    let kind = command
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    state.logger.record(
        "messenger",
        "rest_command",
        LogLevel::Info,
        &format!("REST command received: {kind}"),
        None,
    );

    let raw = match RawCommand::from_value(command.clone()) {
        Ok(raw) => raw,
        Err(error) => return detail_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    let mut response = json!({
        "status": "command_processed",
        "command": command,
    });
    if let Some(reply) = state.messenger.handle_command(None, &raw) {
        response["reply"] = serde_json::to_value(reply).unwrap_or(Value::Null);
    }

    Json(response).into_response()
}
