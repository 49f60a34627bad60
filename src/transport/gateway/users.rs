use super::{AppState, detail_response};
use axum::{
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn user_not_found() -> Response {
    detail_response(StatusCode::NOT_FOUND, "User not found")
}

/// GET /api/users
pub(super) async fn list_users(State(state): State<AppState>) -> Response {
    Json(state.users.list()).into_response()
}

/// POST /api/users
pub(super) async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => {
            let user = state.users.create(&body.username, &body.email);
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(rejection) => detail_response(rejection.status(), rejection.body_text()),
    }
}

/// GET /api/users/{id}
pub(super) async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.users.get(&id) {
        Some(user) => Json(user).into_response(),
        None => user_not_found(),
    }
}

/// PUT /api/users/{id}: an empty body leaves the record unchanged
pub(super) async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let update = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateUserBody::default()
    } else {
        match serde_json::from_slice::<UpdateUserBody>(&body) {
            Ok(update) => update,
            Err(error) => {
                return detail_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Invalid user update: {error}"),
                );
            }
        }
    };

    match state
        .users
        .update(&id, update.username.as_deref(), update.email.as_deref())
    {
        Some(user) => Json(user).into_response(),
        None => user_not_found(),
    }
}

/// DELETE /api/users/{id}
pub(super) async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.users.delete(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        user_not_found()
    }
}
