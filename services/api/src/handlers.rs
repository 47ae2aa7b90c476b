//! Axum Handlers for the REST API
//!
//! Session management, the command endpoint the quick-action buttons go
//! through, and read-only views of the dialog and vehicle state. `utoipa`
//! doc comments generate the OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::{
    models::{
        CommandPayload, CommandResponse, DialogMessageView, ErrorResponse, QuickActionView,
        Session, UpdateSessionStatusPayload, VehicleStateView,
    },
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session with id '{}' not found", id))
}

/// Create a new assistant session.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = Session),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.store.create_session().await;
    (StatusCode::CREATED, Json(session))
}

/// List all sessions.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "List of sessions", body = [Session])
    )
)]
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<Session>> {
    Json(state.store.list_sessions().await)
}

/// Get a specific session by its ID.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session details", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .store
        .get_session(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok((StatusCode::OK, Json(session)))
}

/// Update the status of a session.
#[utoipa::path(
    patch,
    path = "/sessions/{id}/status",
    request_body = UpdateSessionStatusPayload,
    responses(
        (status = 200, description = "Session status updated successfully", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn update_session_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSessionStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .store
        .update_session_status(id, payload.status)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok((StatusCode::OK, Json(updated)))
}

/// Get the dialog transcript of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}/messages",
    responses(
        (status = 200, description = "Dialog messages in order", body = [DialogMessageView]),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DialogMessageView>>, ApiError> {
    let messages = state
        .store
        .get_messages(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(messages.iter().map(DialogMessageView::from).collect()))
}

/// Clear the dialog transcript of a session.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/messages",
    responses(
        (status = 204, description = "Transcript cleared"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn clear_session_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .clear_messages(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the current vehicle state snapshot.
#[utoipa::path(
    get,
    path = "/sessions/{id}/vehicle",
    responses(
        (status = 200, description = "Vehicle state snapshot", body = VehicleStateView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_vehicle_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .store
        .vehicle_state(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok((StatusCode::OK, Json(VehicleStateView { vehicle: snapshot })))
}

/// Run one text command through the assistant.
///
/// This is the path quick-action buttons take; the WebSocket session uses
/// the same classify-and-execute cycle for typed and spoken input.
#[utoipa::path(
    post,
    path = "/sessions/{id}/command",
    request_body = CommandPayload,
    responses(
        (status = 200, description = "Command executed", body = CommandResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommandPayload>,
) -> Result<Json<CommandResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    let (command, result, vehicle) = state
        .store
        .execute_command(id, &payload.text)
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(CommandResponse {
        command_type: command.command_type,
        category: command.category,
        success: result.is_success(),
        reply: result.message().to_string(),
        vehicle,
    }))
}

/// List the quick-action phrases the UI offers as buttons.
#[utoipa::path(
    get,
    path = "/quick-actions",
    responses(
        (status = 200, description = "Supported quick-action phrases", body = [QuickActionView])
    )
)]
pub async fn list_quick_actions() -> Json<Vec<QuickActionView>> {
    Json(
        cabin_core::QUICK_ACTIONS
            .iter()
            .map(|a| QuickActionView {
                phrase: a.phrase.to_string(),
                label: a.label.to_string(),
            })
            .collect(),
    )
}
