//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        CommandPayload, CommandResponse, DialogMessageView, ErrorResponse, QuickActionView,
        Session, SessionStatus, UpdateSessionStatusPayload, VehicleStateView,
    },
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::list_sessions,
        handlers::get_session,
        handlers::update_session_status,
        handlers::get_session_messages,
        handlers::clear_session_messages,
        handlers::get_vehicle_state,
        handlers::run_command,
        handlers::list_quick_actions,
    ),
    components(
        schemas(Session, SessionStatus, DialogMessageView, CommandPayload, CommandResponse,
            VehicleStateView, QuickActionView, UpdateSessionStatusPayload, ErrorResponse)
    ),
    tags(
        (name = "Cabin API", description = "Session and command surface of the in-vehicle voice assistant demo")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route("/sessions/{id}", get(handlers::get_session))
        .route(
            "/sessions/{id}/status",
            patch(handlers::update_session_status),
        )
        .route(
            "/sessions/{id}/messages",
            get(handlers::get_session_messages).delete(handlers::clear_session_messages),
        )
        .route("/sessions/{id}/vehicle", get(handlers::get_vehicle_state))
        .route("/sessions/{id}/command", post(handlers::run_command))
        .route("/quick-actions", get(handlers::list_quick_actions))
        .route("/ws", get(ws_handler))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Merge the stateful routes with the stateless Swagger UI.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
