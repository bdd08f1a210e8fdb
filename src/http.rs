//! HTTP surface — the single skill endpoint plus a health probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::error;

use crate::dispatch::RequestDispatcher;
use crate::error::Error;
use crate::protocol::request::InboundRequest;

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<RequestDispatcher>,
}

/// Build the Axum router for the skill endpoint and health route.
pub fn skill_routes(dispatcher: Arc<RequestDispatcher>) -> Router {
    let state = AppState { dispatcher };

    Router::new()
        .route("/api/skill", post(handle_skill))
        .route("/health", get(health))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "email-skill"
    }))
}

// ── Skill endpoint ──────────────────────────────────────────────────────

async fn handle_skill(
    State(state): State<AppState>,
    Json(request): Json<InboundRequest>,
) -> impl IntoResponse {
    match state.dispatcher.handle(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(Error::Request(e)) => {
            error!(error = %e, "Rejected malformed request");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Request handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "internal error"})),
            )
                .into_response()
        }
    }
}
