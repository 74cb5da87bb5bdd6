//! Board endpoints for clients that don't hold a WebSocket open

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use boardsync_core::{Board, Intent};

use crate::http::error::ApiError;
use crate::state::AppState;

/// GET /board - current snapshot
async fn get_board(State(state): State<AppState>) -> Result<Json<Arc<Board>>, ApiError> {
    let snapshot = state.board().snapshot().await?;
    Ok(Json(snapshot.into_board()))
}

/// POST /intents - apply one intent and report its outcome.
///
/// Mutations answer `202 Accepted` (the new snapshot goes out as a
/// `board.update` broadcast); `list.get` answers with the snapshot.
async fn post_intent(
    State(state): State<AppState>,
    body: Result<Json<Intent>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(intent) = body.map_err(|e| ApiError::BadRequest {
        message: e.body_text(),
    })?;
    let event = intent.event_name();

    match state.board().request(intent).await?? {
        Some(snapshot) => Ok(Json(snapshot.into_board()).into_response()),
        None => {
            tracing::debug!(event, "intent applied");
            Ok(StatusCode::ACCEPTED.into_response())
        }
    }
}

/// Board routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/board", get(get_board))
        .route("/intents", post(post_intent))
}
