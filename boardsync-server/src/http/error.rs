//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use boardsync_core::BoardError;
use serde_json::json;

use crate::error::ServerError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// The board rejected the intent (404 for missing ids, 422 for indices,
    /// 500 when a handler panicked)
    Rejected(BoardError),

    /// Request body is not a known intent (400)
    BadRequest { message: String },

    /// Board actor not running (503)
    Unavailable,

    /// Internal error (500)
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Rejected(BoardError::Internal { message }) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Rejected(e) => {
                let (status, code) = if e.is_not_found() {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_index")
                };
                (
                    status,
                    json!({
                        "error": code,
                        "message": e.to_string()
                    }),
                )
            }
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "unavailable",
                    "message": "board is not accepting intents"
                }),
            ),
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BoardError> for ApiError {
    fn from(e: BoardError) -> Self {
        Self::Rejected(e)
    }
}

impl From<ServerError> for ApiError {
    fn from(e: ServerError) -> Self {
        match e {
            ServerError::ActorClosed => Self::Unavailable,
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardsync_core::IndexKind;
    use uuid::Uuid;

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(BoardError::card_not_found(Uuid::nil()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_index_is_422() {
        let err = ApiError::from(BoardError::invalid_index(IndexKind::Source, 4, 2));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn handler_panic_is_500() {
        let err = ApiError::from(BoardError::Internal {
            message: "boom".into(),
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn actor_closed_is_503() {
        let err = ApiError::from(ServerError::ActorClosed);
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
