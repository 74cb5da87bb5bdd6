//! Error types for boardsync-server

use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The board actor has stopped; no more intents can be applied
    #[error("board actor is not running")]
    ActorClosed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ServerError::ActorClosed.to_string(),
            "board actor is not running"
        );
    }
}
