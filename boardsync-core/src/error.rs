/// Structured error types for boardsync-core.
///
/// Library consumers get `thiserror` enums; the `boardsync` binary wraps them
/// in `anyhow` where it needs context.
use std::any::Any;
use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why a mutation was rejected. A rejected mutation never changes the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Referenced list id is not on the board
    #[error("list with id = {id} not found")]
    ListNotFound { id: Uuid },

    /// Referenced card id is not in any list
    #[error("card with id = {id} not found")]
    CardNotFound { id: Uuid },

    /// Source or destination index outside the valid range
    #[error(
        "{what} index {index} out of range for length {len} (valid: {valid})",
        valid = .what.valid_range(.len)
    )]
    InvalidIndex {
        what: IndexKind,
        index: usize,
        len: usize,
    },

    /// A handler panicked; the store keeps its last committed board
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Which index of a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Position of the element being moved
    Source,
    /// Target position within the same sequence, after removal
    Destination,
    /// Target position in another sequence; `len` itself appends
    Insertion,
}

impl IndexKind {
    /// Accepted indices for a sequence of `len` elements
    pub fn valid_range(self, len: impl Borrow<usize>) -> String {
        let len = *len.borrow();
        match self {
            Self::Source | Self::Destination if len == 0 => "none".to_string(),
            Self::Source | Self::Destination => format!("0..={}", len - 1),
            Self::Insertion => format!("0..={len}"),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination | Self::Insertion => f.write_str("destination"),
        }
    }
}

/// Result type alias for board mutations
pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    pub fn list_not_found(id: Uuid) -> Self {
        Self::ListNotFound { id }
    }

    pub fn card_not_found(id: Uuid) -> Self {
        Self::CardNotFound { id }
    }

    /// `len` is the length of the sequence the index was checked against.
    pub fn invalid_index(what: IndexKind, index: usize, len: usize) -> Self {
        Self::InvalidIndex { what, index, len }
    }

    /// Wrap a caught panic payload
    pub fn panicked(payload: &(dyn Any + Send)) -> Self {
        Self::Internal {
            message: panic_message(payload),
        }
    }

    /// Missing-identity failures, as opposed to bad indices
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ListNotFound { .. } | Self::CardNotFound { .. })
    }
}

/// Text of a panic payload (`panic!` with a literal or a formatted string)
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// A log sink failed to accept a record
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background writer is gone (runtime shut down)
    #[error("sink '{sink}' is closed")]
    Closed { sink: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = Uuid::nil();
        let err = BoardError::list_not_found(id);
        assert_eq!(
            err.to_string(),
            "list with id = 00000000-0000-0000-0000-000000000000 not found"
        );

        let err = BoardError::invalid_index(IndexKind::Destination, 7, 3);
        assert_eq!(
            err.to_string(),
            "destination index 7 out of range for length 3 (valid: 0..=2)"
        );
    }

    #[test]
    fn test_valid_range_by_kind() {
        let empty = BoardError::invalid_index(IndexKind::Source, 0, 0);
        assert_eq!(
            empty.to_string(),
            "source index 0 out of range for length 0 (valid: none)"
        );

        let append = BoardError::invalid_index(IndexKind::Insertion, 4, 2);
        assert_eq!(
            append.to_string(),
            "destination index 4 out of range for length 2 (valid: 0..=2)"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(BoardError::card_not_found(Uuid::nil()).is_not_found());
        assert!(!BoardError::invalid_index(IndexKind::Source, 1, 1).is_not_found());
    }

    #[test]
    fn test_panic_payload_message() {
        let caught = std::panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(
            BoardError::panicked(caught.as_ref()),
            BoardError::Internal {
                message: "boom 7".into()
            }
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let sink_err: SinkError = io_err.into();
        assert!(matches!(sink_err, SinkError::Io(_)));
    }
}
