//! The authoritative board store.
//!
//! Readers get an `Arc<Board>` snapshot that is never modified afterwards;
//! writers hand over a complete replacement board. There is no partial update.
//! Every commit bumps the store revision by one.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::Board;

/// A committed board and the revision it was committed at.
///
/// Serializes as `{"revision": n, "lists": [...]}`. Receivers keep the
/// highest revision they have seen and drop anything older.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub revision: u64,
    #[serde(rename = "lists")]
    board: Arc<Board>,
}

impl Snapshot {
    pub fn new(revision: u64, board: Arc<Board>) -> Self {
        Self { revision, board }
    }

    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn into_board(self) -> Arc<Board> {
        self.board
    }

    /// True when `self` was committed before `other`
    pub fn is_older_than(&self, other: &Snapshot) -> bool {
        self.revision < other.revision
    }
}

impl Deref for Snapshot {
    type Target = Board;

    fn deref(&self) -> &Board {
        &self.board
    }
}

/// Storage seam for the board. `MemoryStore` is the only implementation
/// shipped; a durable store would implement the same two calls.
pub trait BoardStore: Send {
    /// Current snapshot
    fn get_data(&self) -> Arc<Board>;

    /// Replace the whole board atomically
    fn set_data(&mut self, board: Board);

    /// Number of commits so far
    fn revision(&self) -> u64;

    /// Current board together with its revision
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.revision(), self.get_data())
    }
}

/// In-memory store holding the current snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Arc<Board>,
    revision: u64,
}

impl MemoryStore {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Store starting from `board`
    pub fn seeded(board: Board) -> Self {
        Self {
            current: Arc::new(board),
            revision: 0,
        }
    }
}

impl BoardStore for MemoryStore {
    fn get_data(&self) -> Arc<Board> {
        Arc::clone(&self.current)
    }

    fn set_data(&mut self, board: Board) {
        self.current = Arc::new(board);
        self.revision += 1;
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
