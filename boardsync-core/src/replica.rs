//! Client-side mirror of the board.
//!
//! A client renders from a [`BoardReplica`]. Drag-and-drop moves are applied
//! optimistically with the same reorder functions the authoritative path
//! uses; the next `board.update` replaces whatever the replica holds.
//! Snapshots older than the last one received are ignored, so a `list.get`
//! reply overtaken by a newer broadcast cannot roll the replica back.

use std::sync::Arc;

use crate::error::Result;
use crate::model::Board;
use crate::protocol::{Intent, ServerMessage};
use crate::reorder::{move_card, reorder_within};

#[derive(Debug, Clone, Default)]
pub struct BoardReplica {
    board: Arc<Board>,
    /// Revision of the last authoritative snapshot, if any arrived yet
    revision: Option<u64>,
    /// Optimistic moves applied since the last authoritative snapshot
    pending: usize,
}

impl BoardReplica {
    pub fn new(board: Arc<Board>) -> Self {
        Self {
            board,
            revision: None,
            pending: 0,
        }
    }

    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Take a server message. Snapshots at or above the current revision
    /// replace local state; returns true when the replica changed.
    pub fn receive(&mut self, message: ServerMessage) -> bool {
        let snapshot = match message {
            ServerMessage::Update(snapshot) | ServerMessage::Lists(snapshot) => snapshot,
            ServerMessage::Error { .. } => return false,
        };

        if self.revision.is_some_and(|current| snapshot.revision < current) {
            tracing::debug!(
                revision = snapshot.revision,
                current = self.revision,
                "ignoring stale snapshot"
            );
            return false;
        }

        self.revision = Some(snapshot.revision);
        self.board = snapshot.into_board();
        self.pending = 0;
        true
    }

    /// Apply a reorder intent locally before the server confirms it.
    /// Returns false for intents that are not previewed (they wait for the
    /// broadcast).
    pub fn preview(&mut self, intent: &Intent) -> Result<bool> {
        let next = match intent {
            Intent::ReorderLists {
                source_index,
                destination_index,
            } => Board::new(reorder_within(
                self.board.lists(),
                *source_index,
                *destination_index,
            )?),
            Intent::ReorderCards(mv) => move_card(&self.board, mv)?,
            _ => return Ok(false),
        };
        self.board = Arc::new(next);
        self.pending += 1;
        Ok(true)
    }
}
