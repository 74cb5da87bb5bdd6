//! Positional reorder engine.
//!
//! Index semantics follow drag-and-drop: the element is removed first and the
//! destination index is read against the shortened sequence. Moving an item
//! one slot down therefore lands it right after its old neighbour.
//!
//! The same functions drive the authoritative mutation path and the client
//! replica (`crate::replica`), so the two can never disagree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BoardError, IndexKind, Result};
use crate::model::Board;

/// A card move between (or within) lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMove {
    pub source_list_id: Uuid,
    pub destination_list_id: Uuid,
    pub source_index: usize,
    pub destination_index: usize,
}

impl CardMove {
    pub fn is_same_list(&self) -> bool {
        self.source_list_id == self.destination_list_id
    }
}

/// Remove the element at `from` and insert it at `to` in the shortened
/// sequence. Valid iff `from < len` and `to <= len - 1`.
pub fn reorder_within<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>> {
    let len = items.len();
    if from >= len {
        return Err(BoardError::invalid_index(IndexKind::Source, from, len));
    }
    if to >= len {
        return Err(BoardError::invalid_index(IndexKind::Destination, to, len));
    }

    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}

/// Move the element at `source_index` of `source` to `destination_index` of
/// `destination`. Valid iff `source_index < len(source)` and
/// `destination_index <= len(destination)`.
///
/// Passing the same slice twice routes to [`reorder_within`]; both returned
/// vectors are then the reordered collection.
pub fn move_between<T: Clone>(
    source: &[T],
    destination: &[T],
    source_index: usize,
    destination_index: usize,
) -> Result<(Vec<T>, Vec<T>)> {
    if std::ptr::eq(source, destination) {
        let reordered = reorder_within(source, source_index, destination_index)?;
        return Ok((reordered.clone(), reordered));
    }

    if source_index >= source.len() {
        return Err(BoardError::invalid_index(
            IndexKind::Source,
            source_index,
            source.len(),
        ));
    }
    if destination_index > destination.len() {
        return Err(BoardError::invalid_index(
            IndexKind::Insertion,
            destination_index,
            destination.len(),
        ));
    }

    let mut src = source.to_vec();
    let item = src.remove(source_index);
    let mut dst = destination.to_vec();
    dst.insert(destination_index, item);
    Ok((src, dst))
}

/// Apply a card move to a board, returning the replacement board.
///
/// Same-list moves go through [`reorder_within`]; cross-list moves through
/// [`move_between`]. Both list ids must exist.
pub fn move_card(board: &Board, mv: &CardMove) -> Result<Board> {
    let source = board
        .list_index(mv.source_list_id)
        .ok_or_else(|| BoardError::list_not_found(mv.source_list_id))?;
    let destination = board
        .list_index(mv.destination_list_id)
        .ok_or_else(|| BoardError::list_not_found(mv.destination_list_id))?;

    let lists = board.lists();
    if source == destination {
        let list = &lists[source];
        let cards = reorder_within(&list.cards, mv.source_index, mv.destination_index)?;
        return Ok(board.with_list(source, list.with_cards(cards)));
    }

    let (src_cards, dst_cards) = move_between(
        &lists[source].cards,
        &lists[destination].cards,
        mv.source_index,
        mv.destination_index,
    )?;

    let mut next = lists.to_vec();
    next[source] = lists[source].with_cards(src_cards);
    next[destination] = lists[destination].with_cards(dst_cards);
    Ok(Board::new(next))
}

/// Reorder entry point used by the handlers. Traces every call with its
/// inputs, then delegates to the pure functions above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderEngine;

impl ReorderEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn reorder<T: Clone>(&self, items: &[T], from: usize, to: usize) -> Result<Vec<T>> {
        tracing::debug!(len = items.len(), from, to, "reorder called");
        reorder_within(items, from, to)
    }

    pub fn move_card(&self, board: &Board, mv: &CardMove) -> Result<Board> {
        tracing::debug!(
            source_list = %mv.source_list_id,
            destination_list = %mv.destination_list_id,
            source_index = mv.source_index,
            destination_index = mv.destination_index,
            "move_card called"
        );
        move_card(board, mv)
    }
}
