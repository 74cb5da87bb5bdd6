//! Mutation handlers.
//!
//! [`BoardContext`] owns the store, the broadcaster and the log publisher and
//! is the only thing that writes to the store. Handler families borrow it:
//! [`ListHandler`] via [`BoardContext::lists`], [`CardHandler`] via
//! [`BoardContext::cards`].
//!
//! Every mutation goes through [`BoardContext::commit`]:
//! read snapshot → compute replacement → `set_data` → broadcast → INFO record.
//! A rejected mutation leaves the store alone, broadcasts nothing and emits
//! one ERROR record.

mod card;
mod list;

use serde_json::Value;

pub use card::CardHandler;
pub use list::ListHandler;

use crate::audit::{LogPublisher, LogRecord};
use crate::broadcast::Broadcaster;
use crate::error::Result;
use crate::model::Board;
use crate::protocol::Intent;
use crate::reorder::ReorderEngine;
use crate::store::{BoardStore, Snapshot};

/// What a successful mutation produced
pub(crate) struct Change<T> {
    board: Board,
    message: String,
    value: T,
}

impl<T> Change<T> {
    pub(crate) fn new(board: Board, message: impl Into<String>, value: T) -> Self {
        Self {
            board,
            message: message.into(),
            value,
        }
    }
}

pub struct BoardContext<S, B> {
    store: S,
    broadcaster: B,
    publisher: LogPublisher,
    engine: ReorderEngine,
}

impl<S: BoardStore, B: Broadcaster> BoardContext<S, B> {
    pub fn new(store: S, broadcaster: B, publisher: LogPublisher) -> Self {
        Self {
            store,
            broadcaster,
            publisher,
            engine: ReorderEngine::new(),
        }
    }

    pub fn lists(&mut self) -> ListHandler<'_, S, B> {
        ListHandler::new(self)
    }

    pub fn cards(&mut self) -> CardHandler<'_, S, B> {
        CardHandler::new(self)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn publisher(&self) -> &LogPublisher {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut LogPublisher {
        &mut self.publisher
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub(crate) fn engine(&self) -> ReorderEngine {
        self.engine
    }

    /// Route one intent to its handler. Returns the snapshot for `list.get`,
    /// `None` for mutations.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<Snapshot>> {
        tracing::debug!(intent = intent.event_name(), "applying intent");
        let result = match intent {
            Intent::GetLists => return Ok(Some(self.lists().get())),
            Intent::CreateList { name } => self.lists().create(&name).map(drop),
            Intent::RenameList { id, new_name } => self.lists().rename(id, &new_name),
            Intent::DeleteList { id } => self.lists().delete(id),
            Intent::ReorderLists {
                source_index,
                destination_index,
            } => self.lists().reorder(source_index, destination_index),
            Intent::CreateCard { list_id, name } => self.cards().create(list_id, &name).map(drop),
            Intent::RenameCard { card_id, new_name } => self.cards().rename(card_id, &new_name),
            Intent::ChangeCardDescription {
                card_id,
                new_description,
            } => self.cards().change_description(card_id, &new_description),
            Intent::DeleteCard { card_id } => self.cards().delete(card_id),
            Intent::DuplicateCard { card } => self.cards().duplicate(&card).map(drop),
            Intent::ReorderCards(mv) => self.cards().reorder(mv),
        };
        result.map(|()| None)
    }

    /// Run one mutation. `action` describes the attempt for the ERROR record;
    /// `parameters` are the operation inputs recorded either way.
    pub(crate) fn commit<T>(
        &mut self,
        action: &str,
        parameters: Value,
        mutate: impl FnOnce(&Board) -> Result<Change<T>>,
    ) -> Result<T> {
        let current = self.store.get_data();

        match mutate(&current) {
            Ok(change) => {
                self.store.set_data(change.board);
                self.broadcaster.broadcast(self.store.snapshot());
                self.publisher
                    .notify(&LogRecord::info(change.message).with_parameters(parameters));
                Ok(change.value)
            }
            Err(e) => {
                tracing::warn!(action, error = %e, "mutation rejected");
                self.publisher.notify(
                    &LogRecord::error(format!("ERROR when {action}: {e}"))
                        .with_parameters(parameters),
                );
                Err(e)
            }
        }
    }
}
