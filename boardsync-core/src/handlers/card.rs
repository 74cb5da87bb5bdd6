use serde_json::json;
use uuid::Uuid;

use super::{BoardContext, Change};
use crate::broadcast::Broadcaster;
use crate::error::{BoardError, Result};
use crate::model::{Board, Card};
use crate::reorder::CardMove;
use crate::store::BoardStore;

/// Card intents: create, rename, change description, delete, duplicate, reorder.
pub struct CardHandler<'a, S, B> {
    ctx: &'a mut BoardContext<S, B>,
}

fn card_ids(board: &Board, list_id: Uuid) -> Vec<Uuid> {
    board
        .list(list_id)
        .map(|l| l.cards.iter().map(|c| c.id).collect())
        .unwrap_or_default()
}

impl<'a, S: BoardStore, B: Broadcaster> CardHandler<'a, S, B> {
    pub(crate) fn new(ctx: &'a mut BoardContext<S, B>) -> Self {
        Self { ctx }
    }

    /// Append a card with an empty description to `list_id`. Returns its id.
    pub fn create(&mut self, list_id: Uuid, name: &str) -> Result<Uuid> {
        let card = Card::new(name, "");
        let id = card.id;

        self.ctx.commit(
            &format!("creating a card \"{name}\" in list with id = {list_id}"),
            json!({ "listId": list_id, "name": name }),
            |board| {
                let index = board
                    .list_index(list_id)
                    .ok_or_else(|| BoardError::list_not_found(list_id))?;
                let list = &board.lists()[index];
                let mut cards = list.cards.clone();
                cards.push(card);
                Ok(Change::new(
                    board.with_list(index, list.with_cards(cards)),
                    format!("card with id = {id} created in list with id = {list_id}"),
                    id,
                ))
            },
        )
    }

    pub fn rename(&mut self, card_id: Uuid, new_name: &str) -> Result<()> {
        self.ctx.commit(
            &format!("renaming a card with id = {card_id} to {new_name}"),
            json!({ "cardId": card_id, "newName": new_name }),
            |board| {
                let loc = board
                    .locate_card(card_id)
                    .ok_or_else(|| BoardError::card_not_found(card_id))?;
                let next = board.with_card(loc, |card| Card {
                    name: new_name.to_owned(),
                    ..card.clone()
                });
                Ok(Change::new(
                    next,
                    format!("card with id = {card_id} was renamed to {new_name}"),
                    (),
                ))
            },
        )
    }

    pub fn change_description(&mut self, card_id: Uuid, new_description: &str) -> Result<()> {
        self.ctx.commit(
            &format!("changing description of a card with id = {card_id} to {new_description}"),
            json!({ "cardId": card_id, "newDescription": new_description }),
            |board| {
                let loc = board
                    .locate_card(card_id)
                    .ok_or_else(|| BoardError::card_not_found(card_id))?;
                let next = board.with_card(loc, |card| Card {
                    description: new_description.to_owned(),
                    ..card.clone()
                });
                Ok(Change::new(
                    next,
                    format!("card with id = {card_id} changed its description to {new_description}"),
                    (),
                ))
            },
        )
    }

    pub fn delete(&mut self, card_id: Uuid) -> Result<()> {
        self.ctx.commit(
            &format!("deleting a card with id = {card_id}"),
            json!({ "cardId": card_id }),
            |board| {
                let loc = board
                    .locate_card(card_id)
                    .ok_or_else(|| BoardError::card_not_found(card_id))?;
                let list = &board.lists()[loc.list_index];
                let mut cards = list.cards.clone();
                cards.remove(loc.card_index);
                Ok(Change::new(
                    board.with_list(loc.list_index, list.with_cards(cards)),
                    format!("card with id = {card_id} was deleted"),
                    (),
                ))
            },
        )
    }

    /// Clone `card` under a new id and append it to whichever list holds a
    /// card with `card.id` right now. The caller's view of where the card
    /// lives is not trusted. Returns the new card's id.
    pub fn duplicate(&mut self, card: &Card) -> Result<Uuid> {
        let copy = card.duplicate();
        let copy_id = copy.id;
        let source_id = card.id;

        self.ctx.commit(
            &format!("duplicating a card with id = {source_id}"),
            json!({ "card": card }),
            |board| {
                let loc = board
                    .locate_card(source_id)
                    .ok_or_else(|| BoardError::card_not_found(source_id))?;
                let list = &board.lists()[loc.list_index];
                let mut cards = list.cards.clone();
                cards.push(copy);
                Ok(Change::new(
                    board.with_list(loc.list_index, list.with_cards(cards)),
                    format!(
                        "card with id = {source_id} was duplicated as {copy_id} in list with id = {}",
                        list.id
                    ),
                    copy_id,
                ))
            },
        )
    }

    /// Move a card within a list or across lists.
    pub fn reorder(&mut self, mv: CardMove) -> Result<()> {
        let engine = self.ctx.engine();
        let snapshot = self.ctx.snapshot();
        let lists = if mv.is_same_list() {
            format!("list with id = {}", mv.source_list_id)
        } else {
            format!(
                "lists with id = {} and {}",
                mv.source_list_id, mv.destination_list_id
            )
        };

        self.ctx.commit(
            &format!("reordering cards in {lists}"),
            json!({
                "sourceListId": mv.source_list_id,
                "destinationListId": mv.destination_list_id,
                "sourceIndex": mv.source_index,
                "destinationIndex": mv.destination_index,
                "sourceItems": card_ids(&snapshot, mv.source_list_id),
                "destinationItems": card_ids(&snapshot, mv.destination_list_id),
            }),
            |board| {
                let next = engine.move_card(board, &mv)?;
                Ok(Change::new(next, format!("cards reordered in {lists}"), ()))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{LogPublisher, MemorySink};
    use crate::broadcast::RecordingBroadcaster;
    use crate::error::BoardError;
    use crate::handlers::BoardContext;
    use crate::model::{Board, Card, List};
    use crate::reorder::CardMove;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn context(
        board: Board,
    ) -> (
        BoardContext<MemoryStore, RecordingBroadcaster>,
        Arc<MemorySink>,
        RecordingBroadcaster,
    ) {
        let sink = Arc::new(MemorySink::new());
        let mut publisher = LogPublisher::new();
        publisher.subscribe(sink.clone());
        let broadcaster = RecordingBroadcaster::new();
        let ctx = BoardContext::new(MemoryStore::seeded(board), broadcaster.clone(), publisher);
        (ctx, sink, broadcaster)
    }

    fn list_with(name: &str, cards: &[&str]) -> List {
        let mut list = List::new(name);
        list.cards = cards.iter().map(|c| Card::new(*c, "")).collect();
        list
    }

    #[test]
    fn create_appends_with_empty_description() {
        let list = list_with("todo", &["a"]);
        let list_id = list.id;
        let (mut ctx, _, _) = context(Board::new(vec![list]));

        let id = ctx.cards().create(list_id, "b").unwrap();

        let board = ctx.snapshot();
        let card = &board.lists()[0].cards[1];
        assert_eq!(card.id, id);
        assert_eq!(card.name, "b");
        assert!(card.description.is_empty());
    }

    #[test]
    fn create_in_missing_list_is_rejected() {
        let (mut ctx, sink, broadcaster) = context(Board::new(vec![list_with("todo", &[])]));
        let missing = Uuid::new_v4();

        let err = ctx.cards().create(missing, "x").unwrap_err();

        assert_eq!(err, BoardError::list_not_found(missing));
        assert_eq!(ctx.snapshot().card_count(), 0);
        assert_eq!(broadcaster.count(), 0);
        assert!(sink.records()[0].is_error());
    }

    #[test]
    fn rename_and_describe_in_place() {
        let list = list_with("todo", &["a", "b", "c"]);
        let id = list.cards[1].id;
        let (mut ctx, sink, broadcaster) = context(Board::new(vec![list]));

        ctx.cards().rename(id, "bee").unwrap();
        ctx.cards().change_description(id, "second letter").unwrap();

        let board = ctx.snapshot();
        let card = &board.lists()[0].cards[1];
        assert_eq!(card.id, id);
        assert_eq!(card.name, "bee");
        assert_eq!(card.description, "second letter");
        assert_eq!(broadcaster.count(), 2);
        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn rename_missing_card_logs_error() {
        let (mut ctx, sink, broadcaster) = context(Board::new(vec![list_with("todo", &["a"])]));
        let missing = Uuid::new_v4();

        assert!(ctx.cards().rename(missing, "x").is_err());

        assert_eq!(broadcaster.count(), 0);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].message.contains(&missing.to_string()));
    }

    #[test]
    fn delete_collapses_indices() {
        let list = list_with("todo", &["a", "b", "c"]);
        let id = list.cards[0].id;
        let (mut ctx, _, _) = context(Board::new(vec![list]));

        ctx.cards().delete(id).unwrap();

        let names: Vec<_> = ctx.snapshot().lists()[0]
            .cards
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn duplicate_follows_current_owner() {
        let a = list_with("a", &["x", "y"]);
        let b = list_with("b", &["z"]);
        let payload = a.cards[0].clone();
        let (a_id, b_id) = (a.id, b.id);
        let (mut ctx, _, _) = context(Board::new(vec![a, b]));

        // The card moves to list b before the duplicate intent arrives.
        ctx.cards()
            .reorder(CardMove {
                source_list_id: a_id,
                destination_list_id: b_id,
                source_index: 0,
                destination_index: 0,
            })
            .unwrap();
        let copy_id = ctx.cards().duplicate(&payload).unwrap();

        let board = ctx.snapshot();
        let b = board.list(b_id).unwrap();
        assert_eq!(b.cards.len(), 3);
        let copy = b.cards.last().unwrap();
        assert_eq!(copy.id, copy_id);
        assert_ne!(copy.id, payload.id);
        assert_eq!(copy.name, payload.name);
        assert_eq!(copy.description, payload.description);
        assert_eq!(board.list(a_id).unwrap().cards.len(), 1);
    }

    #[test]
    fn duplicate_of_deleted_card_is_rejected() {
        let list = list_with("a", &["x"]);
        let payload = list.cards[0].clone();
        let (mut ctx, _, broadcaster) = context(Board::new(vec![list]));
        ctx.cards().delete(payload.id).unwrap();

        assert_eq!(
            ctx.cards().duplicate(&payload),
            Err(BoardError::card_not_found(payload.id))
        );
        assert_eq!(broadcaster.count(), 1);
    }

    #[test]
    fn reorder_with_bad_index_is_not_applied() {
        let a = list_with("a", &["x"]);
        let b = list_with("b", &[]);
        let (a_id, b_id) = (a.id, b.id);
        let board = Board::new(vec![a, b]);
        let (mut ctx, sink, broadcaster) = context(board.clone());

        let result = ctx.cards().reorder(CardMove {
            source_list_id: a_id,
            destination_list_id: b_id,
            source_index: 0,
            destination_index: 4,
        });

        assert!(matches!(result, Err(BoardError::InvalidIndex { .. })));
        assert_eq!(*ctx.snapshot(), board);
        assert_eq!(broadcaster.count(), 0);
        let params = sink.records()[0].parameters.clone().unwrap();
        assert_eq!(params["destinationIndex"], 4);
    }
}
