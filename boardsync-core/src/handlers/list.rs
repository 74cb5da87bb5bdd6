use serde_json::json;
use uuid::Uuid;

use super::{BoardContext, Change};
use crate::broadcast::Broadcaster;
use crate::error::{BoardError, Result};
use crate::model::{Board, List};
use crate::store::{BoardStore, Snapshot};

/// List intents: create, rename, delete, reorder, get.
pub struct ListHandler<'a, S, B> {
    ctx: &'a mut BoardContext<S, B>,
}

fn list_ids(board: &Board) -> Vec<Uuid> {
    board.lists().iter().map(|l| l.id).collect()
}

impl<'a, S: BoardStore, B: Broadcaster> ListHandler<'a, S, B> {
    pub(crate) fn new(ctx: &'a mut BoardContext<S, B>) -> Self {
        Self { ctx }
    }

    /// Snapshot for `list.get`. Read-only: no broadcast, no record.
    pub fn get(&self) -> Snapshot {
        self.ctx.snapshot()
    }

    /// Append a new, empty list. Returns its id.
    pub fn create(&mut self, name: &str) -> Result<Uuid> {
        let list = List::new(name);
        let id = list.id;

        self.ctx
            .commit("creating a list", json!({ "name": name }), |board| {
                let mut lists = board.lists().to_vec();
                lists.push(list);
                Ok(Change::new(
                    Board::new(lists),
                    format!("new list created with id = {id}"),
                    id,
                ))
            })
    }

    pub fn rename(&mut self, id: Uuid, new_name: &str) -> Result<()> {
        self.ctx.commit(
            &format!("renaming a list with id = {id} to {new_name}"),
            json!({ "id": id, "newName": new_name }),
            |board| {
                let index = board
                    .list_index(id)
                    .ok_or_else(|| BoardError::list_not_found(id))?;
                let list = List {
                    name: new_name.to_owned(),
                    ..board.lists()[index].clone()
                };
                Ok(Change::new(
                    board.with_list(index, list),
                    format!("list with id = {id} was renamed to {new_name}"),
                    (),
                ))
            },
        )
    }

    /// Remove a list together with its cards.
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.ctx.commit(
            &format!("deleting a list with id = {id}"),
            json!({ "id": id }),
            |board| {
                let index = board
                    .list_index(id)
                    .ok_or_else(|| BoardError::list_not_found(id))?;
                let removed = board.lists()[index].cards.len();
                let mut lists = board.lists().to_vec();
                lists.remove(index);
                Ok(Change::new(
                    Board::new(lists),
                    format!("list with id = {id} was deleted ({removed} cards removed)"),
                    (),
                ))
            },
        )
    }

    pub fn reorder(&mut self, source_index: usize, destination_index: usize) -> Result<()> {
        let engine = self.ctx.engine();
        let items = list_ids(&self.ctx.snapshot());

        self.ctx.commit(
            &format!(
                "reordering lists: moving a list from index {source_index} to index {destination_index}"
            ),
            json!({
                "items": items,
                "sourceIndex": source_index,
                "destinationIndex": destination_index,
            }),
            |board| {
                let lists = engine.reorder(board.lists(), source_index, destination_index)?;
                Ok(Change::new(
                    Board::new(lists),
                    format!(
                        "lists reordered: list moved from index {source_index} to index {destination_index}"
                    ),
                    (),
                ))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{LogPublisher, MemorySink};
    use crate::broadcast::RecordingBroadcaster;
    use crate::handlers::BoardContext;
    use crate::model::{Board, Card, List};
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

    fn names(board: &Board) -> Vec<String> {
        board.lists().iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn create_appends() {
        let (mut ctx, sink, broadcaster) = context(Board::new(vec![List::new("first")]));

        let id = ctx.lists().create("second").unwrap();

        let board = ctx.lists().get();
        assert_eq!(names(&board), vec!["first", "second"]);
        assert_eq!(board.lists()[1].id, id);
        assert!(board.lists()[1].cards.is_empty());
        assert_eq!(broadcaster.count(), 1);
        assert!(sink.records()[0].message.contains(&id.to_string()));
    }

    #[test]
    fn rename_keeps_position_and_cards() {
        let mut list = List::new("old");
        list.cards.push(Card::new("c", ""));
        let id = list.id;
        let (mut ctx, _, _) = context(Board::new(vec![List::new("x"), list]));

        ctx.lists().rename(id, "new").unwrap();

        let board = ctx.snapshot();
        assert_eq!(names(&board), vec!["x", "new"]);
        assert_eq!(board.lists()[1].cards.len(), 1);
    }

    #[test]
    fn delete_removes_cards() {
        let mut doomed = List::new("doomed");
        doomed.cards = vec![Card::new("a", ""), Card::new("b", "")];
        let mut kept = List::new("kept");
        kept.cards = vec![Card::new("c", "")];
        let id = doomed.id;
        let (mut ctx, _, _) = context(Board::new(vec![doomed, kept]));

        assert_eq!(ctx.snapshot().card_count(), 3);
        ctx.lists().delete(id).unwrap();

        assert_eq!(ctx.snapshot().card_count(), 1);
        assert_eq!(names(&ctx.snapshot()), vec!["kept"]);
    }

    #[test]
    fn delete_missing_list_changes_nothing() {
        let (mut ctx, sink, broadcaster) =
            context(Board::new(vec![List::new("a"), List::new("b")]));
        let before = serde_json::to_vec(&*ctx.snapshot()).unwrap();
        let missing = Uuid::new_v4();

        assert!(ctx.lists().delete(missing).is_err());

        assert_eq!(serde_json::to_vec(&*ctx.snapshot()).unwrap(), before);
        assert_eq!(broadcaster.count(), 0);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_error());
        assert!(records[0].message.contains(&missing.to_string()));
    }

    #[test]
    fn reorder_records_inputs() {
        let (mut ctx, sink, _) = context(Board::new(vec![
            List::new("a"),
            List::new("b"),
            List::new("c"),
        ]));

        ctx.lists().reorder(2, 0).unwrap();

        assert_eq!(names(&ctx.snapshot()), vec!["c", "a", "b"]);
        let params = sink.records()[0].parameters.clone().unwrap();
        assert_eq!(params["sourceIndex"], 2);
        assert_eq!(params["destinationIndex"], 0);
        assert_eq!(params["items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn reorder_out_of_range_is_rejected() {
        let (mut ctx, sink, broadcaster) = context(Board::new(vec![List::new("a")]));

        assert!(ctx.lists().reorder(0, 1).is_err());
        assert!(ctx.lists().reorder(5, 0).is_err());

        assert_eq!(names(&ctx.snapshot()), vec!["a"]);
        assert_eq!(broadcaster.count(), 0);
        assert!(sink.records().iter().all(|r| r.is_error()));
    }
}
