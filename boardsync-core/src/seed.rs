//! Demo board for local development.

use crate::model::{Board, Card, List};

fn list(name: &str, cards: &[(&str, &str)]) -> List {
    let mut list = List::new(name);
    list.cards = cards
        .iter()
        .map(|(name, description)| Card::new(*name, *description))
        .collect();
    list
}

/// A small three-column board.
pub fn demo_board() -> Board {
    Board::new(vec![
        list(
            "To Do",
            &[
                ("Write release notes", "Summarize changes since the last tag"),
                ("Triage bug reports", ""),
                ("Plan sprint demo", "Pick three features to show"),
            ],
        ),
        list(
            "In Progress",
            &[
                ("Drag and drop polish", "Snap cards to the drop target"),
                ("Card duplication", ""),
            ],
        ),
        list("Done", &[("Project setup", "Repository, CI, lint rules")]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_ids_are_unique() {
        let board = demo_board();
        let ids: HashSet<_> = board
            .lists()
            .iter()
            .flat_map(|l| l.cards.iter().map(|c| c.id))
            .collect();
        assert_eq!(ids.len(), board.card_count());
        assert_eq!(board.len(), 3);
    }
}
