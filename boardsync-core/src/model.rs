//! Board entities: cards, lists and the board snapshot.
//!
//! Everything here is a plain value. Mutations build new values and hand them
//! to the store; nothing is edited in place behind a shared reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A card. `id` never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Copy of this card under a fresh identity and creation time.
    pub fn duplicate(&self) -> Self {
        Self::new(self.name.clone(), self.description.clone())
    }
}

/// An ordered list of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Same list with its card collection swapped out whole.
    pub fn with_cards(&self, cards: Vec<Card>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            cards,
        }
    }

    pub fn position_of(&self, card_id: Uuid) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// Location of a card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub list_index: usize,
    pub card_index: usize,
}

/// One snapshot of the whole board. Serializes as a bare array of lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    lists: Vec<List>,
}

impl Board {
    pub fn new(lists: Vec<List>) -> Self {
        Self { lists }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn into_lists(self) -> Vec<List> {
        self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of cards across every list
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }

    pub fn list_index(&self, list_id: Uuid) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    pub fn list(&self, list_id: Uuid) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    /// Find which list currently holds `card_id`, and where.
    pub fn locate_card(&self, card_id: Uuid) -> Option<CardLocation> {
        self.lists.iter().enumerate().find_map(|(list_index, list)| {
            list.position_of(card_id).map(|card_index| CardLocation {
                list_index,
                card_index,
            })
        })
    }

    pub fn card(&self, card_id: Uuid) -> Option<&Card> {
        self.locate_card(card_id)
            .map(|loc| &self.lists[loc.list_index].cards[loc.card_index])
    }

    /// New board with the list at `index` replaced. Panics on a bad index,
    /// callers pass indices they just looked up.
    pub fn with_list(&self, index: usize, list: List) -> Self {
        let mut lists = self.lists.clone();
        lists[index] = list;
        Self { lists }
    }

    /// New board with the card at `loc` replaced by `f(card)`.
    pub fn with_card(&self, loc: CardLocation, f: impl FnOnce(&Card) -> Card) -> Self {
        let list = &self.lists[loc.list_index];
        let mut cards = list.cards.clone();
        cards[loc.card_index] = f(&list.cards[loc.card_index]);
        self.with_list(loc.list_index, list.with_cards(cards))
    }
}

impl From<Vec<List>> for Board {
    fn from(lists: Vec<List>) -> Self {
        Self::new(lists)
    }
}
