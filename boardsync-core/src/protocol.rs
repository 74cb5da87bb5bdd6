//! Wire protocol between clients and the board.
//!
//! Every message is a JSON envelope `{"event": "<name>", "payload": {...}}`.
//!
//! Inbound ([`Intent`]):
//! ```json
//! {"event": "card.reorder", "payload": {"sourceListId": "..", "destinationListId": "..",
//!                                       "sourceIndex": 0, "destinationIndex": 2}}
//! {"event": "list.get"}
//! ```
//!
//! Outbound ([`ServerMessage`]):
//! ```json
//! {"event": "board.update", "payload": {"revision": 4,
//!                                       "lists": [ {"id": "..", "name": "..", "cards": [..]} ]}}
//! ```
//!
//! `board.update` and the `list.get` reply carry the store revision; a client
//! drops any snapshot older than the one it already shows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Card;
use crate::reorder::CardMove;
use crate::store::Snapshot;

/// Event name of the full-snapshot broadcast
pub const BOARD_UPDATE: &str = "board.update";

/// A client request. Everything except `list.get` mutates the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum Intent {
    #[serde(rename = "list.create")]
    CreateList { name: String },

    #[serde(rename = "list.rename", rename_all = "camelCase")]
    RenameList { id: Uuid, new_name: String },

    #[serde(rename = "list.delete")]
    DeleteList { id: Uuid },

    #[serde(rename = "list.reorder", rename_all = "camelCase")]
    ReorderLists {
        source_index: usize,
        destination_index: usize,
    },

    #[serde(rename = "list.get")]
    GetLists,

    #[serde(rename = "card.create", rename_all = "camelCase")]
    CreateCard { list_id: Uuid, name: String },

    #[serde(rename = "card.rename", rename_all = "camelCase")]
    RenameCard { card_id: Uuid, new_name: String },

    #[serde(rename = "card.changeDescription", rename_all = "camelCase")]
    ChangeCardDescription {
        card_id: Uuid,
        new_description: String,
    },

    #[serde(rename = "card.delete", rename_all = "camelCase")]
    DeleteCard { card_id: Uuid },

    /// Carries the whole card as the client saw it
    #[serde(rename = "card.duplicate")]
    DuplicateCard { card: Card },

    #[serde(rename = "card.reorder")]
    ReorderCards(CardMove),
}

impl Intent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CreateList { .. } => "list.create",
            Self::RenameList { .. } => "list.rename",
            Self::DeleteList { .. } => "list.delete",
            Self::ReorderLists { .. } => "list.reorder",
            Self::GetLists => "list.get",
            Self::CreateCard { .. } => "card.create",
            Self::RenameCard { .. } => "card.rename",
            Self::ChangeCardDescription { .. } => "card.changeDescription",
            Self::DeleteCard { .. } => "card.delete",
            Self::DuplicateCard { .. } => "card.duplicate",
            Self::ReorderCards(_) => "card.reorder",
        }
    }

    /// True for the read-only `list.get`
    pub fn is_query(&self) -> bool {
        matches!(self, Self::GetLists)
    }
}

/// A message pushed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ServerMessage {
    /// Full snapshot after a committed mutation, sent to every client
    #[serde(rename = "board.update")]
    Update(Snapshot),

    /// Reply to `list.get`, sent to the requester only
    #[serde(rename = "list.get")]
    Lists(Snapshot),

    /// The client's message could not be understood
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The snapshot carried by `board.update` and `list.get`
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::Update(snapshot) | Self::Lists(snapshot) => Some(snapshot),
            Self::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Board;
    use serde_json::json;

    #[test]
    fn parses_card_reorder() {
        let src = Uuid::new_v4();
        let dst = Uuid::new_v4();
        let intent: Intent = serde_json::from_value(json!({
            "event": "card.reorder",
            "payload": {
                "sourceListId": src,
                "destinationListId": dst,
                "sourceIndex": 1,
                "destinationIndex": 0
            }
        }))
        .unwrap();

        assert_eq!(
            intent,
            Intent::ReorderCards(CardMove {
                source_list_id: src,
                destination_list_id: dst,
                source_index: 1,
                destination_index: 0,
            })
        );
        assert_eq!(intent.event_name(), "card.reorder");
    }

    #[test]
    fn parses_get_without_payload() {
        let intent: Intent = serde_json::from_str(r#"{"event":"list.get"}"#).unwrap();
        assert!(intent.is_query());
    }

    #[test]
    fn parses_camel_case_fields() {
        let id = Uuid::new_v4();
        let intent: Intent = serde_json::from_value(json!({
            "event": "card.changeDescription",
            "payload": {"cardId": id, "newDescription": "details"}
        }))
        .unwrap();
        assert_eq!(
            intent,
            Intent::ChangeCardDescription {
                card_id: id,
                new_description: "details".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_event() {
        let result: Result<Intent, _> =
            serde_json::from_str(r#"{"event":"board.drop","payload":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_carries_revision_and_lists() {
        let msg = ServerMessage::Update(Snapshot::new(3, Arc::new(Board::empty())));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["event"], BOARD_UPDATE);
        assert_eq!(value["payload"], json!({"revision": 3, "lists": []}));
        assert_eq!(msg.snapshot().map(|s| s.revision), Some(3));
        assert!(ServerMessage::error("x").snapshot().is_none());
    }
}
