//! WebSocket transport
//!
//! Inbound text frames are [`Intent`] envelopes. Outbound frames are
//! `board.update` broadcasts (every connection gets every snapshot), plus
//! `list.get` replies and `error` notices addressed to this connection only.
//!
//! Broadcasts and replies reach the writer on separate channels, so a reply
//! can be overtaken by a newer broadcast. The writer never sends a snapshot
//! older than the last one it sent.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use boardsync_core::{Intent, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::state::AppState;

/// Drops outbound snapshots older than the last one sent on a connection.
#[derive(Debug, Default)]
struct RevisionGate {
    last: Option<u64>,
}

impl RevisionGate {
    fn admit(&mut self, message: &ServerMessage) -> bool {
        let Some(snapshot) = message.snapshot() else {
            return true;
        };
        if self.last.is_some_and(|last| snapshot.revision < last) {
            return false;
        }
        self.last = Some(snapshot.revision);
        true
    }
}

/// GET /ws
async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn = Uuid::new_v4();
    tracing::info!(%conn, "client connected");

    let (mut sink, mut stream) = socket.split();
    let mut updates = state.subscribe();
    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // One task owns the socket sink and merges broadcasts with direct replies.
    let writer = tokio::spawn(async move {
        let mut gate = RevisionGate::default();
        loop {
            let message = tokio::select! {
                update = updates.recv() => match update {
                    Ok(board) => ServerMessage::Update(board),
                    // Snapshots are complete, so skipped ones need no replay.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(%conn, skipped, "connection lagged behind broadcasts");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                direct = direct_rx.recv() => match direct {
                    Some(message) => message,
                    None => break,
                },
            };

            if !gate.admit(&message) {
                tracing::debug!(
                    %conn,
                    revision = ?message.snapshot().map(|s| s.revision),
                    "dropping stale snapshot"
                );
                continue;
            }

            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(%conn, error = %e, "failed to encode message");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_text(&state, conn, text.as_str(), &direct_tx).await;
            }
            Ok(Message::Binary(data)) => {
                tracing::warn!(%conn, bytes = data.len(), "ignoring binary frame");
            }
            Ok(Message::Close(frame)) => {
                tracing::debug!(%conn, ?frame, "client closed connection");
                break;
            }
            // Ping/pong are answered by axum
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(%conn, error = %e, "websocket error");
                break;
            }
        }
    }

    writer.abort();
    tracing::info!(%conn, "client disconnected");
}

async fn handle_text(
    state: &AppState,
    conn: Uuid,
    text: &str,
    direct: &mpsc::UnboundedSender<ServerMessage>,
) {
    let intent: Intent = match serde_json::from_str(text) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::warn!(%conn, error = %e, "unparseable message");
            let _ = direct.send(ServerMessage::error(format!("invalid message: {e}")));
            return;
        }
    };

    tracing::debug!(%conn, event = intent.event_name(), "intent received");

    if intent.is_query() {
        match state.board().snapshot().await {
            Ok(snapshot) => {
                let _ = direct.send(ServerMessage::Lists(snapshot));
            }
            Err(e) => {
                let _ = direct.send(ServerMessage::error(e.to_string()));
            }
        }
        return;
    }

    // Fire-and-forget: the outcome reaches everyone as a broadcast (or an
    // ERROR record when rejected).
    if let Err(e) = state.board().submit(intent).await {
        let _ = direct.send(ServerMessage::error(e.to_string()));
    }
}

/// WebSocket routes
pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use boardsync_core::{Board, BoardContext, List, LogPublisher, MemoryStore, Snapshot};

    use crate::actor::BoardActor;

    fn state(board: Board) -> AppState {
        let (updates, _) = broadcast::channel(8);
        let ctx = BoardContext::new(MemoryStore::seeded(board), updates.clone(), LogPublisher::new());
        let (handle, _actor) = BoardActor::spawn(ctx, 8);
        AppState::new(handle, updates)
    }

    #[tokio::test]
    async fn malformed_text_gets_error_reply() {
        let state = state(Board::empty());
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_text(&state, Uuid::new_v4(), "{not json", &tx).await;

        assert!(matches!(rx.recv().await, Some(ServerMessage::Error { .. })));
    }

    #[tokio::test]
    async fn list_get_replies_only_to_sender() {
        let state = state(Board::new(vec![List::new("a")]));
        let mut updates = state.subscribe();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_text(&state, Uuid::new_v4(), r#"{"event":"list.get"}"#, &tx).await;

        match rx.recv().await {
            Some(ServerMessage::Lists(board)) => assert_eq!(board.len(), 1),
            other => panic!("expected list.get reply, got {other:?}"),
        }
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn mutation_is_broadcast() {
        let state = state(Board::empty());
        let mut updates = state.subscribe();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_text(
            &state,
            Uuid::new_v4(),
            r#"{"event":"list.create","payload":{"name":"Doing"}}"#,
            &tx,
        )
        .await;

        let board = updates.recv().await.unwrap();
        assert_eq!(board.lists()[0].name, "Doing");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn gate_drops_reply_overtaken_by_newer_update() {
        let older = Snapshot::new(3, Arc::new(Board::new(vec![List::new("a")])));
        let newer = Snapshot::new(4, Arc::new(Board::empty()));
        let mut gate = RevisionGate::default();

        assert!(gate.admit(&ServerMessage::Update(newer.clone())));
        assert!(!gate.admit(&ServerMessage::Lists(older)));
        assert!(gate.admit(&ServerMessage::Lists(newer)));
        assert!(gate.admit(&ServerMessage::error("bad frame")));
    }
}
