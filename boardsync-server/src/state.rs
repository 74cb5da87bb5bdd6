//! Application state shared across handlers

use std::sync::Arc;
use std::time::Instant;

use boardsync_core::Snapshot;
use tokio::sync::broadcast;

use crate::actor::BoardHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    board: BoardHandle,
    updates: broadcast::Sender<Snapshot>,
    started_at: Instant,
}

impl AppState {
    pub fn new(board: BoardHandle, updates: broadcast::Sender<Snapshot>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                board,
                updates,
                started_at: Instant::now(),
            }),
        }
    }

    /// Sender side of the board actor
    pub fn board(&self) -> &BoardHandle {
        &self.inner.board
    }

    /// New receiver for `board.update` snapshots
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.inner.updates.subscribe()
    }

    /// Number of connections currently receiving broadcasts
    pub fn connections(&self) -> usize {
        self.inner.updates.receiver_count()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}
