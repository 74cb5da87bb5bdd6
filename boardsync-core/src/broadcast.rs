//! Broadcast seam: after every committed mutation the full snapshot goes to
//! every connected observer.

use std::sync::{Arc, Mutex};

use crate::store::Snapshot;

pub trait Broadcaster: Send {
    fn broadcast(&self, snapshot: Snapshot);
}

/// Records every broadcast snapshot. Used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingBroadcaster {
    sent: Arc<Mutex<Vec<Snapshot>>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Snapshot> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn broadcast(&self, snapshot: Snapshot) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(snapshot);
        }
    }
}

#[cfg(feature = "rt")]
impl Broadcaster for tokio::sync::broadcast::Sender<Snapshot> {
    fn broadcast(&self, snapshot: Snapshot) {
        let revision = snapshot.revision;
        // No receivers just means nobody is connected right now.
        if let Ok(receivers) = self.send(snapshot) {
            tracing::trace!(receivers, revision, "snapshot broadcast");
        }
    }
}
