//! The board actor: the single serial mutation path.
//!
//! One task owns the [`BoardContext`] (and with it the store). Intents from
//! every connection are queued on an mpsc channel and applied one at a time,
//! in arrival order, each running to completion before the next starts.

use std::panic::{catch_unwind, AssertUnwindSafe};

use boardsync_core::{
    BoardContext, BoardError, BoardStore, Broadcaster, Intent, LogRecord, Snapshot,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{ServerError, ServerResult};

/// Result of applying one intent: the snapshot for `list.get`, nothing for
/// mutations, or the reason it was rejected.
pub type Outcome = Result<Option<Snapshot>, BoardError>;

/// Default depth of the intent queue
pub const DEFAULT_QUEUE: usize = 256;

#[derive(Debug)]
pub struct BoardCommand {
    pub intent: Intent,
    pub reply: Option<oneshot::Sender<Outcome>>,
}

/// Cheap, cloneable sender side of the actor
#[derive(Debug, Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<BoardCommand>,
}

impl BoardHandle {
    /// Queue an intent without waiting for it to be applied.
    pub async fn submit(&self, intent: Intent) -> ServerResult<()> {
        self.tx
            .send(BoardCommand {
                intent,
                reply: None,
            })
            .await
            .map_err(|_| ServerError::ActorClosed)
    }

    /// Queue an intent and wait for its outcome.
    pub async fn request(&self, intent: Intent) -> ServerResult<Outcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(BoardCommand {
                intent,
                reply: Some(reply),
            })
            .await
            .map_err(|_| ServerError::ActorClosed)?;
        rx.await.map_err(|_| ServerError::ActorClosed)
    }

    /// Current snapshot, read through the same queue as mutations so it
    /// reflects every intent queued before it.
    pub async fn snapshot(&self) -> ServerResult<Snapshot> {
        match self.request(Intent::GetLists).await? {
            Ok(Some(snapshot)) => Ok(snapshot),
            // list.get never fails and always returns a board
            _ => Err(ServerError::ActorClosed),
        }
    }
}

pub struct BoardActor<S, B> {
    ctx: BoardContext<S, B>,
    rx: mpsc::Receiver<BoardCommand>,
}

impl<S, B> BoardActor<S, B>
where
    S: BoardStore + 'static,
    B: Broadcaster + 'static,
{
    /// Start the actor on the current runtime. It stops once every
    /// [`BoardHandle`] is dropped.
    pub fn spawn(ctx: BoardContext<S, B>, queue: usize) -> (BoardHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue);
        let actor = Self { ctx, rx };
        let handle = tokio::spawn(actor.run());
        (BoardHandle { tx }, handle)
    }

    async fn run(mut self) {
        tracing::info!(lists = self.ctx.snapshot().len(), "board actor started");

        while let Some(BoardCommand { intent, reply }) = self.rx.recv().await {
            let event = intent.event_name();
            let outcome = self.apply(intent);
            if let Err(e) = &outcome {
                tracing::debug!(event, error = %e, "intent rejected");
            }
            if let Some(reply) = reply {
                // Requester may have gone away; the mutation stands regardless.
                let _ = reply.send(outcome);
            }
        }

        tracing::info!("board actor stopped");
    }

    /// Apply one intent. A panicking handler becomes an ERROR record and an
    /// `Internal` rejection; the actor keeps serving.
    fn apply(&mut self, intent: Intent) -> Outcome {
        let event = intent.event_name();
        let ctx = &mut self.ctx;
        match catch_unwind(AssertUnwindSafe(|| ctx.apply(intent))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let err = BoardError::panicked(payload.as_ref());
                tracing::error!(event, error = %err, "handler panicked");
                self.ctx
                    .publisher()
                    .notify(&LogRecord::error(format!("ERROR when applying {event}: {err}")));
                Err(err)
            }
        }
    }
}
