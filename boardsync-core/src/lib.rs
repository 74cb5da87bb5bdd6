//! boardsync-core: the state engine behind a shared kanban board.
//!
//! - [`model`]: cards, lists, board snapshots
//! - [`store`]: the authoritative snapshot store
//! - [`reorder`]: positional reorder / move algorithms
//! - [`handlers`]: intent → store mutation → broadcast + audit record
//! - [`audit`]: structured log records and their fan-out to sinks
//! - [`broadcast`]: the snapshot broadcast seam
//! - [`protocol`]: JSON wire messages
//! - [`replica`]: client-side mirror sharing the reorder code

pub mod audit;
pub mod broadcast;
pub mod error;
pub mod handlers;
pub mod model;
pub mod protocol;
pub mod reorder;
pub mod replica;
pub mod seed;
pub mod store;

pub use audit::{LogObserver, LogPublisher, LogRecord, LogType};
pub use broadcast::Broadcaster;
pub use error::{BoardError, IndexKind, Result, SinkError};
pub use handlers::{BoardContext, CardHandler, ListHandler};
pub use model::{Board, Card, CardLocation, List};
pub use protocol::{Intent, ServerMessage};
pub use reorder::{move_between, move_card, reorder_within, CardMove, ReorderEngine};
pub use replica::BoardReplica;
pub use store::{BoardStore, MemoryStore, Snapshot};
