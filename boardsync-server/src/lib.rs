//! boardsync-server: HTTP and WebSocket front for a shared board
//!
//! Intents arrive over WebSocket (or `POST /intents`), are applied one at a
//! time by the board actor, and every committed change is broadcast to all
//! connections as a full snapshot.

pub mod actor;
pub mod error;
pub mod http;
pub mod state;

pub use actor::{BoardActor, BoardHandle};
pub use error::{ServerError, ServerResult};
pub use http::{build_router, run_server, ServerConfig};
pub use state::AppState;
