//! HTTP server layer
//!
//! Axum server with:
//! - WebSocket intent channel and snapshot broadcast
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig};
