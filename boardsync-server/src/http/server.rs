//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use boardsync_core::audit::{ConsoleSink, FileSink};
use boardsync_core::{Board, BoardContext, LogPublisher, MemoryStore};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::actor::{BoardActor, DEFAULT_QUEUE};
use crate::error::ServerResult;
use crate::state::AppState;

/// Snapshots buffered per connection before it counts as lagging
const BROADCAST_CAPACITY: usize = 64;

/// How long shutdown waits for the actor and the log writer to drain
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3005)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Per-request timeout for plain HTTP routes
    pub request_timeout: Duration,

    /// Append-only audit log (NDJSON). `None` keeps records on the console only.
    pub log_file: Option<PathBuf>,

    /// Board the store starts from
    pub initial_board: Board,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3005)),
            cors_permissive: false,
            request_timeout: Duration::from_secs(30),
            log_file: Some(PathBuf::from("logs.log")),
            initial_board: Board::empty(),
        }
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:3005"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:3005"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router with every route and the middleware stack.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(config.cors_permissive));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::board::router())
        .merge(routes::ws::router())
        .layer(middleware)
        .with_state(state)
}

/// Run the server until Ctrl+C / SIGTERM.
///
/// Wires the log publisher (console, plus the file sink when configured),
/// the broadcast channel and the board actor, then serves HTTP.
pub async fn run_server(config: ServerConfig) -> ServerResult<()> {
    let mut publisher = LogPublisher::new();
    publisher.subscribe(Arc::new(ConsoleSink::new()));

    let log_writer = config.log_file.as_ref().map(|path| {
        tracing::info!(path = %path.display(), "audit log file");
        let (sink, writer) = FileSink::spawn(path);
        publisher.subscribe(Arc::new(sink));
        writer
    });

    let (updates, _) = broadcast::channel(BROADCAST_CAPACITY);
    let store = MemoryStore::seeded(config.initial_board.clone());
    let ctx = BoardContext::new(store, updates.clone(), publisher);
    let (board, actor) = BoardActor::spawn(ctx, DEFAULT_QUEUE);

    let app = build_router(AppState::new(board, updates), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Open WebSocket tasks may still hold a handle; don't wait forever.
    if tokio::time::timeout(DRAIN_TIMEOUT, actor).await.is_err() {
        tracing::warn!("board actor still busy at shutdown");
    }
    if let Some(writer) = log_writer {
        if tokio::time::timeout(DRAIN_TIMEOUT, writer).await.is_err() {
            tracing::warn!("audit log writer did not drain before shutdown");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
