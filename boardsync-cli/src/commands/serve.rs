//! HTTP/WebSocket server command
//!
//! Runs the board server. Flags override the config file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use boardsync_core::{seed, Board};
use boardsync_server::ServerConfig;
use clap::Parser;

use crate::config::BoardsyncConfig;

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3005)
    #[arg(long, short = 'b', env = "BOARDSYNC_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Audit log file, one JSON record per line (default: logs.log)
    #[arg(long, env = "BOARDSYNC_LOG_FILE", conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Keep audit records on the console only
    #[arg(long)]
    pub no_log_file: bool,

    /// Start from a sample board instead of an empty one
    #[arg(long)]
    pub seed_demo: bool,

    /// Per-request timeout for HTTP routes, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ServeArgs {
    /// Merge flags over file settings.
    pub fn server_config(&self, file: &BoardsyncConfig) -> ServerConfig {
        let log_file = if self.no_log_file {
            None
        } else {
            self.log_file
                .clone()
                .or_else(|| file.log_file().map(PathBuf::from))
        };

        let initial_board = if self.seed_demo || file.seed_demo {
            seed::demo_board()
        } else {
            Board::empty()
        };

        ServerConfig {
            bind_addr: self.bind.unwrap_or(file.bind),
            cors_permissive: self.cors_permissive || file.cors_permissive,
            request_timeout: Duration::from_secs(
                self.timeout.unwrap_or(file.request_timeout_secs),
            ),
            log_file,
            initial_board,
        }
    }
}

/// Run the server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let file = BoardsyncConfig::load()?;
    let config = args.server_config(&file);

    tracing::info!(
        bind = %config.bind_addr,
        lists = config.initial_board.len(),
        "Starting boardsync server"
    );

    boardsync_server::run_server(config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_apply_without_flags() {
        let file = BoardsyncConfig {
            bind: "0.0.0.0:9000".parse().unwrap(),
            request_timeout_secs: 5,
            ..BoardsyncConfig::default()
        };

        let config = ServeArgs::default().server_config(&file);
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_file, Some(PathBuf::from("logs.log")));
        assert!(config.initial_board.is_empty());
    }

    #[test]
    fn flags_override_file() {
        let args = ServeArgs {
            bind: Some("127.0.0.1:4000".parse().unwrap()),
            log_file: Some(PathBuf::from("/tmp/board.log")),
            timeout: Some(60),
            seed_demo: true,
            ..ServeArgs::default()
        };

        let config = args.server_config(&BoardsyncConfig::default());
        assert_eq!(config.bind_addr.port(), 4000);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/board.log")));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(!config.initial_board.is_empty());
    }

    #[test]
    fn no_log_file_wins() {
        let args = ServeArgs {
            no_log_file: true,
            ..ServeArgs::default()
        };
        assert_eq!(args.server_config(&BoardsyncConfig::default()).log_file, None);
    }
}
