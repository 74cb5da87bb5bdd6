//! boardsync CLI - real-time collaborative kanban board server
//!
//! Entry point for the `boardsync` binary:
//! - `serve` runs the HTTP/WebSocket board server
//! - `config` inspects `~/.boardsync/config.toml`

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "boardsync",
    author,
    version,
    about = "Shared kanban board server with live WebSocket sync",
    long_about = "Serve one shared board. Every client sends intents over a WebSocket; \
                  each accepted change is broadcast to all clients as a full snapshot \
                  and recorded in an append-only audit log."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the board server (HTTP + WebSocket)
    Serve(commands::serve::ServeArgs),
    /// Inspect boardsync configuration (path, show)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Config(args) => config::run_config(args)?,
    }
    Ok(())
}
