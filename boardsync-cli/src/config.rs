use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Env var pointing at an alternative config file
pub const CONFIG_ENV: &str = "BOARDSYNC_CONFIG";

/// Settings read from `~/.boardsync/config.toml`
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardsyncConfig {
    pub bind: SocketAddr,
    /// Audit log path. An empty string disables the file sink.
    pub log_file: PathBuf,
    pub cors_permissive: bool,
    pub seed_demo: bool,
    pub request_timeout_secs: u64,
}

impl Default for BoardsyncConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3005)),
            log_file: PathBuf::from("logs.log"),
            cors_permissive: false,
            seed_demo: false,
            request_timeout_secs: 30,
        }
    }
}

impl BoardsyncConfig {
    /// Load from `$BOARDSYNC_CONFIG` or `~/.boardsync/config.toml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A file that doesn't exist yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file (invalid TOML): {:?}", path))
    }

    /// Config file path: `$BOARDSYNC_CONFIG`, else `~/.boardsync/config.toml`
    pub fn config_path() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".boardsync/config.toml")
    }

    /// `None` when the file sink is switched off
    pub fn log_file(&self) -> Option<&Path> {
        if self.log_file.as_os_str().is_empty() {
            None
        } else {
            Some(&self.log_file)
        }
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config (file values over defaults) as TOML
    Show,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", BoardsyncConfig::config_path().display());
        }
        ConfigCommands::Show => {
            let config = BoardsyncConfig::load()?;
            let toml_str =
                toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
            print!("{}", toml_str);
        }
    }
    Ok(())
}
