//! Pixel design server: entry point.
//!
//! Serves the single in-memory pixel-art design over a small JSON HTTP API.
//!
//! # Usage
//!
//! ```text
//! pixel-server [OPTIONS]
//!
//! Options:
//!   --bind       <IP>    Address to listen on [default: 0.0.0.0]
//!   --port       <PORT>  HTTP port [default: 3001]
//!   --config     <FILE>  Optional TOML config file
//!   --grid-size  <N>     Side length of the startup design [default: 16]
//!   --fill-color <COLOR> Color of every startup cell [default: #000000]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Flag           |
//! |---------------------|----------------|
//! | `PIXEL_BIND`        | `--bind`       |
//! | `PIXEL_PORT`        | `--port`       |
//! | `PIXEL_CONFIG`      | `--config`     |
//! | `PIXEL_GRID_SIZE`   | `--grid-size`  |
//! | `PIXEL_FILL_COLOR`  | `--fill-color` |
//!
//! Precedence: CLI flag, then environment variable, then config file, then
//! built-in default.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixel_server::domain::ServerConfig;
use pixel_server::infrastructure::config_file::{load_config, ConfigFile};
use pixel_server::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// In-memory pixel design store.
#[derive(Debug, Parser)]
#[command(
    name = "pixel-server",
    about = "In-memory HTTP store for a single pixel-art design",
    version
)]
struct Cli {
    /// IP address to bind the HTTP server to.
    #[arg(long, env = "PIXEL_BIND")]
    bind: Option<String>,

    /// TCP port for the HTTP API.
    #[arg(long, env = "PIXEL_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file.
    #[arg(long, env = "PIXEL_CONFIG")]
    config: Option<PathBuf>,

    /// Side length of the blank design the server starts with.
    #[arg(long, env = "PIXEL_GRID_SIZE")]
    grid_size: Option<u32>,

    /// Color of every cell in the startup design.
    #[arg(long, env = "PIXEL_FILL_COLOR")]
    fill_color: Option<String>,
}

impl Cli {
    /// Layers the CLI values over the config file (or defaults).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the resulting
    /// bind address is not a valid IP address.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut file = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => ConfigFile::default(),
        };

        if let Some(bind) = self.bind {
            file.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            file.server.port = port;
        }
        if let Some(grid_size) = self.grid_size {
            file.design.grid_size = grid_size;
        }
        if let Some(fill_color) = self.fill_color {
            file.design.fill_color = fill_color;
        }

        Ok(file.into_server_config()?)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level is controlled by `RUST_LOG`, falling back to `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;

    info!(
        "pixel design server starting: bind={}, startup grid {}x{} of {}",
        config.bind_addr, config.grid_size, config.grid_size, config.fill_color
    );

    // Cleared by the Ctrl+C handler; the server's shutdown future polls it.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("pixel design server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
