//! Pixel design store command-line client.
//!
//! # Usage
//!
//! ```text
//! pixel-client [--server URL] <COMMAND>
//!
//! Commands:
//!   health                         Check that the server is up
//!   get                            Print the current design as JSON
//!   save <FILE>                    Upload {"gridSize":..,"pixels":[..]} from FILE
//!   fill --grid-size N [--color C] Replace the design with a single-color grid (N in 1..=256)
//! ```
//!
//! `--server` defaults to `http://127.0.0.1:3001` and can also be set with
//! `PIXEL_SERVER_URL`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixel_client::DesignClient;
use pixel_core::{DesignPayload, EMPTY_COLOR, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Command-line client for the pixel design store.
#[derive(Debug, Parser)]
#[command(name = "pixel-client", version)]
struct Cli {
    /// Base URL of the design server.
    #[arg(long, default_value = "http://127.0.0.1:3001", env = "PIXEL_SERVER_URL")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the server is up.
    Health,
    /// Print the current design as JSON.
    Get,
    /// Upload a design read from a JSON file.
    Save {
        /// File containing `{"gridSize": N, "pixels": [...]}`.
        file: PathBuf,
    },
    /// Replace the design with a grid of one color.
    Fill {
        #[arg(
            long,
            value_parser = clap::value_parser!(u32)
                .range(i64::from(MIN_GRID_SIZE)..=i64::from(MAX_GRID_SIZE))
        )]
        grid_size: u32,
        #[arg(long, default_value = EMPTY_COLOR)]
        color: String,
    },
}

fn read_payload(path: &Path) -> anyhow::Result<DesignPayload> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a design payload", path.display()))
}

fn solid_payload(grid_size: u32, color: &str) -> DesignPayload {
    let cells = (grid_size as usize).pow(2);
    DesignPayload {
        grid_size,
        pixels: vec![color.to_string(); cells],
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pipeable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = DesignClient::new(&cli.server)?;

    let output = match cli.command {
        Command::Health => serde_json::to_string_pretty(&client.health().await?)?,
        Command::Get => serde_json::to_string_pretty(&client.fetch_design().await?)?,
        Command::Save { file } => {
            let payload = read_payload(&file)?;
            let response = client.save_design(&payload).await?;
            info!("saved {}x{} design", payload.grid_size, payload.grid_size);
            serde_json::to_string_pretty(&response)?
        }
        Command::Fill { grid_size, color } => {
            let response = client.save_design(&solid_payload(grid_size, &color)).await?;
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{output}");
    Ok(())
}
