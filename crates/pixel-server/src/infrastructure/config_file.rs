//! Optional TOML configuration file.
//!
//! Every key is optional; a missing file section or key falls back to the same
//! default [`ServerConfig::default`] uses.  Example:
//!
//! ```toml
//! [server]
//! bind_address = "127.0.0.1"
//! port = 3001
//!
//! [design]
//! grid_size = 32
//! fill_color = "#ffffff"
//! ```
//!
//! CLI flags and environment variables are applied on top of the parsed file
//! in `main.rs`, then [`ConfigFile::into_server_config`] produces the final
//! [`ServerConfig`].

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::config::{ServerConfig, DEFAULT_PORT};
use pixel_core::{DEFAULT_GRID_SIZE, EMPTY_COLOR};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address: '{0}'")]
    InvalidBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level layout of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub design: DesignSection,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerSection {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Startup design settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DesignSection {
    /// Side length of the blank startup grid.
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Color of every cell in the startup grid.
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}
fn default_fill_color() -> String {
    EMPTY_COLOR.to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DesignSection {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            fill_color: default_fill_color(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses config file contents.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML or wrongly typed keys.
pub fn parse_config(text: &str) -> Result<ConfigFile, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, or
/// [`ConfigError::Parse`] if its contents are not valid.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    /// Resolves the file values into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not an
    /// IPv4 or IPv6 address.
    pub fn into_server_config(self) -> Result<ServerConfig, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind_address.clone()))?;

        Ok(ServerConfig {
            bind_addr: SocketAddr::new(ip, self.server.port),
            grid_size: self.design.grid_size,
            fill_color: self.design.fill_color,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
