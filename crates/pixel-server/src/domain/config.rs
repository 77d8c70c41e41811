//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is populated by the infrastructure layer from CLI arguments, environment
//! variables, and an optional TOML file, or built from defaults in tests.

use std::net::{Ipv4Addr, SocketAddr};

use chrono::Utc;
use pixel_core::{Design, DesignError, DEFAULT_GRID_SIZE, EMPTY_COLOR};

/// Port the HTTP server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 3001;

/// All runtime configuration for the design server.
///
/// # Example
///
/// ```rust
/// use pixel_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 3001);
/// assert_eq!(cfg.grid_size, 16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// The address and port the HTTP server binds to.
    ///
    /// `0.0.0.0` accepts connections on every interface.
    pub bind_addr: SocketAddr,

    /// Side length of the blank design the store starts with.
    pub grid_size: u32,

    /// Color of every cell in the startup design.
    pub fill_color: String,
}

impl Default for ServerConfig {
    /// | Field       | Default          |
    /// |-------------|------------------|
    /// | bind_addr   | `0.0.0.0:3001`   |
    /// | grid_size   | `16`             |
    /// | fill_color  | `#000000`        |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            grid_size: DEFAULT_GRID_SIZE,
            fill_color: EMPTY_COLOR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Builds the blank design the store is seeded with, stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::GridSizeOutOfRange`] when `grid_size` is outside
    /// the bounds accepted for updates.
    pub fn initial_design(&self) -> Result<Design, DesignError> {
        Design::blank(self.grid_size, &self.fill_color, Utc::now())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
