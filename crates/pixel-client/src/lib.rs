//! pixel-client library crate.
//!
//! A thin async wrapper over the design store HTTP API.  Every call either
//! returns the parsed JSON body or a [`ClientError`] whose message is suitable
//! for showing to a user.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), pixel_client::ClientError> {
//! use pixel_client::DesignClient;
//! use pixel_core::DesignPayload;
//!
//! let client = DesignClient::new("http://127.0.0.1:3001")?;
//! let current = client.fetch_design().await?;
//! client
//!     .save_design(&DesignPayload {
//!         grid_size: current.grid_size,
//!         pixels: vec!["#ffffff".to_string(); current.cell_count()],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{ClientError, DesignClient};
