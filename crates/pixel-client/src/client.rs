//! Async HTTP client for the design store API.
//!
//! Failure messages follow a fixed policy so a UI can display them directly:
//!
//! | Call             | Non-2xx message                                        |
//! |------------------|--------------------------------------------------------|
//! | `health`         | `Health check failed`                                  |
//! | `fetch_design`   | `Failed to fetch design`                               |
//! | `save_design`    | body `error` field, else `Failed to save design`;      |
//! |                  | `Unknown error` if the body is not JSON                |

use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use pixel_core::{Design, DesignPayload, HealthResponse, SaveDesignResponse};

const HEALTH_PATH: &str = "/api/health";
const DESIGN_PATH: &str = "/api/design";

const HEALTH_FAILED: &str = "Health check failed";
const FETCH_FAILED: &str = "Failed to fetch design";
const SAVE_FAILED: &str = "Failed to save design";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors returned by [`DesignClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL given to [`DesignClient::new`] could not be parsed.
    #[error("invalid server URL: {0}")]
    InvalidBaseUrl(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    /// The request never produced a usable response (connection refused,
    /// timeout, undecodable success body, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for one design store server.
#[derive(Debug, Clone)]
pub struct DesignClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DesignClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:3001`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(format!("'{base_url}' cannot be a base")));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(request_error(status, HEALTH_FAILED.to_string()));
        }
        Ok(response.json().await?)
    }

    /// `GET /api/design`: the server's current design.
    pub async fn fetch_design(&self) -> Result<Design, ClientError> {
        let response = self.http.get(self.endpoint(DESIGN_PATH)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(request_error(status, FETCH_FAILED.to_string()));
        }
        Ok(response.json().await?)
    }

    /// `POST /api/design`: replaces the server's design with `payload`.
    ///
    /// The server assigns `updatedAt`; the stamped design is returned in
    /// [`SaveDesignResponse::saved_design`].
    pub async fn save_design(&self, payload: &DesignPayload) -> Result<SaveDesignResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint(DESIGN_PATH)?)
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(request_error(status, save_error_message(&body)));
        }
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("'{}{path}': {e}", self.base_url)))
    }
}

fn request_error(status: StatusCode, message: String) -> ClientError {
    debug!("request failed with {status}: {message}");
    ClientError::Request { status, message }
}

/// Picks the user-facing message out of a failed save response body.
fn save_error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(SAVE_FAILED)
            .to_string(),
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}
