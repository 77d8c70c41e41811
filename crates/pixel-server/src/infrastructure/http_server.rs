//! HTTP server: routes, handlers, and the serve loop.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Mapping the three API routes onto [`DesignService`] calls.
//! 3. Turning [`DesignError`]s into `400 { "error": ... }` responses.
//! 4. Stopping gracefully when the `running` flag is cleared.
//!
//! # Routes
//!
//! | Method | Path          | Handler         |
//! |--------|---------------|-----------------|
//! | GET    | `/api/health` | [`health`]      |
//! | GET    | `/api/design` | [`get_design`]  |
//! | POST   | `/api/design` | [`save_design`] |
//!
//! The POST body is read as raw bytes, whatever its `Content-Type`, so that a
//! malformed body gets the same `Invalid payload` answer as a wrongly typed
//! field instead of an extractor rejection.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use pixel_core::{Design, DesignCandidate, DesignError, ErrorResponse, HealthResponse, SaveDesignResponse};

use crate::application::DesignService;
use crate::domain::config::ServerConfig;
use crate::infrastructure::memory_store::InMemoryDesignStore;

/// How often the shutdown future re-checks the `running` flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Builds the API router around a shared [`DesignService`].
///
/// CORS is fully permissive so a browser UI served from another origin can
/// call the API.
pub fn router(service: Arc<DesignService>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/design", get(get_design).post(save_design))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Binds `config.bind_addr`, seeds the store, and serves until `running` is
/// set to `false`.
///
/// # Errors
///
/// Returns an error if the configured startup design is invalid or the
/// listener cannot be bound (e.g. the port is already in use).
pub async fn run_server(config: ServerConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let initial = config.initial_design().with_context(|| {
        format!(
            "invalid startup design (grid_size = {}, fill_color = '{}')",
            config.grid_size, config.fill_color
        )
    })?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    let store = Arc::new(InMemoryDesignStore::new(initial));
    let service = Arc::new(DesignService::new(store));

    serve(listener, service, running).await
}

/// Serves the API on an already-bound listener until `running` is cleared.
///
/// Split from [`run_server`] so tests can bind `127.0.0.1:0` and learn the
/// chosen port before the server starts.
///
/// # Errors
///
/// Returns an error if the underlying accept loop fails.
pub async fn serve(
    listener: TcpListener,
    service: Arc<DesignService>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local_addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    info!("design server listening on {local_addr}");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(wait_for_shutdown(running))
        .await
        .context("HTTP server failed")?;

    info!("design server on {local_addr} stopped");
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /api/health` → `{ "ok": true }`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// `GET /api/design` → the stored design, verbatim.
pub async fn get_design(State(service): State<Arc<DesignService>>) -> Json<Design> {
    Json(service.current_design())
}

/// `POST /api/design` → `{ "ok": true, "savedDesign": ... }` or a 400.
pub async fn save_design(
    State(service): State<Arc<DesignService>>,
    body: Bytes,
) -> Result<Json<SaveDesignResponse>, ApiError> {
    let candidate = DesignCandidate::from_json_slice(&body).map_err(|e| {
        warn!("rejected design update: body is not a JSON object ({} bytes)", body.len());
        e
    })?;
    let saved = service.update_design(candidate)?;
    Ok(Json(SaveDesignResponse::saved(saved)))
}

// ── Error mapping ─────────────────────────────────────────────────────────────

/// A client-caused failure, rendered as `400 { "error": "<message>" }`.
#[derive(Debug)]
pub struct ApiError(DesignError);

impl From<DesignError> for ApiError {
    fn from(err: DesignError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

async fn wait_for_shutdown(running: Arc<AtomicBool>) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
    }
    info!("shutdown flag set; draining open connections");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
