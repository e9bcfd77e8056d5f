//! HTTP surface: service banner, health check, webhook intake, metrics.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use court_telegram::Update;
use court_types::{InboundMessage, Timestamp};

use crate::metrics::BotMetrics;
use crate::NodeError;

/// Shared state for the HTTP handlers.
pub struct ServerState {
    /// Where webhook updates go; the dispatcher owns the other end.
    pub updates: mpsc::Sender<InboundMessage>,
    pub metrics: Arc<BotMetrics>,
    /// Whether the record store opened.
    pub store_available: bool,
    pub enable_metrics: bool,
}

/// Build the router over `state`.
pub fn router(state: Arc<ServerState>) -> Router {
    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler));
    if state.enable_metrics {
        app = app.route("/metrics", get(metrics_handler));
    }
    app.with_state(state)
}

/// Serve on an already-bound listener until shutdown is signalled.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<ServerState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), NodeError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| NodeError::Server(e.to_string()))
}

/// Bind `0.0.0.0:{port}` and serve until shutdown.
pub async fn serve(
    port: u16,
    state: Arc<ServerState>,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), NodeError> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| NodeError::Server(format!("bind {addr}: {e}")))?;
    serve_on(listener, state, shutdown).await
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Yang Gang Court Bot is running!",
        "status": "active",
        "timestamp": Timestamp::now().as_secs(),
    }))
}

async fn health_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let database = if state.store_available {
        "connected"
    } else {
        "not available"
    };
    Json(serde_json::json!({
        "status": "OK",
        "message": "Bot is running",
        "database": database,
        "timestamp": Timestamp::now().as_secs(),
    }))
}

async fn webhook_handler(
    State(state): State<Arc<ServerState>>,
    Json(update): Json<Update>,
) -> StatusCode {
    state.metrics.updates_received.inc();
    let update_id = update.update_id;
    let Some(msg) = update.into_inbound() else {
        debug!(update_id, "ignoring update without a text message");
        return StatusCode::OK;
    };
    match state.updates.send(msg).await {
        Ok(()) => StatusCode::OK,
        Err(_) => {
            warn!(update_id, "dispatcher gone, dropping webhook update");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn metrics_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
