use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{Ack, WebhookBuffer};
use crate::presentation::{gauges, DashboardSnapshot, DashboardState, Gauge};
use crate::shutdown::ShutdownSignal;

#[derive(Clone)]
pub struct WebhookState {
    pub buffer: Arc<WebhookBuffer>,
    pub dashboard: Arc<DashboardSnapshot>,
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    #[serde(flatten)]
    state: DashboardState,
    gauges: Vec<Gauge>,
    update_pending: bool,
    buffered_payloads: usize,
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}

async fn webhook_handler(
    State(state): State<WebhookState>,
    body: Bytes,
) -> (StatusCode, Json<Ack>) {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Webhook body is not valid JSON");
                return (StatusCode::BAD_REQUEST, Json(Ack::failed()));
            }
        }
    };

    match state.buffer.ingest(payload) {
        Ok(ack) => (StatusCode::OK, Json(ack)),
        Err(e) => {
            warn!(error = %e, "Webhook payload rejected");
            (StatusCode::BAD_REQUEST, Json(Ack::failed()))
        }
    }
}

async fn dashboard_handler(State(state): State<WebhookState>) -> Json<DashboardResponse> {
    let current = state.dashboard.current();
    Json(DashboardResponse {
        gauges: current.metrics.as_ref().map(gauges).unwrap_or_default(),
        state: current,
        update_pending: state.buffer.is_update_pending(),
        buffered_payloads: state.buffer.len(),
    })
}

/// Serve the webhook router on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    state: WebhookState,
    mut shutdown: ShutdownSignal,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, "Webhook receiver listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await?;

    info!("Webhook receiver stopped");
    Ok(())
}
