use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::Command;
use crate::presentation::DashboardSnapshot;
use crate::shutdown::ShutdownCoordinator;
use crate::webhook::{self, WebhookBuffer, WebhookState};

/// Webhook receiver without the poll loop. Needs no tracker credentials.
pub struct WebhookCommand {
    bind_address: String,
}

impl WebhookCommand {
    pub fn new(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
        }
    }
}

impl Command for WebhookCommand {
    async fn execute(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("failed to bind webhook receiver to {}", self.bind_address))?;

        println!("📬 Webhook receiver on http://{}/webhook", listener.local_addr()?);
        println!("   Press Ctrl-C to stop");

        let coordinator = Arc::new(ShutdownCoordinator::new());
        coordinator.install_signal_handlers();

        let buffer = Arc::new(WebhookBuffer::new());
        let state = WebhookState {
            buffer: buffer.clone(),
            dashboard: Arc::new(DashboardSnapshot::new()),
        };
        webhook::serve(listener, state, coordinator.subscribe()).await?;

        println!("👋 Stopped after buffering {} payloads", buffer.len());
        Ok(())
    }
}
