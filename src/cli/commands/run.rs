use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::{connect, ensure_ready, Command};
use crate::config::SprintHealthConfig;
use crate::driver::{PollSettings, PollingDriver};
use crate::presentation::{DashboardSnapshot, SinkFanout, TerminalRenderer};
use crate::shutdown::ShutdownCoordinator;
use crate::webhook::{self, WebhookBuffer, WebhookState};

pub struct RunCommand {
    config: SprintHealthConfig,
    show_table: bool,
}

impl RunCommand {
    pub fn new(config: SprintHealthConfig) -> Self {
        Self {
            config,
            show_table: true,
        }
    }

    pub fn with_table(mut self, show_table: bool) -> Self {
        self.show_table = show_table;
        self
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        ensure_ready(&self.config)?;
        let client = connect(&self.config)?;

        println!("🏃 Sprint Health for project {}", self.config.tracker.project_key);
        println!(
            "   🔄 Refreshing every {}s, press Ctrl-C to stop",
            self.config.polling.interval_seconds
        );
        println!();

        let snapshot = Arc::new(DashboardSnapshot::new());
        let sink = SinkFanout::new()
            .with(snapshot.clone())
            .with(Arc::new(TerminalRenderer::new(self.show_table)));

        let coordinator = Arc::new(ShutdownCoordinator::new());
        coordinator.install_signal_handlers();

        let webhook_task = if self.config.webhook.enabled {
            let listener = TcpListener::bind(&self.config.webhook.bind_address)
                .await
                .with_context(|| {
                    format!("failed to bind webhook receiver to {}", self.config.webhook.bind_address)
                })?;
            println!("   📬 Webhook receiver on http://{}/webhook", listener.local_addr()?);
            let state = WebhookState {
                buffer: Arc::new(WebhookBuffer::new()),
                dashboard: snapshot.clone(),
            };
            Some(tokio::spawn(webhook::serve(
                listener,
                state,
                coordinator.subscribe(),
            )))
        } else {
            None
        };

        let driver = PollingDriver::new(
            client,
            Arc::new(sink),
            PollSettings::from(&self.config),
            self.config.weights,
        );
        driver.run_until(coordinator.subscribe()).await;

        if let Some(task) = webhook_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Webhook receiver failed"),
                Err(e) => error!(error = %e, "Webhook receiver task panicked"),
            }
        }

        info!("Sprint health dashboard stopped");
        println!("👋 Stopped");
        Ok(())
    }
}
