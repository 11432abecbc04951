use anyhow::Result;
use std::sync::Arc;

use super::{connect, ensure_ready, Command};
use crate::config::SprintHealthConfig;
use crate::driver::{PollSettings, PollingDriver};
use crate::presentation::{DashboardSnapshot, PresentationSink, TerminalRenderer};

pub struct OnceCommand {
    config: SprintHealthConfig,
    json: bool,
}

impl OnceCommand {
    pub fn new(config: SprintHealthConfig) -> Self {
        Self {
            config,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for OnceCommand {
    async fn execute(&self) -> Result<()> {
        ensure_ready(&self.config)?;
        let client = connect(&self.config)?;

        // JSON output goes to stdout untouched, so the terminal renderer
        // stays out of the way.
        let sink: Arc<dyn PresentationSink> = if self.json {
            Arc::new(DashboardSnapshot::new())
        } else {
            Arc::new(TerminalRenderer::new(true))
        };

        let driver = PollingDriver::new(
            client,
            sink,
            PollSettings::from(&self.config),
            self.config.weights,
        );

        match driver.run_cycle().await {
            Ok(report) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&report.metrics)?);
                } else {
                    println!(
                        "✅ {} issues analysed in {:.2}s",
                        report.records.len(),
                        report.elapsed.as_secs_f64()
                    );
                }
                Ok(())
            }
            Err(e) => {
                println!("❌ Error: {e}");
                Err(e.into())
            }
        }
    }
}
