use anyhow::Result;
use std::sync::Arc;

use crate::config::{ConfigError, SprintHealthConfig};
use crate::tracker::{JiraClient, TrackerClient};

pub mod config;
pub mod once;
pub mod run;
pub mod webhook;

pub use config::{ConfigInitCommand, ConfigShowCommand};
pub use once::OnceCommand;
pub use run::RunCommand;
pub use webhook::WebhookCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Refuse to start without a complete tracker connection. Nothing is sent
/// to the tracker when this fails.
pub fn ensure_ready(config: &SprintHealthConfig) -> Result<()> {
    match config.validate() {
        Ok(()) => Ok(()),
        Err(e @ ConfigError::MissingFields { .. }) => {
            println!("⚠️  Please fill in all fields to get started");
            if let ConfigError::MissingFields { fields } = &e {
                for field in fields {
                    println!("   • {field}");
                }
            }
            println!("   💡 Run 'sprint-health config init' and edit sprint-health.toml,");
            println!("      or pass --base-url, --email, --api-token and --project");
            Err(e.into())
        }
        Err(e) => {
            println!("❌ Invalid configuration: {e}");
            Err(e.into())
        }
    }
}

pub fn connect(config: &SprintHealthConfig) -> Result<Arc<dyn TrackerClient>> {
    let client = JiraClient::new(&config.tracker)?;
    Ok(Arc::new(client))
}
