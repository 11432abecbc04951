use anyhow::{bail, Result};
use std::path::PathBuf;

use super::Command;
use crate::config::SprintHealthConfig;

pub struct ConfigShowCommand {
    config: SprintHealthConfig,
}

impl ConfigShowCommand {
    pub fn new(config: SprintHealthConfig) -> Self {
        Self { config }
    }
}

impl Command for ConfigShowCommand {
    async fn execute(&self) -> Result<()> {
        let mut shown = self.config.clone();
        if !shown.tracker.api_token.is_empty() {
            shown.tracker.api_token = "<redacted>".to_string();
        }
        println!("{}", toml::to_string_pretty(&shown)?);

        match self.config.validate() {
            Ok(()) => println!("✅ Configuration is complete"),
            Err(e) => println!("⚠️  {e}"),
        }
        Ok(())
    }
}

pub struct ConfigInitCommand {
    path: PathBuf,
    force: bool,
}

impl ConfigInitCommand {
    pub fn new(path: PathBuf) -> Self {
        Self { path, force: false }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl Command for ConfigInitCommand {
    async fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                self.path.display()
            );
        }

        SprintHealthConfig::default().save_to_file(&self.path)?;

        println!("✅ Wrote {}", self.path.display());
        println!("   💡 Fill in tracker.base_url, tracker.email, tracker.api_token and tracker.project_key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_defaults_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sprint-health.toml");

        ConfigInitCommand::new(path.clone()).execute().await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("interval_seconds = 5"));
        assert!(written.contains("max_results = 100"));

        assert!(ConfigInitCommand::new(path.clone()).execute().await.is_err());
        ConfigInitCommand::new(path)
            .with_force(true)
            .execute()
            .await
            .unwrap();
    }
}
