use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::metrics::Weights;

const DEFAULT_CONFIG_FILE: &str = "sprint-health.toml";
const ENV_PREFIX: &str = "SPRINT_HEALTH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("please fill in all fields to get started; missing: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration structure for Sprint Health
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SprintHealthConfig {
    /// Issue tracker connection
    pub tracker: TrackerConfig,
    /// Poll loop settings
    pub polling: PollingConfig,
    /// Category weights for the health score
    pub weights: Weights,
    /// Webhook receiver settings
    pub webhook: WebhookConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Jira site, e.g. https://your-team.atlassian.net
    pub base_url: String,
    /// API token (can be set via JIRA_API_TOKEN)
    pub api_token: String,
    /// Account email used for basic auth
    pub email: String,
    /// Project key, e.g. SCRUM
    pub project_key: String,
    /// Issues fetched per cycle (capped at 100)
    pub max_results: u32,
    /// Per-request timeout
    pub request_timeout_seconds: u64,
    pub rate_limit: RateLimitConfig,
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("email", &self.email)
            .field("project_key", &self.project_key)
            .field("max_results", &self.max_results)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Fixed pause between cycles
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Run the webhook receiver alongside the poll loop
    pub enabled: bool,
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub json_logs: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            email: String::new(),
            project_key: String::new(),
            max_results: 100,
            request_timeout_seconds: 30,
            rate_limit: RateLimitConfig {
                requests_per_second: 2,
                burst_capacity: 5,
            },
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5,
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl SprintHealthConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (`path`, or sprint-health.toml when present)
    /// 3. Environment variables (SPRINT_HEALTH__TRACKER__EMAIL etc.)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: SprintHealthConfig = builder.build()?.try_deserialize()?;

        if loaded.tracker.api_token.is_empty() {
            if let Ok(token) = std::env::var("JIRA_API_TOKEN") {
                loaded.tracker.api_token = token;
            }
        }

        Ok(loaded)
    }

    /// Refuse to start unless every connection field is filled in and the
    /// numeric settings make sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tracker = &self.tracker;
        let missing: Vec<&'static str> = [
            ("tracker.base_url", &tracker.base_url),
            ("tracker.api_token", &tracker.api_token),
            ("tracker.email", &tracker.email),
            ("tracker.project_key", &tracker.project_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields { fields: missing });
        }

        if self.polling.interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_seconds",
                reason: "must be at least 1".to_string(),
            });
        }
        if tracker.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracker.max_results",
                reason: "must be at least 1".to_string(),
            });
        }
        let w = &self.weights;
        if [w.engagement, w.task_quality, w.board_quality]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
            || w.category_total() <= 0.0
        {
            return Err(ConfigError::InvalidValue {
                field: "weights",
                reason: "category weights must be non-negative with a positive sum".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<(), ConfigError> {
        if Path::new(".env").exists() {
            dotenvy::dotenv().map_err(|e| ConfigError::InvalidValue {
                field: ".env",
                reason: e.to_string(),
            })?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
