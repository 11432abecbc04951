use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SprintHealthConfig;

pub mod commands;

#[derive(Parser)]
#[command(name = "sprint-health")]
#[command(about = "Live sprint health dashboard for a Jira project")]
#[command(long_about = "Sprint Health polls a Jira project every few seconds, scores engagement, \
                       task quality and board hygiene, and prints a health dashboard. Get started \
                       with 'sprint-health config init' and then 'sprint-health run'.")]
pub struct Cli {
    /// Configuration file (defaults to ./sprint-health.toml when present)
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub tracker: TrackerOverrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Connection fields that can be given on the command line instead of the
/// configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct TrackerOverrides {
    #[arg(long, global = true, help = "Jira site URL, e.g. https://your-team.atlassian.net")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Jira account email")]
    pub email: Option<String>,

    #[arg(long, global = true, help = "Jira API token")]
    pub api_token: Option<String>,

    #[arg(long, global = true, help = "Jira project key, e.g. SCRUM")]
    pub project: Option<String>,
}

impl TrackerOverrides {
    pub fn apply(&self, config: &mut SprintHealthConfig) {
        let tracker = &mut config.tracker;
        if let Some(base_url) = &self.base_url {
            tracker.base_url = base_url.clone();
        }
        if let Some(email) = &self.email {
            tracker.email = email.clone();
        }
        if let Some(api_token) = &self.api_token {
            tracker.api_token = api_token.clone();
        }
        if let Some(project) = &self.project {
            tracker.project_key = project.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard and poll until interrupted (default)
    Run {
        /// Seconds to sleep between cycles
        #[arg(long, help = "Override the pause between poll cycles, in seconds")]
        interval: Option<u64>,
        /// Also start the webhook receiver
        #[arg(long, help = "Run the webhook receiver next to the poll loop")]
        webhook: bool,
        /// Skip the backlog table
        #[arg(long, help = "Only print the gauges, not the backlog table")]
        no_table: bool,
    },
    /// Run a single poll cycle and exit
    Once {
        /// Print metrics as JSON
        #[arg(long, help = "Print the computed metrics as JSON instead of gauges")]
        json: bool,
    },
    /// Run only the webhook receiver
    Webhook {
        /// Address to listen on
        #[arg(long, help = "Bind address, e.g. 127.0.0.1:5000")]
        bind: Option<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with the token redacted
    Show,
    /// Write a configuration file with default values
    Init {
        #[arg(default_value = "sprint-health.toml", help = "Where to write the file")]
        path: PathBuf,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}
