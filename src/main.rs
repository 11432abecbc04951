use anyhow::Result;
use clap::Parser;

use sprint_health::cli::commands::{
    Command, ConfigInitCommand, ConfigShowCommand, OnceCommand, RunCommand, WebhookCommand,
};
use sprint_health::cli::{Cli, Commands, ConfigAction};
use sprint_health::config::SprintHealthConfig;
use sprint_health::telemetry::{init_telemetry, shutdown_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    SprintHealthConfig::load_env_file()?;
    let mut config = SprintHealthConfig::load(cli.config.as_deref())?;
    cli.tracker.apply(&mut config);

    init_telemetry(&config.observability)?;

    let result = tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            // Default behavior: no subcommand starts the dashboard
            None => RunCommand::new(config).execute().await,
            Some(Commands::Run {
                interval,
                webhook,
                no_table,
            }) => {
                if let Some(seconds) = interval {
                    config.polling.interval_seconds = seconds;
                }
                if webhook {
                    config.webhook.enabled = true;
                }
                RunCommand::new(config).with_table(!no_table).execute().await
            }
            Some(Commands::Once { json }) => OnceCommand::new(config).with_json(json).execute().await,
            Some(Commands::Webhook { bind }) => {
                let bind = bind.unwrap_or(config.webhook.bind_address);
                WebhookCommand::new(bind).execute().await
            }
            Some(Commands::Config { action }) => match action {
                ConfigAction::Show => ConfigShowCommand::new(config).execute().await,
                ConfigAction::Init { path, force } => {
                    ConfigInitCommand::new(path).with_force(force).execute().await
                }
            },
        }
    });

    shutdown_telemetry();
    result
}
