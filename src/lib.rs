// Sprint Health Library - live sprint metrics for a Jira project
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod driver;
pub mod metrics;
pub mod normalize;
pub mod observability;
pub mod presentation;
pub mod shutdown;
pub mod telemetry;
pub mod tracker;
pub mod webhook;

// Re-export key types for easy access
pub use config::{ConfigError, SprintHealthConfig};
pub use driver::{CycleError, CycleReport, DriverPhase, PollSettings, PollingDriver};
pub use metrics::{aggregate, MetricsAggregator, SprintMetrics, Weights};
pub use normalize::{normalize, normalize_batch, IssueRecord, NormalizeError};
pub use observability::{tracker_metrics, OperationTimer, TrackerApiMetrics};
pub use presentation::{
    DashboardSnapshot, DashboardState, PresentationSink, RecordRow, Severity, SinkFanout,
    TerminalRenderer,
};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use tracker::{JiraClient, RawIssue, TrackerClient, TrackerError};
pub use webhook::{Ack, WebhookBuffer, WebhookError, WebhookState};
