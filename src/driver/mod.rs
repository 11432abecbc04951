//! Polling driver: fetch → normalize → aggregate → publish, forever.
//!
//! A failing cycle is reported to the sink and never ends the loop. State is
//! rebuilt from scratch on every cycle.

pub mod lifecycle;

use statig::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::config::SprintHealthConfig;
use crate::metrics::{MetricsAggregator, SprintMetrics, Weights};
use crate::normalize::{normalize_batch, IssueRecord, NormalizeError};
use crate::observability::{tracker_metrics, OperationTimer};
use crate::presentation::{project_rows, PresentationSink};
use crate::shutdown::ShutdownSignal;
use crate::telemetry::{create_cycle_span, generate_correlation_id};
use crate::tracker::{TrackerClient, TrackerError};

pub use lifecycle::{DriverEvent, DriverLifecycle, DriverPhase};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] TrackerError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub project_key: String,
    pub max_results: u32,
    pub interval: Duration,
}

impl From<&SprintHealthConfig> for PollSettings {
    fn from(config: &SprintHealthConfig) -> Self {
        Self {
            project_key: config.tracker.project_key.clone(),
            max_results: config.tracker.max_results,
            interval: config.polling.interval(),
        }
    }
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub correlation_id: String,
    pub records: Vec<IssueRecord>,
    pub metrics: SprintMetrics,
    pub elapsed: Duration,
}

pub struct PollingDriver {
    client: Arc<dyn TrackerClient>,
    sink: Arc<dyn PresentationSink>,
    settings: PollSettings,
    aggregator: MetricsAggregator,
    lifecycle: StateMachine<DriverLifecycle>,
}

impl PollingDriver {
    pub fn new(
        client: Arc<dyn TrackerClient>,
        sink: Arc<dyn PresentationSink>,
        settings: PollSettings,
        weights: Weights,
    ) -> Self {
        Self {
            client,
            sink,
            settings,
            aggregator: MetricsAggregator::new(weights),
            lifecycle: DriverLifecycle::default().state_machine(),
        }
    }

    pub fn phase(&self) -> DriverPhase {
        lifecycle::phase_of(&self.lifecycle)
    }

    /// Start the analysis. Returns false when already running.
    pub fn trigger(&mut self) -> bool {
        let before = self.phase();
        self.lifecycle.handle(&DriverEvent::Trigger);
        before != self.phase()
    }

    /// Run one fetch → normalize → aggregate → publish cycle.
    ///
    /// Errors are returned untouched; nothing is published on failure.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let correlation_id = generate_correlation_id();
        let span = create_cycle_span(&self.settings.project_key, &correlation_id);

        async {
            let timer = OperationTimer::new("poll_cycle");

            let raw = self
                .client
                .search(&self.settings.project_key, self.settings.max_results)
                .await?;
            let records = normalize_batch(&raw)?;
            let metrics = self.aggregator.aggregate(&records);
            self.sink.publish(&metrics, &project_rows(&records));

            let elapsed = timer.finish();
            info!(
                issues = records.len(),
                engagement = metrics.engagement_pct,
                task_quality = metrics.task_quality_pct,
                board_quality = metrics.board_quality_pct,
                health = metrics.health_score_pct,
                "Poll cycle published"
            );

            Ok(CycleReport {
                correlation_id: correlation_id.clone(),
                records,
                metrics,
                elapsed,
            })
        }
        .instrument(span)
        .await
    }

    /// Run one cycle, turning a failure into a published error message.
    pub async fn poll_once(&self) -> Option<CycleReport> {
        match self.run_cycle().await {
            Ok(report) => {
                tracker_metrics().record_cycle(true);
                Some(report)
            }
            Err(e) => {
                tracker_metrics().record_cycle(false);
                warn!(error = %e, "Poll cycle failed; previous dashboard state kept");
                self.sink.publish_error(&e.to_string());
                None
            }
        }
    }

    /// Poll until the process is killed.
    pub async fn run(self) {
        self.run_until(ShutdownSignal::never()).await
    }

    /// Poll until `shutdown` fires. The signal is only observed while
    /// sleeping between cycles; the pause is fixed and not shortened by the
    /// time a cycle took.
    pub async fn run_until(mut self, mut shutdown: ShutdownSignal) {
        self.trigger();
        info!(
            project = %self.settings.project_key,
            interval_secs = self.settings.interval.as_secs(),
            "Entering poll loop"
        );

        loop {
            self.poll_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = shutdown.wait() => {
                    info!("Shutdown requested; leaving poll loop");
                    break;
                }
            }
        }

        tracker_metrics().log_stats();
    }
}
