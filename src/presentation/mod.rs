//! Presentation boundary.
//!
//! The polling driver publishes into a [`PresentationSink`]; every publish
//! replaces what was shown before.

pub mod severity;
pub mod snapshot;
pub mod terminal;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::SprintMetrics;
use crate::normalize::IssueRecord;

pub use severity::{Gauge, Severity};
pub use snapshot::{DashboardSnapshot, DashboardState};
pub use terminal::TerminalRenderer;

/// Receives the output of every poll cycle.
pub trait PresentationSink: Send + Sync {
    /// Replace the displayed metrics and issue table.
    fn publish(&self, metrics: &SprintMetrics, rows: &[RecordRow]);

    /// Show a cycle-scoped error. Previously published metrics stay visible.
    fn publish_error(&self, error: &str);
}

impl<S: PresentationSink + ?Sized> PresentationSink for Arc<S> {
    fn publish(&self, metrics: &SprintMetrics, rows: &[RecordRow]) {
        (**self).publish(metrics, rows)
    }

    fn publish_error(&self, error: &str) {
        (**self).publish_error(error)
    }
}

/// Forwards each publish to several sinks in order.
#[derive(Default)]
pub struct SinkFanout {
    sinks: Vec<Arc<dyn PresentationSink>>,
}

impl SinkFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn PresentationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl PresentationSink for SinkFanout {
    fn publish(&self, metrics: &SprintMetrics, rows: &[RecordRow]) {
        for sink in &self.sinks {
            sink.publish(metrics, rows);
        }
    }

    fn publish_error(&self, error: &str) {
        for sink in &self.sinks {
            sink.publish_error(error);
        }
    }
}

/// Backlog table row: Key, Summary, Status, Assignee, Story Points, Sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: String,
    pub story_points: Option<f64>,
    pub sprint: Option<String>,
}

impl From<&IssueRecord> for RecordRow {
    fn from(record: &IssueRecord) -> Self {
        Self {
            key: record.key.clone(),
            summary: record.summary.clone(),
            status: record.status.clone(),
            assignee: record.assignee.clone(),
            story_points: record.story_points,
            sprint: record.sprint_name.clone(),
        }
    }
}

pub fn project_rows(records: &[IssueRecord]) -> Vec<RecordRow> {
    records.iter().map(RecordRow::from).collect()
}

/// The four headline gauges in display order.
pub fn gauges(metrics: &SprintMetrics) -> Vec<Gauge> {
    metrics
        .headline()
        .into_iter()
        .map(|(label, value)| Gauge::new(label, value))
        .collect()
}
