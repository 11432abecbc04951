use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

use super::{PresentationSink, RecordRow};
use crate::metrics::SprintMetrics;

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub metrics: Option<SprintMetrics>,
    pub rows: Vec<RecordRow>,
    /// Error of the most recent cycle, cleared by the next success.
    pub error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub publishes: u64,
}

/// In-memory sink holding the latest published state.
#[derive(Debug, Default)]
pub struct DashboardSnapshot {
    state: RwLock<DashboardState>,
}

impl DashboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn current(&self) -> DashboardState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PresentationSink for DashboardSnapshot {
    fn publish(&self, metrics: &SprintMetrics, rows: &[RecordRow]) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.metrics = Some(metrics.clone());
        state.rows = rows.to_vec();
        state.error = None;
        state.last_success_at = Some(Utc::now());
        state.publishes += 1;
    }

    fn publish_error(&self, error: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.error = Some(error.to_string());
        state.last_error_at = Some(Utc::now());
        state.publishes += 1;
    }
}
