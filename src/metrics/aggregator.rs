use std::collections::BTreeMap;

use super::types::*;
use crate::normalize::IssueRecord;

const FULL: f64 = 100.0;
const NONE: f64 = 0.0;

/// Pure computation of [`SprintMetrics`] from a batch of records.
///
/// Holds nothing but the weights, so aggregating the same slice twice gives
/// identical results.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    weights: Weights,
}

impl MetricsAggregator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn aggregate(&self, records: &[IssueRecord]) -> SprintMetrics {
        let breakdown = MetricBreakdown {
            engagement: engagement(records),
            task_quality: task_quality(records),
            board_quality: board_quality(records),
        };

        let engagement_pct = breakdown.engagement.score();
        let task_quality_pct = breakdown.task_quality.score();
        let board_quality_pct = breakdown.board_quality.score();

        SprintMetrics {
            engagement_pct,
            task_quality_pct,
            board_quality_pct,
            health_score_pct: self
                .weights
                .combine(engagement_pct, task_quality_pct, board_quality_pct),
            total_issues: records.len(),
            breakdown,
        }
    }
}

/// Convenience wrapper around [`MetricsAggregator::aggregate`].
pub fn aggregate(records: &[IssueRecord], weights: &Weights) -> SprintMetrics {
    MetricsAggregator::new(*weights).aggregate(records)
}

fn engagement(records: &[IssueRecord]) -> EngagementBreakdown {
    EngagementBreakdown {
        assigned_pct: share(records, IssueRecord::is_assigned),
        balanced_distribution_pct: balanced_distribution(records),
        comments_mention_pct: share(records, |r| r.summary_mentions("comment")),
        has_subtasks_pct: share(records, IssueRecord::has_subtasks),
    }
}

fn task_quality(records: &[IssueRecord]) -> TaskQualityBreakdown {
    TaskQualityBreakdown {
        has_description_pct: share(records, |r| r.has_description),
        // Same formula as the engagement submetric, recomputed on purpose.
        has_subtasks_pct: share(records, IssueRecord::has_subtasks),
        has_story_points_pct: share(records, IssueRecord::has_story_points),
    }
}

fn board_quality(records: &[IssueRecord]) -> BoardQualityBreakdown {
    // With no issues nothing on the board can be wrong yet.
    if records.is_empty() {
        return BoardQualityBreakdown {
            backlog_managed_pct: FULL,
            git_integration_pct: FULL,
            workflow_rules_pct: FULL,
        };
    }

    BoardQualityBreakdown {
        backlog_managed_pct: share(records, |r| !r.is_backlog()),
        git_integration_pct: any_summary_mentions(records, "git"),
        workflow_rules_pct: any_summary_mentions(records, "workflow"),
    }
}

/// Percentage of records matching `predicate`; 0 for an empty batch.
fn share<F>(records: &[IssueRecord], predicate: F) -> f64
where
    F: Fn(&IssueRecord) -> bool,
{
    if records.is_empty() {
        return NONE;
    }
    let matching = records.iter().filter(|&r| predicate(r)).count();
    matching as f64 / records.len() as f64 * FULL
}

/// Binary signal: 100 if any summary contains `needle`, else 0.
fn any_summary_mentions(records: &[IssueRecord], needle: &str) -> f64 {
    if records.iter().any(|r| r.summary_mentions(needle)) {
        FULL
    } else {
        NONE
    }
}

/// `100 - stddev(per-assignee counts) / total * 100`, unclamped.
///
/// Uses the sample standard deviation; "Unassigned" counts as one assignee.
/// A single assignee group has no sample deviation; it is scored as 0
/// deviation (100 balance) rather than left undefined.
fn balanced_distribution(records: &[IssueRecord]) -> f64 {
    let total = records.len();
    if total <= 1 {
        return FULL;
    }

    let mut per_assignee: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *per_assignee.entry(record.assignee.as_str()).or_default() += 1;
    }
    let counts: Vec<f64> = per_assignee.values().map(|&c| c as f64).collect();

    FULL - (sample_std_dev(&counts) / total as f64 * FULL)
}

/// Sample (n - 1) standard deviation. A single value has no spread.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}
