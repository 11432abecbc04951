use serde::{Deserialize, Serialize};

/// Category weights used by the health score.
///
/// `health_score` is carried for configuration compatibility only; the
/// combination formula uses the other three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub engagement: f64,
    pub task_quality: f64,
    pub board_quality: f64,
    pub health_score: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            engagement: 1.5,
            task_quality: 1.0,
            board_quality: 0.5,
            health_score: 1.0,
        }
    }
}

impl Weights {
    /// Weighted mean of the three category scores.
    pub fn combine(&self, engagement: f64, task_quality: f64, board_quality: f64) -> f64 {
        let weighted = self.engagement * engagement
            + self.task_quality * task_quality
            + self.board_quality * board_quality;
        weighted / self.category_total()
    }

    pub fn category_total(&self) -> f64 {
        self.engagement + self.task_quality + self.board_quality
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementBreakdown {
    pub assigned_pct: f64,
    pub balanced_distribution_pct: f64,
    pub comments_mention_pct: f64,
    pub has_subtasks_pct: f64,
}

impl EngagementBreakdown {
    pub fn score(&self) -> f64 {
        mean(&[
            self.assigned_pct,
            self.balanced_distribution_pct,
            self.comments_mention_pct,
            self.has_subtasks_pct,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskQualityBreakdown {
    pub has_description_pct: f64,
    pub has_subtasks_pct: f64,
    pub has_story_points_pct: f64,
}

impl TaskQualityBreakdown {
    pub fn score(&self) -> f64 {
        mean(&[
            self.has_description_pct,
            self.has_subtasks_pct,
            self.has_story_points_pct,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardQualityBreakdown {
    pub backlog_managed_pct: f64,
    pub git_integration_pct: f64,
    pub workflow_rules_pct: f64,
}

impl BoardQualityBreakdown {
    pub fn score(&self) -> f64 {
        mean(&[
            self.backlog_managed_pct,
            self.git_integration_pct,
            self.workflow_rules_pct,
        ])
    }
}

/// Every submetric behind the four headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub engagement: EngagementBreakdown,
    pub task_quality: TaskQualityBreakdown,
    pub board_quality: BoardQualityBreakdown,
}

/// Result of one aggregation. Values are percentages and are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintMetrics {
    pub engagement_pct: f64,
    pub task_quality_pct: f64,
    pub board_quality_pct: f64,
    pub health_score_pct: f64,
    pub total_issues: usize,
    pub breakdown: MetricBreakdown,
}

impl SprintMetrics {
    /// Headline values in dashboard order.
    pub fn headline(&self) -> [(&'static str, f64); 4] {
        [
            ("Engagement (%)", self.engagement_pct),
            ("Task Quality (%)", self.task_quality_pct),
            ("Board Quality (%)", self.board_quality_pct),
            ("Health Score (%)", self.health_score_pct),
        ]
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
