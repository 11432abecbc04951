use std::fmt::Write as _;

use super::{PresentationSink, RecordRow, Severity};
use crate::metrics::SprintMetrics;

const GAUGE_WIDTH: usize = 20;
const SUMMARY_WIDTH: usize = 40;

/// Prints gauges and the backlog table to stdout after every cycle.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    show_table: bool,
}

impl TerminalRenderer {
    pub fn new(show_table: bool) -> Self {
        Self { show_table }
    }
}

impl PresentationSink for TerminalRenderer {
    fn publish(&self, metrics: &SprintMetrics, rows: &[RecordRow]) {
        println!("{}", render_gauges(metrics));
        if self.show_table {
            println!("{}", render_table(rows));
        }
    }

    fn publish_error(&self, error: &str) {
        println!("❌ Error: {error}");
    }
}

/// One line per headline metric: bar, rounded value, severity and label.
pub fn render_gauges(metrics: &SprintMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Sprint Health ({} issues)", metrics.total_issues);
    for (label, value) in metrics.headline() {
        let severity = Severity::classify(value);
        let _ = writeln!(
            out,
            "  {} {:>4.0}% {:<8} {}",
            gauge_bar(value),
            value,
            severity.label(),
            label
        );
    }
    out
}

/// The value is drawn clamped to the bar; the printed number stays raw.
fn gauge_bar(value: f64) -> String {
    let fraction = if value.is_finite() {
        value.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = (fraction * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}

pub fn render_table(rows: &[RecordRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Backlog Overview");
    let _ = writeln!(
        out,
        "  {:<12} {:<width$} {:<14} {:<18} {:>6} {}",
        "Key",
        "Summary",
        "Status",
        "Assignee",
        "Points",
        "Sprint",
        width = SUMMARY_WIDTH
    );
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<12} {:<width$} {:<14} {:<18} {:>6} {}",
            row.key,
            truncate(&row.summary, SUMMARY_WIDTH),
            row.status,
            row.assignee,
            row.story_points.map(format_points).unwrap_or_else(|| "-".to_string()),
            row.sprint.as_deref().unwrap_or("-"),
            width = SUMMARY_WIDTH
        );
    }
    out
}

fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points}")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars - 1).collect();
    shortened.push('…');
    shortened
}
