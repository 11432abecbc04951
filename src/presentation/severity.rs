use serde::{Deserialize, Serialize};

/// Colour of the unfilled part of a gauge.
pub const TRACK_COLOR: &str = "#838383";

/// Three-bucket colour policy for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Healthy,
}

impl Severity {
    /// `v <= 20` is critical, `21 <= v <= 35` is a warning, anything else
    /// (including the gap between 20 and 21) is healthy.
    pub fn classify(value: f64) -> Self {
        if value <= 20.0 {
            Severity::Critical
        } else if (21.0..=35.0).contains(&value) {
            Severity::Warning
        } else {
            Severity::Healthy
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Critical => "#FF0000",
            Severity::Warning => "#FFA500",
            Severity::Healthy => "#4CAF50",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Healthy => "healthy",
        }
    }
}

/// One headline metric as a front end draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub label: String,
    pub value: f64,
    pub severity: Severity,
    pub color: String,
    pub track_color: String,
}

impl Gauge {
    pub fn new(label: &str, value: f64) -> Self {
        let severity = Severity::classify(value);
        Self {
            label: label.to_string(),
            value,
            severity,
            color: severity.color().to_string(),
            track_color: TRACK_COLOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(Severity::classify(-12.0), Severity::Critical);
        assert_eq!(Severity::classify(0.0), Severity::Critical);
        assert_eq!(Severity::classify(20.0), Severity::Critical);
        assert_eq!(Severity::classify(20.5), Severity::Healthy);
        assert_eq!(Severity::classify(21.0), Severity::Warning);
        assert_eq!(Severity::classify(35.0), Severity::Warning);
        assert_eq!(Severity::classify(35.01), Severity::Healthy);
        assert_eq!(Severity::classify(140.0), Severity::Healthy);
    }

    #[test]
    fn test_colors() {
        assert_eq!(Severity::Critical.color(), "#FF0000");
        assert_eq!(Severity::Warning.color(), "#FFA500");
        assert_eq!(Severity::Healthy.color(), "#4CAF50");
    }

    #[test]
    fn test_gauge_carries_color_policy() {
        let gauge = Gauge::new("Task Quality (%)", 33.3);
        assert_eq!(gauge.severity, Severity::Warning);
        assert_eq!(gauge.color, "#FFA500");
        assert_eq!(gauge.track_color, TRACK_COLOR);
    }
}
