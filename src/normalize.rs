//! Mapping of raw tracker issues onto [`IssueRecord`].
//!
//! Missing optional fields fall back to fixed sentinels. A malformed or
//! missing timestamp is an error, and one bad issue fails the whole batch.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tracker::RawIssue;

pub const NO_SUMMARY: &str = "No Summary";
pub const NO_STATUS: &str = "No Status";
pub const UNASSIGNED: &str = "Unassigned";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("issue {key}: missing '{field}' timestamp")]
    MissingTimestamp { key: String, field: &'static str },

    #[error("issue {key}: cannot parse '{field}' timestamp '{value}': {source}")]
    InvalidTimestamp {
        key: String,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One tracker issue in the shape the aggregator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub duration_days: i64,
    pub story_points: Option<f64>,
    pub subtask_count: usize,
    pub has_description: bool,
    pub sprint_name: Option<String>,
}

impl IssueRecord {
    pub fn is_assigned(&self) -> bool {
        self.assignee != UNASSIGNED
    }

    pub fn has_subtasks(&self) -> bool {
        self.subtask_count > 0
    }

    pub fn has_story_points(&self) -> bool {
        self.story_points.is_some()
    }

    /// Case-insensitive substring test against the summary.
    pub fn summary_mentions(&self, needle: &str) -> bool {
        self.summary.to_lowercase().contains(needle)
    }

    pub fn is_backlog(&self) -> bool {
        self.status.to_lowercase() == "backlog"
    }
}

/// Normalize a single raw issue.
pub fn normalize(raw: &RawIssue) -> Result<IssueRecord, NormalizeError> {
    let fields = &raw.fields;

    let created_raw = required_timestamp(&raw.key, "created", fields.created.as_deref())?;
    let updated_raw = required_timestamp(&raw.key, "updated", fields.updated.as_deref())?;
    let created_at = parse_field(&raw.key, "created", created_raw)?;
    let updated_at = parse_field(&raw.key, "updated", updated_raw)?;

    let summary = fields
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY)
        .to_string();
    let status = fields
        .status
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| NO_STATUS.to_string());
    let assignee = fields
        .assignee
        .as_ref()
        .and_then(|user| user.display_name.clone())
        .unwrap_or_else(|| UNASSIGNED.to_string());

    Ok(IssueRecord {
        key: raw.key.clone(),
        summary,
        status,
        assignee,
        created_at,
        updated_at,
        duration_days: duration_days(created_at, updated_at),
        story_points: fields.story_points,
        subtask_count: fields.subtasks.as_ref().map_or(0, Vec::len),
        has_description: fields.description.as_ref().is_some_and(is_present),
        sprint_name: fields.sprints.as_ref().and_then(first_sprint_name),
    })
}

/// Normalize a whole fetch. The first failing issue aborts the batch.
pub fn normalize_batch(raws: &[RawIssue]) -> Result<Vec<IssueRecord>, NormalizeError> {
    raws.iter().map(normalize).collect()
}

/// Parse a tracker timestamp such as `2024-03-01T09:15:42.123+0000`.
///
/// A fractional part and a zone (`Z`, `+HHMM` or `+HH:MM`) after the
/// seconds are dropped. Any other trailing text is an error.
pub fn parse_tracker_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(strip_suffix(raw), TIMESTAMP_FORMAT)
}

fn strip_suffix(raw: &str) -> &str {
    match (raw.get(..19), raw.get(19..)) {
        (Some(base), Some(rest)) if is_fraction_and_zone(rest) => base,
        _ => raw,
    }
}

fn is_fraction_and_zone(rest: &str) -> bool {
    let zone = match rest.strip_prefix('.') {
        Some(fraction) => {
            let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return false;
            }
            &fraction[digits..]
        }
        None => rest,
    };
    is_zone(zone)
}

fn is_zone(zone: &str) -> bool {
    if zone.is_empty() || zone == "Z" {
        return true;
    }
    let Some(offset) = zone.strip_prefix(['+', '-']) else {
        return false;
    };
    match offset.as_bytes() {
        [h1, h2, m1, m2] | [h1, h2, b':', m1, m2] => {
            [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

fn required_timestamp<'a>(
    key: &str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, NormalizeError> {
    value.ok_or_else(|| NormalizeError::MissingTimestamp {
        key: key.to_string(),
        field,
    })
}

fn parse_field(key: &str, field: &'static str, value: &str) -> Result<NaiveDateTime, NormalizeError> {
    parse_tracker_timestamp(value).map_err(|source| NormalizeError::InvalidTimestamp {
        key: key.to_string(),
        field,
        value: value.to_string(),
        source,
    })
}

/// Whole days between two instants, rounded toward negative infinity.
fn duration_days(created: NaiveDateTime, updated: NaiveDateTime) -> i64 {
    (updated - created).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(_) => true,
    }
}

fn first_sprint_name(sprints: &Value) -> Option<String> {
    let first = sprints.as_array()?.first()?;
    match first {
        Value::Object(sprint) => sprint
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        // Jira Server encodes sprints as "com.atlassian...Sprint@1a2b[id=1,name=Sprint 4,...]"
        Value::String(encoded) => encoded
            .split(|c: char| c == '[' || c == ',' || c == ']')
            .find_map(|part| part.strip_prefix("name="))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawIssue {
        serde_json::from_value(value).unwrap()
    }

    fn minimal(key: &str) -> Value {
        json!({
            "key": key,
            "fields": {
                "created": "2024-03-01T09:00:00.000+0000",
                "updated": "2024-03-04T08:59:59.000+0000"
            }
        })
    }

    #[test]
    fn test_missing_fields_fall_back_to_sentinels() {
        let record = normalize(&raw(minimal("SCRUM-1"))).unwrap();

        assert_eq!(record.key, "SCRUM-1");
        assert_eq!(record.summary, NO_SUMMARY);
        assert_eq!(record.status, NO_STATUS);
        assert_eq!(record.assignee, UNASSIGNED);
        assert_eq!(record.story_points, None);
        assert_eq!(record.subtask_count, 0);
        assert!(!record.has_description);
        assert_eq!(record.sprint_name, None);
    }

    #[test]
    fn test_full_issue_is_mapped() {
        let record = normalize(&raw(json!({
            "key": "SCRUM-7",
            "fields": {
                "summary": "Wire up login",
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Alice"},
                "created": "2024-03-01T09:00:00.000+0000",
                "updated": "2024-03-11T10:00:00.000+0000",
                "customfield_10016": 5.0,
                "subtasks": [{"key": "SCRUM-8"}, {"key": "SCRUM-9"}],
                "description": "As a user I want to log in",
                "customfield_10020": [{"id": 3, "name": "Sprint 3"}, {"id": 4, "name": "Sprint 4"}]
            }
        })))
        .unwrap();

        assert_eq!(record.summary, "Wire up login");
        assert_eq!(record.status, "In Progress");
        assert_eq!(record.assignee, "Alice");
        assert_eq!(record.duration_days, 10);
        assert_eq!(record.story_points, Some(5.0));
        assert_eq!(record.subtask_count, 2);
        assert!(record.has_description);
        assert_eq!(record.sprint_name.as_deref(), Some("Sprint 3"));
    }

    #[test]
    fn test_duration_truncates_partial_days() {
        let record = normalize(&raw(minimal("SCRUM-2"))).unwrap();
        assert_eq!(record.duration_days, 2);
    }

    #[test]
    fn test_negative_duration_floors() {
        let record = normalize(&raw(json!({
            "key": "SCRUM-3",
            "fields": {
                "created": "2024-03-02T00:00:00",
                "updated": "2024-03-01T12:00:00"
            }
        })))
        .unwrap();
        assert_eq!(record.duration_days, -1);
    }

    #[test]
    fn test_empty_description_and_sprint_list() {
        let record = normalize(&raw(json!({
            "key": "SCRUM-4",
            "fields": {
                "summary": "",
                "description": "",
                "customfield_10020": [],
                "created": "2024-03-01T09:00:00",
                "updated": "2024-03-01T09:00:00"
            }
        })))
        .unwrap();
        assert!(!record.has_description);
        assert_eq!(record.sprint_name, None);
        assert_eq!(record.summary, NO_SUMMARY);
    }

    #[test]
    fn test_server_encoded_sprint_string() {
        let sprints = json!(["com.atlassian.greenhopper.service.sprint.Sprint@1f[id=12,rapidViewId=2,state=ACTIVE,name=Sprint 9,goal=]"]);
        assert_eq!(first_sprint_name(&sprints).as_deref(), Some("Sprint 9"));
    }

    #[test]
    fn test_timestamp_suffixes_are_stripped() {
        let expected = parse_tracker_timestamp("2024-03-01T09:15:42").unwrap();
        assert_eq!(parse_tracker_timestamp("2024-03-01T09:15:42.512+0100").unwrap(), expected);
        assert_eq!(parse_tracker_timestamp("2024-03-01T09:15:42Z").unwrap(), expected);
        assert_eq!(parse_tracker_timestamp("2024-03-01T09:15:42+0000").unwrap(), expected);
        assert_eq!(parse_tracker_timestamp("2024-03-01T09:15:42.5-05:30").unwrap(), expected);

        for malformed in [
            "2024-03-01T09:15:42-not-a-zone",
            "2024-03-01T09:15:42Zjunk",
            "2024-03-01T09:15:42.abc",
            "2024-03-01T09:15:42.123+01",
            "2024-03-01T09:15:42 extra",
        ] {
            assert!(parse_tracker_timestamp(malformed).is_err(), "{malformed} should not parse");
        }
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let err = normalize(&raw(json!({
            "key": "SCRUM-5",
            "fields": {"created": "yesterday", "updated": "2024-03-01T09:00:00"}
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::InvalidTimestamp { field: "created", .. }
        ));
    }

    #[test]
    fn test_batch_aborts_on_first_bad_issue() {
        let batch = vec![
            raw(minimal("SCRUM-1")),
            raw(json!({"key": "SCRUM-2", "fields": {"created": "2024-03-01T09:00:00"}})),
            raw(minimal("SCRUM-3")),
        ];
        let err = normalize_batch(&batch).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingTimestamp { ref key, field: "updated" } if key == "SCRUM-2"
        ));
    }
}
