use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Story points custom field on Jira Cloud boards.
pub const STORY_POINTS_FIELD: &str = "customfield_10016";
/// Sprint custom field on Jira Cloud boards.
pub const SPRINT_FIELD: &str = "customfield_10020";

/// Fields requested from the search endpoint.
pub const REQUESTED_FIELDS: &[&str] = &[
    "summary",
    "status",
    "assignee",
    "created",
    "updated",
    "subtasks",
    "description",
    STORY_POINTS_FIELD,
    SPRINT_FIELD,
];

/// Body of `GET /rest/api/2/search`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

/// One issue as the tracker returns it, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default, rename = "customfield_10016")]
    pub story_points: Option<f64>,
    #[serde(default)]
    pub subtasks: Option<Vec<Value>>,
    /// Plain text on API v2, an ADF document on v3.
    #[serde(default)]
    pub description: Option<Value>,
    /// List of sprint objects on Cloud, list of encoded strings on older servers.
    #[serde(default, rename = "customfield_10020")]
    pub sprints: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawStatus {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unused_response_fields_are_ignored() {
        let body = json!({
            "startAt": 0,
            "maxResults": 100,
            "total": 1,
            "issues": [{
                "key": "SCRUM-1",
                "fields": {
                    "assignee": {"displayName": "Alice", "emailAddress": "alice@example.com"}
                }
            }]
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.total, 1);
        let assignee = response.issues[0].fields.assignee.as_ref().unwrap();
        assert_eq!(assignee.display_name.as_deref(), Some("Alice"));
    }
}
