use thiserror::Error;

/// Failures talking to the issue tracker.
///
/// Every variant is caught at the poll-cycle boundary; none of them stop the
/// polling loop.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid tracker base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("tracker authentication failed (HTTP {status}); check the account email and API token")]
    Authentication { status: u16 },

    #[error("project '{project_key}' not found or not visible to this account")]
    ProjectNotFound { project_key: String },

    #[error("tracker returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error while querying tracker: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode tracker response: {0}")]
    Decode(String),
}

impl TrackerError {
    /// Map a non-success HTTP status to the closest variant.
    pub fn from_status(status: u16, project_key: &str, message: String) -> Self {
        match status {
            401 | 403 => TrackerError::Authentication { status },
            404 => TrackerError::ProjectNotFound {
                project_key: project_key.to_string(),
            },
            _ => TrackerError::Status { status, message },
        }
    }
}
