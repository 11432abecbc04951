pub mod client;
pub mod errors;
pub mod types;

pub use client::{JiraClient, TrackerClient, MAX_RESULTS_CAP};
#[cfg(any(test, feature = "testing"))]
pub use client::MockTrackerClient;
pub use errors::TrackerError;
pub use types::{RawFields, RawIssue, RawStatus, RawUser, SearchResponse};
