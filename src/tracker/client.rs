use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::Url;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::errors::TrackerError;
use super::types::{RawIssue, SearchResponse, REQUESTED_FIELDS};
use crate::config::TrackerConfig;
use crate::observability::tracker_metrics;

/// Hard upper bound on issues fetched per cycle. There is no pagination.
pub const MAX_RESULTS_CAP: u32 = 100;

/// Query interface consumed by the polling driver.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Return at most `max_results` issues of `project_key`.
    async fn search(&self, project_key: &str, max_results: u32)
        -> Result<Vec<RawIssue>, TrackerError>;
}

/// Rate-limited Jira REST client using basic auth (account email + API token).
#[derive(Debug)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: Url,
    email: String,
    api_token: String,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl JiraClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| TrackerError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TrackerError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let per_second =
            NonZeroU32::new(config.rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("sprint-health/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/rest/api/2/search",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TrackerClient for JiraClient {
    async fn search(
        &self,
        project_key: &str,
        max_results: u32,
    ) -> Result<Vec<RawIssue>, TrackerError> {
        let limit = max_results.min(MAX_RESULTS_CAP);
        let jql = format!("project = {project_key}");

        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        let metrics = tracker_metrics();
        metrics.record_request();
        debug!(project = project_key, limit, "Querying tracker search endpoint");

        let response = self
            .http
            .get(self.search_url())
            .basic_auth(&self.email, Some(&self.api_token))
            .query(&[
                ("jql", jql),
                ("maxResults", limit.to_string()),
                ("fields", REQUESTED_FIELDS.join(",")),
            ])
            .send()
            .await
            .inspect_err(|_| metrics.record_error())?;

        let status = response.status();
        if !status.is_success() {
            metrics.record_error();
            let message = response.text().await.unwrap_or_default();
            return Err(TrackerError::from_status(status.as_u16(), project_key, message));
        }

        let mut page: SearchResponse = response.json().await.map_err(|e| {
            metrics.record_error();
            TrackerError::Decode(e.to_string())
        })?;
        page.issues.truncate(limit as usize);

        debug!(
            returned = page.issues.len(),
            total = page.total,
            "Tracker search completed"
        );
        Ok(page.issues)
    }
}
