//! Webhook receiver over real HTTP
//!
//! Each test binds an ephemeral port on localhost and talks to the router
//! with reqwest.

use serde_json::{json, Value};
use sprint_health::metrics::MetricsAggregator;
use sprint_health::presentation::{DashboardSnapshot, PresentationSink};
use sprint_health::shutdown::ShutdownCoordinator;
use sprint_health::webhook::{self, WebhookBuffer, WebhookState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct TestReceiver {
    url: String,
    buffer: Arc<WebhookBuffer>,
    dashboard: Arc<DashboardSnapshot>,
    coordinator: Arc<ShutdownCoordinator>,
    task: JoinHandle<std::io::Result<()>>,
}

impl TestReceiver {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let buffer = Arc::new(WebhookBuffer::new());
        let dashboard = Arc::new(DashboardSnapshot::new());
        let coordinator = Arc::new(ShutdownCoordinator::new());

        let state = WebhookState {
            buffer: buffer.clone(),
            dashboard: dashboard.clone(),
        };
        let task = tokio::spawn(webhook::serve(listener, state, coordinator.subscribe()));

        Self {
            url,
            buffer,
            dashboard,
            coordinator,
            task,
        }
    }

    async fn post(&self, body: &'static str) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/webhook", self.url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_non_empty_payload_is_acknowledged_and_buffered() {
    let receiver = TestReceiver::start().await;

    let (status, ack) = receiver
        .post(r#"{"webhookEvent": "jira:issue_updated", "issue": {"key": "SCRUM-7"}}"#)
        .await;

    assert_eq!(status, 200);
    assert_eq!(ack, json!({"status": "success"}));
    assert_eq!(receiver.buffer.len(), 1);
    assert!(receiver.buffer.is_update_pending());
    assert_eq!(receiver.buffer.payloads()[0]["issue"]["key"], "SCRUM-7");
}

#[tokio::test]
async fn test_empty_payloads_are_rejected() {
    let receiver = TestReceiver::start().await;

    for body in ["", "   ", "null", "{}", "[]", "\"\"", "0", "false", "not json"] {
        let (status, ack) = receiver.post(body).await;
        assert_eq!(status, 400, "body {body:?}");
        assert_eq!(ack, json!({"status": "failed"}));
    }

    assert!(receiver.buffer.is_empty());
    assert!(!receiver.buffer.is_update_pending());
}

#[tokio::test]
async fn test_dashboard_reports_snapshot_and_pending_flag() {
    let receiver = TestReceiver::start().await;
    receiver
        .dashboard
        .publish(&MetricsAggregator::default().aggregate(&[]), &[]);
    receiver.post(r#"{"event": "sprint_started"}"#).await;

    let body: Value = reqwest::get(format!("{}/dashboard", receiver.url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["update_pending"], true);
    assert_eq!(body["buffered_payloads"], 1);
    assert_eq!(body["metrics"]["board_quality_pct"], 100.0);
    assert_eq!(body["publishes"], 1);
    assert_eq!(body["gauges"][0]["label"], "Engagement (%)");
    assert_eq!(body["gauges"][0]["severity"], "warning");
    assert_eq!(body["gauges"][2]["color"], "#4CAF50");
}

#[tokio::test]
async fn test_receiver_stops_on_shutdown() {
    let receiver = TestReceiver::start().await;
    receiver.coordinator.trigger();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), receiver.task)
        .await
        .expect("server should stop")
        .unwrap();
    assert!(result.is_ok());
}
