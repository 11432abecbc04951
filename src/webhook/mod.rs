//! Webhook ingestion buffer.
//!
//! Inbound payloads are appended to an in-memory list and an "update pending"
//! flag is raised. Nothing in the poll loop consumes the flag yet; consumers
//! can call [`WebhookBuffer::take_pending`] or wait on
//! [`WebhookBuffer::wait_for_update`].

pub mod server;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, info};

pub use server::{router, serve, WebhookState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("webhook payload is empty")]
    EmptyPayload,
}

/// Response body for every webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: "failed".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct WebhookBuffer {
    payloads: Mutex<Vec<Value>>,
    pending: AtomicBool,
    notify: Notify,
}

impl WebhookBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload and raise the pending flag. Absent, `null` and
    /// empty string/array/object payloads are rejected without touching
    /// the buffer.
    pub fn ingest(&self, payload: Option<Value>) -> Result<Ack, WebhookError> {
        let payload = match payload {
            Some(value) if !is_empty_payload(&value) => value,
            _ => {
                debug!("Rejected empty webhook payload");
                return Err(WebhookError::EmptyPayload);
            }
        };

        let buffered = {
            let mut payloads = self.payloads.lock().unwrap_or_else(PoisonError::into_inner);
            payloads.push(payload);
            // Raised while the lock is held so a reader never sees the flag
            // without the payload.
            self.pending.store(true, Ordering::SeqCst);
            payloads.len()
        };
        self.notify.notify_waiters();

        info!(buffered, "Webhook payload buffered");
        Ok(Ack::success())
    }

    pub fn is_update_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Read and clear the pending flag.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Resolve once the next payload arrives, or immediately if one is
    /// already pending.
    pub async fn wait_for_update(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_update_pending() {
            return;
        }
        notified.await;
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_ingest_appends_and_raises_flag() {
        let buffer = WebhookBuffer::new();
        assert!(!buffer.is_update_pending());

        let ack = buffer.ingest(Some(json!({"issue": {"key": "SCRUM-1"}}))).unwrap();

        assert_eq!(ack, Ack::success());
        assert_eq!(buffer.len(), 1);
        assert!(buffer.is_update_pending());
        assert!(buffer.take_pending());
        assert!(!buffer.take_pending());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_empty_payloads_are_rejected_without_state_change() {
        let buffer = WebhookBuffer::new();
        for payload in [None, Some(Value::Null), Some(json!("")), Some(json!([])), Some(json!({}))] {
            assert_eq!(buffer.ingest(payload), Err(WebhookError::EmptyPayload));
        }
        assert!(buffer.is_empty());
        assert!(!buffer.is_update_pending());
    }

    #[test]
    fn test_falsy_scalars_are_rejected() {
        let buffer = WebhookBuffer::new();
        for value in [json!(false), json!(0), json!(0.0)] {
            assert!(matches!(
                buffer.ingest(Some(value)),
                Err(WebhookError::EmptyPayload)
            ));
        }
        assert!(buffer.is_empty());
        assert!(!buffer.is_update_pending());

        buffer.ingest(Some(json!(true))).unwrap();
        buffer.ingest(Some(json!(1))).unwrap();
        assert_eq!(buffer.payloads(), vec![json!(true), json!(1)]);
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        const WRITERS: usize = 16;
        let buffer = Arc::new(WebhookBuffer::new());

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let buffer = buffer.clone();
                std::thread::spawn(move || buffer.ingest(Some(json!({"writer": i}))).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(buffer.len(), WRITERS);
        let mut seen: Vec<u64> = buffer
            .payloads()
            .iter()
            .map(|p| p["writer"].as_u64().unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..WRITERS as u64).collect::<Vec<_>>());
        assert!(buffer.take_pending());
        assert!(!buffer.take_pending());
    }

    #[tokio::test]
    async fn test_wait_for_update_wakes_on_ingest() {
        let buffer = Arc::new(WebhookBuffer::new());
        let waiter = {
            let buffer = buffer.clone();
            tokio::spawn(async move { buffer.wait_for_update().await })
        };
        tokio::task::yield_now().await;

        buffer.ingest(Some(json!({"event": "issue_updated"}))).unwrap();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
