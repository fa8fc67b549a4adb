//! In-memory transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::TransportError;
use crate::host::{RawResponse, Transport};

/// Replays scripted outcomes and records what was sent. Never sleeps.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    outcomes: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<(String, Value)>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, &body.to_string());
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
            retry_after: None,
        }));
    }

    pub(crate) fn repeat_json(&self, status: u16, body: Value, times: usize) {
        for _ in 0..times {
            self.push_json(status, body.clone());
        }
    }

    pub(crate) fn push_error(&self, err: TransportError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub(crate) fn payloads(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<RawResponse, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".to_string())))
    }

    async fn sleep(&self, delay: Duration) {
        self.sleeps.lock().unwrap().push(delay);
    }
}
