//! Test doubles for exercising the paginator without a network.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{CheckError, Result};
use crate::transport::Transport;

/// A transport that replays canned response bodies in order and records
/// every query it was given, for assertions on cursors and page counts.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Value>>,
    queries: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body to hand out on the next call.
    pub fn with_response(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(body);
        self
    }

    /// Every query executed so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, query: &str) -> Result<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CheckError::Shape("mock transport ran out of responses".to_string()))
    }
}
