//! Network seam between the paginator and the API.
//!
//! The paginator only needs "send one query, get one decoded body", so
//! that is the whole trait. The HTTP implementation carries the access
//! token in the `X-Check-Token` header; tests swap in a mock with canned
//! pages.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CheckError, Result};

/// One GraphQL round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a query and return the decoded response body.
    async fn execute(&self, query: &str) -> Result<Value>;
}

/// Standard GraphQL request body.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

/// Transport that POSTs to `<host>/api/graphql`.
///
/// No retries, no backoff, no timeout configuration: a single failure at
/// any page ends the whole fetch.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    /// Build a transport for an API host and access credential. Both are
    /// trimmed of surrounding whitespace.
    pub fn new(host: &str, key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/graphql", host.trim()),
            token: key.trim().to_string(),
        }
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, query: &str) -> Result<Value> {
        debug!(endpoint = %self.endpoint, "posting export query");
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Check-Token", &self.token)
            .json(&QueryBody { query })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "API answered with an error status");
            return Err(CheckError::Http {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_and_token_are_trimmed() {
        let transport = HttpTransport::new("  https://check.example.org ", " secret\n");
        assert_eq!(transport.endpoint, "https://check.example.org/api/graphql");
        assert_eq!(transport.token, "secret");
    }
}
