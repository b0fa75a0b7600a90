//! Task endpoint client.
//!
//! [`TaskClient`] is the seam between the submission controller and the
//! network. [`HttpTaskClient`] is the real implementation: one JSON `POST`
//! per request, no retries, bounded by the configured timeout.

use crate::config::ClientConfig;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::debug;

/// Body sent to the task endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// The trimmed user text.
    pub task: String,
    /// Auxiliary context; always an empty object for now.
    pub context: Value,
}

impl TaskRequest {
    /// Create a request with an empty context object.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            context: Value::Object(Map::new()),
        }
    }
}

/// Something that can deliver a [`TaskRequest`] and return the parsed body.
pub trait TaskClient: Send + Sync {
    /// Issue exactly one request. Implementations must not retry.
    fn submit_task(
        &self,
        request: &TaskRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// HTTP implementation of [`TaskClient`].
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    http: Client,
    endpoint: String,
}

impl HttpTaskClient {
    /// Build a client from configuration.
    ///
    /// The configuration is expected to be validated by the caller.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if let Some(agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(agent);
        } else {
            builder = builder.user_agent(concat!("buildchat/", env!("CARGO_PKG_VERSION")));
        }
        let http = builder.build().map_err(TransportError::from)?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the outbound request without sending it.
    pub fn build_request(&self, request: &TaskRequest) -> reqwest::RequestBuilder {
        self.http
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(request)
    }
}

impl TaskClient for HttpTaskClient {
    async fn submit_task(&self, request: &TaskRequest) -> Result<Value, TransportError> {
        debug!(endpoint = %self.endpoint, "posting task request");

        let response = self.build_request(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }
}

/// Everything that can go wrong between issuing a request and having a
/// parsed response body.
///
/// The UI collapses all variants into one generic notice; the detail is
/// kept for logs.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS, or protocol failure.
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("Server error: {0}")]
    Status(StatusCode),

    /// The response body was not valid JSON.
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}
