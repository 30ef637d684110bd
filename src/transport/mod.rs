//! HTTP transport abstraction.
//!
//! The session only ever calls [`Transport::post`] and awaits the result.
//! Timeouts, TLS and connection reuse belong to the implementation.

mod http;

pub use http::ReqwestTransport;

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Request headers as name/value pairs, sent in order.
pub type Headers = Vec<(String, String)>;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait — swappable HTTP client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str, headers: &Headers) -> Result<HttpResponse>;

    async fn post(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse>;

    async fn put(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse>;

    async fn patch(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse>;

    async fn delete(&self, uri: &str, headers: &Headers) -> Result<HttpResponse>;

    /// Per-request timeout applied by the implementation.
    fn timeout(&self) -> Duration;

    fn set_timeout(&mut self, timeout: Duration);
}

/// One request seen by [`StubTransport`].
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub body: String,
    pub headers: Headers,
}

/// Scripted transport for testing.
#[cfg(test)]
pub struct StubTransport {
    responses: std::sync::Mutex<std::collections::VecDeque<HttpResponse>>,
    requests: std::sync::Arc<std::sync::Mutex<Vec<RecordedRequest>>>,
    timeout: Duration,
}

#[cfg(test)]
impl StubTransport {
    /// Create with responses returned in order, one per request.
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            requests: Default::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create returning 200 with each body in order.
    pub fn with_bodies(bodies: Vec<String>) -> Self {
        Self::new(bodies.into_iter().map(|b| HttpResponse::new(200, b)).collect())
    }

    /// Shared handle to the request log; stays valid after the stub is boxed.
    pub fn requests(&self) -> std::sync::Arc<std::sync::Mutex<Vec<RecordedRequest>>> {
        self.requests.clone()
    }

    fn respond(
        &self,
        method: &'static str,
        uri: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            uri: uri.to_string(),
            body: body.to_string(),
            headers: headers.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| crate::error::Error::Other("No more stub responses".to_string()))
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, uri: &str, headers: &Headers) -> Result<HttpResponse> {
        self.respond("GET", uri, "", headers)
    }

    async fn post(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.respond("POST", uri, body, headers)
    }

    async fn put(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.respond("PUT", uri, body, headers)
    }

    async fn patch(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.respond("PATCH", uri, body, headers)
    }

    async fn delete(&self, uri: &str, headers: &Headers) -> Result<HttpResponse> {
        self.respond("DELETE", uri, "", headers)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
