//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::Result;

use super::{Headers, HttpResponse, Transport};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport using a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with the default timeout.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a new transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<HttpResponse> {
        debug!("{} {} (timeout {:?})", method, uri, self.timeout);

        let mut request = self.client.request(method, uri).timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Received status {} with {} bytes", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, uri: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(Method::GET, uri, None, headers).await
    }

    async fn post(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(Method::POST, uri, Some(body), headers).await
    }

    async fn put(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(Method::PUT, uri, Some(body), headers).await
    }

    async fn patch(&self, uri: &str, body: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(Method::PATCH, uri, Some(body), headers).await
    }

    async fn delete(&self, uri: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(Method::DELETE, uri, None, headers).await
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
