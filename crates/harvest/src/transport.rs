//! Remote transport.
//!
//! The harvester only sees the [`Transport`] trait, so tests and callers that
//! need cancellation can inject their own implementation. [`HttpTransport`]
//! is the `reqwest` implementation used by the binary.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// HTTP method of a remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Key-value-pair request in the URL.
    Get,
    /// XML request in the body.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request to a remote catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    /// Method.
    pub method: Method,
    /// Full target URL.
    pub url: String,
    /// XML body for POST requests.
    pub body: Option<String>,
}

impl RemoteRequest {
    /// A GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// A POST request with an XML body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }
}

/// A successful answer. Non-success statuses are [`TransportError::Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

/// Sends requests to remote catalogues.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the body of a successful answer.
    async fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("geocat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn map_error(url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self
                .client
                .post(&request.url)
                .header(reqwest::header::CONTENT_TYPE, "application/xml")
                .body(request.body.clone().unwrap_or_default()),
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending remote request");
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&request.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::map_error(&request.url, e))?;
        Ok(RemoteResponse {
            status: status.as_u16(),
            body,
        })
    }
}
