//! HTTP transport
//!
//! [`PodClient`](crate::PodClient) talks to pods through the
//! [`HttpTransport`] trait. Two implementations are provided:
//!
//! - [`ReqwestTransport`] for real servers, with timeout, cross-origin
//!   proxy template and bearer credentials
//! - [`MemoryPod`], an in-process pod for tests and demos

mod http;
mod memory;

pub use http::ReqwestTransport;
pub use memory::MemoryPod;

use async_trait::async_trait;
use reqwest::header::{AsHeaderName, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Transport failures (no HTTP response was obtained)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// A request to a pod
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    /// Send the user's credentials along
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            with_credentials: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::POST, url).body(body)
    }

    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::PUT, url).body(body)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header whose value is built at runtime
    pub fn try_header(self, name: HeaderName, value: &str) -> TransportResult<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::InvalidRequest(format!("{name}: {e}")))?;
        Ok(self.header(name, value))
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }
}

/// A pod's answer, whatever its status
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// A header value, if present and valid text
    pub fn header(&self, name: impl AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Something that can carry HTTP requests to a pod
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
}
