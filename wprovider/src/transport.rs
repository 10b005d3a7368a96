//! HTTP transport seam and the reqwest-based implementation.
//!
//! Drivers build an [`HttpRequest`] and hand it to an [`HttpTransport`]; tests
//! substitute scripted transports that replay raw byte chunks.
//!
//! ```rust
//! use wprovider::HttpRequest;
//!
//! let request = HttpRequest::new("https://api.openai.com/v1/chat/completions", serde_json::json!({}))
//!     .with_bearer("sk-secret");
//! assert!(!format!("{request:?}").contains("sk-secret"));
//! assert_eq!(request.header("authorization"), Some("Bearer sk-secret"));
//! ```

use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::time::Duration;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::{ProviderError, ProviderFuture};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

const SENSITIVE_HEADERS: [&str; 2] = ["authorization", "x-api-key"];

pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ProviderError>> + Send + 'a>>;

#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("authorization", format!("Bearer {token}"))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Debug for HttpRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                let shown = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                    "[REDACTED]"
                } else {
                    value.as_str()
                };
                (name.as_str(), shown)
            })
            .collect::<Vec<_>>();

        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Network seam used by every driver.
///
/// Implementations return `Upstream` errors for non-success statuses, so a
/// returned body or stream always belongs to a 2xx response.
pub trait HttpTransport: Send + Sync + Debug {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    fn post_stream<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Bounds connecting and every individual read by `timeout`. A stream
    /// that keeps delivering records is never cut off, only a stalled one.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|err| ProviderError::configuration(err.to_string()))?;
        Ok(Self::new(client))
    }

    fn build(&self, request: &HttpRequest) -> RequestBuilder {
        request
            .headers
            .iter()
            .fold(self.client.post(&request.url), |builder, (name, value)| {
                builder.header(name.as_str(), value.as_str())
            })
            .json(&request.body)
    }

    async fn send(&self, request: HttpRequest) -> Result<Response, ProviderError> {
        tracing::debug!(url = %request.url, "dispatching provider request");

        let response = self.build(&request).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::upstream(status.as_u16(), body))
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let response = self.send(request).await?;
            response.text().await.map_err(map_reqwest_error)
        })
    }

    fn post_stream<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
        Box::pin(async move {
            let response = self.send(request).await?;
            let bytes = response.bytes_stream().map(|item| {
                item.map(|bytes| bytes.to_vec())
                    .map_err(map_reqwest_error)
            });

            Ok(Box::pin(bytes) as ByteStream<'a>)
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}
