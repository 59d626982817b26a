//! HTTP transport abstraction for pluggable backends.

use std::future::Future;
use std::time::Duration;

use http::{HeaderMap, Method, StatusCode};
use url::Url;

use super::ApiError;
use crate::error::Result;

/// An HTTP request to be sent by an [`HttpTransport`] implementation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// The fully-qualified URL, query string included.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response returned by an [`HttpTransport`] implementation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for pluggable HTTP client backends.
///
/// Only transport failures are errors here. A non-2xx response is still an
/// `Ok(HttpResponse)`; status handling belongs to the caller.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, ApiError>> + Send;
}

/// An [`HttpTransport`] backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network("request timed out")
    } else if err.is_connect() {
        ApiError::network(format!("could not connect: {err}"))
    } else if err.is_builder() {
        ApiError::request(err.to_string())
    } else {
        ApiError::network(err.to_string())
    }
}
