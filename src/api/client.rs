//! The JoinMatch REST client.

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use http::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::envelope::PageEnvelope;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use super::ApiError;
use crate::auth::{AuthContext, StaticSession};
use crate::config::Config;
use crate::error::{JoinMatchError, Result};
use crate::feed::{PageRequest, PageResult};

/// Client for the backend's JSON API.
///
/// Generic over the transport so tests can serve canned responses.
pub struct BackendClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    /// Base URL without a trailing slash
    base_url: String,
    auth: Arc<dyn AuthContext>,
}

impl BackendClient<ReqwestTransport> {
    /// Create a client from configuration, using a reqwest transport and a
    /// session built from the configured credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(
            transport,
            &config.api_url(),
            Arc::new(StaticSession::from_config(config)),
        )
    }
}

impl<T: HttpTransport> BackendClient<T> {
    pub fn with_transport(transport: T, base_url: &str, auth: Arc<dyn AuthContext>) -> Result<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(JoinMatchError::Config(format!(
                "'{base_url}' cannot be used as an API base URL"
            )));
        }

        Ok(Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &dyn AuthContext {
        self.auth.as_ref()
    }

    /// Build the absolute URL for `path` with `query` appended in order.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> std::result::Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&joined)
            .map_err(|e| ApiError::request(format!("invalid URL '{joined}': {e}")))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<R, ApiError> {
        let url = self.url(path, query)?;
        let response = self.execute(Method::GET, url).await?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// GET one page of a paginated endpoint.
    ///
    /// Sends `page` and `size` followed by every filter parameter, and maps
    /// the envelope's `last` flag onto [`PageResult::is_last_page`].
    pub async fn get_page<R: DeserializeOwned>(
        &self,
        path: &str,
        request: &PageRequest,
    ) -> std::result::Result<PageResult<R>, ApiError> {
        let page = request.page_index().to_string();
        let size = request.page_size().to_string();

        let mut query: Vec<(&str, &str)> = vec![("page", page.as_str()), ("size", size.as_str())];
        query.extend(request.filters().query_pairs());

        let envelope: PageEnvelope<R> = self.get_json(path, &query).await?;
        Ok(envelope.into_page_result())
    }

    /// Send a body-less request whose response content is not needed.
    pub async fn send_action(&self, method: Method, path: &str) -> std::result::Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.execute(method, url).await.map(|_| ())
    }

    async fn execute(&self, method: Method, url: Url) -> std::result::Result<HttpResponse, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.auth.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| {
                    ApiError::request("session token contains characters not allowed in a header")
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        debug!("{} {}", method, url);

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body: None,
            })
            .await?;

        if !response.status.is_success() {
            let err = ApiError::from_response(response.status, &response.body);
            debug!("request failed: {}", err);
            return Err(err);
        }

        Ok(response)
    }
}

impl<T: HttpTransport> fmt::Debug for BackendClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth.bearer_token().is_some())
            .finish()
    }
}
