use crate::error::{Error, NetworkError, Result};
use reqwest::Method;
use reqwest::header::{CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use super::builder::HttpClient;
use super::response::HttpResponse;

/// One logical HTTP request, replayable across attempts.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Target URL, query included
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request entity, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as JSON and sets it as the entity.
    ///
    /// `Content-Type: application/json` is added unless a content type is
    /// already set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if serialization fails.
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| Error::invalid_request(format!("JSON serialization failed: {e}")))?;
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        self.body = Some(bytes);
        Ok(self)
    }

    /// A request without an entity may be replayed after an I/O failure.
    pub fn is_idempotent(&self) -> bool {
        self.body.is_none()
    }
}

fn peer_closing(headers: &HeaderMap) -> bool {
    headers
        .get(CONNECTION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("close"))
}

impl HttpClient {
    /// Executes a request with pooling, retries and the optional call deadline.
    ///
    /// Any HTTP status is returned as a response; only transport, pool and
    /// deadline failures are errors.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] when the last attempt failed in transport
    /// - [`Error::Timeout`] when `call_timeout` elapsed
    /// - [`Error::ResourceExhausted`] / [`Error::Cancelled`] from the pool
    #[instrument(
        name = "http_execute",
        skip(self, request),
        fields(method = %request.method, path = %request.url.path(), idempotent = request.is_idempotent())
    )]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let Some(limit) = self.config().call_timeout else {
            return self.execute_with_retry(&request).await;
        };

        match tokio::time::timeout(limit, self.execute_with_retry(&request)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(
                    timeout_ms = %limit.as_millis(),
                    "HTTP call timed out (including retries)"
                );
                Err(Error::timeout(format!(
                    "Request to {} timed out after {}ms",
                    request.url.path(),
                    limit.as_millis()
                )))
            }
        }
    }

    #[instrument(
        name = "http_attempt",
        skip(self, request),
        fields(connection_id)
    )]
    pub(crate) async fn execute_once(
        &self,
        request: &HttpRequest,
        attempt: u32,
    ) -> Result<HttpResponse> {
        let lease = self.pool().lease(&request.url).await?;
        tracing::Span::current().record("connection_id", lease.id());

        let mut builder = lease
            .client()
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        if self.config().verbose {
            match &request.body {
                Some(body) => debug!(
                    body = %String::from_utf8_lossy(body),
                    "HTTP request with body"
                ),
                None => debug!("HTTP request without body"),
            }
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let network = NetworkError::from(e);
                lease.release(!network.poisons_connection());
                return Err(network.into());
            }
        };

        let reusable = !peer_closing(response.headers());
        match self.read_response(response).await {
            Ok(response) => {
                trace!(status = response.status().as_u16(), reusable, "Attempt completed");
                lease.release(reusable);
                Ok(response)
            }
            Err(e) => {
                lease.release(false);
                Err(e)
            }
        }
    }
}
