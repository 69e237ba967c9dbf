//! Signed dataset invocation over the pooled HTTP client.
//!
//! [`HttpInvoker`] owns the HTTP client, its connection pool and the idle
//! evictor sweeping that pool. It does not sign; the caller passes a
//! signature computed with [`platform_core::sign`].

use crate::config::GatewayConfig;
use crate::constants::{JSON_CONTENT_TYPE, query};
use platform_core::error::Result;
use platform_core::http_client::{HttpClient, HttpRequest, HttpResponse};
use platform_core::pool::{IdleEvictor, PoolStats};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

const ERROR_BODY_PREVIEW: usize = 200;

/// Executes gateway calls.
///
/// Must be created inside a tokio runtime, since it spawns the evictor.
/// Clones are not provided; share it behind an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use platform_gateway::{GatewayConfig, HttpInvoker};
/// use platform_core::sign::create_sign;
/// use platform_core::canonical::ParameterValue;
/// use serde_json::json;
///
/// # async fn example() -> platform_core::Result<()> {
/// let invoker = HttpInvoker::new(GatewayConfig::default())?;
/// let body = json!({"appId": 7811589334259271_i64, "dataId": 12, "dbCode": "hgjd"});
/// let sign = create_sign(&ParameterValue::from(&body), "secret");
///
/// if let Some(response) = invoker.call(7811589334259271, 12, "1.0", sign.as_str(), &body).await? {
///     println!("{}", response.text());
/// }
/// invoker.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpInvoker {
    client: HttpClient,
    endpoint: Url,
    evictor: IdleEvictor,
}

impl HttpInvoker {
    /// Builds the client and starts the idle evictor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](platform_core::Error::Config) for a
    /// malformed base URL or invalid pool/retry limits.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let validation = config.validate()?;
        for warning in &validation.warnings {
            warn!(warning = %warning, "Gateway configuration warning");
        }

        let endpoint = config.endpoint()?;
        let client = HttpClient::new(config.http)?;
        let evictor = IdleEvictor::start(client.pool().clone(), config.eviction_interval);

        info!(
            endpoint = %endpoint,
            eviction_interval_ms = %config.eviction_interval.as_millis(),
            "Gateway invoker started"
        );

        Ok(Self {
            client,
            endpoint,
            evictor,
        })
    }

    /// Base URL the query is appended to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.client.pool().stats()
    }

    /// Builds the request URI: `appId`, `dataId`, `version`, `sign`, in
    /// that order.
    pub fn request_url(&self, app_id: i64, data_id: i64, version: &str, sign: &str) -> Url {
        let params: Vec<(&str, String)> = vec![
            (query::APP_ID, app_id.to_string()),
            (query::DATA_ID, data_id.to_string()),
            (query::VERSION, version.to_string()),
            (query::SIGN, sign.to_string()),
        ];

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(&params);
        url
    }

    /// POSTs `body` as JSON to the dataset endpoint.
    ///
    /// Returns `Ok(Some(response))` for HTTP 200 and `Ok(None)` for any other
    /// status.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`](platform_core::Error::Network) when every allowed
    ///   attempt failed in transport
    /// - [`Error::Timeout`](platform_core::Error::Timeout) when the configured
    ///   call deadline elapsed
    /// - [`Error::ResourceExhausted`](platform_core::Error::ResourceExhausted)
    ///   / [`Error::Cancelled`](platform_core::Error::Cancelled) from the pool
    #[instrument(name = "gateway_call", skip(self, sign, body))]
    pub async fn call(
        &self,
        app_id: i64,
        data_id: i64,
        version: &str,
        sign: &str,
        body: &Value,
    ) -> Result<Option<HttpResponse>> {
        let request = HttpRequest::post(self.request_url(app_id, data_id, version, sign))
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .json_body(body)?;

        let response = self.client.execute(request).await?;
        if response.status() == StatusCode::OK {
            debug!(body_length = response.body().len(), "Gateway call succeeded");
            return Ok(Some(response));
        }

        let text = response.text();
        let end = text
            .char_indices()
            .nth(ERROR_BODY_PREVIEW)
            .map_or(text.len(), |(i, _)| i);
        warn!(
            status = response.status().as_u16(),
            body_preview = %&text[..end],
            "Gateway returned non-200 status"
        );
        Ok(None)
    }

    /// Stops the evictor and closes the pool.
    ///
    /// In-flight calls finish; later calls fail with `Error::Cancelled`.
    pub async fn shutdown(&self) {
        self.evictor.shutdown().await;
        self.client.shutdown();
        info!("Gateway invoker shut down");
    }
}
