//! Sign, call and verify in one step.

use crate::config::{Credentials, GatewayConfig};
use crate::invoker::HttpInvoker;
use crate::response::GatewayResponse;
use platform_core::error::{Error, Result};
use platform_core::sign::Signer;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Gateway client bound to one application's credentials.
///
/// # Example
///
/// ```rust,no_run
/// use platform_gateway::{Credentials, GatewayClient, GatewayConfig};
/// use serde_json::json;
///
/// # async fn example() -> platform_core::Result<()> {
/// let client = GatewayClient::new(
///     GatewayConfig::default(),
///     Credentials::new(7811589334259271, "EAUJ6CIKPBMCNW36"),
/// )?;
///
/// let params = json!({
///     "appId": 7811589334259271_i64,
///     "dataId": 12,
///     "timestamp": "20200601162222",
///     "dbCode": "hgjd",
/// });
/// if let Some(body) = client.invoke(12, "20200601162222", &params).await? {
///     println!("{body}");
/// }
/// client.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayClient {
    invoker: HttpInvoker,
    app_id: i64,
    signer: Signer,
}

impl GatewayClient {
    /// Creates the client and its invoker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: GatewayConfig, credentials: Credentials) -> Result<Self> {
        let invoker = HttpInvoker::new(config)?;
        Ok(Self {
            invoker,
            app_id: credentials.app_id,
            signer: Signer::new(credentials.secret),
        })
    }

    /// Reads configuration and credentials from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env(), Credentials::from_env()?)
    }

    /// Application id sent with every call.
    pub fn app_id(&self) -> i64 {
        self.app_id
    }

    /// Underlying invoker.
    pub fn invoker(&self) -> &HttpInvoker {
        &self.invoker
    }

    /// Signs `params`, calls dataset `data_id` and returns the verified
    /// response body.
    ///
    /// `Ok(None)` means the gateway answered with a status other than 200.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if the response signature does not verify
    /// - [`Error::Parse`] if the response is not a signed envelope
    /// - any error of [`HttpInvoker::call`]
    #[instrument(name = "gateway_invoke", skip(self, params), fields(app_id = self.app_id))]
    pub async fn invoke(&self, data_id: i64, version: &str, params: &Value) -> Result<Option<Value>> {
        let sign = self.signer.sign_json(params);

        let Some(response) = self
            .invoker
            .call(self.app_id, data_id, version, sign.as_str(), params)
            .await?
        else {
            return Ok(None);
        };

        let envelope = GatewayResponse::from_http(&response)?;
        if !self.signer.verify_json(&envelope.body, &envelope.sign) {
            warn!(data_id, "Response signature mismatch");
            return Err(Error::authentication(format!(
                "response signature mismatch for dataset {data_id}"
            )));
        }

        debug!(data_id, "Response signature verified");
        Ok(Some(envelope.body))
    }

    /// Stops the evictor and closes the pool.
    pub async fn shutdown(&self) {
        self.invoker.shutdown().await;
    }
}
