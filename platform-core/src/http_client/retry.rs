use crate::error::Result;
use tracing::{debug, error, warn};

use super::builder::HttpClient;
use super::request::HttpRequest;
use super::response::HttpResponse;

impl HttpClient {
    pub(crate) async fn execute_with_retry(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let idempotent = request.is_idempotent();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.execute_once(request, attempt).await {
                Ok(response) => {
                    debug!(
                        attempt,
                        status = response.status().as_u16(),
                        "Request completed"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    let failure_kind = e.failure_kind();
                    if self
                        .retry_strategy()
                        .should_retry_error(&e, attempt, idempotent)
                    {
                        let delay = self.retry_strategy().delay();
                        warn!(
                            attempt,
                            failure_kind = ?failure_kind,
                            delay_ms = %delay.as_millis(),
                            error = %e,
                            "Request failed, retrying"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    } else {
                        error!(
                            attempt,
                            failure_kind = ?failure_kind,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }
    }
}
