use crate::error::{Error, NetworkError, ParseError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use tracing::{debug, warn};

use super::builder::HttpClient;

const BODY_PREVIEW_SIZE: usize = 200;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw entity bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response, returning the entity bytes.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Entity as text, invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes the entity from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the entity is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::from(ParseError::Json(e)))
    }
}

impl HttpClient {
    pub(crate) async fn read_response(&self, mut response: Response) -> Result<HttpResponse> {
        let status = response.status();
        let headers = response.headers().clone();
        let max_size = self.config().max_response_size;

        if let Some(content_length) = response.content_length()
            && content_length > max_size as u64
        {
            warn!(
                content_length = content_length,
                max_size = max_size,
                "Response exceeds size limit (Content-Length check)"
            );
            return Err(Error::invalid_request(format!(
                "Response size {content_length} bytes exceeds limit {max_size} bytes"
            )));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::from(NetworkError::from_body_read(&e)))?
        {
            if body.len().saturating_add(chunk.len()) > max_size {
                warn!(max_size = max_size, "Response exceeds size limit during streaming");
                return Err(Error::invalid_request(format!(
                    "Response size exceeds limit {max_size} bytes (streaming)"
                )));
            }
            body.extend_from_slice(&chunk);
        }

        if self.config().verbose {
            let end = body.len().min(BODY_PREVIEW_SIZE);
            debug!(
                status = %status,
                body_length = body.len(),
                body_preview = %String::from_utf8_lossy(&body[..end]),
                "HTTP response received"
            );
        }

        Ok(HttpResponse::new(status, headers, body))
    }
}
