//! Pooled, retrying HTTP client
//!
//! Every request goes through the same loop:
//!
//! ```text
//! lease connection -> send -> classify failure -> release -> retry?
//! ```
//!
//! Connections come from a bounded [`ConnectionPool`](crate::pool::ConnectionPool).
//! Failed attempts are classified into a
//! [`FailureKind`](crate::retry_strategy::FailureKind) and handed to the
//! [`RetryStrategy`](crate::retry_strategy::RetryStrategy). HTTP status codes
//! are never errors at this layer; judging them is up to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use platform_core::http_client::{HttpClient, HttpConfig, HttpRequest};
//! use url::Url;
//!
//! # async fn example() -> platform_core::error::Result<()> {
//! let client = HttpClient::new(HttpConfig::default())?;
//!
//! let url = Url::parse("http://open.example.com/api")?;
//! let request = HttpRequest::post(url).json_body(&serde_json::json!({"dataId": 12}))?;
//! let response = client.execute(request).await?;
//! println!("{} {}", response.status(), response.text());
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod request;
mod response;
mod retry;

#[cfg(test)]
mod tests;

pub use builder::HttpClient;
pub use config::HttpConfig;
pub use request::HttpRequest;
pub use response::HttpResponse;
