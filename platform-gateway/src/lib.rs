//! Data-Gateway Invocation
//!
//! Gateway-specific pieces built on `platform-core`: endpoint configuration,
//! the [`HttpInvoker`] that POSTs signed dataset requests, the signed
//! [`GatewayResponse`] envelope, and the [`GatewayClient`] facade that signs,
//! calls and verifies in one step.
//!
//! # Example
//!
//! ```rust,no_run
//! use platform_gateway::{Credentials, GatewayClient, GatewayConfig};
//! use serde_json::json;
//!
//! # async fn example() -> platform_core::Result<()> {
//! let client = GatewayClient::new(GatewayConfig::default(), Credentials::new(1, "secret"))?;
//! let body = client.invoke(12, "1.0", &json!({"dataId": 12})).await?;
//! println!("{body:?}");
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow common patterns that are acceptable in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::return_self_not_must_use)]

pub mod client;
pub mod config;
pub mod constants;
pub mod invoker;
pub mod response;

pub use client::GatewayClient;
pub use config::{Credentials, GatewayConfig};
pub use invoker::HttpInvoker;
pub use response::GatewayResponse;
