//! # Platform SDK
//!
//! Client SDK for the DRCnet data gateway: deterministic MD5 request
//! signing, a bounded connection pool with background idle eviction, a
//! failure-kind retry policy, and the signed dataset invoker.
//!
//! ## Features
//!
//! - **Deterministic signing**: key-order independent canonical strings
//! - **Bounded pooling**: 100 connections overall, 20 per route by default
//! - **Async/Await**: built on tokio; every background task is cancellable
//! - **Verified responses**: response envelopes are checked before use
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_sdk::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     init_logging(&LogConfig::development());
//!
//!     let client = GatewayClient::new(
//!         GatewayConfig::default(),
//!         Credentials::new(7811589334259271, "EAUJ6CIKPBMCNW36"),
//!     )?;
//!     let body = client.invoke(12, "20200601162222", &json!({"dataId": 12})).await?;
//!     println!("{body:?}");
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Re-export core types
pub use platform_core::{
    canonical::{ParameterValue, canonicalize},
    error::{Error, Result},
    sign::{Signature, Signer, create_sign, verify},
};

// Re-export gateway implementation
pub use platform_gateway::{Credentials, GatewayClient, GatewayConfig, GatewayResponse, HttpInvoker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use platform_core::prelude::*;
    pub use platform_gateway::{
        Credentials, GatewayClient, GatewayConfig, GatewayResponse, HttpInvoker,
    };
}
