//! Platform SDK Core Library
//!
//! Building blocks for calling the data gateway: deterministic parameter
//! canonicalization, MD5 request/response signing, a bounded connection
//! pool with a background idle evictor, a failure-kind retry policy, and a
//! pooled HTTP client composing them.
//!
//! # Features
//!
//! - **Deterministic signing**: one sorted serialization path, independent of key order
//! - **Bounded pooling**: global and per-route connection caps with lease timeouts
//! - **Async/Await**: built on tokio; the evictor is a cancellable task
//! - **Error Handling**: comprehensive error types with `thiserror`
//!
//! # Example
//!
//! ```rust
//! use platform_core::prelude::*;
//! use serde_json::json;
//!
//! let params = ParameterValue::from(json!({"dataId": 12, "dbCode": "hgjd"}));
//! let sign = create_sign(&params, "secret");
//! assert!(verify(&params, sign.as_str(), "secret"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// =============================================================================
// Global Clippy Lint Suppressions
// =============================================================================
// - module_name_repetitions: Common pattern in Rust libraries (e.g., PoolConfig in pool module)
// - missing_errors_doc: Too verbose to document every Result-returning function
// - missing_panics_doc: Too verbose to document every potential panic
// - must_use_candidate: Not all return values need #[must_use]
// - doc_markdown: Technical terms in docs don't need backticks (e.g., MD5, UTF-8)
// - cast_possible_truncation: Millisecond conversions of short durations
// - return_self_not_must_use: Builder pattern methods return Self without must_use
// - unreadable_literal: Ids such as 7811589334259271 are copied verbatim from the gateway
// =============================================================================
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// Re-exports of external dependencies
pub use serde;
pub use serde_json;
pub use url;

// Core modules
pub mod canonical;
pub mod credentials;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod pool;
pub mod retry_strategy;
pub mod sign;

// Re-exports of core types for convenience
pub use canonical::{ParameterValue, canonicalize};
pub use credentials::SecretString;
pub use error::{ContextExt, Error, NetworkError, ParseError, Result};
pub use http_client::{HttpClient, HttpConfig, HttpRequest, HttpResponse};
pub use pool::{ConnectionLease, ConnectionPool, IdleEvictor, PoolConfig, PoolStats, Route};
pub use retry_strategy::{FailureKind, RetryConfig, RetryStrategy};
pub use sign::{Signature, Signer, create_sign, verify};
// Re-export CancellationToken for convenient access
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use platform_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canonical::{ParameterValue, canonicalize};
    pub use crate::credentials::SecretString;
    pub use crate::error::{ContextExt, Error, Result};
    pub use crate::http_client::{HttpClient, HttpConfig, HttpRequest, HttpResponse};
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::pool::{ConnectionPool, IdleEvictor, PoolConfig, PoolStats};
    pub use crate::retry_strategy::{FailureKind, RetryConfig, RetryStrategy};
    pub use crate::sign::{Signature, Signer, create_sign, verify};
    pub use serde::{Deserialize, Serialize};
    pub use tokio_util::sync::CancellationToken;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
