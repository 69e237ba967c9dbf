//! Data-gateway wire constants.
//!
//! Query parameter names, header values and environment keys shared by the
//! invoker, the client and their tests.

/// Gateway endpoints
pub mod endpoints {
    /// Dataset invocation endpoint of the production gateway
    pub const DATASET_INVOKING: &str =
        "http://open.drcdaas.com/gateway/transfer/datasetInvoking/api";
}

/// Query parameter names, in the order they are appended to the URI
pub mod query {
    /// Application id
    pub const APP_ID: &str = "appId";
    /// Dataset id
    pub const DATA_ID: &str = "dataId";
    /// Dataset API version
    pub const VERSION: &str = "version";
    /// Request signature
    pub const SIGN: &str = "sign";
}

/// Response envelope fields
pub mod envelope {
    /// Signed payload
    pub const BODY: &str = "body";
    /// Signature of the payload
    pub const SIGN: &str = "sign";
}

/// Environment variables read by `from_env` constructors
pub mod env {
    /// Overrides the gateway base URL
    pub const GATEWAY_URL: &str = "PLATFORM_GATEWAY_URL";
    /// Application id issued by the platform
    pub const APP_ID: &str = "PLATFORM_APP_ID";
    /// Shared signing secret
    pub const SECRET_KEY: &str = "PLATFORM_SECRET_KEY";
}

/// Content type of every gateway request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
