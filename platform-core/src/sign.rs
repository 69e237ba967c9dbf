//! Request and response signing.
//!
//! A signature is the lowercase hex MD5 of the canonical parameter string
//! (see [`crate::canonical`]) followed by the shared secret. Requests carry
//! it in the `sign` query parameter; responses carry it next to their body
//! so the caller can detect tampering.
//!
//! Arrays are wrapped under the key [`ARRAY_WRAP_KEY`] before being
//! canonicalized, and any other shape signs as if it were empty, so its
//! signature is the digest of the secret alone.
//!
//! # Example
//!
//! ```rust
//! use platform_core::sign::{create_sign, verify};
//! use platform_core::canonical::ParameterValue;
//! use serde_json::json;
//!
//! let params = ParameterValue::from(json!({"dataId": 12, "name": "X"}));
//! let sign = create_sign(&params, "secret");
//! assert_eq!(sign.as_str().len(), 32);
//! assert!(verify(&params, sign.as_str(), "secret"));
//! assert!(!verify(&params, sign.as_str(), "other"));
//! ```

use crate::canonical::{ParameterValue, canonicalize, canonicalize_entries};
use crate::credentials::SecretString;
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;

/// Synthetic key an array is wrapped under before signing.
pub const ARRAY_WRAP_KEY: &str = "array";

/// Lowercase hex MD5 digest, 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Returns the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the signature, returning the hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Signature {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Builds the canonical string for any parameter shape, secret excluded.
pub fn signing_payload(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Object(_) => canonicalize(value, "", &[]),
        ParameterValue::StringArray(_) => {
            let mut wrapped = BTreeMap::new();
            wrapped.insert(ARRAY_WRAP_KEY.to_string(), value.clone());
            canonicalize_entries(&wrapped, "", &[])
        }
        ParameterValue::Json(json) => signing_payload(&ParameterValue::from(json)),
        ParameterValue::Null | ParameterValue::Scalar(_) => String::new(),
    }
}

/// Creates the signature of `value` under `secret`.
pub fn create_sign(value: &ParameterValue, secret: &str) -> Signature {
    let mut hasher = Md5::new();
    hasher.update(signing_payload(value).as_bytes());
    hasher.update(secret.as_bytes());
    Signature(hex::encode(hasher.finalize()))
}

/// Recomputes the signature of `body` and compares it with `provided`.
///
/// The comparison runs in constant time over equal-length inputs.
pub fn verify(body: &ParameterValue, provided: &str, secret: &str) -> bool {
    let expected = create_sign(body, secret);
    expected.as_str().as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Signer bound to one shared secret.
///
/// ```rust
/// use platform_core::sign::Signer;
/// use serde_json::json;
///
/// let signer = Signer::new("secret");
/// let sign = signer.sign_json(&json!(["a", "b"]));
/// assert!(signer.verify_json(&json!(["a", "b"]), sign.as_str()));
/// assert_eq!(format!("{signer:?}"), "Signer { secret: [REDACTED] }");
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    secret: SecretString,
}

impl Signer {
    /// Creates a signer.
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signs a parameter value.
    pub fn sign(&self, value: &ParameterValue) -> Signature {
        create_sign(value, self.secret.expose_secret())
    }

    /// Verifies a parameter value against a provided signature.
    pub fn verify(&self, body: &ParameterValue, provided: &str) -> bool {
        verify(body, provided, self.secret.expose_secret())
    }

    /// Signs a JSON value.
    pub fn sign_json(&self, value: &Value) -> Signature {
        self.sign(&ParameterValue::from(value))
    }

    /// Verifies a JSON value against a provided signature.
    pub fn verify_json(&self, body: &Value, provided: &str) -> bool {
        self.verify(&ParameterValue::from(body), provided)
    }
}
