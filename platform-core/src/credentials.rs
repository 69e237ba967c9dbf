//! Secure credential types with automatic memory zeroization.
//!
//! The gateway's shared secret lives in a [`SecretString`]. Its memory is
//! overwritten with zeros when dropped, and its `Debug`/`Display` output is
//! redacted so it can sit inside configuration structs that get logged.
//!
//! # Example
//!
//! ```rust
//! use platform_core::credentials::SecretString;
//!
//! let secret = SecretString::new("EAUJ6CIKPBMCNW36");
//! assert_eq!(secret.expose_secret(), "EAUJ6CIKPBMCNW36");
//! assert_eq!(format!("{secret:?}"), "[REDACTED]");
//! ```

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that is automatically zeroed when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// # Security
    ///
    /// Use the returned reference immediately; do not copy it into
    /// long-lived or logged values.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns the length of the secret string.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the secret string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Prevent accidental logging of sensitive data
impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacted() {
        let secret = SecretString::new("EAUJ6CIKPBMCNW36");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert!(!format!("{:?}", Some(&secret)).contains("EAUJ"));
    }

    #[test]
    fn test_secret_string_expose() {
        let secret: SecretString = "abc".into();
        assert_eq!(secret.expose_secret(), "abc");
        assert_eq!(secret.len(), 3);
        assert!(!secret.is_empty());
        assert!(SecretString::new(String::new()).is_empty());
    }

    #[test]
    fn test_secret_string_zeroize() {
        let mut secret = SecretString::new("sensitive");
        secret.zeroize();
        assert!(secret.is_empty());
    }

    #[test]
    fn test_secret_string_clone_eq() {
        let a = SecretString::from("k".to_string());
        let b = a.clone();
        assert_eq!(a, b);
    }
}
