//! Configuration validation error types.
//!
//! Invalid pool limits, retry caps or gateway URLs are rejected when the
//! owning component is constructed, never at call time.
//!
//! # Example
//!
//! ```rust
//! use platform_core::error::{ConfigValidationError, ValidationResult};
//!
//! fn validate_max_attempts(value: u32) -> Result<ValidationResult, ConfigValidationError> {
//!     if value == 0 {
//!         return Err(ConfigValidationError::too_low("max_attempts", value, 1));
//!     }
//!     Ok(ValidationResult::new())
//! }
//!
//! assert!(validate_max_attempts(0).is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Configuration validation error types.
///
/// Each variant carries the field name and the offending value so the
/// message is actionable without a debugger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// Field value exceeds the maximum allowed value.
    #[error("Field '{field}' value {value} exceeds maximum {max}")]
    ValueTooHigh {
        /// The name of the configuration field
        field: &'static str,
        /// The actual value that was provided
        value: String,
        /// The maximum allowed value
        max: String,
    },

    /// Field value is below the minimum allowed value.
    #[error("Field '{field}' value {value} is below minimum {min}")]
    ValueTooLow {
        /// The name of the configuration field
        field: &'static str,
        /// The actual value that was provided
        value: String,
        /// The minimum allowed value
        min: String,
    },

    /// Field value is invalid for reasons other than range.
    #[error("Field '{field}' has invalid value: {reason}")]
    ValueInvalid {
        /// The name of the configuration field
        field: &'static str,
        /// The reason why the value is invalid
        reason: String,
    },

    /// Required field is missing.
    #[error("Required field '{field}' is missing")]
    ValueMissing {
        /// The name of the missing configuration field
        field: &'static str,
    },
}

impl ConfigValidationError {
    /// Returns the field name associated with this error.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            ConfigValidationError::ValueTooHigh { field, .. }
            | ConfigValidationError::ValueTooLow { field, .. }
            | ConfigValidationError::ValueInvalid { field, .. }
            | ConfigValidationError::ValueMissing { field } => field,
        }
    }

    /// Creates a new `ValueTooHigh` error.
    pub fn too_high<V: fmt::Display, M: fmt::Display>(
        field: &'static str,
        value: V,
        max: M,
    ) -> Self {
        ConfigValidationError::ValueTooHigh {
            field,
            value: value.to_string(),
            max: max.to_string(),
        }
    }

    /// Creates a new `ValueTooLow` error.
    pub fn too_low<V: fmt::Display, M: fmt::Display>(
        field: &'static str,
        value: V,
        min: M,
    ) -> Self {
        ConfigValidationError::ValueTooLow {
            field,
            value: value.to_string(),
            min: min.to_string(),
        }
    }

    /// Creates a new `ValueInvalid` error.
    ///
    /// ```rust
    /// use platform_core::error::ConfigValidationError;
    ///
    /// let err = ConfigValidationError::invalid("base_url", "relative URL without base");
    /// assert_eq!(err.field_name(), "base_url");
    /// ```
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigValidationError::ValueInvalid {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a new `ValueMissing` error.
    pub fn missing(field: &'static str) -> Self {
        ConfigValidationError::ValueMissing { field }
    }
}

/// Result of a successful configuration validation.
///
/// Warnings flag settings that work but are probably not what the caller
/// wants, such as a lease timeout shorter than a second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Non-fatal issues found during validation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a new empty validation result.
    #[must_use]
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Creates a validation result with the given warnings.
    #[must_use]
    pub fn with_warnings(warnings: Vec<String>) -> Self {
        Self { warnings }
    }

    /// Adds a warning to the validation result.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns `true` if there are no warnings.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns `true` if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Merges another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_too_high_display() {
        let err = ConfigValidationError::too_high("max_per_route", 200, 100);
        let msg = err.to_string();
        assert!(msg.contains("max_per_route"));
        assert!(msg.contains("200"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_value_too_low_display() {
        let err = ConfigValidationError::too_low("max_attempts", 0, 1);
        let msg = err.to_string();
        assert!(msg.contains("max_attempts"));
        assert!(msg.contains("below minimum 1"));
    }

    #[test]
    fn test_value_invalid_display() {
        let err = ConfigValidationError::invalid("base_url", "unsupported scheme 'ftp'");
        let msg = err.to_string();
        assert!(msg.contains("base_url"));
        assert!(msg.contains("ftp"));
    }

    #[test]
    fn test_value_missing_display() {
        let err = ConfigValidationError::missing("secret_key");
        assert!(err.to_string().contains("secret_key"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_field_name() {
        assert_eq!(
            ConfigValidationError::too_high("max_total", 1, 0).field_name(),
            "max_total"
        );
        assert_eq!(
            ConfigValidationError::too_low("lease_timeout", 0, 1).field_name(),
            "lease_timeout"
        );
        assert_eq!(
            ConfigValidationError::invalid("base_url", "x").field_name(),
            "base_url"
        );
        assert_eq!(
            ConfigValidationError::missing("app_id").field_name(),
            "app_id"
        );
    }

    #[test]
    fn test_validation_result_warnings() {
        let mut result = ValidationResult::new();
        assert!(result.is_ok());
        result.add_warning("lease_timeout is very short");
        assert!(result.has_warnings());

        let mut other = ValidationResult::new();
        other.add_warning("idle_timeout longer than connection_ttl");
        result.merge(other);
        assert_eq!(result.warnings.len(), 2);
    }
}
