//! # Error Types
//!
//! Structured error types for calc_core. Validation feedback for end users
//! is *not* an error here; it travels as a per-field message map (see
//! [`crate::validate`]). `CalcError` covers the faults an operator or the
//! hosting application must handle: bad configs, broken formulas, and
//! store failures.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn require_slug(slug: &str) -> CalcResult<()> {
//!     if slug.is_empty() {
//!         return Err(CalcError::invalid_config("<unnamed>", "slug must not be empty"));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// No calculator exists under the requested slug
    #[error("Calculator not found: '{slug}'")]
    ConfigNotFound { slug: String },

    /// A calculator definition failed structural validation
    #[error("Invalid calculator config '{slug}': {reason}")]
    InvalidConfig { slug: String, reason: String },

    /// A formula could not be parsed
    #[error("Formula parse error at offset {offset}: {reason}")]
    FormulaParse { offset: usize, reason: String },

    /// A formula referenced a variable that was not bound
    #[error("Unknown variable in formula: '{name}'")]
    UnknownVariable { name: String },

    /// A formula evaluated against a value it cannot use numerically
    #[error("Evaluation error: {reason}")]
    Evaluation { reason: String },

    /// The external store failed
    #[error("Store error during {operation}: {reason}")]
    Store { operation: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a ConfigNotFound error
    pub fn config_not_found(slug: impl Into<String>) -> Self {
        CalcError::ConfigNotFound { slug: slug.into() }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(slug: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfig {
            slug: slug.into(),
            reason: reason.into(),
        }
    }

    /// Create a FormulaParse error
    pub fn formula_parse(offset: usize, reason: impl Into<String>) -> Self {
        CalcError::FormulaParse {
            offset,
            reason: reason.into(),
        }
    }

    /// Create an UnknownVariable error
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        CalcError::UnknownVariable { name: name.into() }
    }

    /// Create an Evaluation error
    pub fn evaluation(reason: impl Into<String>) -> Self {
        CalcError::Evaluation {
            reason: reason.into(),
        }
    }

    /// Create a Store error
    pub fn store(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Store {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the session contains locally ("no result" rather
    /// than a failed load). Only store failures block the primary flow.
    pub fn is_contained(&self) -> bool {
        matches!(
            self,
            CalcError::FormulaParse { .. }
                | CalcError::UnknownVariable { .. }
                | CalcError::Evaluation { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            CalcError::InvalidConfig { .. } => "INVALID_CONFIG",
            CalcError::FormulaParse { .. } => "FORMULA_PARSE",
            CalcError::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            CalcError::Evaluation { .. } => "EVALUATION",
            CalcError::Store { .. } => "STORE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_config("bmi", "duplicate field 'weightKg'");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::config_not_found("emi").error_code(),
            "CONFIG_NOT_FOUND"
        );
        assert_eq!(
            CalcError::unknown_variable("rate").error_code(),
            "UNKNOWN_VARIABLE"
        );
    }

    #[test]
    fn test_containment() {
        assert!(CalcError::unknown_variable("x").is_contained());
        assert!(CalcError::evaluation("text value is not numeric").is_contained());
        assert!(!CalcError::store("fetch_by_slug", "timeout").is_contained());
    }
}
