//! # Error Types
//!
//! Domain-specific error types for wayfare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wayfare-core errors (this file)                                       │
//! │  ├── CoreError        - Catalog lookups, wrapped validation            │
//! │  └── ValidationError  - Driver/payment form validation failures        │
//! │                                                                         │
//! │  wayfare-booking errors (separate crate)                               │
//! │  └── BookingError     - Checkout flow, confirmation, configuration     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → UI collaborator    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! An incomplete driver or payment form is not an error: it keeps the
//! `can_confirm` gate false. Out-of-range stepper input (driver age, extra
//! quantity) is clamped or ignored, never rejected.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CoreError {
    /// A string id from the UI did not match any catalog entry.
    ///
    /// ## When This Occurs
    /// - UI build is newer than the engine and offers an extra we don't know
    /// - Deep link or restored session carries a stale id
    #[error("Unknown {catalog}: {id}")]
    UnknownCatalogEntry { catalog: &'static str, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form validation errors raised before a sheet saves its profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Invalid format (e.g. email without `@`, malformed expiry).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownCatalogEntry {
            catalog: "protection",
            id: "platinum".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown protection: platinum");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "license number".to_string(),
            min: 5,
        };
        assert_eq!(err.to_string(), "license number must be at least 5 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "cvv".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
