//! # Booking Error Types
//!
//! Errors raised by the booking layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Checkout     │  │  Confirmation   │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotReady       │  │  Declined       │  │  InvalidConfig          │ │
//! │  │  NoCarSelected  │  │  Network        │  │  ConfigLoadFailed       │ │
//! │  │  AlreadyProc.   │  │  Timeout        │  │  Io / TomlParse         │ │
//! │  │  AlreadyConf.   │  │  Cancelled      │  │  TomlSerialize          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Edits made while a confirmation is in flight are not errors. They are
//! ignored and logged.

use thiserror::Error;
use wayfare_core::CoreError;

use crate::checkout::ConfirmFailure;

/// Result type alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;

#[derive(Debug, Error)]
pub enum BookingError {
    // =========================================================================
    // Checkout Errors
    // =========================================================================
    /// Confirm was requested while the gates do not hold.
    #[error("Booking is not ready to confirm: missing {missing}")]
    NotReady { missing: String },

    #[error("A confirmation is already in progress")]
    AlreadyProcessing,

    #[error("Booking is already confirmed; reset to start a new one")]
    AlreadyConfirmed,

    #[error("No car selected")]
    NoCarSelected,

    /// The gateway call ended without a confirmation.
    #[error("Confirmation failed: {0}")]
    Confirmation(#[from] ConfirmFailure),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BookingError {
    /// Returns true if retrying the same confirm may succeed.
    ///
    /// Network failures and timeouts are retryable. Declines are not: the
    /// renter has to change the payment profile first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::Confirmation(ConfirmFailure::Network { .. })
                | BookingError::Confirmation(ConfirmFailure::Timeout { .. })
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidConfig(_)
                | BookingError::ConfigLoadFailed(_)
                | BookingError::TomlParse(_)
                | BookingError::TomlSerialize(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        let network = BookingError::Confirmation(ConfirmFailure::Network {
            message: "connection reset".to_string(),
        });
        assert!(network.is_retryable());

        let timeout = BookingError::Confirmation(ConfirmFailure::Timeout { after_secs: 30 });
        assert!(timeout.is_retryable());

        let declined = BookingError::Confirmation(ConfirmFailure::Declined {
            reason: "insufficient funds".to_string(),
        });
        assert!(!declined.is_retryable());
        assert!(!BookingError::NoCarSelected.is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(BookingError::InvalidConfig("bad".into()).is_config_error());
        assert!(!BookingError::AlreadyProcessing.is_config_error());
    }

    #[test]
    fn test_error_messages() {
        let err = BookingError::NotReady {
            missing: "payment details".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Booking is not ready to confirm: missing payment details"
        );

        let err: BookingError = CoreError::UnknownCatalogEntry {
            catalog: "extra",
            id: "jetpack".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown extra: jetpack");
    }
}
