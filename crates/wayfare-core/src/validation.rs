//! # Validation Module
//!
//! Readiness gates and form validators for the checkout flow.
//!
//! ## Two Kinds of Checks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form validators (on sheet save)                              │
//! │  ├── validate_driver_info   - lengths, email shape                     │
//! │  └── validate_payment_data  - card digits, MM/YY, CVV                  │
//! │           │  Err(ValidationError) → sheet shows the field message      │
//! │           ▼                                                             │
//! │  Layer 2: Gates (on every render)                                      │
//! │  ├── is_search_valid / is_driver_complete / is_payment_complete        │
//! │  └── can_confirm = driver complete ∧ payment complete                  │
//! │           │  plain bool → confirm button enabled / disabled            │
//! │           ▼                                                             │
//! │  Layer 3: Gateway (on confirm)                                         │
//! │  └── declines, network failures → ConfirmFailure                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Gates only check that required fields are present. They are pure
//! functions of the current state, derived on read and never cached.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::search::SearchParams;
use crate::selection::SelectionState;
use crate::types::{Car, DriverInfo, PaymentData};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Gates
// =============================================================================

/// True iff a driver is saved and first name, last name, email and license
/// number are all non-blank.
pub fn is_driver_complete(driver: Option<&DriverInfo>) -> bool {
    match driver {
        Some(d) => [&d.first_name, &d.last_name, &d.email, &d.license_number]
            .iter()
            .all(|field| !field.trim().is_empty()),
        None => false,
    }
}

pub fn is_payment_complete(payment: Option<&PaymentData>) -> bool {
    payment.is_some()
}

pub fn can_confirm(selection: &SelectionState) -> bool {
    is_driver_complete(selection.primary_driver()) && is_payment_complete(selection.payment_data())
}

/// All gates evaluated against one state, for handing to the UI in a
/// single snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessGates {
    pub search_valid: bool,
    pub driver_complete: bool,
    pub payment_complete: bool,
    pub can_confirm: bool,
}

impl ReadinessGates {
    pub fn evaluate(search: &SearchParams, selection: &SelectionState) -> Self {
        let driver_complete = is_driver_complete(selection.primary_driver());
        let payment_complete = is_payment_complete(selection.payment_data());
        ReadinessGates {
            search_valid: search.is_search_valid(),
            driver_complete,
            payment_complete,
            can_confirm: driver_complete && payment_complete,
        }
    }
}

// =============================================================================
// Driver Form
// =============================================================================

const MIN_NAME_LEN: usize = 2;
const MIN_LICENSE_LEN: usize = 5;

/// Validates the driver-details sheet before it saves.
///
/// ## Rules
/// - First and last name: at least 2 characters
/// - Email: non-blank, contains `@` with text on both sides
/// - License number: at least 5 characters
///
/// ## Example
/// ```rust
/// use wayfare_core::types::DriverInfo;
/// use wayfare_core::validation::validate_driver_info;
///
/// let mut driver = DriverInfo {
///     first_name: "Ada".into(),
///     last_name: "Lovelace".into(),
///     email: "ada@example.com".into(),
///     license_number: "D1234567".into(),
///     ..Default::default()
/// };
/// assert!(validate_driver_info(&driver).is_ok());
///
/// driver.email = "ada.example.com".into();
/// assert!(validate_driver_info(&driver).is_err());
/// ```
pub fn validate_driver_info(driver: &DriverInfo) -> ValidationResult<()> {
    validate_min_len("first name", &driver.first_name, MIN_NAME_LEN)?;
    validate_min_len("last name", &driver.last_name, MIN_NAME_LEN)?;
    validate_email(&driver.email)?;
    validate_min_len("license number", &driver.license_number, MIN_LICENSE_LEN)?;
    Ok(())
}

fn validate_min_len(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

// =============================================================================
// Payment Form
// =============================================================================

/// Validates the payment sheet before it saves.
///
/// ## Rules
/// - Card number: 13–19 digits, spaces and dashes allowed
/// - Expiry: `MM/YY`, month 01–12
/// - CVV: 3 or 4 digits
/// - Cardholder name: non-blank
pub fn validate_payment_data(payment: &PaymentData) -> ValidationResult<()> {
    validate_card_number(&payment.card_number)?;
    validate_expiry(&payment.expiry)?;
    validate_cvv(&payment.cvv)?;

    if payment.cardholder_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cardholder name".to_string(),
        });
    }

    Ok(())
}

pub fn validate_card_number(number: &str) -> ValidationResult<()> {
    let field = || "card number".to_string();

    if number.trim().is_empty() {
        return Err(ValidationError::Required { field: field() });
    }

    if !number
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: field(),
            reason: "must contain only digits".to_string(),
        });
    }

    let digits = number.chars().filter(|c| c.is_ascii_digit()).count();
    if !(13..=19).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "card number length".to_string(),
            min: 13,
            max: 19,
        });
    }

    Ok(())
}

pub fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "expiry".to_string(),
        reason: "must be MM/YY".to_string(),
    };

    let (month, year) = expiry.trim().split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    year.parse::<u32>().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "expiry month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

pub fn validate_cvv(cvv: &str) -> ValidationResult<()> {
    let cvv = cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Car
// =============================================================================

/// Highest daily rate accepted from the car catalog, in cents ($100,000).
pub const MAX_DAILY_PRICE_CENTS: i64 = 10_000_000;

/// Checks a car handed over by the car catalog before it enters a booking.
///
/// The daily price must lie in `[0, MAX_DAILY_PRICE_CENTS]`, which keeps
/// every quote field non-negative.
pub fn validate_car(car: &Car) -> ValidationResult<()> {
    let max = Money::from_cents(MAX_DAILY_PRICE_CENTS);
    if car.price_per_day.is_negative() || car.price_per_day > max {
        return Err(ValidationError::OutOfRange {
            field: "price per day (cents)".to_string(),
            min: 0,
            max: MAX_DAILY_PRICE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> DriverInfo {
        DriverInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            license_number: "D1234567".to_string(),
            ..DriverInfo::default()
        }
    }

    fn payment() -> PaymentData {
        PaymentData {
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "08/28".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Ada Lovelace".to_string(),
            billing_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
        }
    }

    #[test]
    fn test_driver_complete_requires_all_four_fields() {
        assert!(!is_driver_complete(None));
        assert!(is_driver_complete(Some(&driver())));

        let blanks: [fn(&mut DriverInfo); 4] = [
            |d| d.first_name.clear(),
            |d| d.last_name = "   ".to_string(),
            |d| d.email.clear(),
            |d| d.license_number.clear(),
        ];
        for blank in blanks {
            let mut d = driver();
            blank(&mut d);
            assert!(!is_driver_complete(Some(&d)));
        }
    }

    #[test]
    fn test_driver_gate_ignores_optional_fields() {
        // Phone, dates and license country are not gate fields
        let d = driver();
        assert!(d.phone.is_empty());
        assert!(is_driver_complete(Some(&d)));
    }

    #[test]
    fn test_can_confirm_truth_table() {
        let mut selection = SelectionState::new();
        assert!(!can_confirm(&selection));

        selection.set_primary_driver(driver());
        assert!(!can_confirm(&selection));

        selection.set_payment_data(payment());
        assert!(can_confirm(&selection));

        selection.set_primary_driver(DriverInfo {
            email: String::new(),
            ..driver()
        });
        assert!(!can_confirm(&selection));

        selection.set_primary_driver(driver());
        selection.clear_payment_data();
        assert!(!can_confirm(&selection));
    }

    #[test]
    fn test_readiness_gates_evaluate() {
        let mut selection = SelectionState::new();
        selection.set_primary_driver(driver());
        let gates = ReadinessGates::evaluate(&SearchParams::default(), &selection);
        assert_eq!(
            gates,
            ReadinessGates {
                search_valid: false,
                driver_complete: true,
                payment_complete: false,
                can_confirm: false,
            }
        );
    }

    #[test]
    fn test_validate_driver_info() {
        assert!(validate_driver_info(&driver()).is_ok());

        let short = DriverInfo {
            first_name: "A".to_string(),
            ..driver()
        };
        assert_eq!(
            validate_driver_info(&short),
            Err(ValidationError::TooShort {
                field: "first name".to_string(),
                min: 2
            })
        );

        let license = DriverInfo {
            license_number: "D12".to_string(),
            ..driver()
        };
        assert!(validate_driver_info(&license).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@").is_err());
    }

    #[test]
    fn test_validate_payment_data() {
        assert!(validate_payment_data(&payment()).is_ok());

        let no_name = PaymentData {
            cardholder_name: " ".to_string(),
            ..payment()
        };
        assert!(validate_payment_data(&no_name).is_err());
    }

    #[test]
    fn test_validate_card_number() {
        assert!(validate_card_number("4242-4242-4242-4242").is_ok());
        assert!(validate_card_number("378282246310005").is_ok());
        assert!(validate_card_number("").is_err());
        assert!(validate_card_number("4242 abcd").is_err());
        assert!(validate_card_number("4242 4242").is_err());
    }

    #[test]
    fn test_validate_expiry() {
        assert!(validate_expiry("01/30").is_ok());
        assert!(validate_expiry("12/25").is_ok());
        assert!(validate_expiry("13/25").is_err());
        assert!(validate_expiry("00/25").is_err());
        assert!(validate_expiry("1/25").is_err());
        assert!(validate_expiry("0125").is_err());
    }

    #[test]
    fn test_validate_cvv() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("1234").is_ok());
        assert!(validate_cvv("12").is_err());
        assert!(validate_cvv("12a").is_err());
    }

    #[test]
    fn test_validate_car_price() {
        assert!(validate_car(&Car::new("car-1", "Toyota Corolla", 5_000)).is_ok());
        assert!(validate_car(&Car::new("car-0", "Loaner", 0)).is_ok());
        assert!(validate_car(&Car::new("car-max", "Limo", MAX_DAILY_PRICE_CENTS)).is_ok());

        let err = validate_car(&Car::new("car-neg", "Glitch", -5_000)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { min: 0, .. }));
        assert!(validate_car(&Car::new("car-big", "Yacht", MAX_DAILY_PRICE_CENTS + 1)).is_err());
    }
}
