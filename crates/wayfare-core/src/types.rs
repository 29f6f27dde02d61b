//! # Domain Types
//!
//! Core domain types shared by the search screen, the checkout sheets and
//! the pricing calculator.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Location     │   │      Car        │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, code       │   │  id, name       │   │  bps (u32)      │       │
//! │  │  kind (airport  │   │  price_per_day  │   │  800 = 8%       │       │
//! │  │   or city)      │   │  seats, gearbox │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   DriverInfo    │   │  PaymentData    │   │ PaymentSummary  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  names, email   │   │  card, cvv ...  │   │  last4, expiry  │       │
//! │  │  license        │   │  NEVER logged   │   │  safe to show   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locations and cars are supplied by external collaborators (location
//! search, car catalog) and are only referenced here, never mutated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (config convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Location
// =============================================================================

/// Whether a pickup/return point is an airport counter or a city branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Airport,
    City,
}

/// A pickup or return point, produced by the location search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    /// Display name, e.g. "Los Angeles International Airport".
    pub name: String,
    /// Short code, e.g. "LAX".
    pub code: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        kind: LocationKind,
    ) -> Self {
        Location {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            kind,
        }
    }

    #[inline]
    pub fn is_airport(&self) -> bool {
        self.kind == LocationKind::Airport
    }
}

// =============================================================================
// Car
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Automatic,
    Manual,
}

/// A rentable car as supplied by the car catalog collaborator.
///
/// Only `price_per_day` takes part in pricing; the remaining fields travel
/// with the booking request so the gateway can identify the vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub name: String,
    /// Rental category, e.g. "Compact SUV".
    pub category: String,
    pub price_per_day: Money,
    pub seats: u8,
    pub transmission: Transmission,
}

impl Car {
    /// Creates a car with a daily price given in cents.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_day_cents: i64) -> Self {
        Car {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            price_per_day: Money::from_cents(price_per_day_cents),
            seats: 5,
            transmission: Transmission::Automatic,
        }
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Primary driver profile, saved as a whole from the driver-details sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub license_number: String,
    pub license_country: String,
    #[ts(as = "Option<String>")]
    pub license_expiry: Option<NaiveDate>,
}

impl DriverInfo {
    /// Full name as printed on the confirmation.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Payment profile saved from the payment sheet.
///
/// ## Handling Rules
/// - Held in memory only, no `Serialize` impl
/// - `Debug` is hand-written and masks the card number and CVV
/// - Anything that needs to show or log the card uses [`PaymentSummary`]
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub card_number: String,
    /// `MM/YY` as typed on the card.
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub billing_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl PaymentData {
    /// Card number with separators removed.
    pub fn card_digits(&self) -> String {
        self.card_number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Last four digits of the card, or fewer if the number is short.
    pub fn last_four(&self) -> String {
        let digits = self.card_digits();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }

    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(&self.card_digits())
    }

    pub fn summary(&self) -> PaymentSummary {
        PaymentSummary {
            brand: self.brand(),
            last_four: self.last_four(),
            expiry: self.expiry.clone(),
            cardholder_name: self.cardholder_name.clone(),
        }
    }
}

impl fmt::Debug for PaymentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentData")
            .field("card_number", &format_args!("•••• {}", self.last_four()))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .field("cardholder_name", &self.cardholder_name)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

/// Card network, detected from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    fn detect(digits: &str) -> Self {
        let prefix2: u32 = digits.get(..2).and_then(|p| p.parse().ok()).unwrap_or(0);
        let prefix4: u32 = digits.get(..4).and_then(|p| p.parse().ok()).unwrap_or(0);

        match (prefix2, prefix4) {
            _ if digits.starts_with('4') => CardBrand::Visa,
            (51..=55, _) | (_, 2221..=2720) => CardBrand::Mastercard,
            (34 | 37, _) => CardBrand::Amex,
            (_, 6011) | (65, _) => CardBrand::Discover,
            _ => CardBrand::Unknown,
        }
    }
}

/// Masked view of a [`PaymentData`], safe for UI display and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub brand: CardBrand,
    pub last_four: String,
    pub expiry: String,
    pub cardholder_name: String,
}

impl fmt::Display for PaymentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} •••• {} ({})", self.brand, self.last_four, self.expiry)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
