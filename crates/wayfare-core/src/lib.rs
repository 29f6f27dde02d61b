//! # wayfare-core: Pure Booking Logic for Wayfare
//!
//! This crate holds the car-rental booking rules as pure functions and plain
//! state types. Nothing in here touches a clock, a file or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wayfare Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Booking UI (any host)                        │   │
//! │  │   Search ──► Car list ──► Checkout sheets ──► Confirmation     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots / mutations                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  wayfare-booking                                │   │
//! │  │   BookingStore, checkout phases, gateway, config, tracing      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wayfare-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐ │   │
//! │  │   │  search  │ │selection │ │ pricing  │ │   validation     │ │   │
//! │  │   │  params  │ │ extras   │ │breakdown │ │ gates + forms    │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘ │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐                      │   │
//! │  │   │  money   │ │ catalog  │ │  types   │                      │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO CLOCK • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in micro-units, exact tax, display rounding
//! - [`types`] - Locations, cars, driver and payment profiles
//! - [`catalog`] - Protection packages and rental extras
//! - [`search`] - Search parameters and their invariants
//! - [`selection`] - Checkout selections
//! - [`pricing`] - Quote computation
//! - [`validation`] - Readiness gates and form validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use wayfare_core::pricing::{compute_pricing, PricingPolicy};
//! use wayfare_core::{Car, Location, LocationKind, Money, SearchParams, SelectionState};
//!
//! let mut search = SearchParams::default();
//! search.set_pickup_location(Location::new("lax", "Los Angeles Intl", "LAX", LocationKind::Airport));
//! search.set_pickup_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
//! search.set_return_date(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
//!
//! let car = Car::new("car-1", "Toyota Corolla", 4_500); // $45.00/day
//! let quote = compute_pricing(&car, &search, &SelectionState::new(), &PricingPolicy::default());
//!
//! // 3 × $45 + $25 airport fee = $160, plus 8% tax
//! assert_eq!(quote.total, Money::from_cents(17_280));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod search;
pub mod selection;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CarExtra, ExtraKind, ProtectionPackage, ProtectionTier};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{PricingBreakdown, PricingPolicy, YoungDriverNotice};
pub use search::SearchParams;
pub use selection::{SelectedExtra, SelectionState};
pub use types::*;
pub use validation::ReadinessGates;
