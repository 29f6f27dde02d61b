//! # wayfare-booking: Booking Store and Checkout for Wayfare
//!
//! Owns the one mutable booking aggregate, the checkout phase machine and
//! the async boundary to the booking gateway.
//!
//! ## Module Organization
//! ```text
//! wayfare_booking/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── store.rs        ◄─── BookingStore aggregate
//! ├── checkout.rs     ◄─── Phases, gateway trait, simulated gateway
//! ├── snapshot.rs     ◄─── BookingSnapshot read model, observers
//! ├── state.rs        ◄─── SharedBookingStore (mutex, cancel, timeout)
//! ├── config.rs       ◄─── EngineConfig (TOML + env)
//! ├── telemetry.rs    ◄─── tracing-subscriber setup
//! └── error.rs        ◄─── BookingError
//! ```
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI event ──► BookingStore mutator ──► search / selection updated      │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                        pricing + gates + phase derived                  │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                        StoreObserver::on_change(snapshot)               │
//! │                                                                         │
//! │  Confirm ──► begin_confirmation ──► BookingGateway::submit ──►          │
//! │              finish_confirmation ──► Confirmed | back to editing        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use wayfare_booking::{BookingStore, CheckoutPhase};
//! use wayfare_core::{Car, ExtraKind, Money};
//!
//! let mut store = BookingStore::new();
//! store.select_car(Car::new("car-1", "Toyota Corolla", 5_000)).unwrap();
//! store.toggle_extra(ExtraKind::Gps);
//!
//! // One day, $50 car + $10 GPS, plus 8% tax
//! assert_eq!(store.pricing().unwrap().total, Money::from_cents(6_480));
//! assert_eq!(store.phase(), CheckoutPhase::Incomplete);
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod telemetry;

pub use checkout::{
    BookingConfirmation, BookingGateway, BookingRequest, CheckoutPhase, ConfirmFailure,
    GatewayError, SimulatedGateway, SimulatedOutcome,
};
pub use config::EngineConfig;
pub use error::{BookingError, BookingResult};
pub use snapshot::{BookingSnapshot, NoOpObserver, StoreObserver};
pub use state::SharedBookingStore;
pub use store::BookingStore;
pub use telemetry::init_tracing;
