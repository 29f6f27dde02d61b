//! # Booking Snapshots
//!
//! The read model handed to UI collaborators after every change, and the
//! observer seam they subscribe through.

use serde::Serialize;
use wayfare_core::{
    Car, PaymentSummary, PricingBreakdown, ReadinessGates, SearchParams, SelectionState,
    YoungDriverNotice,
};

use crate::checkout::{BookingConfirmation, CheckoutPhase, ConfirmFailure};

/// Everything a screen needs to render the booking, derived in one go.
///
/// The payment profile appears only as its masked summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub search: SearchParams,
    pub selection: SelectionState,
    pub car: Option<Car>,
    pub payment: Option<PaymentSummary>,
    /// `None` until a car is selected.
    pub pricing: Option<PricingBreakdown>,
    pub gates: ReadinessGates,
    pub phase: CheckoutPhase,
    pub young_driver_notice: Option<YoungDriverNotice>,
    pub last_failure: Option<ConfirmFailure>,
    pub confirmation: Option<BookingConfirmation>,
}

/// Receives a fresh snapshot after every applied change.
///
/// Called synchronously from the store, so implementations should hand the
/// snapshot off (channel, UI event) rather than block.
pub trait StoreObserver: Send + Sync {
    fn on_change(&self, snapshot: &BookingSnapshot);
}

/// Observer that drops every snapshot.
pub struct NoOpObserver;

impl StoreObserver for NoOpObserver {
    fn on_change(&self, _snapshot: &BookingSnapshot) {}
}
