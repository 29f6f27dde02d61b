//! # Checkout Flow
//!
//! Checkout phases, the booking gateway seam and a simulated gateway.
//!
//! ## Phase Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Phases                                  │
//! │                                                                         │
//! │   ┌────────────┐  driver ∧ payment   ┌────────────────┐                │
//! │   │ Incomplete │ ──────────────────► │ ReadyToConfirm │                │
//! │   │            │ ◄────────────────── │                │                │
//! │   └────────────┘   gate lost         └───────┬────────┘                │
//! │         ▲                                    │ confirm submitted       │
//! │         │                                    ▼                          │
//! │         │  failure / timeout /       ┌────────────────┐                │
//! │         └─────── cancel ───────────  │   Processing   │  edits ignored │
//! │                 (back to editing)    └───────┬────────┘                │
//! │                                              │ gateway success         │
//! │                                              ▼                          │
//! │                                      ┌────────────────┐                │
//! │                                      │   Confirmed    │  terminal      │
//! │                                      └────────────────┘  (reset())     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Incomplete` and `ReadyToConfirm` are derived from the gates on every
//! read. Only `Processing` and `Confirmed` are stored.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;
use wayfare_core::{Car, Money, PricingBreakdown, SearchParams, SelectionState};

// =============================================================================
// Checkout Phase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Driver or payment details are still missing.
    Incomplete,
    /// All gates hold; the confirm button is enabled.
    ReadyToConfirm,
    /// A confirm request is with the gateway.
    Processing,
    /// The gateway accepted the booking.
    Confirmed,
}

impl CheckoutPhase {
    /// True while the booking cannot be edited.
    pub fn is_locked(&self) -> bool {
        matches!(self, CheckoutPhase::Processing | CheckoutPhase::Confirmed)
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutPhase::Incomplete => write!(f, "incomplete"),
            CheckoutPhase::ReadyToConfirm => write!(f, "ready_to_confirm"),
            CheckoutPhase::Processing => write!(f, "processing"),
            CheckoutPhase::Confirmed => write!(f, "confirmed"),
        }
    }
}

// =============================================================================
// Confirm Failure
// =============================================================================

/// Why a confirm attempt ended without a booking.
///
/// Recorded on the store as the last failure and shown next to the confirm
/// button until the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConfirmFailure {
    #[error("payment declined: {reason}")]
    Declined { reason: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("no response after {after_secs} seconds")]
    Timeout {
        #[serde(rename = "afterSecs")]
        after_secs: u64,
    },

    #[error("cancelled")]
    Cancelled,
}

impl ConfirmFailure {
    pub fn timeout(after: Duration) -> Self {
        ConfirmFailure::Timeout {
            after_secs: after.as_secs(),
        }
    }
}

// =============================================================================
// Gateway Contract
// =============================================================================

/// Everything the gateway needs to place the booking.
///
/// Carries the payment profile inside `selection`; serializing the request
/// leaves it out and `Debug` masks it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub attempt_id: Uuid,
    pub car: Car,
    pub search: SearchParams,
    pub selection: SelectionState,
    pub pricing: PricingBreakdown,
}

/// What the gateway hands back for an accepted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    #[ts(as = "String")]
    pub booking_id: Uuid,
    /// Short reference shown to the renter, e.g. `WF-1A2B3C4D`.
    pub reference: String,
    /// Charged amount, rounded to cents.
    pub total: Money,
    #[ts(as = "String")]
    pub confirmed_at: DateTime<Utc>,
}

impl BookingConfirmation {
    /// Builds a confirmation for `request` with a fresh booking id.
    pub fn for_request(request: &BookingRequest) -> Self {
        let booking_id = Uuid::new_v4();
        let short: String = booking_id
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase();

        BookingConfirmation {
            booking_id,
            reference: format!("WF-{}", short),
            total: request.pricing.display_total(),
            confirmed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("declined: {0}")]
    Declined(String),

    #[error("network: {0}")]
    Network(String),
}

impl From<GatewayError> for ConfirmFailure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Declined(reason) => ConfirmFailure::Declined { reason },
            GatewayError::Network(message) => ConfirmFailure::Network { message },
        }
    }
}

/// The payment/booking collaborator.
///
/// Implementations must not log the payment profile. Use
/// `request.selection.payment_summary()` when a card has to be identified.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Places the booking described by `request`.
    async fn submit(&self, request: &BookingRequest) -> Result<BookingConfirmation, GatewayError>;
}

/// Submits `request` and folds the gateway result and the deadline into a
/// single outcome.
pub async fn submit_with_timeout(
    gateway: &dyn BookingGateway,
    request: &BookingRequest,
    timeout: Duration,
) -> Result<BookingConfirmation, ConfirmFailure> {
    match tokio::time::timeout(timeout, gateway.submit(request)).await {
        Ok(Ok(confirmation)) => Ok(confirmation),
        Ok(Err(err)) => Err(err.into()),
        Err(_) => Err(ConfirmFailure::timeout(timeout)),
    }
}

// =============================================================================
// Simulated Gateway
// =============================================================================

/// Scripted result for [`SimulatedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Approve,
    Decline(String),
    NetworkError(String),
    /// Never answers; exercises timeouts and cancellation.
    Hang,
}

/// Gateway stand-in for demos and tests: waits `delay`, then answers with
/// the scripted outcome.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    outcome: SimulatedOutcome,
}

impl SimulatedGateway {
    pub fn new(delay: Duration, outcome: SimulatedOutcome) -> Self {
        SimulatedGateway { delay, outcome }
    }

    /// Approves every booking after `delay`.
    pub fn approving(delay: Duration) -> Self {
        Self::new(delay, SimulatedOutcome::Approve)
    }
}

#[async_trait]
impl BookingGateway for SimulatedGateway {
    async fn submit(&self, request: &BookingRequest) -> Result<BookingConfirmation, GatewayError> {
        tracing::debug!(
            attempt_id = %request.attempt_id,
            car_id = %request.car.id,
            total = %request.pricing.display_total(),
            "Simulated gateway received booking"
        );

        tokio::time::sleep(self.delay).await;

        match &self.outcome {
            SimulatedOutcome::Approve => Ok(BookingConfirmation::for_request(request)),
            SimulatedOutcome::Decline(reason) => Err(GatewayError::Declined(reason.clone())),
            SimulatedOutcome::NetworkError(message) => Err(GatewayError::Network(message.clone())),
            SimulatedOutcome::Hang => std::future::pending().await,
        }
    }
}
