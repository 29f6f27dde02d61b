//! # Booking Store
//!
//! The single source of truth for one booking: search parameters, checkout
//! selections, the chosen car and the confirm lifecycle.
//!
//! ## Store Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Booking Store Operations                             │
//! │                                                                         │
//! │  UI Action                Store Method             State Change         │
//! │  ─────────                ────────────             ────────────         │
//! │                                                                         │
//! │  Pick location ─────────► set_pickup_location() ─► search.pickup       │
//! │  Age stepper ───────────► set_driver_age() ──────► search.driver_age   │
//! │  Choose car ────────────► select_car() ──────────► car                 │
//! │  Protection sheet ──────► select_protection() ───► selection.tier      │
//! │  Extras sheet ──────────► toggle_extra() ────────► selection.extras    │
//! │  Driver / payment sheet ► set_primary_driver() ──► selection.driver    │
//! │  Confirm button ────────► confirm_with() ────────► progress            │
//! │                                                                         │
//! │  Every applied change ──► observer.on_change(snapshot)                 │
//! │                                                                         │
//! │  NOTE: Pricing, gates and phase are derived on every read.             │
//! │        While Processing or Confirmed, edits are ignored.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wayfare_core::pricing::{self, compute_pricing};
use wayfare_core::validation;
use wayfare_core::{
    Car, CoreError, DriverInfo, ExtraKind, Location, PaymentData, PaymentSummary, PricingBreakdown,
    PricingPolicy, ProtectionTier, ReadinessGates, SearchParams, SelectionState,
    YoungDriverNotice,
};

use crate::checkout::{
    submit_with_timeout, BookingConfirmation, BookingGateway, BookingRequest, CheckoutPhase,
    ConfirmFailure,
};
use crate::config::EngineConfig;
use crate::error::{BookingError, BookingResult};
use crate::snapshot::{BookingSnapshot, NoOpObserver, StoreObserver};

/// Stored part of the checkout phase. `Incomplete` and `ReadyToConfirm`
/// are both `Editing` here and told apart by the gates.
#[derive(Debug, Clone)]
enum Progress {
    Editing,
    Processing { attempt_id: Uuid },
    Confirmed(BookingConfirmation),
}

/// The booking aggregate.
///
/// ## Invariants
/// - Fields are private and change only through the methods below
/// - Nothing derived is stored; `pricing()` and `gates()` recompute
/// - While a confirmation is processing the submitted quote cannot drift
pub struct BookingStore {
    search: SearchParams,
    selection: SelectionState,
    car: Option<Car>,
    policy: PricingPolicy,
    /// Template restored by `reset()`.
    search_defaults: SearchParams,
    progress: Progress,
    last_failure: Option<ConfirmFailure>,
    observer: Arc<dyn StoreObserver>,
}

impl fmt::Debug for BookingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingStore")
            .field("search", &self.search)
            .field("selection", &self.selection)
            .field("car", &self.car.as_ref().map(|c| &c.id))
            .field("progress", &self.progress)
            .field("last_failure", &self.last_failure)
            .finish_non_exhaustive()
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    /// Creates a store with the default pricing policy and search defaults.
    pub fn new() -> Self {
        Self::with_policy(PricingPolicy::default(), SearchParams::default())
    }

    pub fn with_policy(policy: PricingPolicy, search_defaults: SearchParams) -> Self {
        BookingStore {
            search: search_defaults.clone(),
            selection: SelectionState::new(),
            car: None,
            policy,
            search_defaults,
            progress: Progress::Editing,
            last_failure: None,
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Creates a store from engine configuration.
    pub fn from_config(config: &EngineConfig) -> BookingResult<Self> {
        Ok(Self::with_policy(config.pricing_policy(), config.search_defaults()?))
    }

    /// Attaches an observer that receives a snapshot after every change.
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    // =========================================================================
    // Search Mutators
    // =========================================================================

    pub fn set_pickup_location(&mut self, location: Location) {
        self.edit("set_pickup_location", |search, _| {
            search.set_pickup_location(location)
        });
    }

    pub fn set_return_location(&mut self, location: Location) {
        self.edit("set_return_location", |search, _| {
            search.set_return_location(location)
        });
    }

    pub fn set_same_return_location(&mut self, same: bool) {
        self.edit("set_same_return_location", |search, _| {
            search.set_same_return_location(same)
        });
    }

    pub fn set_pickup_date(&mut self, date: NaiveDate) {
        self.edit("set_pickup_date", |search, _| search.set_pickup_date(date));
    }

    pub fn set_pickup_time(&mut self, time: NaiveTime) {
        self.edit("set_pickup_time", |search, _| search.set_pickup_time(time));
    }

    pub fn set_return_date(&mut self, date: NaiveDate) {
        self.edit("set_return_date", |search, _| search.set_return_date(date));
    }

    pub fn set_return_time(&mut self, time: NaiveTime) {
        self.edit("set_return_time", |search, _| search.set_return_time(time));
    }

    /// Sets the driver's age. Out-of-range values are ignored.
    ///
    /// Returns whether the age was applied.
    pub fn set_driver_age(&mut self, age: u32) -> bool {
        self.edit("set_driver_age", |search, _| search.set_driver_age(age))
            .unwrap_or(false)
    }

    pub fn increment_driver_age(&mut self) {
        self.edit("increment_driver_age", |search, _| {
            search.increment_driver_age()
        });
    }

    pub fn decrement_driver_age(&mut self) {
        self.edit("decrement_driver_age", |search, _| {
            search.decrement_driver_age()
        });
    }

    // =========================================================================
    // Car & Selection Mutators
    // =========================================================================

    /// Selects the car to book, as supplied by the car catalog.
    ///
    /// A car whose daily price is negative or above
    /// [`MAX_DAILY_PRICE_CENTS`](validation::MAX_DAILY_PRICE_CENTS) is
    /// rejected and the current car is kept. Returns `Ok(false)` if the
    /// booking is locked.
    pub fn select_car(&mut self, car: Car) -> BookingResult<bool> {
        if let Err(e) = validation::validate_car(&car) {
            warn!(car_id = %car.id, price_per_day = %car.price_per_day, "Car rejected: {}", e);
            return Err(CoreError::from(e).into());
        }
        if !self.ensure_editable("select_car") {
            return Ok(false);
        }
        debug!(car_id = %car.id, price_per_day = %car.price_per_day, "Car selected");
        self.car = Some(car);
        self.notify();
        Ok(true)
    }

    pub fn select_protection(&mut self, tier: ProtectionTier) {
        self.edit("select_protection", |_, selection| {
            selection.select_protection(tier)
        });
    }

    /// Selects a protection tier by its catalog id.
    pub fn select_protection_id(&mut self, id: &str) -> BookingResult<()> {
        let tier: ProtectionTier = id.parse()?;
        self.select_protection(tier);
        Ok(())
    }

    /// Switches an extra on or off. Returns whether it is selected
    /// afterwards.
    pub fn toggle_extra(&mut self, kind: ExtraKind) -> bool {
        self.edit("toggle_extra", |_, selection| selection.toggle_extra(kind))
            .unwrap_or_else(|| self.selection.is_extra_selected(kind))
    }

    /// Toggles an extra by its catalog id.
    pub fn toggle_extra_id(&mut self, id: &str) -> BookingResult<bool> {
        let kind: ExtraKind = id.parse()?;
        Ok(self.toggle_extra(kind))
    }

    /// Sets the quantity of a selected extra, clamped to its maximum.
    ///
    /// Returns the stored quantity, or `None` if the extra is not selected.
    pub fn set_extra_quantity(&mut self, kind: ExtraKind, qty: u32) -> Option<u32> {
        match self.edit("set_extra_quantity", |_, selection| {
            selection.set_extra_quantity(kind, qty)
        }) {
            Some(stored) => stored,
            None => self.selection.extra_quantity(kind),
        }
    }

    pub fn set_primary_driver(&mut self, info: DriverInfo) {
        self.edit("set_primary_driver", |_, selection| {
            selection.set_primary_driver(info)
        });
    }

    pub fn set_payment_data(&mut self, data: PaymentData) {
        self.edit("set_payment_data", |_, selection| {
            debug!(payment = %data.summary(), "Payment profile saved");
            selection.set_payment_data(data)
        });
    }

    pub fn clear_payment_data(&mut self) {
        self.edit("clear_payment_data", |_, selection| {
            selection.clear_payment_data()
        });
    }

    // =========================================================================
    // Derived State
    // =========================================================================

    pub fn search(&self) -> &SearchParams {
        &self.search
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn car(&self) -> Option<&Car> {
        self.car.as_ref()
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Billable days for the current dates.
    pub fn rental_days(&self) -> u32 {
        self.search.rental_days()
    }

    /// The current quote, or `None` until a car is selected.
    pub fn pricing(&self) -> Option<PricingBreakdown> {
        self.car
            .as_ref()
            .map(|car| compute_pricing(car, &self.search, &self.selection, &self.policy))
    }

    pub fn gates(&self) -> ReadinessGates {
        ReadinessGates::evaluate(&self.search, &self.selection)
    }

    pub fn phase(&self) -> CheckoutPhase {
        match &self.progress {
            Progress::Processing { .. } => CheckoutPhase::Processing,
            Progress::Confirmed(_) => CheckoutPhase::Confirmed,
            Progress::Editing if validation::can_confirm(&self.selection) => {
                CheckoutPhase::ReadyToConfirm
            }
            Progress::Editing => CheckoutPhase::Incomplete,
        }
    }

    /// Advisory young-driver fee for drivers under 25. Never part of the
    /// quote.
    pub fn young_driver_notice(&self) -> Option<YoungDriverNotice> {
        pricing::young_driver_notice(&self.search, &self.policy)
    }

    pub fn payment_summary(&self) -> Option<PaymentSummary> {
        self.selection.payment_summary()
    }

    pub fn last_failure(&self) -> Option<&ConfirmFailure> {
        self.last_failure.as_ref()
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        match &self.progress {
            Progress::Confirmed(confirmation) => Some(confirmation),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            search: self.search.clone(),
            selection: self.selection.clone(),
            car: self.car.clone(),
            payment: self.payment_summary(),
            pricing: self.pricing(),
            gates: self.gates(),
            phase: self.phase(),
            young_driver_notice: self.young_driver_notice(),
            last_failure: self.last_failure.clone(),
            confirmation: self.confirmation().cloned(),
        }
    }

    // =========================================================================
    // Confirmation Lifecycle
    // =========================================================================

    /// Moves to `Processing` and returns the request to hand to the gateway.
    ///
    /// ## Errors
    /// - `AlreadyProcessing` / `AlreadyConfirmed` from the locked phases
    /// - `NoCarSelected` without a car
    /// - `NotReady` while driver or payment details are missing
    pub fn begin_confirmation(&mut self) -> BookingResult<BookingRequest> {
        match &self.progress {
            Progress::Processing { .. } => return Err(BookingError::AlreadyProcessing),
            Progress::Confirmed(_) => return Err(BookingError::AlreadyConfirmed),
            Progress::Editing => {}
        }

        let car = self.car.clone().ok_or(BookingError::NoCarSelected)?;

        let gates = self.gates();
        if !gates.can_confirm {
            let mut missing = Vec::new();
            if !gates.driver_complete {
                missing.push("driver details");
            }
            if !gates.payment_complete {
                missing.push("payment details");
            }
            return Err(BookingError::NotReady {
                missing: missing.join(" and "),
            });
        }

        let pricing = compute_pricing(&car, &self.search, &self.selection, &self.policy);
        let attempt_id = Uuid::new_v4();

        info!(
            %attempt_id,
            car_id = %car.id,
            total = %pricing.display_total(),
            payment = ?self.selection.payment_summary().map(|p| p.to_string()),
            "Confirmation started"
        );

        self.progress = Progress::Processing { attempt_id };
        self.last_failure = None;
        self.notify();

        Ok(BookingRequest {
            attempt_id,
            car,
            search: self.search.clone(),
            selection: self.selection.clone(),
            pricing,
        })
    }

    /// Records the outcome of attempt `attempt_id`.
    ///
    /// A result for an attempt that is no longer processing (cancelled or
    /// reset) is discarded and reported as `Cancelled`.
    pub fn finish_confirmation(
        &mut self,
        attempt_id: Uuid,
        outcome: Result<BookingConfirmation, ConfirmFailure>,
    ) -> BookingResult<BookingConfirmation> {
        match &self.progress {
            Progress::Processing { attempt_id: current } if *current == attempt_id => {}
            _ => {
                debug!(%attempt_id, "Discarding result of a stale confirmation attempt");
                return Err(BookingError::Confirmation(ConfirmFailure::Cancelled));
            }
        }

        let result = match outcome {
            Ok(confirmation) => {
                info!(
                    %attempt_id,
                    reference = %confirmation.reference,
                    total = %confirmation.total,
                    "Booking confirmed"
                );
                self.progress = Progress::Confirmed(confirmation.clone());
                Ok(confirmation)
            }
            Err(failure) => {
                warn!(%attempt_id, %failure, "Confirmation failed");
                self.progress = Progress::Editing;
                self.last_failure = Some(failure.clone());
                Err(BookingError::Confirmation(failure))
            }
        };

        self.notify();
        result
    }

    /// Abandons the in-flight confirmation, if any.
    ///
    /// Returns true if a confirmation was processing.
    pub fn cancel(&mut self) -> bool {
        let Progress::Processing { attempt_id } = self.progress else {
            return false;
        };

        info!(%attempt_id, "Confirmation cancelled");
        self.progress = Progress::Editing;
        self.last_failure = Some(ConfirmFailure::Cancelled);
        self.notify();
        true
    }

    /// Runs the whole confirm flow against `gateway`, bounded by `timeout`.
    pub async fn confirm_with(
        &mut self,
        gateway: &dyn BookingGateway,
        timeout: Duration,
    ) -> BookingResult<BookingConfirmation> {
        let request = self.begin_confirmation()?;
        let outcome = submit_with_timeout(gateway, &request, timeout).await;
        self.finish_confirmation(request.attempt_id, outcome)
    }

    /// Starts a new booking: search back to its defaults, selections and car
    /// cleared, any failure or confirmation forgotten.
    pub fn reset(&mut self) {
        if let Progress::Processing { attempt_id } = self.progress {
            warn!(%attempt_id, "Reset during confirmation; its result will be discarded");
        }

        self.search = self.search_defaults.clone();
        self.selection = SelectionState::new();
        self.car = None;
        self.progress = Progress::Editing;
        self.last_failure = None;

        info!("Booking reset");
        self.notify();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_editable(&self, action: &'static str) -> bool {
        let phase = self.phase();
        if phase.is_locked() {
            warn!(action, %phase, "Ignoring edit while booking is locked");
            return false;
        }
        true
    }

    /// Applies an edit unless the booking is locked, then notifies the
    /// observer. Returns `None` if the edit was ignored.
    fn edit<R>(
        &mut self,
        action: &'static str,
        apply: impl FnOnce(&mut SearchParams, &mut SelectionState) -> R,
    ) -> Option<R> {
        if !self.ensure_editable(action) {
            return None;
        }
        let result = apply(&mut self.search, &mut self.selection);
        debug!(action, "Booking edited");
        self.notify();
        Some(result)
    }

    fn notify(&self) {
        self.observer.on_change(&self.snapshot());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
