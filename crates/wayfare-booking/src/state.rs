//! # Shared Booking State
//!
//! Host-side wrapper that lets several tasks (UI events, the confirm task,
//! a cancel button) work on one [`BookingStore`].
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>` because:
//! 1. UI events and the confirm task run concurrently
//! 2. Only one of them may change the booking at a time
//! 3. The lock must not be held while the gateway is working, or the
//!    cancel button could never get in
//!
//! ## Confirm Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  confirm()                                                              │
//! │    lock ─► begin_confirmation() ─► unlock                               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │    select! { gateway.submit() within timeout  |  cancel notified }     │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │    lock ─► finish_confirmation(attempt_id, outcome) ─► unlock          │
//! │                                                                         │
//! │  cancel_confirmation()                                                  │
//! │    lock ─► store.cancel() ─► unlock ─► notify waiters                  │
//! │                                                                         │
//! │  A result arriving after a cancel carries a stale attempt id and is    │
//! │  discarded by the store.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::checkout::{submit_with_timeout, BookingConfirmation, BookingGateway, ConfirmFailure};
use crate::error::BookingResult;
use crate::snapshot::BookingSnapshot;
use crate::store::BookingStore;

#[derive(Debug, Clone)]
pub struct SharedBookingStore {
    store: Arc<Mutex<BookingStore>>,
    cancel: Arc<Notify>,
    confirm_timeout: Duration,
}

impl SharedBookingStore {
    pub fn new(store: BookingStore, confirm_timeout: Duration) -> Self {
        SharedBookingStore {
            store: Arc::new(Mutex::new(store)),
            cancel: Arc::new(Notify::new()),
            confirm_timeout,
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let phase = shared.with_store(|store| store.phase()).await;
    /// ```
    pub async fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BookingStore) -> R,
    {
        let store = self.store.lock().await;
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shared.with_store_mut(|store| store.toggle_extra(ExtraKind::Gps)).await;
    /// ```
    pub async fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BookingStore) -> R,
    {
        let mut store = self.store.lock().await;
        f(&mut store)
    }

    pub async fn snapshot(&self) -> BookingSnapshot {
        self.with_store(BookingStore::snapshot).await
    }

    /// Confirms the booking through `gateway`.
    ///
    /// Ends early with `ConfirmFailure::Cancelled` when
    /// [`cancel_confirmation`](Self::cancel_confirmation) is called, and with
    /// `ConfirmFailure::Timeout` when the gateway exceeds the configured
    /// timeout.
    pub async fn confirm(&self, gateway: &dyn BookingGateway) -> BookingResult<BookingConfirmation> {
        // Registered before the unlock: a cancel issued after it must wake us.
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        let request = {
            let mut store = self.store.lock().await;
            let request = store.begin_confirmation()?;
            cancelled.as_mut().enable();
            request
        };
        let attempt_id = request.attempt_id;

        let outcome = tokio::select! {
            outcome = submit_with_timeout(gateway, &request, self.confirm_timeout) => outcome,
            _ = &mut cancelled => {
                debug!(%attempt_id, "Gateway call abandoned");
                Err(ConfirmFailure::Cancelled)
            }
        };

        self.store.lock().await.finish_confirmation(attempt_id, outcome)
    }

    /// Cancels the in-flight confirmation. Returns false if none was
    /// processing.
    pub async fn cancel_confirmation(&self) -> bool {
        let cancelled = self.store.lock().await.cancel();
        if cancelled {
            self.cancel.notify_waiters();
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{
        BookingRequest, CheckoutPhase, GatewayError, SimulatedGateway, SimulatedOutcome,
    };
    use async_trait::async_trait;
    use crate::error::BookingError;
    use wayfare_core::{Car, DriverInfo, PaymentData};

    fn shared() -> SharedBookingStore {
        let mut store = BookingStore::new();
        store.select_car(Car::new("car-1", "Toyota Corolla", 5_000)).unwrap();
        store.set_primary_driver(DriverInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            license_number: "D1234567".to_string(),
            ..DriverInfo::default()
        });
        store.set_payment_data(PaymentData {
            card_number: "4242424242424242".to_string(),
            expiry: "08/28".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Ada Lovelace".to_string(),
            billing_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
        });
        SharedBookingStore::new(store, Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_success() {
        let shared = shared();
        let gateway = SimulatedGateway::approving(Duration::from_millis(1500));

        let confirmation = shared.confirm(&gateway).await.unwrap();
        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.phase, CheckoutPhase::Confirmed);
        assert_eq!(snapshot.confirmation, Some(confirmation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_timeout() {
        let shared = shared();
        let gateway = SimulatedGateway::new(Duration::ZERO, SimulatedOutcome::Hang);

        let err = shared.confirm(&gateway).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Confirmation(ConfirmFailure::Timeout { after_secs: 30 })
        ));
        let phase = shared.with_store(|store| store.phase()).await;
        assert_eq!(phase, CheckoutPhase::ReadyToConfirm);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_confirmation() {
        let shared = shared();
        let gateway: Arc<dyn BookingGateway> =
            Arc::new(SimulatedGateway::new(Duration::ZERO, SimulatedOutcome::Hang));

        let task = {
            let shared = shared.clone();
            let gateway = gateway.clone();
            tokio::spawn(async move { shared.confirm(gateway.as_ref()).await })
        };

        // Let the confirm task reach the gateway
        tokio::task::yield_now().await;
        assert_eq!(
            shared.with_store(|store| store.phase()).await,
            CheckoutPhase::Processing
        );

        assert!(shared.cancel_confirmation().await);
        let result = task.await.unwrap();
        assert!(matches!(
            result,
            Err(BookingError::Confirmation(ConfirmFailure::Cancelled))
        ));

        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.phase, CheckoutPhase::ReadyToConfirm);
        assert_eq!(snapshot.last_failure, Some(ConfirmFailure::Cancelled));
    }

    /// Presses cancel from inside the gateway call, before the confirm
    /// select has waited on anything, then never answers.
    struct CancelOnSubmit {
        shared: SharedBookingStore,
    }

    #[async_trait]
    impl BookingGateway for CancelOnSubmit {
        async fn submit(
            &self,
            _request: &BookingRequest,
        ) -> Result<BookingConfirmation, GatewayError> {
            assert!(self.shared.cancel_confirmation().await);
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_right_after_unlock_is_not_lost() {
        let shared = shared();
        let gateway = CancelOnSubmit {
            shared: shared.clone(),
        };

        let started = tokio::time::Instant::now();
        let err = shared.confirm(&gateway).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Confirmation(ConfirmFailure::Cancelled)
        ));
        // Cancelled immediately, not after the 30s timeout
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(
            shared.with_store(|store| store.phase()).await,
            CheckoutPhase::ReadyToConfirm
        );
    }

    #[tokio::test]
    async fn test_cancel_without_confirmation() {
        let shared = shared();
        assert!(!shared.cancel_confirmation().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_blocked_during_shared_confirm() {
        let shared = shared();
        let gateway: Arc<dyn BookingGateway> = Arc::new(SimulatedGateway::approving(
            Duration::from_millis(500),
        ));

        let task = {
            let shared = shared.clone();
            let gateway = gateway.clone();
            tokio::spawn(async move { shared.confirm(gateway.as_ref()).await })
        };
        tokio::task::yield_now().await;

        let applied = shared.with_store_mut(|store| store.set_driver_age(40)).await;
        assert!(!applied);

        task.await.unwrap().unwrap();
        assert_eq!(shared.with_store(|store| store.search().driver_age()).await, 25);
    }
}
