//! # Checkout Selections
//!
//! What the renter picked on the checkout sheets: one protection tier, any
//! number of extras, the primary driver and the payment profile.
//!
//! ## Sheet → Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Protection sheet ──► select_protection(tier)                          │
//! │  Extras sheet     ──► toggle_extra(kind) / set_extra_quantity(kind, n) │
//! │  Driver sheet     ──► set_primary_driver(info)   (whole form on save)  │
//! │  Payment sheet    ──► set_payment_data(data)     (whole form on save)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::catalog::{CarExtra, ExtraKind, ProtectionPackage, ProtectionTier};
use crate::types::{DriverInfo, PaymentData, PaymentSummary};

// =============================================================================
// Selected Extra
// =============================================================================

/// An extra the renter switched on, with its quantity.
///
/// `quantity` is always within `1..=extra.max_quantity`; only
/// [`SelectionState`] constructs and mutates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedExtra {
    #[serde(rename = "extraId")]
    kind: ExtraKind,
    quantity: u32,
}

impl SelectedExtra {
    pub fn kind(&self) -> ExtraKind {
        self.kind
    }

    pub fn extra(&self) -> &'static CarExtra {
        self.kind.extra()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Selection State
// =============================================================================

#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    protection: ProtectionTier,
    extras: Vec<SelectedExtra>,
    driver: Option<DriverInfo>,
    #[serde(skip)]
    payment: Option<PaymentData>,
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("protection", &self.protection)
            .field("extras", &self.extras)
            .field("driver", &self.driver.as_ref().map(DriverInfo::full_name))
            .field("payment", &self.payment_summary())
            .finish()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Protection
    // =========================================================================

    /// Replaces the selected protection tier. Exactly one tier is always
    /// selected.
    pub fn select_protection(&mut self, tier: ProtectionTier) {
        self.protection = tier;
    }

    pub fn protection(&self) -> ProtectionTier {
        self.protection
    }

    pub fn protection_package(&self) -> &'static ProtectionPackage {
        self.protection.package()
    }

    // =========================================================================
    // Extras
    // =========================================================================

    /// Switches an extra on (quantity 1) or off.
    ///
    /// Switching off discards the quantity; switching back on starts at 1.
    /// Returns whether the extra is selected afterwards.
    pub fn toggle_extra(&mut self, kind: ExtraKind) -> bool {
        if let Some(pos) = self.extras.iter().position(|e| e.kind == kind) {
            self.extras.remove(pos);
            false
        } else {
            self.extras.push(SelectedExtra { kind, quantity: 1 });
            true
        }
    }

    /// Sets the quantity of a selected extra, clamped to
    /// `[1, max_quantity]`.
    ///
    /// No-op when the extra isn't selected. Returns the stored quantity, or
    /// `None` if the extra is not selected.
    pub fn set_extra_quantity(&mut self, kind: ExtraKind, qty: u32) -> Option<u32> {
        let selected = self.extras.iter_mut().find(|e| e.kind == kind)?;
        selected.quantity = qty.clamp(1, kind.max_quantity());
        Some(selected.quantity)
    }

    pub fn extras(&self) -> &[SelectedExtra] {
        &self.extras
    }

    pub fn is_extra_selected(&self, kind: ExtraKind) -> bool {
        self.extras.iter().any(|e| e.kind == kind)
    }

    pub fn extra_quantity(&self, kind: ExtraKind) -> Option<u32> {
        self.extras.iter().find(|e| e.kind == kind).map(|e| e.quantity)
    }

    // =========================================================================
    // Driver & Payment
    // =========================================================================

    /// Replaces the driver profile (form-level save).
    pub fn set_primary_driver(&mut self, info: DriverInfo) {
        self.driver = Some(info);
    }

    pub fn primary_driver(&self) -> Option<&DriverInfo> {
        self.driver.as_ref()
    }

    /// Replaces the payment profile (form-level save).
    pub fn set_payment_data(&mut self, data: PaymentData) {
        self.payment = Some(data);
    }

    /// Forgets the saved payment profile.
    pub fn clear_payment_data(&mut self) {
        self.payment = None;
    }

    pub fn payment_data(&self) -> Option<&PaymentData> {
        self.payment.as_ref()
    }

    /// Masked view of the payment profile.
    pub fn payment_summary(&self) -> Option<PaymentSummary> {
        self.payment.as_ref().map(PaymentData::summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> PaymentData {
        PaymentData {
            card_number: "4242424242424242".to_string(),
            expiry: "12/29".to_string(),
            cvv: "987".to_string(),
            cardholder_name: "Grace Hopper".to_string(),
            billing_address: "1 Navy Yard".to_string(),
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zip_code: "22202".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn test_default_selection() {
        let selection = SelectionState::new();
        assert_eq!(selection.protection(), ProtectionTier::Basic);
        assert!(selection.extras().is_empty());
        assert!(selection.primary_driver().is_none());
        assert!(selection.payment_data().is_none());
    }

    #[test]
    fn test_select_protection_replaces() {
        let mut selection = SelectionState::new();
        selection.select_protection(ProtectionTier::Premium);
        selection.select_protection(ProtectionTier::Standard);
        assert_eq!(selection.protection(), ProtectionTier::Standard);
        assert_eq!(selection.protection_package().name, "Standard Protection");
    }

    #[test]
    fn test_toggle_extra_on_and_off() {
        let mut selection = SelectionState::new();
        assert!(selection.toggle_extra(ExtraKind::Gps));
        assert!(selection.is_extra_selected(ExtraKind::Gps));
        assert_eq!(selection.extra_quantity(ExtraKind::Gps), Some(1));

        assert!(!selection.toggle_extra(ExtraKind::Gps));
        assert!(!selection.is_extra_selected(ExtraKind::Gps));
    }

    #[test]
    fn test_toggle_off_discards_quantity() {
        let mut selection = SelectionState::new();
        selection.toggle_extra(ExtraKind::ChildSeat);
        selection.set_extra_quantity(ExtraKind::ChildSeat, 3);
        selection.toggle_extra(ExtraKind::ChildSeat);
        selection.toggle_extra(ExtraKind::ChildSeat);
        assert_eq!(selection.extra_quantity(ExtraKind::ChildSeat), Some(1));
    }

    #[test]
    fn test_set_extra_quantity_clamps() {
        let mut selection = SelectionState::new();
        selection.toggle_extra(ExtraKind::ChildSeat); // max 3

        assert_eq!(selection.set_extra_quantity(ExtraKind::ChildSeat, 10), Some(3));
        assert_eq!(selection.set_extra_quantity(ExtraKind::ChildSeat, 0), Some(1));
        assert_eq!(selection.set_extra_quantity(ExtraKind::ChildSeat, 2), Some(2));
    }

    #[test]
    fn test_set_extra_quantity_requires_selection() {
        let mut selection = SelectionState::new();
        assert_eq!(selection.set_extra_quantity(ExtraKind::ChildSeat, 2), None);
        assert!(!selection.is_extra_selected(ExtraKind::ChildSeat));
    }

    #[test]
    fn test_quantity_always_within_bounds() {
        let mut selection = SelectionState::new();
        for kind in ExtraKind::ALL {
            selection.toggle_extra(kind);
            for qty in [0, 1, 2, 3, 4, 50, u32::MAX] {
                selection.set_extra_quantity(kind, qty);
            }
        }
        for selected in selection.extras() {
            assert!(selected.quantity() >= 1);
            assert!(selected.quantity() <= selected.extra().max_quantity);
        }
    }

    #[test]
    fn test_extras_keep_selection_order() {
        let mut selection = SelectionState::new();
        selection.toggle_extra(ExtraKind::SkiRack);
        selection.toggle_extra(ExtraKind::Gps);
        let kinds: Vec<_> = selection.extras().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![ExtraKind::SkiRack, ExtraKind::Gps]);
    }

    #[test]
    fn test_payment_is_not_serialized_or_debug_printed() {
        let mut selection = SelectionState::new();
        selection.set_payment_data(payment());

        let json = serde_json::to_string(&selection).unwrap();
        assert!(!json.contains("4242"));

        let debug = format!("{:?}", selection);
        assert!(!debug.contains("987"));
        assert!(!debug.contains("4242424242424242"));

        selection.clear_payment_data();
        assert!(selection.payment_summary().is_none());
    }
}
