//! # Pricing Calculator
//!
//! Derives the rental quote from the search parameters, the checkout
//! selections and the chosen car. Pure: same inputs, same quote.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rental_days     = max(1, return_date − pickup_date)   (calendar days) │
//! │                                                                         │
//! │  base_rate       = car.price_per_day        × days                     │
//! │  protection_cost = protection.price_per_day × days                     │
//! │  extras_cost     = Σ extra.price_per_day × qty × days                  │
//! │  airport_fee     = policy.airport_fee  if pickup is an airport         │
//! │  ─────────────────────────────────────────────────                     │
//! │  subtotal        = base + protection + extras + airport_fee            │
//! │  taxes           = subtotal × policy.tax_rate                          │
//! │  total           = subtotal + taxes           (exact, no rounding)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens once, in [`PricingBreakdown::display_total`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ExtraKind;
use crate::money::Money;
use crate::search::SearchParams;
use crate::selection::SelectionState;
use crate::types::{Car, TaxRate};

// =============================================================================
// Pricing Policy
// =============================================================================

/// Tax and surcharge settings applied to every quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    /// Flat surcharge when the pickup location is an airport.
    pub airport_fee: Money,
    /// Per-day fee quoted to drivers under 25.
    ///
    /// Shown as a notice only; it is not part of [`PricingBreakdown`].
    pub young_driver_fee_per_day: Money,
}

impl Default for PricingPolicy {
    /// 8% tax, $25.00 airport fee, $15.00/day young-driver notice.
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(800),
            airport_fee: Money::from_cents(2_500),
            young_driver_fee_per_day: Money::from_cents(1_500),
        }
    }
}

// =============================================================================
// Rental Days
// =============================================================================

/// Billable days between pickup and return, counted in calendar days.
///
/// Same-day rentals bill as one day. So does a missing date or a return
/// date before pickup.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use wayfare_core::pricing::rental_days;
///
/// let pickup = NaiveDate::from_ymd_opt(2025, 3, 1);
/// let ret = NaiveDate::from_ymd_opt(2025, 3, 4);
/// assert_eq!(rental_days(pickup, ret), 3);
/// assert_eq!(rental_days(pickup, pickup), 1);
/// assert_eq!(rental_days(None, ret), 1);
/// ```
pub fn rental_days(pickup: Option<NaiveDate>, return_date: Option<NaiveDate>) -> u32 {
    match (pickup, return_date) {
        (Some(pickup), Some(return_date)) => {
            let days = (return_date - pickup).num_days().max(1);
            u32::try_from(days).unwrap_or(u32::MAX)
        }
        _ => 1,
    }
}

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// Charge for one selected extra over the whole rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraCharge {
    pub extra_id: ExtraKind,
    pub quantity: u32,
    pub amount: Money,
}

/// The derived quote. Never edited directly; recompute instead.
///
/// ## Invariant
/// `total == base_rate + protection_cost + extras_cost + airport_fee + taxes`
/// exactly, and every amount is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub rental_days: u32,
    pub base_rate: Money,
    pub protection_cost: Money,
    pub extras_cost: Money,
    pub extras: Vec<ExtraCharge>,
    pub airport_fee: Money,
    pub taxes: Money,
    pub total: Money,
}

impl PricingBreakdown {
    /// Everything before tax.
    pub fn subtotal(&self) -> Money {
        self.base_rate + self.protection_cost + self.extras_cost + self.airport_fee
    }

    /// The total as shown to the renter, rounded to cents.
    pub fn display_total(&self) -> Money {
        self.total.round_to_cents()
    }

    /// Labelled, non-zero line items for receipt-style rendering.
    /// Base rate and taxes are always listed.
    pub fn lines(&self) -> Vec<PriceLine> {
        let day_word = if self.rental_days == 1 { "day" } else { "days" };
        let mut lines = vec![PriceLine::new(
            format!("Car rental ({} {})", self.rental_days, day_word),
            self.base_rate,
        )];

        if !self.protection_cost.is_zero() {
            lines.push(PriceLine::new("Protection", self.protection_cost));
        }
        for charge in &self.extras {
            let extra = charge.extra_id.extra();
            let label = if charge.quantity > 1 {
                format!("{} × {}", extra.name, charge.quantity)
            } else {
                extra.name.to_string()
            };
            lines.push(PriceLine::new(label, charge.amount));
        }
        if !self.airport_fee.is_zero() {
            lines.push(PriceLine::new("Airport surcharge", self.airport_fee));
        }
        lines.push(PriceLine::new("Taxes & fees", self.taxes));
        lines
    }

    /// Checks the exact-sum invariant.
    pub fn is_consistent(&self) -> bool {
        let amounts = [
            self.base_rate,
            self.protection_cost,
            self.extras_cost,
            self.airport_fee,
            self.taxes,
        ];
        amounts.iter().all(|m| !m.is_negative())
            && self.extras.iter().map(|c| c.amount).sum::<Money>() == self.extras_cost
            && self.subtotal() + self.taxes == self.total
    }
}

/// A single labelled amount in a rendered quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceLine {
    pub label: String,
    pub amount: Money,
}

impl PriceLine {
    fn new(label: impl Into<String>, amount: Money) -> Self {
        PriceLine {
            label: label.into(),
            amount,
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the quote for `car` under the current search and selections.
pub fn compute_pricing(
    car: &Car,
    search: &SearchParams,
    selection: &SelectionState,
    policy: &PricingPolicy,
) -> PricingBreakdown {
    let days = search.rental_days();

    let base_rate = car.price_per_day * days;
    let protection_cost = selection.protection_package().price_per_day * days;

    let extras: Vec<ExtraCharge> = selection
        .extras()
        .iter()
        .map(|selected| ExtraCharge {
            extra_id: selected.kind(),
            quantity: selected.quantity(),
            amount: selected.extra().price_per_day * selected.quantity() * days,
        })
        .collect();
    let extras_cost: Money = extras.iter().map(|c| c.amount).sum();

    let airport_fee = match search.pickup_location() {
        Some(location) if location.is_airport() => policy.airport_fee,
        _ => Money::zero(),
    };

    let subtotal = base_rate + protection_cost + extras_cost + airport_fee;
    let taxes = subtotal.calculate_tax(policy.tax_rate);

    PricingBreakdown {
        rental_days: days,
        base_rate,
        protection_cost,
        extras_cost,
        extras,
        airport_fee,
        taxes,
        total: subtotal + taxes,
    }
}

// =============================================================================
// Young Driver Notice
// =============================================================================

/// Advisory young-driver fee, shown on the driver sheet for renters under 25.
///
/// Not charged: [`compute_pricing`] never includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct YoungDriverNotice {
    pub driver_age: u8,
    pub fee_per_day: Money,
    /// `fee_per_day × rental_days`, for the "about $X for this trip" hint.
    pub estimated_fee: Money,
}

pub fn young_driver_notice(search: &SearchParams, policy: &PricingPolicy) -> Option<YoungDriverNotice> {
    if !search.is_young_driver() || policy.young_driver_fee_per_day.is_zero() {
        return None;
    }
    Some(YoungDriverNotice {
        driver_age: search.driver_age(),
        fee_per_day: policy.young_driver_fee_per_day,
        estimated_fee: policy.young_driver_fee_per_day * search.rental_days(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProtectionTier;
    use crate::types::{Location, LocationKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn car() -> Car {
        Car::new("car-1", "Toyota Corolla", 5_000) // $50/day
    }

    /// Airport pickup, 2025-03-01 → 2025-03-04.
    fn airport_search() -> SearchParams {
        let mut search = SearchParams::default();
        search.set_pickup_location(Location::new(
            "loc-lax",
            "Los Angeles Intl",
            "LAX",
            LocationKind::Airport,
        ));
        search.set_pickup_date(date(2025, 3, 1));
        search.set_return_date(date(2025, 3, 4));
        search
    }

    #[test]
    fn test_rental_days_is_max_one_and_calendar_difference() {
        let start = date(2025, 1, 30);
        for d in 0..40i64 {
            let end = start + chrono::Duration::days(d);
            assert_eq!(rental_days(Some(start), Some(end)), d.max(1) as u32);
        }
    }

    #[test]
    fn test_rental_days_crosses_month_and_leap_day() {
        assert_eq!(rental_days(Some(date(2024, 2, 28)), Some(date(2024, 3, 1))), 2);
        assert_eq!(rental_days(Some(date(2025, 2, 28)), Some(date(2025, 3, 1))), 1);
    }

    #[test]
    fn test_rental_days_return_before_pickup_bills_one_day() {
        assert_eq!(rental_days(Some(date(2025, 3, 4)), Some(date(2025, 3, 1))), 1);
    }

    #[test]
    fn test_airport_scenario_basic_no_extras() {
        let policy = PricingPolicy::default();
        let quote = compute_pricing(&car(), &airport_search(), &SelectionState::new(), &policy);

        let fee = policy.airport_fee;
        assert_eq!(quote.rental_days, 3);
        assert_eq!(quote.base_rate, Money::from_cents(15_000));
        assert_eq!(quote.protection_cost, Money::zero());
        assert_eq!(quote.extras_cost, Money::zero());
        assert_eq!(quote.airport_fee, fee);
        assert_eq!(
            quote.taxes,
            (Money::from_cents(15_000) + fee).calculate_tax(TaxRate::from_bps(800))
        );
        assert_eq!(quote.total, Money::from_cents(15_000) + fee + quote.taxes);

        // $150 + $25 = $175, 8% = $14.00, total $189.00
        assert_eq!(quote.taxes, Money::from_cents(1_400));
        assert_eq!(quote.total, Money::from_cents(18_900));
        assert!(quote.is_consistent());
    }

    #[test]
    fn test_gps_extra_adds_exactly_taxed_amount() {
        let policy = PricingPolicy::default();
        let search = airport_search();
        let mut selection = SelectionState::new();
        let before = compute_pricing(&car(), &search, &selection, &policy);

        selection.toggle_extra(ExtraKind::Gps);
        let after = compute_pricing(&car(), &search, &selection, &policy);

        assert_eq!(after.extras_cost, Money::from_cents(3_000));
        // 30 × 1.08 = 32.40
        assert_eq!(after.total - before.total, Money::from_cents(3_240));
        assert!(after.is_consistent());
    }

    #[test]
    fn test_toggle_extra_off_restores_extras_cost() {
        let policy = PricingPolicy::default();
        let search = airport_search();
        let mut selection = SelectionState::new();
        selection.toggle_extra(ExtraKind::ChildSeat);
        let before = compute_pricing(&car(), &search, &selection, &policy);

        selection.toggle_extra(ExtraKind::Gps);
        selection.toggle_extra(ExtraKind::Gps);
        let after = compute_pricing(&car(), &search, &selection, &policy);

        assert_eq!(after.extras_cost, before.extras_cost);
        assert!(!selection.is_extra_selected(ExtraKind::Gps));
    }

    #[test]
    fn test_city_pickup_has_no_airport_fee() {
        let mut search = airport_search();
        search.set_pickup_location(Location::new("loc-sm", "Santa Monica", "SMO", LocationKind::City));
        let quote = compute_pricing(&car(), &search, &SelectionState::new(), &PricingPolicy::default());
        assert!(quote.airport_fee.is_zero());
    }

    #[test]
    fn test_protection_and_quantity_scale_with_days() {
        let mut selection = SelectionState::new();
        selection.select_protection(ProtectionTier::Standard); // $15/day
        selection.toggle_extra(ExtraKind::ChildSeat); // $8/day
        selection.set_extra_quantity(ExtraKind::ChildSeat, 2);

        let quote = compute_pricing(&car(), &airport_search(), &selection, &PricingPolicy::default());
        assert_eq!(quote.protection_cost, Money::from_cents(4_500));
        assert_eq!(quote.extras_cost, Money::from_cents(4_800));
        assert_eq!(quote.extras[0].quantity, 2);
        assert!(quote.is_consistent());
    }

    #[test]
    fn test_fractional_tax_is_carried_exactly() {
        let policy = PricingPolicy {
            tax_rate: TaxRate::from_bps(825),
            ..PricingPolicy::default()
        };
        let mut search = airport_search();
        search.set_return_date(date(2025, 3, 2)); // 1 day
        let car = Car::new("car-2", "Fiat 500", 1_999);

        let quote = compute_pricing(&car, &search, &SelectionState::new(), &policy);
        // ($19.99 + $25.00) × 8.25% = $3.711675
        assert_eq!(quote.taxes.micros(), 3_711_675);
        assert_eq!(quote.total.micros(), 48_701_675);
        assert_eq!(quote.display_total(), Money::from_cents(4_870));
        assert!(quote.is_consistent());
    }

    #[test]
    fn test_sum_invariant_across_many_states() {
        let policy = PricingPolicy {
            tax_rate: TaxRate::from_bps(725),
            ..PricingPolicy::default()
        };
        let mut search = airport_search();
        let mut selection = SelectionState::new();

        for (i, kind) in ExtraKind::ALL.into_iter().enumerate() {
            selection.toggle_extra(kind);
            selection.set_extra_quantity(kind, i as u32 + 1);
            selection.select_protection(ProtectionTier::ALL[i % 3]);
            search.set_return_date(date(2025, 3, 2 + i as u32 * 3));

            let quote = compute_pricing(&car(), &search, &selection, &policy);
            assert!(quote.is_consistent(), "inconsistent at step {}", i);
        }
    }

    #[test]
    fn test_lines_include_labels() {
        let mut selection = SelectionState::new();
        selection.toggle_extra(ExtraKind::ChildSeat);
        selection.set_extra_quantity(ExtraKind::ChildSeat, 2);
        let quote = compute_pricing(&car(), &airport_search(), &selection, &PricingPolicy::default());

        let labels: Vec<_> = quote.lines().into_iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec![
                "Car rental (3 days)",
                "Child Seat × 2",
                "Airport surcharge",
                "Taxes & fees"
            ]
        );
    }

    #[test]
    fn test_young_driver_notice_is_advisory() {
        let policy = PricingPolicy::default();
        let mut search = airport_search();
        assert!(young_driver_notice(&search, &policy).is_none());

        search.set_driver_age(21);
        let notice = young_driver_notice(&search, &policy).unwrap();
        assert_eq!(notice.fee_per_day, Money::from_cents(1_500));
        assert_eq!(notice.estimated_fee, Money::from_cents(4_500));

        // The quote is unchanged by the notice
        let young = compute_pricing(&car(), &search, &SelectionState::new(), &policy);
        search.set_driver_age(30);
        let adult = compute_pricing(&car(), &search, &SelectionState::new(), &policy);
        assert_eq!(young.total, adult.total);
    }
}
