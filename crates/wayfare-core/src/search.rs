//! # Search Parameters
//!
//! The search-time intent edited from the search screen: where and when the
//! car is picked up and returned, and how old the driver is.
//!
//! ## Invariants Held by the Setters
//! - `driver_age` stays within `[MIN_DRIVER_AGE, MAX_DRIVER_AGE]`
//! - `return_date` never precedes `pickup_date`
//! - `return_location` is empty whenever `same_return_location` is set
//!
//! Fields are private; the only way to change them is through the setters
//! below, which is what keeps the invariants intact.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use ts_rs::TS;

use crate::pricing;
use crate::types::Location;

pub const MIN_DRIVER_AGE: u8 = 18;
pub const MAX_DRIVER_AGE: u8 = 99;
pub const DEFAULT_DRIVER_AGE: u8 = 25;

/// Drivers younger than this are shown the young-driver notice.
pub const YOUNG_DRIVER_AGE: u8 = 25;

/// Default counter time for both pickup and return.
pub fn default_counter_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pickup_location: Option<Location>,
    return_location: Option<Location>,
    same_return_location: bool,
    #[ts(as = "Option<String>")]
    pickup_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pickup_time: NaiveTime,
    #[ts(as = "Option<String>")]
    return_date: Option<NaiveDate>,
    #[ts(as = "String")]
    return_time: NaiveTime,
    driver_age: u8,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams::with_defaults(
            DEFAULT_DRIVER_AGE,
            default_counter_time(),
            default_counter_time(),
        )
    }
}

impl SearchParams {
    /// Fresh search state as created when the search screen mounts.
    ///
    /// An out-of-range `driver_age` falls back to [`DEFAULT_DRIVER_AGE`].
    pub fn with_defaults(driver_age: u8, pickup_time: NaiveTime, return_time: NaiveTime) -> Self {
        let driver_age = if (MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&driver_age) {
            driver_age
        } else {
            DEFAULT_DRIVER_AGE
        };

        SearchParams {
            pickup_location: None,
            return_location: None,
            same_return_location: true,
            pickup_date: None,
            pickup_time,
            return_date: None,
            return_time,
            driver_age,
        }
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_pickup_location(&mut self, location: Location) {
        self.pickup_location = Some(location);
    }

    pub fn set_return_location(&mut self, location: Location) {
        self.return_location = Some(location);
    }

    /// Toggles "return to the same location". Turning it on forgets any
    /// separately chosen return location.
    pub fn set_same_return_location(&mut self, same: bool) {
        self.same_return_location = same;
        if same {
            self.return_location = None;
        }
    }

    /// Sets the pickup date. A return date that would now precede it is
    /// moved forward to the pickup date.
    pub fn set_pickup_date(&mut self, date: NaiveDate) {
        self.pickup_date = Some(date);
        if let Some(return_date) = self.return_date {
            if return_date < date {
                self.return_date = Some(date);
            }
        }
    }

    pub fn set_pickup_time(&mut self, time: NaiveTime) {
        self.pickup_time = time;
    }

    /// Sets the return date, raised to the pickup date if earlier (the
    /// return picker's minimum date).
    pub fn set_return_date(&mut self, date: NaiveDate) {
        let date = match self.pickup_date {
            Some(pickup) if date < pickup => pickup,
            _ => date,
        };
        self.return_date = Some(date);
    }

    pub fn set_return_time(&mut self, time: NaiveTime) {
        self.return_time = time;
    }

    /// Sets the driver's age.
    ///
    /// Values outside `[18, 99]` are ignored: the stepper disables its
    /// buttons at the bounds, so an out-of-range value is a stray event,
    /// not something to report.
    ///
    /// Returns whether the age was applied.
    pub fn set_driver_age(&mut self, age: u32) -> bool {
        if age < MIN_DRIVER_AGE as u32 || age > MAX_DRIVER_AGE as u32 {
            return false;
        }
        self.driver_age = age as u8;
        true
    }

    /// Stepper "+" button; saturates at the upper bound.
    pub fn increment_driver_age(&mut self) {
        self.set_driver_age(self.driver_age as u32 + 1);
    }

    /// Stepper "−" button; saturates at the lower bound.
    pub fn decrement_driver_age(&mut self) {
        self.set_driver_age((self.driver_age as u32).saturating_sub(1));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn pickup_location(&self) -> Option<&Location> {
        self.pickup_location.as_ref()
    }

    pub fn return_location(&self) -> Option<&Location> {
        self.return_location.as_ref()
    }

    /// Where the car actually goes back: the pickup location when
    /// returning to the same place.
    pub fn effective_return_location(&self) -> Option<&Location> {
        if self.same_return_location {
            self.pickup_location.as_ref()
        } else {
            self.return_location.as_ref()
        }
    }

    pub fn same_return_location(&self) -> bool {
        self.same_return_location
    }

    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    pub fn pickup_time(&self) -> NaiveTime {
        self.pickup_time
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn return_time(&self) -> NaiveTime {
        self.return_time
    }

    pub fn driver_age(&self) -> u8 {
        self.driver_age
    }

    pub fn is_young_driver(&self) -> bool {
        self.driver_age < YOUNG_DRIVER_AGE
    }

    /// Billable rental days for the current dates (never below 1).
    pub fn rental_days(&self) -> u32 {
        pricing::rental_days(self.pickup_date, self.return_date)
    }

    /// Whether the search form can be submitted.
    ///
    /// True iff a pickup location and both dates are set, and either the
    /// car returns to the same location or a return location is chosen.
    pub fn is_search_valid(&self) -> bool {
        self.pickup_location.is_some()
            && self.pickup_date.is_some()
            && self.return_date.is_some()
            && (self.same_return_location || self.return_location.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocationKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lax() -> Location {
        Location::new("loc-lax", "Los Angeles Intl", "LAX", LocationKind::Airport)
    }

    fn downtown() -> Location {
        Location::new("loc-dtla", "Downtown LA", "DTLA", LocationKind::City)
    }

    #[test]
    fn test_defaults() {
        let params = SearchParams::default();
        assert_eq!(params.driver_age(), 25);
        assert!(params.same_return_location());
        assert_eq!(params.pickup_time(), default_counter_time());
        assert!(!params.is_search_valid());
    }

    #[test]
    fn test_driver_age_ignores_out_of_range() {
        let mut params = SearchParams::default();

        assert!(!params.set_driver_age(17));
        assert_eq!(params.driver_age(), 25);

        assert!(params.set_driver_age(18));
        assert_eq!(params.driver_age(), 18);

        assert!(!params.set_driver_age(100));
        assert!(params.set_driver_age(99));
        assert_eq!(params.driver_age(), 99);
    }

    #[test]
    fn test_driver_age_stepper_saturates() {
        let mut params = SearchParams::default();
        params.set_driver_age(18);
        params.decrement_driver_age();
        assert_eq!(params.driver_age(), 18);

        params.set_driver_age(99);
        params.increment_driver_age();
        assert_eq!(params.driver_age(), 99);

        params.decrement_driver_age();
        assert_eq!(params.driver_age(), 98);
    }

    #[test]
    fn test_with_defaults_rejects_bad_age() {
        let params = SearchParams::with_defaults(12, default_counter_time(), default_counter_time());
        assert_eq!(params.driver_age(), DEFAULT_DRIVER_AGE);
    }

    #[test]
    fn test_young_driver() {
        let mut params = SearchParams::default();
        assert!(!params.is_young_driver());
        params.set_driver_age(24);
        assert!(params.is_young_driver());
    }

    #[test]
    fn test_same_return_location_clears_return() {
        let mut params = SearchParams::default();
        params.set_same_return_location(false);
        params.set_return_location(downtown());
        assert_eq!(params.return_location(), Some(&downtown()));

        params.set_same_return_location(true);
        assert!(params.return_location().is_none());
    }

    #[test]
    fn test_effective_return_location() {
        let mut params = SearchParams::default();
        params.set_pickup_location(lax());
        assert_eq!(params.effective_return_location(), Some(&lax()));

        params.set_same_return_location(false);
        assert!(params.effective_return_location().is_none());
        params.set_return_location(downtown());
        assert_eq!(params.effective_return_location(), Some(&downtown()));
    }

    #[test]
    fn test_return_date_never_precedes_pickup() {
        let mut params = SearchParams::default();
        params.set_pickup_date(date(2025, 3, 4));
        params.set_return_date(date(2025, 3, 1));
        assert_eq!(params.return_date(), Some(date(2025, 3, 4)));

        // Moving pickup past return drags return along
        params.set_return_date(date(2025, 3, 6));
        params.set_pickup_date(date(2025, 3, 10));
        assert_eq!(params.return_date(), Some(date(2025, 3, 10)));

        // Moving pickup earlier leaves return alone
        params.set_pickup_date(date(2025, 3, 8));
        assert_eq!(params.return_date(), Some(date(2025, 3, 10)));
    }

    #[test]
    fn test_search_validity_progression() {
        let mut params = SearchParams::default();
        assert!(!params.is_search_valid());

        params.set_pickup_location(lax());
        assert!(!params.is_search_valid());

        params.set_pickup_date(date(2025, 3, 1));
        assert!(!params.is_search_valid());

        params.set_return_date(date(2025, 3, 4));
        assert!(params.is_search_valid());

        params.set_same_return_location(false);
        assert!(!params.is_search_valid());

        params.set_return_location(downtown());
        assert!(params.is_search_valid());
    }

    #[test]
    fn test_rental_days_delegates_to_pricing() {
        let mut params = SearchParams::default();
        assert_eq!(params.rental_days(), 1);
        params.set_pickup_date(date(2025, 3, 1));
        params.set_return_date(date(2025, 3, 4));
        assert_eq!(params.rental_days(), 3);
    }
}
