//! # Static Catalogs
//!
//! Protection packages and optional extras offered at checkout.
//!
//! ## Enum-Keyed Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI sends "child_seat"                                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  "child_seat".parse::<ExtraKind>()  ──► Err(UnknownCatalogEntry)       │
//! │        │ Ok(ExtraKind::ChildSeat)        (typed, never a silent miss)  │
//! │        ▼                                                                │
//! │  ExtraKind::ChildSeat.extra()  ──► &'static CarExtra                   │
//! │        (exhaustive match: adding a variant without a catalog entry     │
//! │         does not compile)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog entries are `'static` and immutable; selections store only the
//! enum key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Protection Packages
// =============================================================================

/// Identifier of a protection (coverage) tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionTier {
    /// Included with every rental, zero cost.
    #[default]
    Basic,
    Standard,
    Premium,
}

/// A protection tier with its per-day price and excess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionPackage {
    #[serde(rename = "id")]
    pub tier: ProtectionTier,
    pub name: &'static str,
    pub price_per_day: Money,
    /// Amount the renter is liable for before coverage applies.
    pub excess_amount: Money,
    pub coverage: &'static [&'static str],
    pub recommended: bool,
}

/// All protection packages, cheapest first.
pub static PROTECTION_PACKAGES: [ProtectionPackage; 3] = [
    ProtectionPackage {
        tier: ProtectionTier::Basic,
        name: "Basic Protection",
        price_per_day: Money::from_cents(0),
        excess_amount: Money::from_cents(250_000),
        coverage: &["Collision damage waiver", "Theft protection"],
        recommended: false,
    },
    ProtectionPackage {
        tier: ProtectionTier::Standard,
        name: "Standard Protection",
        price_per_day: Money::from_cents(1_500),
        excess_amount: Money::from_cents(100_000),
        coverage: &[
            "Collision damage waiver",
            "Theft protection",
            "Third-party liability",
            "Windscreen and tyres",
        ],
        recommended: true,
    },
    ProtectionPackage {
        tier: ProtectionTier::Premium,
        name: "Premium Protection",
        price_per_day: Money::from_cents(2_900),
        excess_amount: Money::from_cents(0),
        coverage: &[
            "Collision damage waiver",
            "Theft protection",
            "Third-party liability",
            "Windscreen and tyres",
            "Personal accident insurance",
            "24/7 roadside assistance",
        ],
        recommended: false,
    },
];

impl ProtectionTier {
    pub const ALL: [ProtectionTier; 3] = [
        ProtectionTier::Basic,
        ProtectionTier::Standard,
        ProtectionTier::Premium,
    ];

    /// Catalog entry for this tier.
    pub fn package(self) -> &'static ProtectionPackage {
        match self {
            ProtectionTier::Basic => &PROTECTION_PACKAGES[0],
            ProtectionTier::Standard => &PROTECTION_PACKAGES[1],
            ProtectionTier::Premium => &PROTECTION_PACKAGES[2],
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            ProtectionTier::Basic => "basic",
            ProtectionTier::Standard => "standard",
            ProtectionTier::Premium => "premium",
        }
    }
}

impl fmt::Display for ProtectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProtectionTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProtectionTier::ALL
            .into_iter()
            .find(|tier| tier.id() == s)
            .ok_or_else(|| CoreError::UnknownCatalogEntry {
                catalog: "protection",
                id: s.to_string(),
            })
    }
}

// =============================================================================
// Extras
// =============================================================================

/// Identifier of an optional add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Gps,
    ChildSeat,
    AdditionalDriver,
    WifiHotspot,
    SkiRack,
}

/// An optional add-on with a per-day price and a quantity cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarExtra {
    #[serde(rename = "id")]
    pub kind: ExtraKind,
    pub name: &'static str,
    pub price_per_day: Money,
    pub max_quantity: u32,
    /// Icon name understood by the UI icon set.
    pub icon: &'static str,
}

/// All extras in display order.
pub static AVAILABLE_EXTRAS: [CarExtra; 5] = [
    CarExtra {
        kind: ExtraKind::Gps,
        name: "GPS Navigation",
        price_per_day: Money::from_cents(1_000),
        max_quantity: 1,
        icon: "navigation",
    },
    CarExtra {
        kind: ExtraKind::ChildSeat,
        name: "Child Seat",
        price_per_day: Money::from_cents(800),
        max_quantity: 3,
        icon: "baby",
    },
    CarExtra {
        kind: ExtraKind::AdditionalDriver,
        name: "Additional Driver",
        price_per_day: Money::from_cents(1_200),
        max_quantity: 2,
        icon: "user-plus",
    },
    CarExtra {
        kind: ExtraKind::WifiHotspot,
        name: "Wi-Fi Hotspot",
        price_per_day: Money::from_cents(700),
        max_quantity: 1,
        icon: "wifi",
    },
    CarExtra {
        kind: ExtraKind::SkiRack,
        name: "Ski Rack",
        price_per_day: Money::from_cents(900),
        max_quantity: 1,
        icon: "mountain-snow",
    },
];

impl ExtraKind {
    pub const ALL: [ExtraKind; 5] = [
        ExtraKind::Gps,
        ExtraKind::ChildSeat,
        ExtraKind::AdditionalDriver,
        ExtraKind::WifiHotspot,
        ExtraKind::SkiRack,
    ];

    /// Catalog entry for this extra.
    pub fn extra(self) -> &'static CarExtra {
        match self {
            ExtraKind::Gps => &AVAILABLE_EXTRAS[0],
            ExtraKind::ChildSeat => &AVAILABLE_EXTRAS[1],
            ExtraKind::AdditionalDriver => &AVAILABLE_EXTRAS[2],
            ExtraKind::WifiHotspot => &AVAILABLE_EXTRAS[3],
            ExtraKind::SkiRack => &AVAILABLE_EXTRAS[4],
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            ExtraKind::Gps => "gps",
            ExtraKind::ChildSeat => "child_seat",
            ExtraKind::AdditionalDriver => "additional_driver",
            ExtraKind::WifiHotspot => "wifi_hotspot",
            ExtraKind::SkiRack => "ski_rack",
        }
    }

    #[inline]
    pub fn max_quantity(self) -> u32 {
        self.extra().max_quantity
    }
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExtraKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtraKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| CoreError::UnknownCatalogEntry {
                catalog: "extra",
                id: s.to_string(),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_catalog_position() {
        for tier in ProtectionTier::ALL {
            assert_eq!(tier.package().tier, tier);
        }
        for kind in ExtraKind::ALL {
            assert_eq!(kind.extra().kind, kind);
        }
    }

    #[test]
    fn test_basic_is_default_and_free() {
        let basic = ProtectionTier::default().package();
        assert_eq!(basic.tier, ProtectionTier::Basic);
        assert!(basic.price_per_day.is_zero());
    }

    #[test]
    fn test_ids_round_trip_through_from_str() {
        for tier in ProtectionTier::ALL {
            assert_eq!(tier.id().parse::<ProtectionTier>().unwrap(), tier);
        }
        for kind in ExtraKind::ALL {
            assert_eq!(kind.to_string().parse::<ExtraKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_id_is_typed_error() {
        let err = "jetpack".parse::<ExtraKind>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownCatalogEntry { catalog: "extra", .. }
        ));
        assert_eq!(err.to_string(), "Unknown extra: jetpack");
    }

    #[test]
    fn test_serde_ids_match_string_ids() {
        let json = serde_json::to_value(ExtraKind::ChildSeat).unwrap();
        assert_eq!(json, "child_seat");
        let gps = serde_json::to_value(ExtraKind::Gps.extra()).unwrap();
        assert_eq!(gps["id"], "gps");
        assert_eq!(gps["maxQuantity"], 1);
    }

    #[test]
    fn test_every_extra_allows_at_least_one() {
        assert!(AVAILABLE_EXTRAS.iter().all(|e| e.max_quantity >= 1));
        assert_eq!(ExtraKind::Gps.max_quantity(), 1);
    }
}
