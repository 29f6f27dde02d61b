//! # Engine Configuration
//!
//! Pricing policy, search defaults and checkout limits for the booking
//! engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WAYFARE_TAX_RATE=8.25                                              │
//! │     WAYFARE_CONFIRM_TIMEOUT_SECS=45                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/wayfare/wayfare.toml (Linux)                             │
//! │     ~/Library/Application Support/com.wayfare.booking/wayfare.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8% tax, $25.00 airport fee, age 25, 10:00 counter times            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # wayfare.toml
//! [pricing]
//! tax_rate_bps = 800             # 8%
//! airport_fee_cents = 2500       # $25.00
//! young_driver_fee_cents = 1500  # $15.00/day, advisory
//! currency_code = "USD"
//! currency_symbol = "$"
//!
//! [search]
//! default_driver_age = 25
//! default_pickup_time = "10:00"
//! default_return_time = "10:00"
//!
//! [checkout]
//! confirm_timeout_secs = 30
//! simulated_delay_ms = 1500
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wayfare_core::search::{MAX_DRIVER_AGE, MIN_DRIVER_AGE};
use wayfare_core::{Money, PricingPolicy, SearchParams, TaxRate};

use crate::error::{BookingError, BookingResult};

const TIME_FORMAT: &str = "%H:%M";

/// Upper bound for configured fees, in cents ($100,000).
pub const MAX_FEE_CENTS: i64 = 10_000_000;

// =============================================================================
// Pricing Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax rate in basis points (800 = 8%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Flat surcharge for airport pickups, in cents.
    #[serde(default = "default_airport_fee_cents")]
    pub airport_fee_cents: i64,

    /// Per-day young-driver fee shown as a notice, in cents.
    #[serde(default = "default_young_driver_fee_cents")]
    pub young_driver_fee_cents: i64,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_tax_rate_bps() -> u32 {
    800
}

fn default_airport_fee_cents() -> i64 {
    2_500
}

fn default_young_driver_fee_cents() -> i64 {
    1_500
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
            airport_fee_cents: default_airport_fee_cents(),
            young_driver_fee_cents: default_young_driver_fee_cents(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Search Settings
// =============================================================================

/// Initial values for a fresh search screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_driver_age")]
    pub default_driver_age: u8,

    /// Counter time as `HH:MM`.
    #[serde(default = "default_counter_time")]
    pub default_pickup_time: String,

    #[serde(default = "default_counter_time")]
    pub default_return_time: String,
}

fn default_driver_age() -> u8 {
    wayfare_core::search::DEFAULT_DRIVER_AGE
}

fn default_counter_time() -> String {
    "10:00".to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            default_driver_age: default_driver_age(),
            default_pickup_time: default_counter_time(),
            default_return_time: default_counter_time(),
        }
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Upper bound on a single gateway call.
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,

    /// Delay used by the simulated gateway in demos.
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,
}

fn default_confirm_timeout() -> u64 {
    30
}

fn default_simulated_delay() -> u64 {
    1_500
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            confirm_timeout_secs: default_confirm_timeout(),
            simulated_delay_ms: default_simulated_delay(),
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl EngineConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (if it exists)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> BookingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BookingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BookingError::ConfigLoadFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BookingResult<()> {
        if self.pricing.tax_rate_bps > 10_000 {
            return Err(BookingError::InvalidConfig(format!(
                "tax_rate_bps must be at most 10000 (100%), got {}",
                self.pricing.tax_rate_bps
            )));
        }

        for (name, cents) in [
            ("airport_fee_cents", self.pricing.airport_fee_cents),
            ("young_driver_fee_cents", self.pricing.young_driver_fee_cents),
        ] {
            if !(0..=MAX_FEE_CENTS).contains(&cents) {
                return Err(BookingError::InvalidConfig(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_FEE_CENTS, cents
                )));
            }
        }

        if self.checkout.confirm_timeout_secs == 0 {
            return Err(BookingError::InvalidConfig(
                "confirm_timeout_secs must be greater than 0".into(),
            ));
        }

        let age = self.search.default_driver_age;
        if !(MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&age) {
            return Err(BookingError::InvalidConfig(format!(
                "default_driver_age must be between {} and {}, got {}",
                MIN_DRIVER_AGE, MAX_DRIVER_AGE, age
            )));
        }

        parse_counter_time("default_pickup_time", &self.search.default_pickup_time)?;
        parse_counter_time("default_return_time", &self.search.default_return_time)?;

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// ## Environment Variables
    /// - `WAYFARE_TAX_RATE`: percentage, e.g. "8.25"
    /// - `WAYFARE_AIRPORT_FEE_CENTS`: e.g. "3000"
    /// - `WAYFARE_CONFIRM_TIMEOUT_SECS`: e.g. "45"
    /// - `WAYFARE_DEFAULT_DRIVER_AGE`: e.g. "30"
    /// - `WAYFARE_CURRENCY`: ISO code, e.g. "EUR"
    ///
    /// Unparsable values are ignored. A tax rate that parses but is
    /// negative or not finite is an error.
    fn apply_env_overrides(&mut self) -> BookingResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> BookingResult<()> {
        if let Some(rate) = lookup("WAYFARE_TAX_RATE") {
            if let Ok(pct) = rate.trim().parse::<f64>() {
                if !pct.is_finite() || pct < 0.0 {
                    return Err(BookingError::InvalidConfig(format!(
                        "WAYFARE_TAX_RATE must be a non-negative percentage, got {}",
                        rate.trim()
                    )));
                }
                debug!(tax_rate = %rate, "Overriding tax rate from environment");
                self.pricing.tax_rate_bps = TaxRate::from_percentage(pct).bps();
            }
        }

        if let Some(fee) = lookup("WAYFARE_AIRPORT_FEE_CENTS") {
            if let Ok(cents) = fee.trim().parse::<i64>() {
                self.pricing.airport_fee_cents = cents;
            }
        }

        if let Some(timeout) = lookup("WAYFARE_CONFIRM_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse::<u64>() {
                self.checkout.confirm_timeout_secs = secs;
            }
        }

        if let Some(age) = lookup("WAYFARE_DEFAULT_DRIVER_AGE") {
            if let Ok(age) = age.trim().parse::<u8>() {
                self.search.default_driver_age = age;
            }
        }

        if let Some(code) = lookup("WAYFARE_CURRENCY") {
            let code = code.trim().to_uppercase();
            debug!(currency = %code, "Overriding currency from environment");
            self.pricing.currency_symbol = currency_symbol(&code);
            self.pricing.currency_code = code;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wayfare", "booking")
            .map(|dirs| dirs.config_dir().join("wayfare.toml"))
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
            airport_fee: Money::from_cents(self.pricing.airport_fee_cents),
            young_driver_fee_per_day: Money::from_cents(self.pricing.young_driver_fee_cents),
        }
    }

    /// A fresh search state with the configured defaults.
    pub fn search_defaults(&self) -> BookingResult<SearchParams> {
        let pickup = parse_counter_time("default_pickup_time", &self.search.default_pickup_time)?;
        let ret = parse_counter_time("default_return_time", &self.search.default_return_time)?;
        Ok(SearchParams::with_defaults(
            self.search.default_driver_age,
            pickup,
            ret,
        ))
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.checkout.confirm_timeout_secs)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.checkout.simulated_delay_ms)
    }

    /// Formats an amount for display, rounded to cents.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_booking::EngineConfig;
    /// use wayfare_core::Money;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.to_cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.pricing.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

fn parse_counter_time(field: &str, value: &str) -> BookingResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|e| {
        BookingError::InvalidConfig(format!("{} must be HH:MM, got '{}': {}", field, value, e))
    })
}

fn currency_symbol(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" | "MXN" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        other => format!("{} ", other),
    }
}
