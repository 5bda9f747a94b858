//! # Forms Configuration
//!
//! Configuration passed explicitly to document forms.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LEDGERLY_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after construction, so no locking is needed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ledgerly_core::lenient::{parse_decimal, to_bool};
use ledgerly_core::{Money, TaxRate};

/// Application configuration for document forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormsConfig {
    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for display
    pub currency_decimals: u8,

    /// Whether new documents start with round-off enabled
    pub round_off_by_default: bool,

    /// Tax applied to rows whose product carries no tax reference
    pub default_tax_rate: TaxRate,
}

impl Default for FormsConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Currency: USD ($), 2 decimals
    /// - Round-off: off
    /// - Default tax: 0%
    fn default() -> Self {
        FormsConfig {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            round_off_by_default: false,
            default_tax_rate: TaxRate::zero(),
        }
    }
}

impl FormsConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `LEDGERLY_CURRENCY_CODE`: Override currency code
    /// - `LEDGERLY_CURRENCY_SYMBOL`: Override currency symbol
    /// - `LEDGERLY_CURRENCY_DECIMALS`: Display decimals (e.g., "3")
    /// - `LEDGERLY_ROUND_OFF`: `"true"` to round totals by default
    /// - `LEDGERLY_DEFAULT_TAX_RATE`: Default tax percentage (e.g., "15")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup (env, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = FormsConfig::default();

        if let Some(code) = lookup("LEDGERLY_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("LEDGERLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("LEDGERLY_CURRENCY_DECIMALS") {
            match decimals.trim().parse::<u8>() {
                Ok(d) if d <= 6 => config.currency_decimals = d,
                _ => warn!(%decimals, "Ignoring invalid LEDGERLY_CURRENCY_DECIMALS"),
            }
        }

        if let Some(flag) = lookup("LEDGERLY_ROUND_OFF") {
            config.round_off_by_default = to_bool(&serde_json::Value::String(flag));
        }

        if let Some(rate) = lookup("LEDGERLY_DEFAULT_TAX_RATE") {
            match parse_decimal(&rate) {
                Some(pct) if pct >= Decimal::ZERO && pct <= Decimal::ONE_HUNDRED => {
                    config.default_tax_rate = TaxRate::from_percentage(pct)
                }
                _ => warn!(%rate, "Ignoring invalid LEDGERLY_DEFAULT_TAX_RATE"),
            }
        }

        config
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::Money;
    /// use ledgerly_forms::FormsConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let config = FormsConfig::default();
    /// assert_eq!(config.format_currency(Money::new(Decimal::new(123456, 2))), "$1234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let value = amount.amount().round_dp_with_strategy(
            self.currency_decimals as u32,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        );

        format!(
            "{}{}{:.prec$}",
            if value < Decimal::ZERO { "-" } else { "" },
            self.currency_symbol,
            value.abs(),
            prec = self.currency_decimals as usize
        )
    }
}
