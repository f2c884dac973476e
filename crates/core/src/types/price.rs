//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not pence).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display (e.g., "£19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    GBP,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol used when rendering prices.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GBP => "£",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GBP => "GBP",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        let price = Price::from_amount(Decimal::new(25, 0));
        assert_eq!(price.display(), "£25.00");
    }

    #[test]
    fn test_display_rounds() {
        let price = Price::new(Decimal::new(19_996, 3), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$20.00");
    }

    #[test]
    fn test_default_currency_is_gbp() {
        assert_eq!(CurrencyCode::default().code(), "GBP");
    }
}
