//! # Money
//!
//! Monetary amounts as returned by the Storefront API (`MoneyV2`).
//! Amounts are exact decimals and travel as strings (`"10.00"`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default currency code used when none is supplied
pub const DEFAULT_CURRENCY: &str = "USD";

/// An amount of money in a given currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount (e.g. 10.00)
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g. "USD")
    #[serde(default = "default_currency")]
    pub currency_code: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Money {
    /// Create a new amount
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Zero in the given currency
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Parse a decimal string such as `"19.99"`.
    ///
    /// Returns `None` when the string is not a valid decimal.
    pub fn parse(amount: &str, currency_code: impl Into<String>) -> Option<Self> {
        amount
            .trim()
            .parse::<Decimal>()
            .ok()
            .map(|amount| Self::new(amount, currency_code))
    }

    /// Multiply by a quantity
    pub fn times(&self, quantity: u32) -> Money {
        Money {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code.clone(),
        }
    }

    /// Currency symbol, falling back to the code itself
    pub fn symbol(&self) -> &str {
        match self.currency_code.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "CAD" => "C$",
            "AUD" => "A$",
            "MXN" => "MX$",
            other => other,
        }
    }

    /// Format for display (e.g., "$10.00", "CHF 4.50")
    pub fn display(&self) -> String {
        let symbol = self.symbol();
        let amount = self.amount.round_dp(2);
        if symbol == self.currency_code {
            format!("{} {:.2}", symbol, amount)
        } else {
            format!("{}{:.2}", symbol, amount)
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
