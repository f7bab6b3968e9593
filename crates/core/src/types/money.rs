//! Order totals using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative, currency-denominated amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., pounds, not piastres).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` for amounts below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }
}

/// ISO 4217 currency codes accepted by the order system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EGP,
    USD,
    EUR,
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EGP" => Ok(Self::EGP),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EGP => write!(f, "EGP"),
            Self::USD => write!(f, "USD"),
            Self::EUR => write!(f, "EUR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_rejected() {
        let amount = Decimal::new(-100, 2);
        assert_eq!(
            Money::new(amount, CurrencyCode::EGP),
            Err(MoneyError::Negative(amount))
        );
    }

    #[test]
    fn test_zero_and_positive_accepted() {
        assert!(Money::new(Decimal::ZERO, CurrencyCode::USD).is_ok());
        let money = Money::new(Decimal::new(1999, 2), CurrencyCode::EGP);
        assert_eq!(money.map(|m| m.amount()), Ok(Decimal::new(1999, 2)));
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("EGP".parse::<CurrencyCode>(), Ok(CurrencyCode::EGP));
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
