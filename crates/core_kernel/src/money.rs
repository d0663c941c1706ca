//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors,
//! plus the sr-RS display formatting used on printed invoices
//! (`1.234,56` - dot for thousands, comma for decimals).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits shown on invoices and reports
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Serbian dinar
    #[default]
    RSD,
    EUR,
    USD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::RSD => "RSD",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSD" => Ok(Currency::RSD),
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors raised when reading money values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Rounds an amount the way it is shown to people: two decimals, half away from zero
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        DISPLAY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Formats an amount in sr-RS notation with exactly two decimals
///
/// ```rust
/// use core_kernel::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(7776)), "7.776,00");
/// assert_eq!(format_amount(dec!(-1234567.005)), "-1.234.567,01");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{},{}", sign, grouped, fraction)
}

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 decimal places; rounding to the currency's two
/// places happens only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.currency.code())
    }
}

/// Represents a percentage rate (discount, VAT)
///
/// The percentage is divided by the literal 100 and nothing else, so applying
/// a rate can never divide by a caller-supplied value. Out-of-range
/// percentages are kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.20 for 20%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a percentage (e.g., 20 for 20%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Applies this rate to a bare amount
    ///
    /// # Panics
    ///
    /// Panics if the result is outside the `Decimal` range; see [`Rate::checked_of`].
    pub fn of(&self, amount: Decimal) -> Decimal {
        amount * self.value
    }

    /// Applies this rate, returning `None` on overflow
    pub fn checked_of(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.value)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounded_money_matches_display_rounding(minor in -1_000_000_000i64..1_000_000_000i64) {
            let amount = Decimal::new(minor, 4);
            let money = Money::new(amount, Currency::RSD).round_to_currency();
            prop_assert_eq!(money.amount(), round_for_display(amount));
        }

        #[test]
        fn formatted_amount_round_trips_through_minor_units(minor in -1_000_000_000i64..1_000_000_000i64) {
            let amount = Decimal::new(minor, 2);
            let parsed: Decimal = format_amount(amount)
                .replace('.', "")
                .replace(',', ".")
                .parse()
                .unwrap();
            prop_assert_eq!(parsed, amount);
        }
    }
}
