//! Amount type for handling monetary values stored as integer cents.
//!
//! This module provides the `Amount` type which wraps a count of minor currency units and handles
//! parsing user-entered values that may or may not include a dollar sign and commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{AddAssign, Sub};
use std::str::FromStr;

/// The currency used when none is specified.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Represents an amount of money as an integer count of cents (minor currency units).
///
/// All aggregation is done with saturating integer arithmetic and rendering works on the integer
/// digits, so no cent is ever lost to floating point. Serialized as a plain JSON integer.
/// Parsed user input is limited to [`Amount::MAX`] in either direction.
///
/// # Examples
///
/// Parsing with dollar sign and commas:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,234.50").unwrap();
/// assert_eq!(amount.cents(), 123450);
/// assert_eq!(amount.to_string(), "$1,234.50");
/// ```
///
/// Parsing a whole number:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("15").unwrap();
/// assert_eq!(amount.cents(), 1500);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// The largest magnitude accepted when parsing: one hundred billion in major units.
    pub const MAX: Amount = Amount(10_000_000_000_000);

    /// Creates a new Amount from a count of cents.
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the underlying count of cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Renders the amount in en-US currency style for `currency_code`, e.g. `$5,000.00`,
    /// `-€20.00`, `¥15` or `CHF 15.00` for codes without a known symbol.
    pub fn format(&self, currency_code: &str) -> String {
        let code = currency_code.trim().to_uppercase();
        let (prefix, digits) = currency_style(&code);
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        let number = if digits == 0 {
            // Whole units, half a unit rounds away from zero.
            group_thousands(cents / 100 + u64::from(cents % 100 >= 50))
        } else {
            format!("{}.{:02}", group_thousands(cents / 100), cents % 100)
        };
        format!("{sign}{prefix}{number}")
    }
}

/// Inserts `,` between every group of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Returns the prefix and the number of fraction digits used when rendering `code`.
fn currency_style(code: &str) -> (String, u8) {
    let known = match code {
        "USD" => Some(("$", 2)),
        "EUR" => Some(("€", 2)),
        "GBP" => Some(("£", 2)),
        "JPY" => Some(("¥", 0)),
        "KRW" => Some(("₩", 0)),
        "INR" => Some(("₹", 2)),
        "CNY" => Some(("CN¥", 2)),
        "CAD" => Some(("CA$", 2)),
        "AUD" => Some(("A$", 2)),
        "NZD" => Some(("NZ$", 2)),
        "HKD" => Some(("HK$", 2)),
        "MXN" => Some(("MX$", 2)),
        "BRL" => Some(("R$", 2)),
        "TWD" => Some(("NT$", 2)),
        "ILS" => Some(("₪", 2)),
        "PHP" => Some(("₱", 2)),
        "VND" => Some(("₫", 0)),
        _ => None,
    };
    match known {
        Some((symbol, digits)) => (symbol.to_string(), digits),
        None => (format!("{code} "), 2),
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub enum AmountError {
    Empty,
    Decimal(rust_decimal::Error),
    OutOfRange(String),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "An amount is required"),
            AmountError::Decimal(e) => Display::fmt(e, f),
            AmountError::OutOfRange(s) => write!(f, "The amount '{s}' is too large"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Decimal(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // Remove dollar sign if present: "-$50.00", "$50.00", "-50.00" or "50.00"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(AmountError::Decimal)?;
        let cents = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|d| d.to_i64())
            .filter(|c| c.unsigned_abs() <= Amount::MAX.0.unsigned_abs())
            .ok_or_else(|| AmountError::OutOfRange(trimmed.to_string()))?;
        Ok(Amount(cents))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(DEFAULT_CURRENCY))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |mut total, a| {
            total += a;
            total
        })
    }
}
