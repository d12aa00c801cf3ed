//! Amount type for handling monetary values with optional dollar signs.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! parsing values that may or may not include a dollar sign and commas, the
//! way bank exports format them.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Represents a dollar amount.
///
/// This type wraps `Decimal` and provides custom serialization so that
/// amounts appear in JSON documents as plain numbers: whole-dollar values as
/// integers (`0`, not `0.0`) and everything else as decimals (`54.32`).
///
/// Parsing accepts optional `$` signs and comma thousands separators:
/// ```
/// # use tally::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-$1,250.40").unwrap();
/// assert_eq!(a.to_string(), "-1250.40");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the amount rounded to `dp` decimal places using midpoint
    /// rounding to even, which matches how the totals in existing history
    /// files were accumulated.
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    /// Rounds to the nearest whole dollar, for chart labels.
    pub fn to_whole_dollars(&self) -> i64 {
        self.0.round().to_i64().unwrap_or_default()
    }
}

/// An error that can occur when parsing a string into an `Amount`.
#[derive(Debug, Error)]
#[error("invalid amount '{0}'")]
pub struct ParseAmountError(String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseAmountError(s.to_string()));
        }

        // Remove the dollar sign, which may appear after a minus sign
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousands separators)
        let without_commas = without_dollar.replace(',', "");

        let value =
            Decimal::from_str(&without_commas).map_err(|_| ParseAmountError(s.to_string()))?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Whole-dollar values serialize as JSON integers so that untouched
        // categories appear as 0 rather than 0.0.
        if self.0.is_integer() {
            if let Some(i) = self.0.to_i64() {
                return serializer.serialize_i64(i);
            }
        }
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or a numeric string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount(Decimal::from(v)))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(Decimal::from(v)))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
                // f64 Display produces the shortest representation that
                // round-trips, which is the decimal the JSON file contained.
                Decimal::from_str(&v.to_string())
                    .map(Amount)
                    .map_err(|_| E::custom(format!("cannot represent {v} as an amount")))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                Amount::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("54.32").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("54.32").unwrap());
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("$1,234,567.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  $50.00  ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string_is_an_error() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(Amount::from_str("12.3.4").is_err());
        assert!(Amount::from_str("abc").is_err());
    }

    #[test]
    fn test_serialize_fractional_as_number() {
        let amount = Amount::from_str("54.32").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "54.32");
    }

    #[test]
    fn test_serialize_whole_as_integer() {
        let amount = Amount::default();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "0");
        let amount = Amount::from_str("12.00").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "12");
    }

    #[test]
    fn test_deserialize_integer() {
        let amount: Amount = serde_json::from_str("7").unwrap();
        assert_eq!(amount.value(), Decimal::from(7));
    }

    #[test]
    fn test_deserialize_float() {
        let amount: Amount = serde_json::from_str("54.32").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("54.32").unwrap());
    }

    #[test]
    fn test_deserialize_string() {
        let amount: Amount = serde_json::from_str("\"$1,000.00\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1000.00").unwrap());
    }

    #[test]
    fn test_add_then_round() {
        let a = Amount::from_str("0.105").unwrap();
        let b = Amount::from_str("0.10").unwrap();
        // midpoint rounds to even
        assert_eq!((a + b).round_dp(2).to_string(), "0.20");
    }

    #[test]
    fn test_to_whole_dollars() {
        assert_eq!(Amount::from_str("54.32").unwrap().to_whole_dollars(), 54);
        assert_eq!(Amount::from_str("54.51").unwrap().to_whole_dollars(), 55);
        assert_eq!(Amount::from_str("-10.50").unwrap().to_whole_dollars(), -10);
    }
}
