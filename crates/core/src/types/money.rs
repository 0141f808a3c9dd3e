//! Non-negative monetary amounts.
//!
//! All prices, totals, and wallet balances in Canteen are [`Amount`]s:
//! decimal values that are guaranteed non-negative at construction.
//! Arithmetic is checked - subtraction that would go below zero and
//! multiplication overflow both surface as `None` rather than wrapping.
//!
//! On the wire an `Amount` is a decimal string (e.g. `"50.00"`), matching
//! `rust_decimal`'s string serialization.

use core::fmt;
use core::ops::Deref;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing an [`Amount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The value is negative.
    #[error("amount cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative decimal amount of money.
///
/// ## Examples
///
/// ```
/// use canteen_core::Amount;
/// use rust_decimal::Decimal;
///
/// let price = Amount::new(Decimal::new(5000, 2)).unwrap(); // 50.00
/// let total = price.checked_mul(2).unwrap();               // 100.00
/// assert!(Amount::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] if the value is below zero.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Checked addition. Returns `None` on decimal overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` if the result would be negative
    /// or on decimal overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let result = self.0.checked_sub(other.0)?;
        Self::new(result).ok()
    }

    /// Checked multiplication by a quantity. Returns `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Whether this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for Amount {
    type Target = Decimal;

    fn deref(&self) -> &Decimal {
        &self.0
    }
}

// Manual Deserialize so deserialized values go through the non-negative check.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(cents: i64) -> Amount {
        Amount::new(Decimal::new(cents, 2)).expect("non-negative")
    }

    #[test]
    fn test_new_rejects_negative() {
        let err = Amount::new(Decimal::new(-500, 2)).unwrap_err();
        assert!(matches!(err, AmountError::Negative(_)));
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert_eq!(Amount::new(Decimal::ZERO).expect("zero is valid"), Amount::ZERO);
    }

    #[test]
    fn test_checked_sub_floors_at_zero() {
        assert_eq!(amount(5000).checked_sub(amount(2000)), Some(amount(3000)));
        assert_eq!(amount(2000).checked_sub(amount(5000)), None);
        assert_eq!(amount(2000).checked_sub(amount(2000)), Some(amount(0)));
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(amount(5000).checked_mul(2), Some(amount(10000)));
        assert_eq!(amount(5000).checked_mul(0), Some(amount(0)));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result: Result<Amount, _> = serde_json::from_str("\"-1.50\"");
        assert!(result.is_err());
        let ok: Amount = serde_json::from_str("\"1.50\"").expect("valid");
        assert_eq!(ok, amount(150));
    }

    #[test]
    fn test_display() {
        assert_eq!(amount(5000).to_string(), "50.00");
    }
}
