//! Type-safe price representation in smallest currency units.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative price in the smallest currency unit (e.g., cents).
///
/// Prices come from the catalog collaborator and are never computed with
/// floating point. Aggregates (cart totals) use checked arithmetic so an
/// absurd quantity cannot silently wrap.
///
/// ## Examples
///
/// ```
/// use peachstand_core::Price;
///
/// let unit = Price::new(1999);
/// assert_eq!(unit.display(), "$19.99");
/// assert_eq!(unit.checked_mul(3), Some(Price::new(5997)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in the smallest currency unit.
    #[must_use]
    pub const fn new(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Get the amount in the smallest currency unit.
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub const fn checked_mul(self, count: u32) -> Option<Self> {
        match self.0.checked_mul(count as u64) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Add another price, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating sum used for display aggregates.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Format for display (e.g., "$19.99").
    ///
    /// Uses decimal arithmetic for the minor-unit shift; no floats.
    #[must_use]
    pub fn display(&self) -> String {
        let amount = Decimal::new(i64::try_from(self.0).unwrap_or(i64::MAX), 2);
        format!("${amount:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<u64> for Price {
    fn from(minor_units: u64) -> Self {
        Self(minor_units)
    }
}

impl From<Price> for u64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_minor_units() {
        assert_eq!(Price::new(1999).display(), "$19.99");
        assert_eq!(Price::new(5).display(), "$0.05");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(Price::new(250).checked_mul(4), Some(Price::new(1000)));
        assert_eq!(Price::new(u64::MAX).checked_mul(2), None);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            Price::new(100).checked_add(Price::new(50)),
            Some(Price::new(150))
        );
        assert_eq!(Price::new(u64::MAX).checked_add(Price::new(1)), None);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::new(100), Price::new(250), Price::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(351));
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::new(1234);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "1234");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
