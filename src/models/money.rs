//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64) to avoid floating-point
//! precision issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored in minor units (hundredths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use money_manager::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    ///
    /// # Examples
    /// ```
    /// use money_manager::models::Money;
    /// let amount = Money::from_units(250, 0);
    /// assert_eq!(amount.cents(), 25000);
    /// ```
    pub const fn from_units(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// `self - other`, clamped at zero
    pub fn saturating_remaining(&self, spent: Money) -> Money {
        Money((self.0 - spent.0).max(0))
    }

    /// Share of `limit` this amount represents, as a whole percent
    /// (half rounds up). A zero limit yields 0.
    pub fn percent_of(&self, limit: Money) -> u32 {
        if limit.0 <= 0 || self.0 <= 0 {
            return 0;
        }
        let scaled = (self.0 as i128) * 100;
        let limit = limit.0 as i128;
        let rounded = (scaled * 2 + limit) / (limit * 2);
        rounded.min(u32::MAX as i128) as u32
    }

    /// Split evenly over `parts`, truncating the remainder
    pub fn divide_by(&self, parts: i64) -> Money {
        if parts <= 0 {
            return *self;
        }
        Money(self.0 / parts)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "₹10.50", "10", "1,250.00"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        // Remove currency symbol if present
        let s = s
            .strip_prefix('$')
            .or_else(|| s.strip_prefix('₹'))
            .unwrap_or(s)
            .trim();
        let cleaned: String = s.chars().filter(|c| *c != ',').collect();
        let s = cleaned.as_str();

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        if s.is_empty() || s.contains(['-', '+']) {
            return Err(invalid());
        }

        let (units_str, cents_str) = match s.split_once('.') {
            Some((units, cents)) => (units, cents),
            None => (s, ""),
        };
        if cents_str.contains('.') || !cents_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| invalid())?
        };

        // Pad or truncate cents to 2 digits
        let cents: i64 = match cents_str.len() {
            0 => 0,
            1 => cents_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => cents_str[..2].parse().map_err(|_| invalid())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|total| total.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Parse a user-entered amount, rejecting negative values
    pub fn parse_amount(s: &str) -> Result<Self, MoneyParseError> {
        let amount = Self::parse(s)?;
        if amount.is_negative() {
            return Err(MoneyParseError::Negative(s.trim().to_string()));
        }
        Ok(amount)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    Negative(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::Negative(s) => write!(f, "Amount cannot be negative: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-10.50");
        assert_eq!(Money::from_cents(5).format_with_symbol("₹"), "₹0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(b.saturating_remaining(a), Money::zero());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("₹10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125000);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        assert_eq!(Money::parse_amount("250").unwrap(), Money::from_units(250, 0));
        assert!(matches!(
            Money::parse_amount("-5"),
            Err(MoneyParseError::Negative(_))
        ));
        assert!(matches!(
            Money::parse_amount("twelve"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_repeated_signs() {
        for input in ["--5", "$-5", "+5", "-+5", "5-"] {
            assert!(
                matches!(Money::parse_amount(input), Err(MoneyParseError::InvalidFormat(_))),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            Money::parse_amount("100000000000000000"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_amount("92233720368547758.08"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert_eq!(
            Money::parse_amount("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_percent_of() {
        let limit = Money::from_units(1000, 0);
        assert_eq!(Money::from_units(700, 0).percent_of(limit), 70);
        assert_eq!(Money::from_units(950, 0).percent_of(limit), 95);
        // 1/3 of the limit rounds down, 2/3 rounds up
        assert_eq!(Money::from_cents(1).percent_of(Money::from_cents(3)), 33);
        assert_eq!(Money::from_cents(2).percent_of(Money::from_cents(3)), 67);
        // half rounds up
        assert_eq!(Money::from_cents(1).percent_of(Money::from_cents(200)), 1);
        assert_eq!(Money::from_units(5, 0).percent_of(Money::zero()), 0);
    }

    #[test]
    fn test_divide_by() {
        assert_eq!(Money::from_units(100, 0).divide_by(3).cents(), 3333);
        assert_eq!(Money::from_units(100, 0).divide_by(0).cents(), 10000);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
    }
}
