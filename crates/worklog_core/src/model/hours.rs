//! Exact hour quantities for task entries.
//!
//! # Responsibility
//! - Represent per-entry hours without binary floating-point drift.
//! - Parse raw form text into hour values.
//!
//! # Invariants
//! - `Hours` is always within `0..=ENTRY_CAP`.
//! - Summation is exact: sixteen `0.5` entries total exactly `8`.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::Add;

/// Required total for a normal work day.
pub const DAILY_HOURS: i64 = 8;
/// Upper bound for one single task entry.
pub const ENTRY_CAP: i64 = 8;

static HOURS_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?[0-9]+(?:\.[0-9]+)?)\s*(?:h|hr|hrs|시간)?$").expect("valid hours regex")
});

/// Entry-level hour validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    NegativeHours(Decimal),
    HoursAboveCap(Decimal),
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeHours(value) => {
                write!(f, "hours must not be negative, got {}", value.normalize())
            }
            Self::HoursAboveCap(value) => write!(
                f,
                "hours for one entry must not exceed {ENTRY_CAP}, got {}",
                value.normalize()
            ),
        }
    }
}

impl Error for EntryError {}

/// Non-negative, capped hour value for one task entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Hours(Decimal);

impl Hours {
    pub const ZERO: Hours = Hours(Decimal::ZERO);

    /// Validates and wraps one hour value.
    ///
    /// # Errors
    /// - `NegativeHours` when `value < 0`.
    /// - `HoursAboveCap` when `value > ENTRY_CAP`.
    pub fn new(value: Decimal) -> Result<Self, EntryError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(EntryError::NegativeHours(value));
        }
        if value > Decimal::from(ENTRY_CAP) {
            return Err(EntryError::HoursAboveCap(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Convenience constructor from tenths of an hour (`45` -> `4.5`).
    pub fn from_tenths(tenths: i64) -> Result<Self, EntryError> {
        Self::new(Decimal::new(tenths, 1))
    }

    /// Parses one raw form field.
    ///
    /// Accepts plain decimals with an optional `h`/`시간` suffix. Range checks
    /// are not applied here; callers decide how to treat out-of-range numbers.
    /// Text that does not fit a `Decimal` without rounding is `NotNumeric`.
    pub fn parse(text: &str) -> FieldValue {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return FieldValue::Missing;
        }

        let Some(captures) = HOURS_TEXT_RE.captures(trimmed) else {
            return FieldValue::NotNumeric(trimmed.to_string());
        };

        match Decimal::from_str_exact(&captures[1]) {
            Ok(value) => FieldValue::Number(value),
            Err(_) => FieldValue::NotNumeric(trimmed.to_string()),
        }
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Hours {
    type Error = EntryError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Unbounded running total of hours.
///
/// Totals may exceed one entry cap, so they are kept apart from `Hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TotalHours(Decimal);

impl TotalHours {
    pub const ZERO: TotalHours = TotalHours(Decimal::ZERO);

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Display for TotalHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add<Hours> for TotalHours {
    type Output = TotalHours;

    fn add(self, rhs: Hours) -> Self::Output {
        TotalHours(self.0 + rhs.0)
    }
}

impl Add for TotalHours {
    type Output = TotalHours;

    fn add(self, rhs: TotalHours) -> Self::Output {
        TotalHours(self.0 + rhs.0)
    }
}

impl Sum<Hours> for TotalHours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Self {
        iter.fold(TotalHours::ZERO, |acc, hours| acc + hours)
    }
}

impl<'a> Sum<&'a Hours> for TotalHours {
    fn sum<I: Iterator<Item = &'a Hours>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Hours> for TotalHours {
    fn from(value: Hours) -> Self {
        TotalHours(value.0)
    }
}

/// Classified content of one raw form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Field left blank.
    Missing,
    /// Text that is not a number.
    NotNumeric(String),
    /// Parsed number, not yet range-checked.
    Number(Decimal),
}

#[cfg(test)]
mod tests {
    use super::{EntryError, FieldValue, Hours, TotalHours};
    use rust_decimal::Decimal;

    #[test]
    fn rejects_negative_and_above_cap() {
        assert_eq!(
            Hours::new(Decimal::new(-5, 1)).unwrap_err(),
            EntryError::NegativeHours(Decimal::new(-5, 1))
        );
        assert_eq!(
            Hours::new(Decimal::new(85, 1)).unwrap_err(),
            EntryError::HoursAboveCap(Decimal::new(85, 1))
        );
    }

    #[test]
    fn accepts_bounds() {
        assert!(Hours::new(Decimal::ZERO).unwrap().is_zero());
        assert_eq!(Hours::new(Decimal::from(8)).unwrap().to_string(), "8");
    }

    #[test]
    fn half_hour_steps_sum_exactly() {
        let half = Hours::from_tenths(5).unwrap();
        let total: TotalHours = std::iter::repeat(half).take(16).sum();
        assert_eq!(total.value(), Decimal::from(8));
    }

    #[test]
    fn parse_classifies_form_text() {
        assert_eq!(Hours::parse("   "), FieldValue::Missing);
        assert_eq!(Hours::parse("4.5"), FieldValue::Number(Decimal::new(45, 1)));
        assert_eq!(Hours::parse("2h"), FieldValue::Number(Decimal::from(2)));
        assert_eq!(Hours::parse("3 시간"), FieldValue::Number(Decimal::from(3)));
        assert_eq!(Hours::parse("-1"), FieldValue::Number(Decimal::from(-1)));
        assert_eq!(
            Hours::parse("four"),
            FieldValue::NotNumeric("four".to_string())
        );
    }

    #[test]
    fn parse_refuses_to_round_long_fractions() {
        let text = "7.99999999999999999999999999999";
        assert_eq!(
            Hours::parse(text),
            FieldValue::NotNumeric(text.to_string())
        );
        assert_eq!(
            Hours::parse("7.9999"),
            FieldValue::Number(Decimal::new(79999, 4))
        );
    }

    #[test]
    fn deserialize_applies_range_checks() {
        let hours: Hours = serde_json::from_str("\"4.50\"").unwrap();
        assert_eq!(hours.to_string(), "4.5");
        assert!(serde_json::from_str::<Hours>("\"-1\"").is_err());
    }

    #[test]
    fn display_is_normalized() {
        assert_eq!(Hours::new(Decimal::new(400, 2)).unwrap().to_string(), "4");
        assert_eq!(Hours::from_tenths(35).unwrap().to_string(), "3.5");
    }
}
