//! Shared traits, calendar-month keys, and enums for budgeting primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the finance state.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Associates entities with category ownership.
pub trait BelongsToCategory {
    fn category_id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Scheduling attributes shared by income sources and expenses.
///
/// Date-like values are exposed exactly as they were recorded; interpretation
/// (and tolerance of malformed values) belongs to the calculation layer.
pub trait Scheduled: Amounted {
    fn frequency(&self) -> &Frequency;

    /// Occurrence date of a one-time record (`YYYY-MM-DD`).
    fn occurrence_date(&self) -> Option<&str>;

    /// First month (`YYYY-MM`) in which a recurring record is active.
    fn start_month(&self) -> Option<&str>;

    /// Month (`YYYY-MM`) the record is pinned to, overriding every other rule.
    fn pinned_month(&self) -> Option<&str> {
        None
    }
}

/// How often an income source or expense repeats.
///
/// Values outside the known set are kept verbatim in [`Frequency::Other`] so that
/// documents written by other tools survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
    OneTime,
    Other(String),
}

impl Frequency {
    /// Parses a frequency label. Never fails: unknown labels become [`Frequency::Other`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "monthly" => Frequency::Monthly,
            "yearly" => Frequency::Yearly,
            "one-time" | "onetime" | "one_time" => Frequency::OneTime,
            _ => Frequency::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::OneTime => "one-time",
            Frequency::Other(raw) => raw,
        }
    }

    pub fn is_one_time(&self) -> bool {
        matches!(self, Frequency::OneTime)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Other(_))
    }

    /// Income sources are never recorded with a daily cadence.
    pub fn allowed_for_income(&self) -> bool {
        matches!(
            self,
            Frequency::Weekly
                | Frequency::Biweekly
                | Frequency::Monthly
                | Frequency::Yearly
                | Frequency::OneTime
        )
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Frequency::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Enumerates the cadence a category budget is expressed in.
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetPeriod::Daily => "Daily",
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Biweekly => "Biweekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(BudgetPeriod::Daily),
            "weekly" => Ok(BudgetPeriod::Weekly),
            "biweekly" => Ok(BudgetPeriod::Biweekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(format!("unknown budget period `{other}`")),
        }
    }
}

/// A calendar month, rendered as a zero-padded `YYYY-MM` key.
///
/// Ordering follows the calendar and agrees with lexicographic ordering of the
/// rendered keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Earliest representable key, `0000-01`.
    pub const MIN: MonthKey = MonthKey { year: 0, month: 1 };
    /// Latest representable key, `9999-12`.
    pub const MAX: MonthKey = MonthKey {
        year: 9999,
        month: 12,
    };

    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(0..=9999).contains(&year) {
            return Err(MonthKeyError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Parses an exact `YYYY-MM` key.
    pub fn parse(raw: &str) -> Result<Self, MonthKeyError> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(MonthKeyError::Malformed(raw.to_string()));
        }
        let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        let (year_part, month_part) = (&raw[..4], &raw[5..]);
        if !digits(year_part) || !digits(month_part) {
            return Err(MonthKeyError::Malformed(raw.to_string()));
        }
        let year = year_part
            .parse::<i32>()
            .map_err(|_| MonthKeyError::Malformed(raw.to_string()))?;
        let month = month_part
            .parse::<u32>()
            .map_err(|_| MonthKeyError::Malformed(raw.to_string()))?;
        Self::new(year, month)
    }

    /// Extracts the month from a `YYYY-MM` or `YYYY-MM-DD` style value.
    pub fn from_date_prefix(raw: &str) -> Result<Self, MonthKeyError> {
        let raw = raw.trim();
        let (prefix, rest) = match (raw.get(..7), raw.get(7..)) {
            (Some(prefix), Some(rest)) => (prefix, rest),
            _ => return Err(MonthKeyError::Malformed(raw.to_string())),
        };
        if !rest.is_empty() && !rest.starts_with('-') {
            return Err(MonthKeyError::Malformed(raw.to_string()));
        }
        Self::parse(prefix)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Moves the key by `months` calendar months, rolling over year boundaries.
    /// Saturates at [`MonthKey::MIN`] and [`MonthKey::MAX`].
    pub fn shift(self, months: i32) -> Self {
        let index = (self.index() + i64::from(months))
            .clamp(Self::MIN.index(), Self::MAX.index());
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Number of calendar months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(self, other: MonthKey) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }

    pub fn days_in_month(self) -> u32 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if is_leap_year(self.year) => 29,
            _ => 28,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        MonthKey::parse(value)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MonthKey::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors that can occur when constructing [`MonthKey`] values.
pub enum MonthKeyError {
    Malformed(String),
    YearOutOfRange(i32),
    MonthOutOfRange(u32),
}

impl fmt::Display for MonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthKeyError::Malformed(raw) => write!(f, "`{raw}` is not a YYYY-MM month"),
            MonthKeyError::YearOutOfRange(year) => write!(f, "year {year} is out of range"),
            MonthKeyError::MonthOutOfRange(month) => {
                write!(f, "month {month} is not between 1 and 12")
            }
        }
    }
}

impl std::error::Error for MonthKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> MonthKey {
        MonthKey::parse(raw).expect("valid month key")
    }

    #[test]
    fn month_key_parses_and_renders_zero_padded() {
        let month = key("2024-03");
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn month_key_rejects_malformed_input() {
        for raw in ["2024-3", "2024/03", "24-03", "2024-13", "2024-00", "abcd-ef", ""] {
            assert!(MonthKey::parse(raw).is_err(), "`{raw}` should be rejected");
        }
    }

    #[test]
    fn shift_rolls_over_year_boundaries() {
        assert_eq!(key("2024-12").shift(1), key("2025-01"));
        assert_eq!(key("2025-01").shift(-1), key("2024-12"));
        assert_eq!(key("2024-11").shift(14), key("2026-01"));
        assert_eq!(key("2024-02").shift(-26), key("2021-12"));
    }

    #[test]
    fn ordering_matches_lexicographic_keys() {
        let mut keys = vec![key("2025-01"), key("2024-12"), key("2024-02"), key("2023-11")];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let mut lexical = rendered.clone();
        lexical.sort();
        assert_eq!(rendered, lexical);
    }

    #[test]
    fn date_prefix_accepts_full_dates_only_when_well_formed() {
        assert_eq!(MonthKey::from_date_prefix("2024-03-15"), Ok(key("2024-03")));
        assert_eq!(MonthKey::from_date_prefix("2024-03"), Ok(key("2024-03")));
        assert!(MonthKey::from_date_prefix("2024-031").is_err());
        assert!(MonthKey::from_date_prefix("2024").is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(key("2024-02").days_in_month(), 29);
        assert_eq!(key("2023-02").days_in_month(), 28);
        assert_eq!(key("1900-02").days_in_month(), 28);
        assert_eq!(key("2000-02").days_in_month(), 29);
        assert_eq!(key("2024-04").days_in_month(), 30);
    }

    #[test]
    fn frequency_keeps_unknown_labels() {
        assert_eq!(Frequency::parse("Weekly"), Frequency::Weekly);
        assert_eq!(Frequency::parse("one-time"), Frequency::OneTime);
        let other = Frequency::parse("fortnightly");
        assert_eq!(other, Frequency::Other("fortnightly".into()));
        assert_eq!(String::from(other), "fortnightly");
    }

    #[test]
    fn frequency_serializes_as_plain_label() {
        let json = serde_json::to_string(&Frequency::OneTime).unwrap();
        assert_eq!(json, "\"one-time\"");
        let parsed: Frequency = serde_json::from_str("\"quarterly\"").unwrap();
        assert!(!parsed.is_recognized());
    }

    #[test]
    fn month_key_serde_rejects_bad_keys() {
        let parsed: MonthKey = serde_json::from_str("\"2024-06\"").unwrap();
        assert_eq!(parsed, key("2024-06"));
        assert!(serde_json::from_str::<MonthKey>("\"June\"").is_err());
    }
}
