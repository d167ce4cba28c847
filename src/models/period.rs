//! Budget period representation
//!
//! Calendar-aligned weekly and monthly windows. The same calculation backs
//! both budget entries and spend aggregation, so a budget window and the
//! spending summed against it always agree to the millisecond.

use chrono::{
    Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};
use chrono::{FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which calendar unit a budget is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodType {
    Weekly,
    #[default]
    Monthly,
}

impl PeriodType {
    pub const ALL: [PeriodType; 2] = [PeriodType::Weekly, PeriodType::Monthly];

    /// Stored label, matching the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            _ => Err(PeriodParseError::InvalidType(s.to_string())),
        }
    }
}

/// A concrete calendar period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "start")]
pub enum BudgetPeriod {
    /// Calendar month, identified by its first day
    Monthly(NaiveDate),

    /// Seven days beginning on the configured first day of the week
    Weekly(NaiveDate),
}

impl BudgetPeriod {
    /// The period of `period_type` that contains `date`
    pub fn containing(period_type: PeriodType, date: NaiveDate, first_day: Weekday) -> Self {
        match period_type {
            PeriodType::Monthly => Self::Monthly(date - Duration::days(date.day0() as i64)),
            PeriodType::Weekly => {
                let offset = (date.weekday().num_days_from_monday() + 7
                    - first_day.num_days_from_monday())
                    % 7;
                Self::Weekly(date - Duration::days(offset as i64))
            }
        }
    }

    pub fn period_type(&self) -> PeriodType {
        match self {
            Self::Monthly(_) => PeriodType::Monthly,
            Self::Weekly(_) => PeriodType::Weekly,
        }
    }

    /// First calendar day of the period
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Monthly(start) | Self::Weekly(start) => *start,
        }
    }

    /// Last calendar day of the period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.start_date() + Duration::days(self.total_days() - 1)
    }

    /// Number of calendar days in the period
    pub fn total_days(&self) -> i64 {
        match self {
            Self::Monthly(start) => days_in_month(*start),
            Self::Weekly(_) => 7,
        }
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Monthly(_) => Self::Monthly(self.end_date() + Duration::days(1)),
            Self::Weekly(start) => Self::Weekly(*start + Duration::days(7)),
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Monthly(start) => {
                let last_of_prev = *start - Duration::days(1);
                Self::Monthly(last_of_prev - Duration::days(last_of_prev.day0() as i64))
            }
            Self::Weekly(start) => Self::Weekly(*start - Duration::days(7)),
        }
    }

    /// Millisecond window: start of the first day through 23:59:59 of the
    /// last day, both inclusive, in `zone`
    pub fn window(&self, zone: &Zone) -> PeriodWindow {
        let start = zone.millis_at(self.start_date().and_time(NaiveTime::MIN));
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end = zone.millis_at(self.end_date().and_time(end_of_day));
        PeriodWindow { start, end }
    }

    /// Human-friendly label ("October 2026", "Week of Oct 18, 2026")
    pub fn friendly(&self) -> String {
        match self {
            Self::Monthly(start) => start.format("%B %Y").to_string(),
            Self::Weekly(start) => format!("Week of {}", start.format("%b %d, %Y")),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly(start) => write!(f, "{}", start.format("%Y-%m")),
            Self::Weekly(start) => write!(
                f,
                "{}..{}",
                start.format("%Y-%m-%d"),
                self.end_date().format("%Y-%m-%d")
            ),
        }
    }
}

impl Ord for BudgetPeriod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start_date()
            .cmp(&other.start_date())
            .then(self.total_days().cmp(&other.total_days()))
    }
}

impl PartialOrd for BudgetPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Inclusive epoch-millisecond range of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: i64,
    pub end: i64,
}

impl PeriodWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis <= self.end
    }
}

/// Time zone the calendar is evaluated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The machine's local zone
    #[default]
    Local,
    /// A fixed UTC offset (tests, or users pinning a zone)
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Epoch millis of a wall-clock time in this zone
    pub fn millis_at(&self, naive: NaiveDateTime) -> i64 {
        match self {
            Self::Local => resolve_local(&Local, naive),
            Self::Fixed(offset) => resolve_local(offset, naive),
        }
    }

    /// Calendar date of an instant in this zone
    pub fn date_of(&self, millis: i64) -> NaiveDate {
        match self {
            Self::Local => date_in(&Local, millis),
            Self::Fixed(offset) => date_in(offset, millis),
        }
    }

    /// Today's calendar date in this zone
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now().timestamp_millis())
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> i64 {
    let mut candidate = naive;
    // A DST gap is at most a few hours; walk forward to the first valid instant
    for _ in 0..48 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => return earliest.timestamp_millis(),
            LocalResult::None => candidate += Duration::minutes(30),
        }
    }
    naive.and_utc().timestamp_millis()
}

fn date_in<Tz: TimeZone>(tz: &Tz, millis: i64) -> NaiveDate {
    match tz.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => dt.date_naive(),
        LocalResult::Ambiguous(dt, _) => dt.date_naive(),
        LocalResult::None => NaiveDate::default(),
    }
}

/// Number of days in the calendar month containing `date`
pub fn days_in_month(date: NaiveDate) -> i64 {
    let first = date - Duration::days(date.day0() as i64);
    // chrono's last representable month has no successor
    first
        .checked_add_months(Months::new(1))
        .map_or(31, |next| (next - first).num_days())
}

/// Map a first-day-of-week setting (0 = Sunday ... 6 = Saturday) to a weekday
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Compute the inclusive millisecond range of the `period_type` period that
/// contains `reference`
pub fn range(
    period_type: PeriodType,
    reference: NaiveDate,
    first_day: Weekday,
    zone: &Zone,
) -> PeriodWindow {
    BudgetPeriod::containing(period_type, reference, first_day).window(zone)
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidType(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidType(s) => {
                write!(f, "Invalid period type: {} (expected Weekly or Monthly)", s)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}
