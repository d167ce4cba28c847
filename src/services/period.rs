//! Budget period service
//!
//! Computes period windows from the user's settings. Every caller that
//! needs a window (budget saving, spend aggregation, analytics) goes
//! through here so the first day of the week and the zone always agree.

use chrono::{Duration, NaiveDate, NaiveTime, Utc, Weekday};

use crate::config::Settings;
use crate::error::{MoneyError, MoneyResult};
use crate::models::{BudgetPeriod, PeriodType, PeriodWindow, Zone};

/// Service for budget period management
pub struct PeriodService<'a> {
    settings: &'a Settings,
    zone: Zone,
    today: Option<NaiveDate>,
}

impl<'a> PeriodService<'a> {
    /// Create a period service on the local zone and the real clock
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            zone: Zone::Local,
            today: None,
        }
    }

    /// Evaluate the calendar in a different zone
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Pin "today" (tests, or reports about another day)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn first_day(&self) -> Weekday {
        self.settings.first_weekday()
    }

    /// The period type selected in settings
    pub fn selected_type(&self) -> PeriodType {
        self.settings.budget_period_type
    }

    /// Today's calendar date
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| self.zone.today())
    }

    /// Current instant in epoch millis; noon of the pinned day when pinned
    pub fn now_millis(&self) -> i64 {
        match self.today {
            Some(day) => self.millis_at(day, NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)),
            None => Utc::now().timestamp_millis(),
        }
    }

    /// Epoch millis of `time` on `date` in the service zone
    pub fn millis_at(&self, date: NaiveDate, time: NaiveTime) -> i64 {
        self.zone.millis_at(date.and_time(time))
    }

    /// Start of `date` in epoch millis
    pub fn start_of_day(&self, date: NaiveDate) -> i64 {
        self.millis_at(date, NaiveTime::MIN)
    }

    /// Calendar date of an instant
    pub fn date_of(&self, millis: i64) -> NaiveDate {
        self.zone.date_of(millis)
    }

    /// The period of `period_type` containing today
    pub fn current_period(&self, period_type: PeriodType) -> BudgetPeriod {
        self.period_for_date(period_type, self.today())
    }

    /// Get the period containing a specific date
    pub fn period_for_date(&self, period_type: PeriodType, date: NaiveDate) -> BudgetPeriod {
        BudgetPeriod::containing(period_type, date, self.first_day())
    }

    /// Inclusive millisecond window of the current period
    pub fn current_window(&self, period_type: PeriodType) -> PeriodWindow {
        self.current_period(period_type).window(&self.zone)
    }

    /// Inclusive millisecond window of the period containing `date`
    pub fn window_for_date(&self, period_type: PeriodType, date: NaiveDate) -> PeriodWindow {
        self.period_for_date(period_type, date).window(&self.zone)
    }

    pub fn window_of(&self, period: &BudgetPeriod) -> PeriodWindow {
        period.window(&self.zone)
    }

    /// Window of the period before the current one
    pub fn previous_window(&self, period_type: PeriodType) -> PeriodWindow {
        self.current_period(period_type).prev().window(&self.zone)
    }

    /// Calendar days in the current period
    pub fn days_in_period(&self, period_type: PeriodType) -> i64 {
        self.current_period(period_type).total_days()
    }

    /// Whole days between the period's first day and today (0 on day one)
    pub fn days_elapsed(&self, period_type: PeriodType) -> i64 {
        let period = self.current_period(period_type);
        (self.today() - period.start_date()).num_days()
    }

    /// Days left including today, never less than 1
    pub fn remaining_days(&self, period_type: PeriodType) -> i64 {
        (self.days_in_period(period_type) - self.days_elapsed(period_type)).max(1)
    }

    /// The last `count` periods ending with the current one, oldest first
    pub fn recent_periods(&self, period_type: PeriodType, count: usize) -> Vec<BudgetPeriod> {
        let mut periods = Vec::with_capacity(count);
        let mut current = self.current_period(period_type);

        for _ in 0..count {
            periods.push(current);
            current = current.prev();
        }

        periods.reverse();
        periods
    }

    /// Human-friendly label for the current period
    pub fn format_current(&self, period_type: PeriodType) -> String {
        self.current_period(period_type).friendly()
    }

    /// Parse a user-entered date
    ///
    /// Formats supported: "today", "yesterday", "2026-10-19", "19/10/2026"
    pub fn parse_date(&self, s: &str) -> MoneyResult<NaiveDate> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "today" | "now" => return Ok(self.today()),
            "yesterday" => return Ok(self.today() - Duration::days(1)),
            _ => {}
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
            .map_err(|_| {
                MoneyError::Validation(format!(
                    "Invalid date: {} (expected YYYY-MM-DD or DD/MM/YYYY)",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(settings: &Settings, today: NaiveDate) -> PeriodService<'_> {
        PeriodService::new(settings)
            .with_zone(Zone::utc())
            .with_today(today)
    }

    #[test]
    fn test_current_window_monthly() {
        let settings = Settings::default();
        let periods = service(&settings, date(2025, 1, 17));

        let window = periods.current_window(PeriodType::Monthly);
        assert_eq!(window.start, 1_735_689_600_000);
        assert_eq!(window.end, 1_738_367_999_000);
        assert!(window.contains(periods.now_millis()));
    }

    #[test]
    fn test_first_day_of_week_from_settings() {
        let mut settings = Settings::default();
        // 2026-10-18 is a Sunday
        let sunday = date(2026, 10, 18);

        let start = service(&settings, sunday).current_period(PeriodType::Weekly);
        assert_eq!(start.start_date(), sunday);

        settings.first_day_of_week = 1;
        let start = service(&settings, sunday).current_period(PeriodType::Weekly);
        assert_eq!(start.start_date(), date(2026, 10, 12));
    }

    #[test]
    fn test_day_counts() {
        let settings = Settings::default();

        let first = service(&settings, date(2025, 1, 1));
        assert_eq!(first.days_in_period(PeriodType::Monthly), 31);
        assert_eq!(first.days_elapsed(PeriodType::Monthly), 0);
        assert_eq!(first.remaining_days(PeriodType::Monthly), 31);

        let last = service(&settings, date(2025, 1, 31));
        assert_eq!(last.days_elapsed(PeriodType::Monthly), 30);
        assert_eq!(last.remaining_days(PeriodType::Monthly), 1);

        // Wednesday in a Sunday-start week
        let mid_week = service(&settings, date(2026, 10, 21));
        assert_eq!(mid_week.days_elapsed(PeriodType::Weekly), 3);
        assert_eq!(mid_week.remaining_days(PeriodType::Weekly), 4);
    }

    #[test]
    fn test_previous_window_adjoins_current() {
        let settings = Settings::default();
        let periods = service(&settings, date(2025, 3, 10));

        for period_type in PeriodType::ALL {
            let prev = periods.previous_window(period_type);
            let current = periods.current_window(period_type);
            assert_eq!(prev.end + 1_000, current.start);
        }
    }

    #[test]
    fn test_recent_periods() {
        let settings = Settings::default();
        let periods = service(&settings, date(2025, 2, 10));

        let months = periods.recent_periods(PeriodType::Monthly, 3);
        let starts: Vec<_> = months.iter().map(|p| p.start_date()).collect();
        assert_eq!(starts, [date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]);
    }

    #[test]
    fn test_parse_date() {
        let settings = Settings::default();
        let periods = service(&settings, date(2026, 10, 19));

        assert_eq!(periods.parse_date("today").unwrap(), date(2026, 10, 19));
        assert_eq!(periods.parse_date("yesterday").unwrap(), date(2026, 10, 18));
        assert_eq!(periods.parse_date("2026-01-05").unwrap(), date(2026, 1, 5));
        assert_eq!(periods.parse_date("05/01/2026").unwrap(), date(2026, 1, 5));
        assert!(periods.parse_date("Jan 5").unwrap_err().is_validation());
    }
}
