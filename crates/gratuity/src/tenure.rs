//! Length of service from calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use networth_core::Clock;

/// Average year length (leap years included) used to turn elapsed days into
/// fractional years. This is an approximation, not a calendar-aware count.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Elapsed years between two dates, `|end - start| / 365.25`.
///
/// The order of the arguments does not matter.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = end.signed_duration_since(start).num_days().abs();
    days as f64 / DAYS_PER_YEAR
}

/// Employment start and (possibly projected) end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ServicePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Service from `start` up to the clock's current date.
    pub fn until_today(start: NaiveDate, clock: &dyn Clock) -> Self {
        Self {
            start,
            end: clock.today(),
        }
    }

    pub fn years(&self) -> f64 {
        years_between(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use networth_core::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn divides_elapsed_days_by_average_year() {
        let years = years_between(date(2020, 1, 1), date(2021, 1, 1));
        assert_eq!(years, 366.0 / 365.25);
    }

    #[test]
    fn swapped_dates_give_the_same_magnitude() {
        let forward = years_between(date(2015, 3, 10), date(2024, 8, 1));
        let backward = years_between(date(2024, 8, 1), date(2015, 3, 10));
        assert_eq!(forward, backward);
        assert!(forward > 0.0);
    }

    #[test]
    fn same_day_is_zero_years() {
        assert_eq!(years_between(date(2024, 5, 5), date(2024, 5, 5)), 0.0);
    }

    #[test]
    fn a_non_leap_calendar_year_is_just_short_of_one_service_year() {
        let period = ServicePeriod::new(date(2021, 1, 1), date(2022, 1, 1));
        assert!(period.years() < 1.0);
    }

    #[test]
    fn until_today_ends_on_the_clock_date() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap());
        let period = ServicePeriod::until_today(date(2020, 10, 17), &clock);
        assert_eq!(period.end, date(2026, 10, 17));
        assert_eq!(period.years(), 2191.0 / 365.25);
    }
}
