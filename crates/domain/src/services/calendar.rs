//! Working-day calendar.
//!
//! A date is a working day when its ISO weekday is one of the configured
//! working weekdays and it is not a company holiday.

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use crate::models::DateRange;

/// Monday through Friday in ISO numbering.
pub const DEFAULT_WORKING_DAYS: [u32; 5] = [1, 2, 3, 4, 5];

#[derive(Debug, Clone)]
pub struct WorkingCalendar {
    /// Indexed by `weekday().number_from_monday() - 1`.
    working_weekdays: [bool; 7],
    holidays: HashSet<NaiveDate>,
}

impl Default for WorkingCalendar {
    fn default() -> Self {
        Self::new(&DEFAULT_WORKING_DAYS, std::iter::empty())
    }
}

impl WorkingCalendar {
    /// Builds a calendar from ISO weekday numbers (1 = Monday .. 7 = Sunday).
    ///
    /// Numbers outside `1..=7` are ignored.
    pub fn new(
        working_days_of_week: &[u32],
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        let mut working_weekdays = [false; 7];
        for day in working_days_of_week {
            if (1..=7).contains(day) {
                working_weekdays[(*day - 1) as usize] = true;
            }
        }
        Self {
            working_weekdays,
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        let index = (date.weekday().number_from_monday() - 1) as usize;
        self.working_weekdays[index] && !self.is_holiday(date)
    }

    /// Counts working days in an inclusive range.
    pub fn working_days_in(&self, range: &DateRange) -> u32 {
        range.days().filter(|d| self.is_working_day(*d)).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_calendar_skips_weekends() {
        let calendar = WorkingCalendar::default();
        assert!(calendar.is_working_day(date(2024, 3, 4))); // Monday
        assert!(calendar.is_working_day(date(2024, 3, 8))); // Friday
        assert!(!calendar.is_working_day(date(2024, 3, 9))); // Saturday
        assert!(!calendar.is_working_day(date(2024, 3, 10))); // Sunday
    }

    #[test]
    fn test_holidays_are_not_working_days() {
        let calendar = WorkingCalendar::new(&DEFAULT_WORKING_DAYS, [date(2024, 12, 25)]);
        assert!(calendar.is_holiday(date(2024, 12, 25)));
        assert!(!calendar.is_working_day(date(2024, 12, 25)));
        assert!(calendar.is_working_day(date(2024, 12, 24)));
    }

    #[test]
    fn test_custom_work_week() {
        // Sunday to Thursday
        let calendar = WorkingCalendar::new(&[7, 1, 2, 3, 4], std::iter::empty());
        assert!(calendar.is_working_day(date(2024, 3, 10)));
        assert!(!calendar.is_working_day(date(2024, 3, 8)));
    }

    #[test]
    fn test_working_days_in_month() {
        let calendar = WorkingCalendar::default();
        let march = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(calendar.working_days_in(&march), 21);

        let calendar = WorkingCalendar::new(&DEFAULT_WORKING_DAYS, [date(2024, 3, 29)]);
        assert_eq!(calendar.working_days_in(&march), 20);
    }

    #[test]
    fn test_invalid_weekday_numbers_ignored() {
        let calendar = WorkingCalendar::new(&[0, 8, 1], std::iter::empty());
        let week = DateRange::new(date(2024, 3, 4), date(2024, 3, 10)).unwrap();
        assert_eq!(calendar.working_days_in(&week), 1);
    }
}
