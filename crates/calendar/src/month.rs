//! Month key newtype and month-length lookup for the Gregorian calendar.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::CalendarError;

/// Returns the number of days in `month` of `year`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12, or
/// [`CalendarError::InvalidDate`] if `year` is outside chrono's range.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = MonthKey::new(year, month)?.first_day()?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(CalendarError::InvalidDate {
            year,
            month,
            day: 1,
        })?;
    Ok((next - first).num_days() as u32)
}

/// A calendar month with year context.
///
/// Ordering is chronological: fields compare year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a new `MonthKey`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u32 {
        self.month
    }

    /// Returns the number of days in this month.
    pub fn len_days(self) -> u32 {
        // only fails outside chrono's range, where last_day fails too
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    /// Returns the first day of this month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] if the year is outside chrono's
    /// representable range.
    pub fn first_day(self) -> Result<NaiveDate, CalendarError> {
        self.day(1)
    }

    /// Returns the last day of this month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] if the year is outside chrono's
    /// representable range.
    pub fn last_day(self) -> Result<NaiveDate, CalendarError> {
        self.day(self.len_days())
    }

    fn day(self, day: u32) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or(CalendarError::InvalidDate {
            year: self.year,
            month: self.month,
            day,
        })
    }

    /// Returns the month `months` away from this one (negative moves back).
    pub fn shift(self, months: i32) -> Self {
        let total = self.ordinal() + i64::from(months);
        Self::from_ordinal(total)
    }

    /// Returns the signed number of months from `origin` to `self`.
    pub fn months_since(self, origin: MonthKey) -> i64 {
        self.ordinal() - origin.ordinal()
    }

    /// Zero-based month count since January of year 0.
    fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_common_year() {
        let total: u32 = (1..=12).map(|m| days_in_month(1901, m).unwrap()).sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn days_in_month_leap_years() {
        assert_eq!(days_in_month(1904, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
    }

    #[test]
    fn days_in_month_invalid() {
        assert_eq!(
            days_in_month(1901, 0).unwrap_err(),
            CalendarError::InvalidMonth { month: 0 }
        );
        assert_eq!(
            days_in_month(1901, 13).unwrap_err(),
            CalendarError::InvalidMonth { month: 13 }
        );
    }

    #[test]
    fn new_rejects_bad_month() {
        assert!(MonthKey::new(1902, 0).is_err());
        assert!(MonthKey::new(1902, 13).is_err());
        assert!(MonthKey::new(1902, 12).is_ok());
    }

    #[test]
    fn shift_across_year_boundaries() {
        let dec = MonthKey::new(1902, 12).unwrap();
        assert_eq!(dec.shift(1), MonthKey::new(1903, 1).unwrap());
        assert_eq!(dec.shift(-11), MonthKey::new(1902, 1).unwrap());
        assert_eq!(dec.shift(-12), MonthKey::new(1901, 12).unwrap());
        assert_eq!(dec.shift(0), dec);
    }

    #[test]
    fn shift_negative_years() {
        let jan = MonthKey::new(0, 1).unwrap();
        let back = jan.shift(-1);
        assert_eq!(back.year(), -1);
        assert_eq!(back.month(), 12);
    }

    #[test]
    fn months_since_is_signed() {
        let a = MonthKey::new(1901, 1).unwrap();
        let b = MonthKey::new(1902, 3).unwrap();
        assert_eq!(b.months_since(a), 14);
        assert_eq!(a.months_since(b), -14);
    }

    #[test]
    fn first_and_last_day() {
        let feb = MonthKey::new(1904, 2).unwrap();
        assert_eq!(feb.first_day().unwrap().to_string(), "1904-02-01");
        assert_eq!(feb.last_day().unwrap().to_string(), "1904-02-29");
        let dec = MonthKey::new(2009, 12).unwrap();
        assert_eq!(dec.last_day().unwrap().to_string(), "2009-12-31");
    }

    #[test]
    fn ordering_is_chronological() {
        let a = MonthKey::new(1901, 12).unwrap();
        let b = MonthKey::new(1902, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(MonthKey::new(1902, 3).unwrap().to_string(), "1902-03");
    }
}
