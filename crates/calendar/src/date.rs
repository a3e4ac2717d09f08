//! Year and month shifts, the canonical date-of-year, and date parsing.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::CalendarError;

/// Month used when a date boundary is configured by year alone.
pub const CANONICAL_MONTH: u32 = 12;

/// Day-of-month used when a date boundary is configured by year alone.
pub const CANONICAL_DAY: u32 = 15;

/// Returns the canonical date (December 15) of `year`.
///
/// Every year-level boundary of a run (start, end, and each whole-year
/// step) falls on this day, so the trailing twelve-month window of a
/// boundary always covers January through December of its year.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] if `year` is outside chrono's
/// representable range.
pub fn canonical_date(year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, CANONICAL_MONTH, CANONICAL_DAY).ok_or(
        CalendarError::InvalidDate {
            year,
            month: CANONICAL_MONTH,
            day: CANONICAL_DAY,
        },
    )
}

/// Shifts `date` by a whole number of years.
///
/// The day-of-month is clamped to the length of the target month, so
/// February 29 shifted by one year lands on February 28.
///
/// # Errors
///
/// Returns [`CalendarError::Overflow`] if the result is not representable.
pub fn add_years(date: NaiveDate, years: i32) -> Result<NaiveDate, CalendarError> {
    let months = years.checked_mul(12).ok_or_else(|| CalendarError::Overflow {
        reason: format!("adding {years} years to {date}"),
    })?;
    add_months(date, months)
}

/// Shifts `date` by a whole number of months, clamping the day-of-month.
///
/// # Errors
///
/// Returns [`CalendarError::Overflow`] if the result is not representable.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, CalendarError> {
    let span = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(span)
    } else {
        date.checked_sub_months(span)
    };
    shifted.ok_or_else(|| CalendarError::Overflow {
        reason: format!("adding {months} months to {date}"),
    })
}

/// Returns the signed number of calendar years from `from` to `to`,
/// ignoring month and day.
pub fn year_delta(from: NaiveDate, to: NaiveDate) -> i32 {
    to.year() - from.year()
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`CalendarError::Parse`] if `input` is not a valid date.
pub fn parse_ymd(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| CalendarError::Parse {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
