//! Time-axis metadata: reference date discovery and valid-date bounds.

use chrono::{NaiveDate, TimeDelta};
use cruak_calendar::{MonthKey, parse_ymd};

use crate::error::IoError;

/// Finds the first whitespace-separated token of `units` that parses as a
/// `YYYY-MM-DD` date.
///
/// Handles CF-style strings (`"days since 1900-01-01 00:00:00"`) as well as
/// free-form descriptions that mention the reference date anywhere.
///
/// # Errors
///
/// Returns [`IoError::InvalidTime`] if no token is a date.
pub fn find_reference_date(units: &str) -> Result<NaiveDate, IoError> {
    units
        .split_whitespace()
        .find_map(|token| parse_ymd(token).ok())
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("no YYYY-MM-DD reference date in time units '{units}'"),
        })
}

/// Inclusive range of dates for which the archive holds data.
///
/// `first` is the first day of the month of the earliest time stamp and
/// `last` is the last day of the month of the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl ValidRange {
    /// Creates a range from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] if `first > last`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self, IoError> {
        if first > last {
            return Err(IoError::InvalidTime {
                reason: format!("first valid date {first} is after last valid date {last}"),
            });
        }
        Ok(Self { first, last })
    }

    /// Derives the range from a reference date and the raw day offsets of
    /// the time axis. Offsets are truncated to whole days.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] if the axis is empty, an offset is
    /// not finite, or the resulting dates overflow or are out of order.
    pub fn from_time_axis(reference: NaiveDate, offsets: &[f64]) -> Result<Self, IoError> {
        let (Some(&first_offset), Some(&last_offset)) = (offsets.first(), offsets.last()) else {
            return Err(IoError::InvalidTime {
                reason: "time axis is empty".to_string(),
            });
        };
        let start = offset_date(reference, first_offset)?;
        let end = offset_date(reference, last_offset)?;
        let first = MonthKey::from_date(start).first_day()?;
        let last = MonthKey::from_date(end).last_day()?;
        Self::new(first, last)
    }

    /// First valid date (a first-of-month).
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Last valid date (a last-of-month).
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Returns true if `date` lies inside the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.first..=self.last).contains(&date)
    }
}

fn offset_date(reference: NaiveDate, offset: f64) -> Result<NaiveDate, IoError> {
    if !offset.is_finite() {
        return Err(IoError::InvalidTime {
            reason: format!("non-finite time offset {offset}"),
        });
    }
    let days = offset as i64;
    TimeDelta::try_days(days)
        .and_then(|delta| reference.checked_add_signed(delta))
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("date overflow adding {days} days to {reference}"),
        })
}
