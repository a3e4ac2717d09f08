//! Trailing month windows.

use chrono::NaiveDate;

use crate::month::MonthKey;

/// Returns the `n` calendar months ending at the month of `end`
/// (inclusive), oldest first.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use cruak_calendar::{MonthKey, trailing_months};
///
/// let end = NaiveDate::from_ymd_opt(1903, 3, 15).unwrap();
/// let months = trailing_months(end, 4);
/// assert_eq!(months[0], MonthKey::new(1902, 12).unwrap());
/// assert_eq!(months[3], MonthKey::new(1903, 3).unwrap());
/// ```
pub fn trailing_months(end: NaiveDate, n: usize) -> Vec<MonthKey> {
    let last = MonthKey::from_date(end);
    (0..n)
        .rev()
        .map(|back| last.shift(-(back as i32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let end = NaiveDate::from_ymd_opt(1902, 12, 15).unwrap();
        assert!(trailing_months(end, 0).is_empty());
    }

    #[test]
    fn single_is_current_month() {
        let end = NaiveDate::from_ymd_opt(1902, 6, 1).unwrap();
        assert_eq!(trailing_months(end, 1), vec![MonthKey::new(1902, 6).unwrap()]);
    }

    #[test]
    fn december_covers_calendar_year() {
        let end = NaiveDate::from_ymd_opt(1902, 12, 15).unwrap();
        let months = trailing_months(end, 12);
        assert_eq!(months.len(), 12);
        for (i, key) in months.iter().enumerate() {
            assert_eq!(key.year(), 1902);
            assert_eq!(key.month(), i as u32 + 1);
        }
    }

    #[test]
    fn mid_year_spans_two_years() {
        let end = NaiveDate::from_ymd_opt(1903, 6, 15).unwrap();
        let months = trailing_months(end, 12);
        assert_eq!(months[0], MonthKey::new(1902, 7).unwrap());
        assert_eq!(months[6], MonthKey::new(1903, 1).unwrap());
        assert_eq!(months[11], MonthKey::new(1903, 6).unwrap());
    }
}
