//! Error types for the cruak-calendar crate.

/// Error type for all fallible operations in the cruak-calendar crate.
///
/// This enum covers validation failures for month numbers and calendar
/// dates, shifts that leave chrono's representable range, and malformed
/// `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u32,
    },

    /// Returned when a (year, month, day) triple is not a Gregorian date.
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
        /// Day component.
        day: u32,
    },

    /// Returned when shifting a date leaves the representable range.
    #[error("date overflow: {reason}")]
    Overflow {
        /// Description of the shift that overflowed.
        reason: String,
    },

    /// Returned when a string is not a `YYYY-MM-DD` date.
    #[error("malformed date '{input}': {reason}")]
    Parse {
        /// The string that failed to parse.
        input: String,
        /// Parser message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_month() {
        let err = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_date_is_zero_padded() {
        let err = CalendarError::InvalidDate {
            year: 1901,
            month: 2,
            day: 29,
        };
        assert_eq!(err.to_string(), "invalid date: 1901-02-29");
    }

    #[test]
    fn error_overflow() {
        let err = CalendarError::Overflow {
            reason: "adding 12 months".to_string(),
        };
        assert_eq!(err.to_string(), "date overflow: adding 12 months");
    }

    #[test]
    fn error_parse() {
        let err = CalendarError::Parse {
            input: "1902/12/15".to_string(),
            reason: "input contains invalid characters".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed date '1902/12/15': input contains invalid characters"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<CalendarError>();
    }
}
