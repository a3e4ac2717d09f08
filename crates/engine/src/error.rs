//! Error types for cruak-engine.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Error type for all fallible operations in the cruak-engine crate.
///
/// Configuration and date-range variants are construction-time failures;
/// once a [`TemperatureModel`](crate::TemperatureModel) exists, only month
/// validation and step or calendar overflow can fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Returned when a required configuration key is absent.
    #[error("missing configuration key '{key}'")]
    MissingKey {
        /// Name of the missing key.
        key: String,
    },

    /// Returned when a configuration file names a key the model does not know.
    #[error("unknown configuration key '{key}'")]
    UnknownKey {
        /// Name of the unrecognised key.
        key: String,
    },

    /// Returned when a configuration value cannot be converted.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value as written.
        value: String,
        /// Why conversion failed.
        reason: String,
    },

    /// Returned when the grid type is not a rectilinear variant.
    #[error("unsupported grid type '{grid_type}'")]
    UnsupportedGridType {
        /// Grid type as written.
        grid_type: String,
    },

    /// Returned when no archive is known for a region/resolution pair.
    #[error("combination of run_region '{region}' and run_resolution '{resolution}' not recognized")]
    UnsupportedRegion {
        /// Configured region.
        region: String,
        /// Configured resolution.
        resolution: String,
    },

    /// Returned when neither an archive path nor a data directory is configured.
    #[error("no archive configured: {reason}")]
    ArchiveNotConfigured {
        /// What is missing.
        reason: String,
    },

    /// Returned when configuration values are individually valid but
    /// inconsistent, or out of their allowed range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration file cannot be read or parsed.
    #[error("cannot load configuration {}: {reason}", path.display())]
    ConfigFile {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Returned when writing a configuration would replace an existing file.
    #[error("configuration {} already exists", path.display())]
    ConfigExists {
        /// Path that was not overwritten.
        path: PathBuf,
    },

    /// Returned when a configuration cannot be serialized or written.
    #[error("cannot write configuration {}: {reason}", path.display())]
    ConfigWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Returned when a run date falls outside the archive's valid dates.
    #[error("{name} {date} is outside the archive's valid dates [{first_valid}, {last_valid}]")]
    DateOutOfRange {
        /// Which run date is out of range.
        name: String,
        /// The offending date.
        date: NaiveDate,
        /// First valid archive date.
        first_valid: NaiveDate,
        /// Last valid archive date.
        last_valid: NaiveDate,
    },

    /// Returned when a month number is outside 1..=12.
    #[error("month ({month}) and year ({year}) can't be made a date")]
    InvalidMonth {
        /// Requested month.
        month: u32,
        /// Requested year.
        year: i32,
    },

    /// Returned when a step request does not fit in a year count.
    #[error("advancing {steps} steps of {step_years} years overflows")]
    StepOverflow {
        /// Requested number of steps.
        steps: i32,
        /// Years per step.
        step_years: i32,
    },

    /// Wraps an error originating from the cruak-io crate.
    #[error("archive error: {reason}")]
    Archive {
        /// Description of the underlying archive failure.
        reason: String,
    },

    /// Wraps an error originating from the cruak-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },
}

impl From<cruak_io::IoError> for EngineError {
    fn from(e: cruak_io::IoError) -> Self {
        EngineError::Archive {
            reason: e.to_string(),
        }
    }
}

impl From<cruak_calendar::CalendarError> for EngineError {
    fn from(e: cruak_calendar::CalendarError) -> Self {
        EngineError::Calendar {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_out_of_range() {
        let err = EngineError::DateOutOfRange {
            name: "last_date".to_string(),
            date: NaiveDate::from_ymd_opt(2010, 12, 15).unwrap(),
            first_valid: NaiveDate::from_ymd_opt(1901, 1, 1).unwrap(),
            last_valid: NaiveDate::from_ymd_opt(2009, 12, 31).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "last_date 2010-12-15 is outside the archive's valid dates [1901-01-01, 2009-12-31]"
        );
    }

    #[test]
    fn display_unsupported_region() {
        let err = EngineError::UnsupportedRegion {
            region: "Yukon".to_string(),
            resolution: "lowres".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "combination of run_region 'Yukon' and run_resolution 'lowres' not recognized"
        );
    }

    #[test]
    fn display_invalid_value() {
        let err = EngineError::InvalidValue {
            key: "i_ul".to_string(),
            value: "fifty".to_string(),
            reason: "expected an integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'fifty' for 'i_ul': expected an integer"
        );
    }

    #[test]
    fn display_config_exists() {
        let err = EngineError::ConfigExists {
            path: PathBuf::from("default_temperature.toml"),
        };
        assert_eq!(
            err.to_string(),
            "configuration default_temperature.toml already exists"
        );
    }

    #[test]
    fn display_step_overflow() {
        let err = EngineError::StepOverflow {
            steps: i32::MAX,
            step_years: 2,
        };
        assert_eq!(
            err.to_string(),
            "advancing 2147483647 steps of 2 years overflows"
        );
    }

    #[test]
    fn from_io_error() {
        let io = cruak_io::IoError::InvalidTime {
            reason: "time axis is empty".to_string(),
        };
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Archive { .. }));
        assert!(err.to_string().contains("time axis is empty"));
    }

    #[test]
    fn from_calendar_error() {
        let cal = cruak_calendar::CalendarError::InvalidMonth { month: 13 };
        let err: EngineError = cal.into();
        assert!(matches!(err, EngineError::Calendar { .. }));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<EngineError>();
    }
}
