//! Error types for cruak-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the cruak-io crate.
///
/// This enum covers missing files, netCDF library failures, time-axis
/// metadata problems, and sub-region windows that do not fit the archive.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the netCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying netCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the cruak-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when a required variable is not present in the archive.
    #[error("variable '{name}' not found in {source_name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Description of the archive that was inspected.
        source_name: String,
    },

    /// Returned when a dimension or array has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when values read from the archive cannot be arranged into
    /// the expected array shape.
    #[error("array shape error: {reason}")]
    Shape {
        /// Description of the shape failure.
        reason: String,
    },

    /// Returned when time-axis metadata cannot be interpreted.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a sub-region has a zero extent or a zero stride.
    #[error("invalid sub-region: {reason}")]
    InvalidRegion {
        /// Which parameter is invalid.
        reason: String,
    },

    /// Returned when a sub-region reaches past the archive's edge.
    #[error("window exceeds archive along {axis}: needs index {needed}, archive has {len}")]
    WindowOutOfBounds {
        /// Axis name (`rows` or `columns`).
        axis: String,
        /// Largest index the window needs.
        needed: usize,
        /// Archive length along that axis.
        len: usize,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<cruak_calendar::CalendarError> for IoError {
    fn from(e: cruak_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for IoError {
    fn from(e: ndarray::ShapeError) -> Self {
        IoError::Shape {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "temp".to_string(),
            source_name: "/data/cru.nc".to_string(),
        };
        assert_eq!(err.to_string(), "variable 'temp' not found in /data/cru.nc");
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "temp dimensions".to_string(),
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'temp dimensions' mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn display_window_out_of_bounds() {
        let err = IoError::WindowOutOfBounds {
            axis: "columns".to_string(),
            needed: 90,
            len: 80,
        };
        assert_eq!(
            err.to_string(),
            "window exceeds archive along columns: needs index 90, archive has 80"
        );
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn from_calendar_error() {
        let cal_err = cruak_calendar::CalendarError::InvalidMonth { month: 0 };
        let err: IoError = cal_err.into();
        assert!(matches!(err, IoError::Calendar { .. }));
        assert!(err.to_string().contains("calendar error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
