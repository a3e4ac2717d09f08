//! The archive-source seam.

use std::ops::Range;

use ndarray::{Array2, Array3};

use crate::error::IoError;

/// Name of the 2-D latitude variable.
pub const LAT_VAR: &str = "lat";
/// Name of the 2-D longitude variable.
pub const LON_VAR: &str = "lon";
/// Name of the 3-D `time x row x column` temperature variable.
pub const TEMP_VAR: &str = "temp";
/// Name of the time-offset variable.
pub const TIME_VAR: &str = "time";
/// Attributes of the time variable searched, in order, for a reference date.
pub const TIME_UNITS_ATTRS: &[&str] = &["time_units", "units"];

/// Full on-disk dimensions of the temperature variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveDims {
    /// Number of time steps (months).
    pub nt: usize,
    /// Number of rows.
    pub ny: usize,
    /// Number of columns.
    pub nx: usize,
}

/// A monthly temperature archive readable by contiguous hyperslab.
///
/// Implementors return data in `[row, column]` / `[time, row, column]`
/// order for the requested ranges; striding is applied by the caller.
pub trait ArchiveSource {
    /// Dimensions of the temperature variable.
    fn dims(&self) -> Result<ArchiveDims, IoError>;

    /// Reads a 2-D coordinate variable (`lat` or `lon`) over the given ranges.
    fn read_coordinate(
        &self,
        name: &str,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array2<f32>, IoError>;

    /// Reads the temperature variable over all times and the given ranges.
    fn read_temperature(
        &self,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array3<f32>, IoError>;

    /// Textual units description of the time axis.
    fn time_units(&self) -> Result<String, IoError>;

    /// Raw time offsets, in days from the reference date.
    fn time_offsets(&self) -> Result<Vec<f64>, IoError>;

    /// Human-readable name of the archive, used in logs and errors.
    fn describe(&self) -> String;
}
