//! In-memory archive source.

use std::ops::Range;

use ndarray::{Array2, Array3, s};

use crate::error::IoError;
use crate::source::{ArchiveDims, ArchiveSource, LAT_VAR, LON_VAR, TIME_VAR};

/// An archive held entirely in memory.
///
/// Useful for hosts that already carry the data and for deterministic
/// fixtures. Coordinates default to the row index (latitude) and column
/// index (longitude) unless set with [`MemoryArchive::with_coordinates`].
#[derive(Debug, Clone)]
pub struct MemoryArchive {
    temperature: Array3<f32>,
    latitude: Array2<f32>,
    longitude: Array2<f32>,
    time_units: String,
    time_offsets: Vec<f64>,
}

impl MemoryArchive {
    /// Creates an archive from a `time x row x column` temperature array,
    /// the time-axis units text, and one day offset per time step.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if the number of offsets does
    /// not match the time dimension.
    pub fn new(
        temperature: Array3<f32>,
        time_units: impl Into<String>,
        time_offsets: Vec<f64>,
    ) -> Result<Self, IoError> {
        let (nt, ny, nx) = temperature.dim();
        if time_offsets.len() != nt {
            return Err(IoError::DimensionMismatch {
                name: TIME_VAR.to_string(),
                expected: nt,
                got: time_offsets.len(),
            });
        }
        let latitude = Array2::from_shape_fn((ny, nx), |(j, _)| j as f32);
        let longitude = Array2::from_shape_fn((ny, nx), |(_, i)| i as f32);
        Ok(Self {
            temperature,
            latitude,
            longitude,
            time_units: time_units.into(),
            time_offsets,
        })
    }

    /// Replaces the latitude and longitude grids.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if either grid's shape differs
    /// from the temperature grid's spatial shape.
    pub fn with_coordinates(
        mut self,
        latitude: Array2<f32>,
        longitude: Array2<f32>,
    ) -> Result<Self, IoError> {
        let (_, ny, nx) = self.temperature.dim();
        for (name, grid) in [(LAT_VAR, &latitude), (LON_VAR, &longitude)] {
            if grid.dim() != (ny, nx) {
                return Err(IoError::DimensionMismatch {
                    name: name.to_string(),
                    expected: ny * nx,
                    got: grid.len(),
                });
            }
        }
        self.latitude = latitude;
        self.longitude = longitude;
        Ok(self)
    }
}

impl ArchiveSource for MemoryArchive {
    fn dims(&self) -> Result<ArchiveDims, IoError> {
        let (nt, ny, nx) = self.temperature.dim();
        Ok(ArchiveDims { nt, ny, nx })
    }

    fn read_coordinate(
        &self,
        name: &str,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array2<f32>, IoError> {
        let grid = match name {
            LAT_VAR => &self.latitude,
            LON_VAR => &self.longitude,
            _ => {
                return Err(IoError::MissingVariable {
                    name: name.to_string(),
                    source_name: self.describe(),
                });
            }
        };
        Ok(grid.slice(s![rows, columns]).to_owned())
    }

    fn read_temperature(
        &self,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array3<f32>, IoError> {
        Ok(self.temperature.slice(s![.., rows, columns]).to_owned())
    }

    fn time_units(&self) -> Result<String, IoError> {
        Ok(self.time_units.clone())
    }

    fn time_offsets(&self) -> Result<Vec<f64>, IoError> {
        Ok(self.time_offsets.clone())
    }

    fn describe(&self) -> String {
        let (nt, ny, nx) = self.temperature.dim();
        format!("in-memory archive ({nt}x{ny}x{nx})")
    }
}
