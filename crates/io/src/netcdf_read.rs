//! netCDF-backed archive source.

use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};

use crate::error::IoError;
use crate::source::{ArchiveDims, ArchiveSource, TEMP_VAR, TIME_UNITS_ATTRS, TIME_VAR};

/// An open netCDF archive.
///
/// The file handle is released when the value is dropped; callers that
/// only need the in-memory window should go through
/// [`read_netcdf_window`](crate::read_netcdf_window), which drops it
/// before returning.
pub struct NetcdfArchive {
    file: netcdf::File,
    path: PathBuf,
}

impl NetcdfArchive {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the path does not exist, or
    /// [`IoError::Netcdf`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            file: netcdf::open(path)?,
            path: path.to_path_buf(),
        })
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>, IoError> {
        self.file
            .variable(name)
            .ok_or_else(|| IoError::MissingVariable {
                name: name.to_string(),
                source_name: self.describe(),
            })
    }

    fn check_rank(var: &netcdf::Variable<'_>, name: &str, rank: usize) -> Result<(), IoError> {
        let got = var.dimensions().len();
        if got != rank {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} dimensions"),
                expected: rank,
                got,
            });
        }
        Ok(())
    }
}

impl ArchiveSource for NetcdfArchive {
    fn dims(&self) -> Result<ArchiveDims, IoError> {
        let var = self.variable(TEMP_VAR)?;
        Self::check_rank(&var, TEMP_VAR, 3)?;
        let dims = var.dimensions();
        Ok(ArchiveDims {
            nt: dims[0].len(),
            ny: dims[1].len(),
            nx: dims[2].len(),
        })
    }

    fn read_coordinate(
        &self,
        name: &str,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array2<f32>, IoError> {
        let var = self.variable(name)?;
        Self::check_rank(&var, name, 2)?;
        let shape = (rows.len(), columns.len());
        let data = var.get_values::<f32, _>((rows, columns))?;
        Ok(Array2::from_shape_vec(shape, data)?)
    }

    fn read_temperature(
        &self,
        rows: Range<usize>,
        columns: Range<usize>,
    ) -> Result<Array3<f32>, IoError> {
        let nt = self.dims()?.nt;
        let var = self.variable(TEMP_VAR)?;
        let shape = (nt, rows.len(), columns.len());
        let data = var.get_values::<f32, _>((0..nt, rows, columns))?;
        Ok(Array3::from_shape_vec(shape, data)?)
    }

    fn time_units(&self) -> Result<String, IoError> {
        let var = self.variable(TIME_VAR)?;
        for &attr in TIME_UNITS_ATTRS {
            let Some(value) = var.attribute_value(attr) else {
                continue;
            };
            let units: String = value
                .map_err(|e| IoError::InvalidTime {
                    reason: format!("failed to read '{attr}' attribute: {e}"),
                })?
                .try_into()
                .map_err(|e: netcdf::Error| IoError::InvalidTime {
                    reason: format!("'{attr}' attribute is not a string: {e}"),
                })?;
            return Ok(units);
        }
        Err(IoError::InvalidTime {
            reason: format!(
                "time variable '{TIME_VAR}' has none of the attributes {TIME_UNITS_ATTRS:?}"
            ),
        })
    }

    fn time_offsets(&self) -> Result<Vec<f64>, IoError> {
        let var = self.variable(TIME_VAR)?;
        Ok(var.get_values::<f64, _>(..)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
