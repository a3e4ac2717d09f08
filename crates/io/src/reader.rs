//! Loading an archive window into memory.

use std::path::Path;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, s};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read::NetcdfArchive;
use crate::region::SubRegion;
use crate::source::{ArchiveDims, ArchiveSource, LAT_VAR, LON_VAR};
use crate::time_axis::{ValidRange, find_reference_date};

/// The in-memory sub-region of an archive: coordinates, temperature for
/// every month of the archive, and the archive's valid-date bounds.
///
/// Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ArchiveWindow {
    latitude: Array2<f32>,
    longitude: Array2<f32>,
    temperature: Array3<f32>,
    dims: ArchiveDims,
    region: SubRegion,
    valid_range: ValidRange,
}

impl ArchiveWindow {
    /// Latitude of each window cell, `(rows, columns)`.
    pub fn latitude(&self) -> ArrayView2<'_, f32> {
        self.latitude.view()
    }

    /// Longitude of each window cell, `(rows, columns)`.
    pub fn longitude(&self) -> ArrayView2<'_, f32> {
        self.longitude.view()
    }

    /// Temperature for every archive month, `(months, rows, columns)`.
    pub fn temperature(&self) -> ArrayView3<'_, f32> {
        self.temperature.view()
    }

    /// Temperature grid at time index `index`, or `None` past the time axis.
    pub fn month(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        (index < self.n_months()).then(|| self.temperature.index_axis(Axis(0), index))
    }

    /// Number of months held.
    pub fn n_months(&self) -> usize {
        self.temperature.len_of(Axis(0))
    }

    /// Spatial shape of the window, `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.region.shape()
    }

    /// Full on-disk dimensions of the archive's temperature variable.
    pub fn dims(&self) -> ArchiveDims {
        self.dims
    }

    /// The sub-region this window was read with.
    pub fn region(&self) -> &SubRegion {
        &self.region
    }

    /// Dates for which the archive holds data.
    pub fn valid_range(&self) -> ValidRange {
        self.valid_range
    }
}

/// Reads `region` from `source` into memory.
///
/// Coordinates and temperature are read as one contiguous hyperslab per
/// variable and then strided down to the window's cells.
///
/// # Errors
///
/// Returns [`IoError`] if the region is invalid or does not fit the
/// archive, a variable is missing or misshapen, or the time axis cannot be
/// interpreted.
pub fn load_window<S: ArchiveSource + ?Sized>(
    source: &S,
    region: &SubRegion,
) -> Result<ArchiveWindow, IoError> {
    region.validate()?;
    let dims = source.dims()?;
    region.check_fits(dims.ny, dims.nx)?;

    let rows = region.row_span();
    let columns = region.column_span();
    debug!(?rows, ?columns, "reading archive hyperslab");

    let j_step = region.j_skip() as isize;
    let i_step = region.i_skip() as isize;

    let latitude = source
        .read_coordinate(LAT_VAR, rows.clone(), columns.clone())?
        .slice(s![..;j_step, ..;i_step])
        .to_owned();
    let longitude = source
        .read_coordinate(LON_VAR, rows.clone(), columns.clone())?
        .slice(s![..;j_step, ..;i_step])
        .to_owned();
    let temperature = source
        .read_temperature(rows, columns)?
        .slice(s![.., ..;j_step, ..;i_step])
        .to_owned();

    let expected = region.shape();
    for (name, got) in [
        (LAT_VAR, latitude.dim()),
        (LON_VAR, longitude.dim()),
        ("temp", (temperature.dim().1, temperature.dim().2)),
    ] {
        if got != expected {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} window"),
                expected: expected.0 * expected.1,
                got: got.0 * got.1,
            });
        }
    }

    let units = source.time_units()?;
    let reference = find_reference_date(&units)?;
    let offsets = source.time_offsets()?;
    if offsets.len() != dims.nt {
        return Err(IoError::DimensionMismatch {
            name: "time".to_string(),
            expected: dims.nt,
            got: offsets.len(),
        });
    }
    let valid_range = ValidRange::from_time_axis(reference, &offsets)?;

    info!(
        archive = %source.describe(),
        months = dims.nt,
        rows = expected.0,
        columns = expected.1,
        first_valid = %valid_range.first(),
        last_valid = %valid_range.last(),
        "archive window loaded"
    );

    Ok(ArchiveWindow {
        latitude,
        longitude,
        temperature,
        dims,
        region: *region,
        valid_range,
    })
}

/// Opens the netCDF archive at `path`, loads `region`, and closes the file
/// before returning.
///
/// # Errors
///
/// See [`NetcdfArchive::open`] and [`load_window`].
pub fn read_netcdf_window(path: &Path, region: &SubRegion) -> Result<ArchiveWindow, IoError> {
    let archive = NetcdfArchive::open(path)?;
    load_window(&archive, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryArchive;
    use chrono::NaiveDate;

    fn archive(nt: usize, ny: usize, nx: usize) -> MemoryArchive {
        let temp = Array3::from_shape_fn((nt, ny, nx), |(t, j, i)| {
            (t * 10_000 + j * 100 + i) as f32
        });
        let offsets = (0..nt).map(|t| 15.0 + 30.5 * t as f64).collect();
        MemoryArchive::new(temp, "days since 1900-01-01", offsets).unwrap()
    }

    #[test]
    fn loads_strided_window() {
        let region = SubRegion::new(3, 2).with_offset(1, 2).with_stride(2, 3);
        let window = load_window(&archive(4, 8, 8), &region).unwrap();

        assert_eq!(window.shape(), (2, 3));
        assert_eq!(window.n_months(), 4);
        // Model (j=1, i=2) -> archive (row 5, column 5).
        assert_eq!(window.temperature()[[3, 1, 2]], 30_505.0);
        assert_eq!(window.latitude()[[1, 2]], 5.0);
        assert_eq!(window.longitude()[[1, 2]], 5.0);
        assert_eq!(
            window.valid_range().first(),
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
        );
    }

    #[test]
    fn month_past_axis_is_none() {
        let window = load_window(&archive(2, 2, 2), &SubRegion::new(2, 2)).unwrap();
        assert!(window.month(1).is_some());
        assert!(window.month(2).is_none());
    }

    #[test]
    fn rejects_window_outside_archive() {
        let region = SubRegion::new(3, 2).with_offset(6, 0);
        assert!(matches!(
            load_window(&archive(1, 4, 8), &region),
            Err(IoError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_missing_reference_date() {
        let temp = Array3::<f32>::zeros((1, 1, 1));
        let source = MemoryArchive::new(temp, "months", vec![0.0]).unwrap();
        assert!(matches!(
            load_window(&source, &SubRegion::new(1, 1)),
            Err(IoError::InvalidTime { .. })
        ));
    }
}
