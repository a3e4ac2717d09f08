//! Integration tests for reading archive windows from netCDF files.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use chrono::NaiveDate;
use tempfile::tempdir;
use cruak_io::{ArchiveSource, IoError, NetcdfArchive, SubRegion, read_netcdf_window};

// ---------------------------------------------------------------------------
// Helper: programmatic netCDF fixture builder
// ---------------------------------------------------------------------------

struct Fixture {
    nt: usize,
    ny: usize,
    nx: usize,
    units_attr: &'static str,
    units: String,
    with_lon: bool,
}

impl Fixture {
    fn new(nt: usize, ny: usize, nx: usize) -> Self {
        Self {
            nt,
            ny,
            nx,
            units_attr: "time_units",
            units: "days since 1900-01-01 00:00:00".to_string(),
            with_lon: true,
        }
    }

    fn with_units(mut self, attr: &'static str, units: &str) -> Self {
        self.units_attr = attr;
        self.units = units.to_string();
        self
    }

    fn without_lon(mut self) -> Self {
        self.with_lon = false;
        self
    }

    fn value(t: usize, j: usize, i: usize) -> f32 {
        t as f32 + j as f32 * 0.01 + i as f32 * 0.0001
    }

    fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("archive.nc");
        let mut file = netcdf::create(&path).expect("failed to create netCDF file");

        file.add_dimension("time", self.nt).expect("add dim time");
        file.add_dimension("y", self.ny).expect("add dim y");
        file.add_dimension("x", self.nx).expect("add dim x");

        let lat: Vec<f32> = (0..self.ny * self.nx)
            .map(|k| 55.0 + (k / self.nx) as f32 * 0.5)
            .collect();
        let lon: Vec<f32> = (0..self.ny * self.nx)
            .map(|k| -170.0 + (k % self.nx) as f32 * 0.5)
            .collect();
        {
            let mut var = file
                .add_variable::<f32>("lat", &["y", "x"])
                .expect("add var lat");
            var.put_values(&lat, ..).expect("put lat values");
        }
        if self.with_lon {
            let mut var = file
                .add_variable::<f32>("lon", &["y", "x"])
                .expect("add var lon");
            var.put_values(&lon, ..).expect("put lon values");
        }
        {
            // Mid-month stamps, 31 days apart, from 1901-01-16.
            let time: Vec<f64> = (0..self.nt).map(|t| 380.0 + 31.0 * t as f64).collect();
            let mut var = file
                .add_variable::<f64>("time", &["time"])
                .expect("add var time");
            var.put_values(&time, ..).expect("put time values");
            var.put_attribute(self.units_attr, self.units.as_str())
                .expect("add time units");
        }
        {
            let mut temp = Vec::with_capacity(self.nt * self.ny * self.nx);
            for t in 0..self.nt {
                for j in 0..self.ny {
                    for i in 0..self.nx {
                        temp.push(Self::value(t, j, i));
                    }
                }
            }
            let mut var = file
                .add_variable::<f32>("temp", &["time", "y", "x"])
                .expect("add var temp");
            var.put_values(&temp, ..).expect("put temp values");
        }

        path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn reads_offset_window() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(24, 10, 12).write(dir.path());

    let region = SubRegion::new(4, 3).with_offset(5, 2);
    let window = read_netcdf_window(&path, &region).unwrap();

    assert_eq!(window.shape(), (3, 4));
    assert_eq!(window.n_months(), 24);
    assert_eq!(window.dims().nx, 12);
    assert_relative_eq!(
        window.temperature()[[7, 1, 3]],
        Fixture::value(7, 3, 8),
        epsilon = 1e-6
    );
    assert_relative_eq!(window.latitude()[[2, 0]], 57.0, epsilon = 1e-6);
    assert_relative_eq!(window.longitude()[[0, 3]], -166.0, epsilon = 1e-6);
}

#[test]
fn reads_strided_window() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(3, 10, 12).write(dir.path());

    let region = SubRegion::new(3, 2).with_offset(1, 1).with_stride(4, 5);
    let window = read_netcdf_window(&path, &region).unwrap();

    assert_eq!(window.shape(), (2, 3));
    assert_relative_eq!(
        window.temperature()[[2, 1, 2]],
        Fixture::value(2, 6, 9),
        epsilon = 1e-6
    );
}

#[test]
fn valid_dates_span_whole_months() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(24, 2, 2).write(dir.path());

    let window = read_netcdf_window(&path, &SubRegion::new(2, 2)).unwrap();
    let range = window.valid_range();
    // 380 days after 1900-01-01 is 1901-01-16; 380 + 23*31 = 1093 is 1902-12-30.
    assert_eq!(range.first(), NaiveDate::from_ymd_opt(1901, 1, 1).unwrap());
    assert_eq!(range.last(), NaiveDate::from_ymd_opt(1902, 12, 31).unwrap());
}

#[test]
fn falls_back_to_units_attribute() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(2, 2, 2)
        .with_units("units", "days since 1900-01-01")
        .write(dir.path());

    let archive = NetcdfArchive::open(&path).unwrap();
    assert_eq!(archive.time_units().unwrap(), "days since 1900-01-01");
}

#[test]
fn missing_file() {
    let dir = tempdir().unwrap();
    let err = read_netcdf_window(&dir.path().join("nope.nc"), &SubRegion::new(1, 1)).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn missing_coordinate_variable() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(2, 2, 2).without_lon().write(dir.path());

    match read_netcdf_window(&path, &SubRegion::new(2, 2)).unwrap_err() {
        IoError::MissingVariable { name, .. } => assert_eq!(name, "lon"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn window_too_large() {
    let dir = tempdir().unwrap();
    let path = Fixture::new(2, 4, 4).write(dir.path());

    let err = read_netcdf_window(&path, &SubRegion::new(5, 1)).unwrap_err();
    assert!(matches!(err, IoError::WindowOutOfBounds { .. }));
}
