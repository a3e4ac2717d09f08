//! End-to-end runs from configuration files against netCDF archives.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use cruak_engine::{ALASKA_LOWRES_ARCHIVE, EngineError, RunConfig, TemperatureModel};
use tempfile::tempdir;

const NT: usize = 48; // 1901-01 .. 1904-12
const NY: usize = 6;
const NX: usize = 8;

fn value(t: usize, j: usize, i: usize) -> f32 {
    -30.0 + t as f32 + j as f32 * 0.1 + i as f32 * 0.01
}

fn write_archive(path: &Path) {
    let mut file = netcdf::create(path).expect("create archive");
    file.add_dimension("time", NT).expect("add dim time");
    file.add_dimension("y", NY).expect("add dim y");
    file.add_dimension("x", NX).expect("add dim x");

    let lat: Vec<f32> = (0..NY * NX).map(|k| 60.0 + (k / NX) as f32).collect();
    let lon: Vec<f32> = (0..NY * NX).map(|k| -150.0 + (k % NX) as f32).collect();
    {
        let mut var = file.add_variable::<f32>("lat", &["y", "x"]).expect("add lat");
        var.put_values(&lat, ..).expect("put lat");
    }
    {
        let mut var = file.add_variable::<f32>("lon", &["y", "x"]).expect("add lon");
        var.put_values(&lon, ..).expect("put lon");
    }
    {
        let reference = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let time: Vec<f64> = (0..NT)
            .map(|t| {
                let d = NaiveDate::from_ymd_opt(1901 + (t / 12) as i32, (t % 12) as u32 + 1, 15)
                    .unwrap();
                (d - reference).num_days() as f64
            })
            .collect();
        let mut var = file.add_variable::<f64>("time", &["time"]).expect("add time");
        var.put_values(&time, ..).expect("put time");
        var.put_attribute("time_units", "days since 1900-01-01")
            .expect("put time_units");
    }
    {
        let temp: Vec<f32> = (0..NT * NY * NX)
            .map(|k| value(k / (NY * NX), (k / NX) % NY, k % NX))
            .collect();
        let mut var = file
            .add_variable::<f32>("temp", &["time", "y", "x"])
            .expect("add temp");
        var.put_values(&temp, ..).expect("put temp");
    }
}

fn legacy_cfg(extra: &str) -> String {
    format!(
        "\
# test run
model_start_year | 1902 | int | x
model_end_year   | 1904 | int | x
timestep         | 1    | int | x
grid_columns     | 3    | int | x
grid_rows        | 2    | int | x
grid_type        | uniform_rectilinear | string | x
grid_name        | temperature | string | x
i_ul             | 4    | int | x
j_ul             | 1    | int | x
run_region       | Alaska | string | x
run_resolution   | lowres | string | x
{extra}"
    )
}

fn write_text(path: &Path, text: &str) -> PathBuf {
    std::fs::write(path, text).expect("write config");
    path.to_path_buf()
}

#[test]
fn legacy_config_with_archive_path() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("temperature.nc");
    write_archive(&archive);
    let cfg = write_text(
        &dir.path().join("run_cruAKtemp_model.cfg"),
        &legacy_cfg(&format!("archive_path | {} | string | x\n", archive.display())),
    );

    let model = TemperatureModel::from_config_file(&cfg).unwrap();
    assert_eq!(model.grid_shape(), (2, 3));
    assert_eq!(model.first_valid_date(), NaiveDate::from_ymd_opt(1901, 1, 1).unwrap());
    assert_eq!(model.last_valid_date(), NaiveDate::from_ymd_opt(1904, 12, 31).unwrap());
    // December 1902 is t = 23; window cell (0, 0) is archive (1, 4).
    assert_abs_diff_eq!(model.t_air()[[0, 0]], value(23, 1, 4));
    assert_abs_diff_eq!(model.prior_jan()[[1, 2]], value(12, 2, 6));
    assert_eq!(model.latitude()[[1, 0]], 62.0);
    assert_eq!(model.longitude()[[0, 2]], -144.0);
}

#[test]
fn toml_config_with_data_directory() {
    let dir = tempdir().unwrap();
    write_archive(&dir.path().join(ALASKA_LOWRES_ARCHIVE));
    let cfg = write_text(
        &dir.path().join("run.toml"),
        &format!(
            "grid_columns = 3\ngrid_rows = 2\ni_ul = 4\nj_ul = 1\n\
             model_start_year = 1902\nmodel_end_year = 1904\n\
             data_directory = \"{}\"\n",
            dir.path().display()
        ),
    );

    let mut model = TemperatureModel::from_config_file(&cfg).unwrap();
    model.update(None).unwrap();
    assert_abs_diff_eq!(model.t_air()[[0, 0]], value(35, 1, 4));
    assert_eq!(model.get_current_timestep(), 1);
}

#[test]
fn initialize_from_run_config() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("a.nc");
    write_archive(&archive);
    let config = RunConfig::new(3, 2, 1902, 1904)
        .with_offset(4, 1)
        .with_archive_path(&archive);

    let mut model = TemperatureModel::initialize(config).unwrap();
    while model.current_date() < model.last_date() {
        model.update(None).unwrap();
    }
    assert_eq!(model.get_current_timestep(), model.get_end_timestep());
    assert_abs_diff_eq!(model.t_air()[[1, 1]], value(47, 2, 5));
}

#[test]
fn missing_archive_file() {
    let dir = tempdir().unwrap();
    let config = RunConfig::new(3, 2, 1902, 1904).with_data_directory(dir.path());
    let err = TemperatureModel::initialize(config).unwrap_err();
    assert!(matches!(err, EngineError::Archive { .. }));
    assert!(err.to_string().contains(ALASKA_LOWRES_ARCHIVE));
}

#[test]
fn unsupported_region_in_config_file() {
    let dir = tempdir().unwrap();
    let cfg = write_text(
        &dir.path().join("bad.cfg"),
        &legacy_cfg("").replace("| lowres |", "| hires |"),
    );
    let err = TemperatureModel::from_config_file(&cfg).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedRegion { .. }));
}

#[test]
fn run_past_archive_end_is_rejected() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("a.nc");
    write_archive(&archive);
    let config = RunConfig::new(3, 2, 1902, 1905).with_archive_path(&archive);
    let err = TemperatureModel::initialize(config).unwrap_err();
    assert!(matches!(err, EngineError::DateOutOfRange { .. }));
}
