//! Run configuration for the temperature model.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use cruak_io::SubRegion;
use serde::{Deserialize, Serialize};

use tracing::info;

use crate::error::EngineError;
use crate::legacy::parse_legacy_config;

/// File name of the low-resolution Alaska archive inside a data directory.
pub const ALASKA_LOWRES_ARCHIVE: &str = "cru_alaska_lowres_temperature.nc";

/// File written by [`write_default_config`] when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "default_temperature.toml";

/// Spatial grid layout of the model domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    /// Equal spacing along each axis.
    #[default]
    UniformRectilinear,
    /// Per-axis coordinate vectors.
    Rectilinear,
}

impl GridType {
    /// Configuration spelling of this grid type.
    pub fn as_str(self) -> &'static str {
        match self {
            GridType::UniformRectilinear => "uniform_rectilinear",
            GridType::Rectilinear => "rectilinear",
        }
    }
}

impl FromStr for GridType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "uniform_rectilinear" => Ok(GridType::UniformRectilinear),
            "rectilinear" => Ok(GridType::Rectilinear),
            other => Err(EngineError::UnsupportedGridType {
                grid_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a fractional BMI update advances the clock.
///
/// `Literal` advances once by the rounded step count, refreshes, and then
/// runs a full model update with the same fraction, so the clock moves
/// twice. `SingleAdvance` stops after the first advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FracStepMode {
    /// Advance, refresh, then a second model update.
    #[default]
    #[serde(rename = "literal")]
    Literal,
    /// Advance and refresh only.
    #[serde(rename = "single")]
    SingleAdvance,
}

impl FromStr for FracStepMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "literal" => Ok(FracStepMode::Literal),
            "single" => Ok(FracStepMode::SingleAdvance),
            other => Err(EngineError::InvalidValue {
                key: "frac_step_mode".to_string(),
                value: other.to_string(),
                reason: "expected 'literal' or 'single'".to_string(),
            }),
        }
    }
}

/// Configuration of one model run.
///
/// Field names match the keys of both supported file formats. Required
/// values go through [`RunConfig::new`]; the rest have builder methods.
///
/// # Example
///
/// ```
/// use cruak_engine::RunConfig;
///
/// let config = RunConfig::new(40, 20, 1902, 1910)
///     .with_offset(50, 25)
///     .with_data_directory("/data/cru");
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.grid_shape(), (20, 40));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    grid_columns: usize,
    grid_rows: usize,
    #[serde(default)]
    grid_type: GridType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_name: Option<String>,
    #[serde(default)]
    i_ul: usize,
    #[serde(default)]
    j_ul: usize,
    #[serde(default = "default_skip")]
    i_skip: usize,
    #[serde(default = "default_skip")]
    j_skip: usize,
    model_start_year: i32,
    model_end_year: i32,
    #[serde(default = "default_timestep")]
    timestep: i32,
    #[serde(default = "default_region")]
    run_region: String,
    #[serde(default = "default_resolution")]
    run_resolution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    run_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    archive_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestep0_date: Option<NaiveDate>,
    #[serde(default)]
    frac_step_mode: FracStepMode,
}

fn default_skip() -> usize {
    1
}
fn default_timestep() -> i32 {
    1
}
fn default_region() -> String {
    "Alaska".to_string()
}
fn default_resolution() -> String {
    "lowres".to_string()
}

/// The default Alaska run: a 40 x 20 window at column 50, row 25 of the
/// low-resolution archive, stepped yearly from 1902 to 1910.
impl Default for RunConfig {
    fn default() -> Self {
        RunConfig::new(40, 20, 1902, 1910)
            .with_offset(50, 25)
            .with_grid_name("temperature")
            .with_description("north slope subset of upscaled cru-ncep temp data")
    }
}

impl RunConfig {
    /// Creates a configuration for a `grid_columns` x `grid_rows` window
    /// running from `model_start_year` to `model_end_year`.
    ///
    /// Defaults: uniform rectilinear grid, offset `(0, 0)`, stride `1`,
    /// one-year timestep, region `Alaska` at `lowres`, literal frac steps.
    pub fn new(
        grid_columns: usize,
        grid_rows: usize,
        model_start_year: i32,
        model_end_year: i32,
    ) -> Self {
        Self {
            grid_columns,
            grid_rows,
            grid_type: GridType::default(),
            grid_name: None,
            i_ul: 0,
            j_ul: 0,
            i_skip: default_skip(),
            j_skip: default_skip(),
            model_start_year,
            model_end_year,
            timestep: default_timestep(),
            run_region: default_region(),
            run_resolution: default_resolution(),
            run_description: None,
            archive_path: None,
            data_directory: None,
            timestep0_date: None,
            frac_step_mode: FracStepMode::default(),
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Sets the grid type.
    pub fn with_grid_type(mut self, grid_type: GridType) -> Self {
        self.grid_type = grid_type;
        self
    }

    /// Sets the descriptive grid name.
    pub fn with_grid_name(mut self, name: impl Into<String>) -> Self {
        self.grid_name = Some(name.into());
        self
    }

    /// Sets the archive column (`i_ul`) and row (`j_ul`) of the window's
    /// upper-left cell.
    pub fn with_offset(mut self, i_ul: usize, j_ul: usize) -> Self {
        self.i_ul = i_ul;
        self.j_ul = j_ul;
        self
    }

    /// Sets the column and row strides.
    pub fn with_stride(mut self, i_skip: usize, j_skip: usize) -> Self {
        self.i_skip = i_skip;
        self.j_skip = j_skip;
        self
    }

    /// Sets the step duration in whole years.
    pub fn with_timestep(mut self, years: i32) -> Self {
        self.timestep = years;
        self
    }

    /// Sets the region and resolution used to locate the archive.
    pub fn with_region(mut self, region: impl Into<String>, resolution: impl Into<String>) -> Self {
        self.run_region = region.into();
        self.run_resolution = resolution.into();
        self
    }

    /// Sets the free-text run description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.run_description = Some(description.into());
        self
    }

    /// Points the run at an explicit archive file.
    pub fn with_archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    /// Sets the directory searched for region archives.
    pub fn with_data_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_directory = Some(dir.into());
        self
    }

    /// Overrides the date at timestep 0 (defaults to the first model date).
    pub fn with_timestep0_date(mut self, date: NaiveDate) -> Self {
        self.timestep0_date = Some(date);
        self
    }

    /// Sets how fractional BMI updates advance the clock.
    pub fn with_frac_step_mode(mut self, mode: FracStepMode) -> Self {
        self.frac_step_mode = mode;
        self
    }

    /// Number of columns in the model grid.
    pub fn grid_columns(&self) -> usize {
        self.grid_columns
    }

    /// Number of rows in the model grid.
    pub fn grid_rows(&self) -> usize {
        self.grid_rows
    }

    /// Model grid shape as `(rows, columns)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.grid_rows, self.grid_columns)
    }

    /// Grid type.
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    /// Descriptive grid name, if any.
    pub fn grid_name(&self) -> Option<&str> {
        self.grid_name.as_deref()
    }

    /// Archive column of the window's upper-left cell.
    pub fn i_ul(&self) -> usize {
        self.i_ul
    }

    /// Archive row of the window's upper-left cell.
    pub fn j_ul(&self) -> usize {
        self.j_ul
    }

    /// Column stride.
    pub fn i_skip(&self) -> usize {
        self.i_skip
    }

    /// Row stride.
    pub fn j_skip(&self) -> usize {
        self.j_skip
    }

    /// First model year.
    pub fn model_start_year(&self) -> i32 {
        self.model_start_year
    }

    /// Last model year.
    pub fn model_end_year(&self) -> i32 {
        self.model_end_year
    }

    /// Step duration in whole years.
    pub fn timestep(&self) -> i32 {
        self.timestep
    }

    /// Region name.
    pub fn run_region(&self) -> &str {
        &self.run_region
    }

    /// Resolution name.
    pub fn run_resolution(&self) -> &str {
        &self.run_resolution
    }

    /// Free-text run description, if any.
    pub fn run_description(&self) -> Option<&str> {
        self.run_description.as_deref()
    }

    /// Explicit archive file, if configured.
    pub fn archive_path(&self) -> Option<&Path> {
        self.archive_path.as_deref()
    }

    /// Directory searched for region archives, if configured.
    pub fn data_directory(&self) -> Option<&Path> {
        self.data_directory.as_deref()
    }

    /// Date at timestep 0 override, if configured.
    pub fn timestep0_date(&self) -> Option<NaiveDate> {
        self.timestep0_date
    }

    /// Fractional update behaviour.
    pub fn frac_step_mode(&self) -> FracStepMode {
        self.frac_step_mode
    }

    /// The archive sub-region this configuration reads.
    pub fn sub_region(&self) -> SubRegion {
        SubRegion::new(self.grid_columns, self.grid_rows)
            .with_offset(self.i_ul, self.j_ul)
            .with_stride(self.i_skip, self.j_skip)
    }

    /// Serializes this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|e| EngineError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Validates this configuration.
    ///
    /// Checks grid extent, strides, step duration, year order, and that the
    /// region/resolution pair names a known archive.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "grid must be non-empty, got {} columns x {} rows",
                    self.grid_columns, self.grid_rows
                ),
            });
        }
        if self.i_skip == 0 || self.j_skip == 0 {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "strides must be at least 1, got i_skip={} j_skip={}",
                    self.i_skip, self.j_skip
                ),
            });
        }
        if self.timestep < 1 {
            return Err(EngineError::InvalidConfig {
                reason: format!("timestep must be at least one year, got {}", self.timestep),
            });
        }
        if self.model_start_year > self.model_end_year {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "model_start_year ({}) is after model_end_year ({})",
                    self.model_start_year, self.model_end_year
                ),
            });
        }
        archive_file_name(&self.run_region, &self.run_resolution)?;
        Ok(())
    }

    /// Path of the archive this run reads.
    ///
    /// An explicit `archive_path` wins; otherwise the region/resolution
    /// archive inside `data_directory`.
    pub fn resolve_archive_path(&self) -> Result<PathBuf, EngineError> {
        if let Some(path) = &self.archive_path {
            return Ok(path.clone());
        }
        let file_name = archive_file_name(&self.run_region, &self.run_resolution)?;
        let dir = self
            .data_directory
            .as_ref()
            .ok_or_else(|| EngineError::ArchiveNotConfigured {
                reason: "set archive_path or data_directory".to_string(),
            })?;
        Ok(dir.join(file_name))
    }
}

/// Archive file name for a region/resolution pair.
pub fn archive_file_name(region: &str, resolution: &str) -> Result<&'static str, EngineError> {
    match (region, resolution) {
        ("Alaska", "lowres") => Ok(ALASKA_LOWRES_ARCHIVE),
        _ => Err(EngineError::UnsupportedRegion {
            region: region.to_string(),
            resolution: resolution.to_string(),
        }),
    }
}

/// Loads a configuration file, choosing the format by extension.
///
/// `.toml` files are parsed as TOML; anything else as the legacy
/// `name | value | type | description` format.
pub fn load_config(path: &Path) -> Result<RunConfig, EngineError> {
    let text = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let parsed = if is_toml {
        RunConfig::from_toml_str(&text)
    } else {
        parse_legacy_config(&text)
    };
    parsed.map_err(|e| EngineError::ConfigFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes `config` to `path` as TOML.
///
/// An existing file is left untouched unless `overwrite` is set.
///
/// # Errors
///
/// Returns [`EngineError::ConfigExists`] if `path` exists and `overwrite`
/// is false, or [`EngineError::ConfigWrite`] if the file cannot be written.
pub fn write_config(config: &RunConfig, path: &Path, overwrite: bool) -> Result<(), EngineError> {
    let text = config.to_toml_string()?;
    let write_err = |e: std::io::Error| EngineError::ConfigWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            EngineError::ConfigExists {
                path: path.to_path_buf(),
            }
        } else {
            write_err(e)
        }
    })?;
    file.write_all(text.as_bytes()).map_err(write_err)?;
    info!(path = %path.display(), overwrite, "configuration written");
    Ok(())
}

/// Writes the [default run](RunConfig::default) to `path`.
pub fn write_default_config(path: &Path, overwrite: bool) -> Result<(), EngineError> {
    write_config(&RunConfig::default(), path, overwrite)
}
