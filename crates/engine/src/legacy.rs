//! Reader for the pipe-delimited `.cfg` run files.
//!
//! Each meaningful line has four `|`-separated fields:
//! `name | value | type | description`. Lines starting with `#` and lines
//! with any other field count are ignored. Values are typed by name first
//! (`*date` keys are `YYYY-MM-DD`, `grid*` keys are collected and resolved
//! after the whole file is read, `timestep` is an integer) and by the type
//! column otherwise (`int` and `long` are integers, anything else a string).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cruak_calendar::parse_ymd;
use tracing::debug;

use crate::config::{FracStepMode, GridType, RunConfig};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
enum RawValue {
    Int(i64),
    Date(NaiveDate),
    Text(String),
}

impl RawValue {
    fn render(&self) -> String {
        match self {
            RawValue::Int(v) => v.to_string(),
            RawValue::Date(d) => d.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, EngineError> {
    value
        .parse::<i64>()
        .map_err(|e| invalid(key, value, e.to_string()))
}

/// Parses the text of a legacy `.cfg` file.
///
/// # Errors
///
/// Returns [`EngineError`] if a required key is missing, a key is not
/// recognised, a value cannot be converted, or the grid type is not
/// supported.
pub fn parse_legacy_config(text: &str) -> Result<RunConfig, EngineError> {
    let mut values: BTreeMap<String, RawValue> = BTreeMap::new();
    let mut grid: BTreeMap<String, String> = BTreeMap::new();

    for line in text.lines() {
        if line.starts_with('#') {
            continue;
        }
        let words: Vec<&str> = line.split('|').collect();
        if words.len() != 4 {
            continue;
        }
        let name = words[0].trim();
        let value = words[1].trim();
        let kind = words[2].trim();

        if name.ends_with("date") {
            let date = parse_ymd(value).map_err(|e| invalid(name, value, e.to_string()))?;
            values.insert(name.to_string(), RawValue::Date(date));
        } else if name.starts_with("grid") {
            grid.insert(name.to_string(), value.to_string());
        } else if name == "timestep" || kind == "int" || kind == "long" {
            values.insert(name.to_string(), RawValue::Int(parse_int(name, value)?));
        } else {
            values.insert(name.to_string(), RawValue::Text(value.to_string()));
        }
    }
    debug!(keys = values.len() + grid.len(), "read legacy configuration");

    let mut fields = Fields { values, grid };
    let config = fields.build()?;
    fields.reject_leftovers()?;
    Ok(config)
}

/// Reads and parses a legacy `.cfg` file.
pub fn read_legacy_config(path: &Path) -> Result<RunConfig, EngineError> {
    let text = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_legacy_config(&text)
}

struct Fields {
    values: BTreeMap<String, RawValue>,
    grid: BTreeMap<String, String>,
}

impl Fields {
    fn build(&mut self) -> Result<RunConfig, EngineError> {
        let grid_columns = self.grid_count("grid_columns")?;
        let grid_rows = self.grid_count("grid_rows")?;
        let grid_type: GridType = self.required_grid("grid_type")?.parse()?;

        let model_start_year = to_i32("model_start_year", self.required_int("model_start_year")?)?;
        let model_end_year = to_i32("model_end_year", self.required_int("model_end_year")?)?;
        let timestep = to_i32("timestep", self.required_int("timestep")?)?;
        let i_ul = to_usize("i_ul", self.required_int("i_ul")?)?;
        let j_ul = to_usize("j_ul", self.required_int("j_ul")?)?;
        let i_skip = self.int("i_skip")?.map(|v| to_usize("i_skip", v)).transpose()?;
        let j_skip = self.int("j_skip")?.map(|v| to_usize("j_skip", v)).transpose()?;
        let region = self.required_text("run_region")?;
        let resolution = self.required_text("run_resolution")?;

        let mut config = RunConfig::new(grid_columns, grid_rows, model_start_year, model_end_year)
            .with_grid_type(grid_type)
            .with_offset(i_ul, j_ul)
            .with_stride(i_skip.unwrap_or(1), j_skip.unwrap_or(1))
            .with_timestep(timestep)
            .with_region(region, resolution);

        if let Some(name) = self.grid.remove("grid_name") {
            config = config.with_grid_name(name);
        }
        if let Some(description) = self.text("run_description") {
            config = config.with_description(description);
        }
        if let Some(path) = self.text("archive_path") {
            config = config.with_archive_path(PathBuf::from(path));
        }
        if let Some(dir) = self.text("data_directory") {
            config = config.with_data_directory(PathBuf::from(dir));
        }
        if let Some(date) = self.date("timestep0_date")? {
            config = config.with_timestep0_date(date);
        }
        if let Some(mode) = self.text("frac_step_mode") {
            config = config.with_frac_step_mode(mode.parse::<FracStepMode>()?);
        }
        Ok(config)
    }

    fn reject_leftovers(&self) -> Result<(), EngineError> {
        let leftover = self.values.keys().chain(self.grid.keys()).min();
        match leftover {
            Some(key) => Err(EngineError::UnknownKey { key: key.clone() }),
            None => Ok(()),
        }
    }

    fn required_grid(&mut self, key: &str) -> Result<String, EngineError> {
        self.grid.remove(key).ok_or_else(|| EngineError::MissingKey {
            key: key.to_string(),
        })
    }

    fn grid_count(&mut self, key: &str) -> Result<usize, EngineError> {
        let raw = self.required_grid(key)?;
        raw.parse::<usize>()
            .map_err(|e| invalid(key, &raw, e.to_string()))
    }

    fn int(&mut self, key: &str) -> Result<Option<i64>, EngineError> {
        match self.values.remove(key) {
            None => Ok(None),
            Some(RawValue::Int(v)) => Ok(Some(v)),
            Some(RawValue::Text(s)) => parse_int(key, &s).map(Some),
            Some(other) => Err(invalid(key, &other.render(), "expected an integer")),
        }
    }

    fn required_int(&mut self, key: &str) -> Result<i64, EngineError> {
        self.int(key)?.ok_or_else(|| EngineError::MissingKey {
            key: key.to_string(),
        })
    }

    fn text(&mut self, key: &str) -> Option<String> {
        self.values.remove(key).map(|v| v.render())
    }

    fn required_text(&mut self, key: &str) -> Result<String, EngineError> {
        self.text(key).ok_or_else(|| EngineError::MissingKey {
            key: key.to_string(),
        })
    }

    fn date(&mut self, key: &str) -> Result<Option<NaiveDate>, EngineError> {
        match self.values.remove(key) {
            None => Ok(None),
            Some(RawValue::Date(d)) => Ok(Some(d)),
            Some(other) => Err(invalid(key, &other.render(), "expected YYYY-MM-DD")),
        }
    }
}

fn to_i32(key: &str, value: i64) -> Result<i32, EngineError> {
    i32::try_from(value).map_err(|e| invalid(key, &value.to_string(), e.to_string()))
}

fn to_usize(key: &str, value: i64) -> Result<usize, EngineError> {
    usize::try_from(value).map_err(|e| invalid(key, &value.to_string(), e.to_string()))
}
