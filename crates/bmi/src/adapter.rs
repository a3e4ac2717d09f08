//! The BMI component wrapping a [`TemperatureModel`].

use std::borrow::Cow;
use std::path::Path;

use chrono::Datelike;
use cruak_engine::{FracStepMode, RunConfig, TemperatureModel, round_half_up};
use ndarray::{ArrayViewD, aview0};
use tracing::{debug, info, warn};

use crate::attributes::{NAME_INITIALIZED, NAME_UNINITIALIZED, attribute};
use crate::error::BmiError;
use crate::vars::{INPUT_VAR_NAMES, OUTPUT_VAR_NAMES, OutputVar};

/// Node spacing reported for every rank-2 grid.
pub const GRID_SPACING: [f64; 2] = [10000.0, 10000.0];

/// Origin reported for every rank-2 grid.
pub const GRID_ORIGIN: [f64; 2] = [0.0, 0.0];

const ITEM_SIZE: usize = std::mem::size_of::<f32>();

/// Basic Model Interface over the Alaska monthly temperature engine.
///
/// Output grids are read straight from the engine's storage, so a step is
/// visible through every accessor as soon as it returns.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use cruak_bmi::AlaskaTemperatureBmi;
///
/// let mut bmi = AlaskaTemperatureBmi::new();
/// bmi.initialize(Path::new("alaska_cruAKtemp_model.cfg"))?;
/// bmi.update_until(5.0)?;
///
/// let mut out = vec![0.0_f32; bmi.get_grid_size(0)?];
/// bmi.get_value("atmosphere_bottom_air__temperature", &mut out)?;
/// bmi.finalize();
/// # Ok::<(), cruak_bmi::BmiError>(())
/// ```
#[derive(Debug)]
pub struct AlaskaTemperatureBmi {
    model: Option<TemperatureModel>,
    frac_step_mode: FracStepMode,
    datetime_start: f32,
    datetime_end: f32,
}

impl Default for AlaskaTemperatureBmi {
    fn default() -> Self {
        Self::new()
    }
}

impl AlaskaTemperatureBmi {
    /// Creates an uninitialized component.
    pub fn new() -> Self {
        Self {
            model: None,
            frac_step_mode: FracStepMode::default(),
            datetime_start: 0.0,
            datetime_end: 0.0,
        }
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Loads a configuration file (legacy `.cfg` or TOML) and opens the
    /// archive it names.
    pub fn initialize(&mut self, cfg_file: &Path) -> Result<(), BmiError> {
        let model = TemperatureModel::from_config_file(cfg_file)?;
        self.initialize_with_model(model);
        Ok(())
    }

    /// Initializes from an in-memory configuration.
    pub fn initialize_with_config(&mut self, config: RunConfig) -> Result<(), BmiError> {
        let model = TemperatureModel::initialize(config)?;
        self.initialize_with_model(model);
        Ok(())
    }

    /// Adopts an already-built model.
    pub fn initialize_with_model(&mut self, model: TemperatureModel) {
        let t0 = model.date_at_timestep0();
        self.datetime_start = (model.first_date() - t0).num_days() as f32;
        self.datetime_end = (model.last_date() - t0).num_days() as f32;
        self.frac_step_mode = model.config().frac_step_mode();
        info!(
            start = %model.first_date(),
            end = %model.last_date(),
            frac_step_mode = ?self.frac_step_mode,
            "component initialized"
        );
        self.model = Some(model);
    }

    /// Advances one step and refreshes the outputs.
    pub fn update(&mut self) -> Result<(), BmiError> {
        self.model_mut()?.update(None)?;
        Ok(())
    }

    /// Advances by a fractional step count.
    ///
    /// The clock first moves `round_half_up(fraction)` steps and the grids
    /// are refreshed. Under [`FracStepMode::Literal`] a full model update
    /// with the same fraction follows, moving the clock a second time.
    pub fn update_frac(&mut self, fraction: f64) -> Result<(), BmiError> {
        let mode = self.frac_step_mode;
        let model = self.model_mut()?;
        let steps = model.years_for_steps(round_half_up(fraction))?;
        debug!(fraction, steps, "fractional update rounded to whole years");
        model.increment_date(Some(steps))?;
        model.update_temperature_values();
        if mode == FracStepMode::Literal {
            model.update(Some(fraction))?;
        }
        Ok(())
    }

    /// Steps until the current year reaches `time` years past timestep 0.
    ///
    /// Targets before the current year are ignored and targets past the
    /// last model year are clamped to it; both are logged as warnings.
    /// A NaN target is ignored.
    pub fn update_until(&mut self, time: f64) -> Result<(), BmiError> {
        let model = self.model_ref()?;
        let mut stop_year = time + f64::from(model.date_at_timestep0().year());
        let current_year = f64::from(model.current_date().year());
        let last_year = model.last_date().year();

        if time.is_nan() {
            warn!(time, "update_until target is not a number, no update run");
            return Ok(());
        }
        if stop_year < current_year {
            warn!(stop_year, current_year, "update_until target is before the current date, no update run");
            return Ok(());
        }
        if stop_year > f64::from(last_year) {
            warn!(stop_year, last_year, "update_until target is past the last model date, clamping");
            stop_year = f64::from(last_year);
        }

        loop {
            let model = self.model_ref()?;
            let year = model.current_date().year();
            if f64::from(year) >= stop_year {
                break;
            }
            if year + model.timestep_duration() > last_year {
                warn!(year, last_year, "next step would pass the last model date, stopping");
                break;
            }
            self.update()?;
        }
        Ok(())
    }

    /// Releases the model. Further value and time queries fail until the
    /// component is initialized again.
    pub fn finalize(&mut self) {
        if self.model.take().is_some() {
            info!("component finalized");
        }
    }

    /// The wrapped model, if initialized.
    pub fn model(&self) -> Option<&TemperatureModel> {
        self.model.as_ref()
    }

    fn model_ref(&self) -> Result<&TemperatureModel, BmiError> {
        self.model.as_ref().ok_or(BmiError::NotInitialized)
    }

    fn model_mut(&mut self) -> Result<&mut TemperatureModel, BmiError> {
        self.model.as_mut().ok_or(BmiError::NotInitialized)
    }

    // -----------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------

    pub fn get_component_name(&self) -> &'static str {
        if self.model.is_some() {
            NAME_INITIALIZED
        } else {
            NAME_UNINITIALIZED
        }
    }

    /// Static metadata value; names are matched case-insensitively.
    pub fn get_attribute(&self, name: &str) -> Result<&'static str, BmiError> {
        attribute(name).ok_or_else(|| BmiError::UnknownAttribute {
            name: name.to_string(),
        })
    }

    pub fn get_input_var_names(&self) -> &'static [&'static str] {
        &INPUT_VAR_NAMES
    }

    pub fn get_output_var_names(&self) -> &'static [&'static str] {
        &OUTPUT_VAR_NAMES
    }

    /// Model-side name of a BMI variable.
    pub fn get_var_name(&self, name: &str) -> Result<&'static str, BmiError> {
        Ok(OutputVar::from_name(name)?.model_name())
    }

    pub fn get_var_units(&self, name: &str) -> Result<&'static str, BmiError> {
        Ok(OutputVar::from_name(name)?.units())
    }

    pub fn get_var_type(&self, name: &str) -> Result<&'static str, BmiError> {
        OutputVar::from_name(name)?;
        Ok("float32")
    }

    pub fn get_var_itemsize(&self, name: &str) -> Result<usize, BmiError> {
        OutputVar::from_name(name)?;
        Ok(ITEM_SIZE)
    }

    pub fn get_var_nbytes(&self, name: &str) -> Result<usize, BmiError> {
        let var = OutputVar::from_name(name)?;
        Ok(self.var_size(var)? * ITEM_SIZE)
    }

    pub fn get_var_location(&self, name: &str) -> Result<&'static str, BmiError> {
        OutputVar::from_name(name)?;
        Ok("node")
    }

    pub fn get_var_grid(&self, name: &str) -> Result<usize, BmiError> {
        Ok(OutputVar::from_name(name)?.grid_id())
    }

    // -----------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------

    pub fn get_start_time(&self) -> f64 {
        0.0
    }

    pub fn get_current_time(&self) -> Result<f64, BmiError> {
        Ok(f64::from(self.model_ref()?.get_current_timestep()))
    }

    pub fn get_end_time(&self) -> Result<f64, BmiError> {
        Ok(f64::from(self.model_ref()?.get_end_timestep()))
    }

    /// Step duration in years.
    pub fn get_time_step(&self) -> Result<f64, BmiError> {
        Ok(f64::from(self.model_ref()?.timestep_duration()))
    }

    pub fn get_time_units(&self) -> &'static str {
        "years"
    }

    // -----------------------------------------------------------------
    // Grids
    // -----------------------------------------------------------------

    pub fn get_grid_type(&self, grid: usize) -> Result<&'static str, BmiError> {
        Ok(OutputVar::from_grid(grid)?.grid_type())
    }

    /// Shape as `[rows, columns]`, or empty for the scalar grids.
    pub fn get_grid_shape(&self, grid: usize) -> Result<Vec<usize>, BmiError> {
        let var = OutputVar::from_grid(grid)?;
        Ok(self.value(var)?.shape().to_vec())
    }

    pub fn get_grid_size(&self, grid: usize) -> Result<usize, BmiError> {
        self.var_size(OutputVar::from_grid(grid)?)
    }

    pub fn get_grid_rank(&self, grid: usize) -> Result<usize, BmiError> {
        let var = OutputVar::from_grid(grid)?;
        Ok(self.value(var)?.ndim())
    }

    pub fn get_grid_node_count(&self, grid: usize) -> Result<usize, BmiError> {
        self.get_grid_size(grid)
    }

    /// Node spacing; empty for the scalar grids.
    pub fn get_grid_spacing(&self, grid: usize) -> Result<Vec<f64>, BmiError> {
        let var = OutputVar::from_grid(grid)?;
        Ok(match var.output_grid() {
            Some(_) => GRID_SPACING.to_vec(),
            None => Vec::new(),
        })
    }

    /// Grid origin; empty for the scalar grids.
    pub fn get_grid_origin(&self, grid: usize) -> Result<Vec<f64>, BmiError> {
        let var = OutputVar::from_grid(grid)?;
        Ok(match var.output_grid() {
            Some(_) => GRID_ORIGIN.to_vec(),
            None => Vec::new(),
        })
    }

    // -----------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------

    /// Borrowed view of a variable. Rank 2 for grids, rank 0 for the date
    /// scalars.
    pub fn value(&self, var: OutputVar) -> Result<ArrayViewD<'_, f32>, BmiError> {
        let model = self.model_ref()?;
        Ok(match var.output_grid() {
            Some(grid) => model.grid(grid).into_dyn(),
            None if var == OutputVar::DatetimeStart => aview0(&self.datetime_start).into_dyn(),
            None => aview0(&self.datetime_end).into_dyn(),
        })
    }

    /// Borrowed view of the variable named `name`.
    pub fn get_value_ref(&self, name: &str) -> Result<ArrayViewD<'_, f32>, BmiError> {
        self.value(OutputVar::from_name(name)?)
    }

    /// Copies a variable into `dest` in row-major order.
    pub fn get_value(&self, name: &str, dest: &mut [f32]) -> Result<(), BmiError> {
        let view = self.get_value_ref(name)?;
        if dest.len() != view.len() {
            return Err(BmiError::SizeMismatch {
                name: name.to_string(),
                expected: view.len(),
                got: dest.len(),
            });
        }
        for (d, &v) in dest.iter_mut().zip(view.iter()) {
            *d = v;
        }
        Ok(())
    }

    /// Gathers the elements at row-major `indices` into `dest`.
    pub fn get_value_at_indices(
        &self,
        name: &str,
        indices: &[usize],
        dest: &mut [f32],
    ) -> Result<(), BmiError> {
        let view = self.get_value_ref(name)?;
        check_lengths(name, indices.len(), dest.len())?;
        let flat: Cow<'_, [f32]> = match view.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(view.iter().copied().collect()),
        };
        for (d, &index) in dest.iter_mut().zip(indices) {
            check_index(name, index, flat.len())?;
            *d = flat[index];
        }
        Ok(())
    }

    /// Replaces a whole grid from row-major `src`.
    ///
    /// Writes last until the next update refreshes the grids.
    pub fn set_value(&mut self, name: &str, src: &[f32]) -> Result<(), BmiError> {
        let var = OutputVar::from_name(name)?;
        let grid = var.output_grid().ok_or_else(|| BmiError::ReadOnly {
            name: name.to_string(),
        })?;
        let mut target = self.model_mut()?.grid_mut(grid);
        if src.len() != target.len() {
            return Err(BmiError::SizeMismatch {
                name: name.to_string(),
                expected: target.len(),
                got: src.len(),
            });
        }
        for (t, &s) in target.iter_mut().zip(src) {
            *t = s;
        }
        Ok(())
    }

    /// Scatters `src` into the elements at row-major `indices`.
    pub fn set_value_at_indices(
        &mut self,
        name: &str,
        indices: &[usize],
        src: &[f32],
    ) -> Result<(), BmiError> {
        let var = OutputVar::from_name(name)?;
        let grid = var.output_grid().ok_or_else(|| BmiError::ReadOnly {
            name: name.to_string(),
        })?;
        check_lengths(name, indices.len(), src.len())?;
        let mut target = self.model_mut()?.grid_mut(grid);
        let (size, columns) = (target.len(), target.ncols());
        for &index in indices {
            check_index(name, index, size)?;
        }
        for (&index, &value) in indices.iter().zip(src) {
            target[[index / columns, index % columns]] = value;
        }
        Ok(())
    }

    fn var_size(&self, var: OutputVar) -> Result<usize, BmiError> {
        Ok(self.value(var)?.len())
    }
}

fn check_lengths(name: &str, indices: usize, values: usize) -> Result<(), BmiError> {
    if indices == values {
        Ok(())
    } else {
        Err(BmiError::SizeMismatch {
            name: name.to_string(),
            expected: indices,
            got: values,
        })
    }
}

fn check_index(name: &str, index: usize, size: usize) -> Result<(), BmiError> {
    if index < size {
        Ok(())
    } else {
        Err(BmiError::IndexOutOfBounds {
            name: name.to_string(),
            index,
            size,
        })
    }
}
