//! The temporal-grid engine.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use cruak_calendar::{MonthKey, add_years, canonical_date, trailing_months};
use cruak_io::{ArchiveSource, ArchiveWindow, load_window, read_netcdf_window};
use ndarray::{Array2, ArrayView2, ArrayViewMut2, CowArray, Ix2};
use tracing::{debug, info};

use crate::clock::SimulationClock;
use crate::config::{RunConfig, load_config};
use crate::error::EngineError;
use crate::grids::{DerivedGrids, GridSnapshot, OutputGrid, PRIOR_MONTHS};

/// Rounds half away from zero for non-negative `x`: `trunc(x + 0.5)`.
///
/// Used to turn a fractional step request into a whole step count.
pub fn round_half_up(x: f64) -> i32 {
    (x + 0.5).trunc() as i32
}

/// Monthly air temperature over a fixed window, stepped a year at a time.
///
/// On every date change the model refreshes `T_air` for the current month,
/// the twelve trailing months ending at it, and their mean.
///
/// # Example
///
/// ```no_run
/// use cruak_engine::{RunConfig, TemperatureModel};
///
/// let config = RunConfig::new(40, 20, 1902, 1910)
///     .with_offset(50, 25)
///     .with_data_directory("/data/cru");
/// let mut model = TemperatureModel::initialize(config)?;
/// model.update(None)?;
/// println!("{}", model.t_air()[[0, 0]]);
/// # Ok::<(), cruak_engine::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureModel {
    config: RunConfig,
    window: ArchiveWindow,
    clock: SimulationClock,
    grids: DerivedGrids,
}

impl TemperatureModel {
    /// Opens the netCDF archive the configuration resolves to and builds
    /// the model from it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid, the archive
    /// cannot be read, or a run date lies outside the archive.
    #[tracing::instrument(skip(config), fields(start = config.model_start_year(), end = config.model_end_year()))]
    pub fn initialize(config: RunConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let path = config.resolve_archive_path()?;
        let window = read_netcdf_window(&path, &config.sub_region())?;
        Self::from_window(config, window)
    }

    /// Loads a configuration file (legacy `.cfg` or TOML) and initializes
    /// from it.
    #[tracing::instrument]
    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        Self::initialize(load_config(path)?)
    }

    /// Builds the model from an already-open archive source.
    #[tracing::instrument(skip(config, source), fields(source = %source.describe()))]
    pub fn with_source<S: ArchiveSource + ?Sized>(
        config: RunConfig,
        source: &S,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let window = load_window(source, &config.sub_region())?;
        Self::from_window(config, window)
    }

    /// Builds the model from a window that is already in memory.
    pub fn from_window(config: RunConfig, window: ArchiveWindow) -> Result<Self, EngineError> {
        config.validate()?;
        if window.shape() != config.grid_shape() {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "window shape {:?} does not match configured grid {:?}",
                    window.shape(),
                    config.grid_shape()
                ),
            });
        }

        let first_date = canonical_date(config.model_start_year())?;
        let last_date = canonical_date(config.model_end_year())?;
        let timestep0 = config.timestep0_date().unwrap_or(first_date);
        let clock = SimulationClock::new(first_date, last_date, timestep0, config.timestep());
        clock.check_within(window.valid_range())?;

        let grids = DerivedGrids::nan(config.grid_shape());
        let mut model = Self {
            config,
            window,
            clock,
            grids,
        };
        model.update_temperature_values();

        let valid = model.window.valid_range();
        info!(
            first_date = %first_date,
            last_date = %last_date,
            first_valid = %valid.first(),
            last_valid = %valid.last(),
            rows = model.config.grid_rows(),
            columns = model.config.grid_columns(),
            "temperature model initialized"
        );
        Ok(model)
    }

    /// Archive time index of `(month, year)`.
    ///
    /// `month + 12 * (year - first_valid_year) - 1`; not bounds-checked.
    pub fn get_time_index(&self, month: u32, year: i32) -> i64 {
        time_index(self.first_valid_date().year(), month, year)
    }

    /// Temperature grid for `(month, year)`.
    ///
    /// Borrowed from the archive when the month is inside the valid dates;
    /// otherwise a NaN grid of the configured shape.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn get_temperature_grid(
        &self,
        month: u32,
        year: i32,
    ) -> Result<CowArray<'_, f32, Ix2>, EngineError> {
        let key = MonthKey::new(year, month).map_err(|_| EngineError::InvalidMonth { month, year })?;
        Ok(month_grid(&self.window, key))
    }

    /// Refreshes every derived grid for the current date, in place.
    pub fn update_temperature_values(&mut self) {
        let date = self.clock.current_date();
        let window = &self.window;
        let grids = &mut self.grids;

        grids
            .current_mut()
            .assign(&month_grid(window, MonthKey::from_date(date)));
        for (slot, key) in grids
            .prior_months_mut()
            .iter_mut()
            .zip(trailing_months(date, PRIOR_MONTHS))
        {
            slot.assign(&month_grid(window, key));
        }
        grids.recompute_mean();
    }

    /// Advances the current date by `step_count` years (one step duration
    /// when `None`) without refreshing the grids.
    pub fn increment_date(&mut self, step_count: Option<i32>) -> Result<(), EngineError> {
        self.clock.increment(step_count)
    }

    /// Advances `round_half_up(frac)` steps, or one step when `frac` is
    /// `None`, then refreshes the grids.
    pub fn update(&mut self, frac: Option<f64>) -> Result<(), EngineError> {
        let steps = match frac {
            Some(frac) => {
                let steps = round_half_up(frac);
                debug!(frac, steps, "fractional steps are rounded to the nearest whole step");
                steps
            }
            None => 1,
        };
        let steps = steps.max(0);
        // the whole advance must be representable before the clock moves
        add_years(self.current_date(), self.years_for_steps(steps)?)?;
        for _ in 0..steps {
            self.increment_date(None)?;
        }
        self.update_temperature_values();
        Ok(())
    }

    /// Years covered by `steps` steps of the configured duration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StepOverflow`] if the product overflows.
    pub fn years_for_steps(&self, steps: i32) -> Result<i32, EngineError> {
        let step_years = self.timestep_duration();
        steps
            .checked_mul(step_years)
            .ok_or(EngineError::StepOverflow { steps, step_years })
    }

    /// Whole years from timestep 0 to `date`.
    pub fn timestep_from_date(&self, date: NaiveDate) -> i32 {
        self.clock.timestep_from_date(date)
    }

    /// Timestep of the current date.
    pub fn get_current_timestep(&self) -> i32 {
        self.clock.timestep_from_date(self.clock.current_date())
    }

    /// Timestep of the last model date.
    pub fn get_end_timestep(&self) -> i32 {
        self.clock.last_timestep()
    }

    /// Timestep recorded by the last date advance.
    pub fn current_timestep(&self) -> i32 {
        self.clock.current_timestep()
    }

    pub fn first_timestep(&self) -> i32 {
        self.clock.first_timestep()
    }

    pub fn last_timestep(&self) -> i32 {
        self.clock.last_timestep()
    }

    pub fn current_date(&self) -> NaiveDate {
        self.clock.current_date()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.clock.first_date()
    }

    pub fn last_date(&self) -> NaiveDate {
        self.clock.last_date()
    }

    pub fn date_at_timestep0(&self) -> NaiveDate {
        self.clock.date_at_timestep0()
    }

    pub fn first_valid_date(&self) -> NaiveDate {
        self.window.valid_range().first()
    }

    pub fn last_valid_date(&self) -> NaiveDate {
        self.window.valid_range().last()
    }

    /// Step duration in whole years.
    pub fn timestep_duration(&self) -> i32 {
        self.clock.step_years()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The archive window held in memory.
    pub fn archive(&self) -> &ArchiveWindow {
        &self.window
    }

    /// Grid shape as `(rows, columns)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.config.grid_shape()
    }

    pub fn latitude(&self) -> ArrayView2<'_, f32> {
        self.window.latitude()
    }

    pub fn longitude(&self) -> ArrayView2<'_, f32> {
        self.window.longitude()
    }

    /// `T_air`.
    pub fn t_air(&self) -> ArrayView2<'_, f32> {
        self.grids.current()
    }

    /// Trailing twelve months ending at the current month, oldest first.
    pub fn prior_months(&self) -> &[Array2<f32>] {
        self.grids.prior_months()
    }

    pub fn prior_jan(&self) -> ArrayView2<'_, f32> {
        self.grids.prior_jan()
    }

    pub fn prior_jul(&self) -> ArrayView2<'_, f32> {
        self.grids.prior_jul()
    }

    pub fn prior_year(&self) -> ArrayView2<'_, f32> {
        self.grids.prior_year()
    }

    pub fn grid(&self, grid: OutputGrid) -> ArrayView2<'_, f32> {
        self.grids.get(grid)
    }

    /// Write access to one output grid. Overwritten by the next refresh.
    pub fn grid_mut(&mut self, grid: OutputGrid) -> ArrayViewMut2<'_, f32> {
        self.grids.get_mut(grid)
    }

    /// Owned copy of the derived grids at the current date.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.grids, self.current_date(), self.get_current_timestep())
    }
}

fn time_index(first_valid_year: i32, month: u32, year: i32) -> i64 {
    i64::from(month) + 12 * (i64::from(year) - i64::from(first_valid_year)) - 1
}

fn month_grid(window: &ArchiveWindow, key: MonthKey) -> CowArray<'_, f32, Ix2> {
    let valid = window.valid_range();
    let in_range = key.first_day().is_ok_and(|day| valid.contains(day));
    let index = time_index(valid.first().year(), key.month(), key.year());
    let view = usize::try_from(index)
        .ok()
        .filter(|_| in_range)
        .and_then(|i| window.month(i));
    match view {
        Some(view) => CowArray::from(view),
        None => CowArray::from(Array2::from_elem(window.shape(), f32::NAN)),
    }
}
