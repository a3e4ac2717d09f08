//! Whole-year simulation clock.

use chrono::{Datelike, NaiveDate};
use cruak_calendar::{add_years, year_delta};
use cruak_io::ValidRange;
use tracing::debug;

use crate::error::EngineError;

/// Run dates and the current position of a model run.
///
/// Timesteps count whole years since [`date_at_timestep0`](Self::date_at_timestep0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    first_date: NaiveDate,
    last_date: NaiveDate,
    date_at_timestep0: NaiveDate,
    current_date: NaiveDate,
    current_timestep: i32,
    step_years: i32,
}

impl SimulationClock {
    /// Creates a clock positioned at `date_at_timestep0`.
    pub fn new(
        first_date: NaiveDate,
        last_date: NaiveDate,
        date_at_timestep0: NaiveDate,
        step_years: i32,
    ) -> Self {
        Self {
            first_date,
            last_date,
            date_at_timestep0,
            current_date: date_at_timestep0,
            current_timestep: 0,
            step_years,
        }
    }

    /// Fails if any run date lies outside `valid`.
    ///
    /// Checked in the order timestep 0, first date, last date.
    pub fn check_within(&self, valid: ValidRange) -> Result<(), EngineError> {
        for (name, date) in [
            ("date_at_timestep0", self.date_at_timestep0),
            ("first_date", self.first_date),
            ("last_date", self.last_date),
        ] {
            if !valid.contains(date) {
                return Err(EngineError::DateOutOfRange {
                    name: name.to_string(),
                    date,
                    first_valid: valid.first(),
                    last_valid: valid.last(),
                });
            }
        }
        Ok(())
    }

    /// Whole years from timestep 0 to `date`.
    pub fn timestep_from_date(&self, date: NaiveDate) -> i32 {
        year_delta(self.date_at_timestep0, date)
    }

    /// Advances the current date by `step_count` years, or by one step
    /// duration when `None`. Day-of-month is clamped to the target month.
    pub fn increment(&mut self, step_count: Option<i32>) -> Result<(), EngineError> {
        let years = step_count.unwrap_or(self.step_years);
        self.current_date = add_years(self.current_date, years)?;
        self.current_timestep = self.timestep_from_date(self.current_date);
        debug!(
            date = %self.current_date,
            timestep = self.current_timestep,
            "clock advanced"
        );
        Ok(())
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    pub fn date_at_timestep0(&self) -> NaiveDate {
        self.date_at_timestep0
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Timestep recorded by the last advance.
    pub fn current_timestep(&self) -> i32 {
        self.current_timestep
    }

    /// Step duration in whole years.
    pub fn step_years(&self) -> i32 {
        self.step_years
    }

    /// Timestep of the first model date.
    pub fn first_timestep(&self) -> i32 {
        self.timestep_from_date(self.first_date)
    }

    /// Timestep of the last model date.
    pub fn last_timestep(&self) -> i32 {
        self.timestep_from_date(self.last_date)
    }

    /// Year of the current date.
    pub fn current_year(&self) -> i32 {
        self.current_date.year()
    }
}
