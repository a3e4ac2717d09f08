//! Output grids derived from the archive at the current date.

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// Number of trailing months kept.
pub const PRIOR_MONTHS: usize = 12;

/// Position of the prior-January grid within the trailing months.
pub const PRIOR_JAN_INDEX: usize = 0;

/// Position of the prior-July grid within the trailing months.
pub const PRIOR_JUL_INDEX: usize = 6;

/// The four grids a run publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputGrid {
    /// Temperature for the month of the current date (`T_air`).
    Current,
    /// First of the trailing twelve months (`T_air_prior_jan`).
    PriorJan,
    /// Seventh of the trailing twelve months (`T_air_prior_jul`).
    PriorJul,
    /// Mean of the trailing twelve months (`T_air_prior_year`).
    PriorYear,
}

impl OutputGrid {
    /// Every output grid, in publication order.
    pub const ALL: [OutputGrid; 4] = [
        OutputGrid::Current,
        OutputGrid::PriorJan,
        OutputGrid::PriorJul,
        OutputGrid::PriorYear,
    ];

    /// Model-side variable name.
    pub fn name(self) -> &'static str {
        match self {
            OutputGrid::Current => "T_air",
            OutputGrid::PriorJan => "T_air_prior_jan",
            OutputGrid::PriorJul => "T_air_prior_jul",
            OutputGrid::PriorYear => "T_air_prior_year",
        }
    }
}

/// Storage for the derived grids.
///
/// January and July are not stored separately: they are the entries at
/// [`PRIOR_JAN_INDEX`] and [`PRIOR_JUL_INDEX`] of the trailing months, so a
/// write through either is visible in both places.
#[derive(Debug, Clone)]
pub struct DerivedGrids {
    current: Array2<f32>,
    prior_months: Vec<Array2<f32>>,
    prior_year: Array2<f32>,
}

impl DerivedGrids {
    /// NaN-filled grids of `shape` (`(rows, columns)`).
    pub(crate) fn nan(shape: (usize, usize)) -> Self {
        Self {
            current: Array2::from_elem(shape, f32::NAN),
            prior_months: vec![Array2::from_elem(shape, f32::NAN); PRIOR_MONTHS],
            prior_year: Array2::from_elem(shape, f32::NAN),
        }
    }

    pub(crate) fn current_mut(&mut self) -> &mut Array2<f32> {
        &mut self.current
    }

    pub(crate) fn prior_months_mut(&mut self) -> &mut [Array2<f32>] {
        &mut self.prior_months
    }

    /// Recomputes the trailing-year mean from the trailing months.
    ///
    /// Accumulates in `f64`; a NaN in any month makes that cell NaN.
    pub(crate) fn recompute_mean(&mut self) {
        let mut sum = Array2::<f64>::zeros(self.prior_year.raw_dim());
        for month in &self.prior_months {
            sum.zip_mut_with(month, |s, &v| *s += f64::from(v));
        }
        let n = self.prior_months.len() as f64;
        self.prior_year
            .zip_mut_with(&sum, |out, &s| *out = (s / n) as f32);
    }

    pub fn current(&self) -> ArrayView2<'_, f32> {
        self.current.view()
    }

    /// Trailing twelve months, oldest first.
    pub fn prior_months(&self) -> &[Array2<f32>] {
        &self.prior_months
    }

    pub fn prior_jan(&self) -> ArrayView2<'_, f32> {
        self.prior_months[PRIOR_JAN_INDEX].view()
    }

    pub fn prior_jul(&self) -> ArrayView2<'_, f32> {
        self.prior_months[PRIOR_JUL_INDEX].view()
    }

    pub fn prior_year(&self) -> ArrayView2<'_, f32> {
        self.prior_year.view()
    }

    /// Read view of one output grid.
    pub fn get(&self, grid: OutputGrid) -> ArrayView2<'_, f32> {
        match grid {
            OutputGrid::Current => self.current(),
            OutputGrid::PriorJan => self.prior_jan(),
            OutputGrid::PriorJul => self.prior_jul(),
            OutputGrid::PriorYear => self.prior_year(),
        }
    }

    /// Write view of one output grid.
    pub fn get_mut(&mut self, grid: OutputGrid) -> ArrayViewMut2<'_, f32> {
        match grid {
            OutputGrid::Current => self.current.view_mut(),
            OutputGrid::PriorJan => self.prior_months[PRIOR_JAN_INDEX].view_mut(),
            OutputGrid::PriorJul => self.prior_months[PRIOR_JUL_INDEX].view_mut(),
            OutputGrid::PriorYear => self.prior_year.view_mut(),
        }
    }
}

/// An owned copy of the derived grids at one date.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    /// Model date the grids belong to.
    pub date: NaiveDate,
    /// Timestep at that date.
    pub timestep: i32,
    /// `T_air`.
    pub current: Array2<f32>,
    /// Trailing twelve months, oldest first.
    pub prior_months: Vec<Array2<f32>>,
    /// Trailing-year mean.
    pub prior_year: Array2<f32>,
}

impl GridSnapshot {
    pub(crate) fn capture(grids: &DerivedGrids, date: NaiveDate, timestep: i32) -> Self {
        Self {
            date,
            timestep,
            current: grids.current.clone(),
            prior_months: grids.prior_months.clone(),
            prior_year: grids.prior_year.clone(),
        }
    }

    pub fn prior_jan(&self) -> ArrayView2<'_, f32> {
        self.prior_months[PRIOR_JAN_INDEX].view()
    }

    pub fn prior_jul(&self) -> ArrayView2<'_, f32> {
        self.prior_months[PRIOR_JUL_INDEX].view()
    }
}
