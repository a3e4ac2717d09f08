//! Rectangular, strided sub-region of an archive grid.

use std::ops::Range;

use crate::error::IoError;

/// A `rows x columns` window into an archive grid.
///
/// Model cell `(j, i)` maps to archive cell
/// `(j_ul + j * j_skip, i_ul + i * i_skip)`. Columns run along the
/// archive's last (x) axis and rows along its second-to-last (y) axis.
///
/// # Example
///
/// ```
/// use cruak_io::SubRegion;
///
/// let region = SubRegion::new(40, 20).with_offset(50, 25);
/// assert!(region.validate().is_ok());
/// assert_eq!(region.shape(), (20, 40));
/// assert_eq!(region.i_nc_from_i(0), Some(50));
/// assert_eq!(region.j_nc_from_j(19), Some(44));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRegion {
    columns: usize,
    rows: usize,
    i_ul: usize,
    j_ul: usize,
    i_skip: usize,
    j_skip: usize,
}

impl SubRegion {
    /// Creates a window of `columns x rows` cells anchored at the archive
    /// origin with unit stride.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            i_ul: 0,
            j_ul: 0,
            i_skip: 1,
            j_skip: 1,
        }
    }

    /// Sets the archive column (`i_ul`) and row (`j_ul`) of the upper-left cell.
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

    /// Number of model columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of model rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Archive column of model column 0.
    pub fn i_ul(&self) -> usize {
        self.i_ul
    }

    /// Archive row of model row 0.
    pub fn j_ul(&self) -> usize {
        self.j_ul
    }

    /// Archive columns between adjacent model columns.
    pub fn i_skip(&self) -> usize {
        self.i_skip
    }

    /// Archive rows between adjacent model rows.
    pub fn j_skip(&self) -> usize {
        self.j_skip
    }

    /// Array shape of the window, `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Validates extents and strides.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidRegion`] if either extent or stride is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(IoError::InvalidRegion {
                reason: format!(
                    "grid must have at least one cell, got {} columns x {} rows",
                    self.columns, self.rows
                ),
            });
        }
        if self.i_skip == 0 || self.j_skip == 0 {
            return Err(IoError::InvalidRegion {
                reason: format!(
                    "strides must be >= 1, got i_skip={} j_skip={}",
                    self.i_skip, self.j_skip
                ),
            });
        }
        Ok(())
    }

    /// Archive column for model column `i`, or `None` if `i` is outside the window.
    pub fn i_nc_from_i(&self, i: usize) -> Option<usize> {
        (i < self.columns).then(|| self.i_ul + i * self.i_skip)
    }

    /// Archive row for model row `j`, or `None` if `j` is outside the window.
    pub fn j_nc_from_j(&self, j: usize) -> Option<usize> {
        (j < self.rows).then(|| self.j_ul + j * self.j_skip)
    }

    /// Model column for archive column `i_nc`, or `None` if the archive
    /// column is not sampled by this window.
    pub fn i_from_i_nc(&self, i_nc: usize) -> Option<usize> {
        inverse(i_nc, self.i_ul, self.i_skip, self.columns)
    }

    /// Model row for archive row `j_nc`, or `None` if the archive row is
    /// not sampled by this window.
    pub fn j_from_j_nc(&self, j_nc: usize) -> Option<usize> {
        inverse(j_nc, self.j_ul, self.j_skip, self.rows)
    }

    /// Contiguous archive column range covering the window (before striding).
    pub fn column_span(&self) -> Range<usize> {
        self.i_ul..self.i_ul + (self.columns - 1) * self.i_skip + 1
    }

    /// Contiguous archive row range covering the window (before striding).
    pub fn row_span(&self) -> Range<usize> {
        self.j_ul..self.j_ul + (self.rows - 1) * self.j_skip + 1
    }

    /// Checks that the window lies inside an archive grid of `ny x nx`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WindowOutOfBounds`] naming the first axis that
    /// does not fit.
    pub fn check_fits(&self, ny: usize, nx: usize) -> Result<(), IoError> {
        let rows = self.row_span();
        if rows.end > ny {
            return Err(IoError::WindowOutOfBounds {
                axis: "rows".to_string(),
                needed: rows.end - 1,
                len: ny,
            });
        }
        let cols = self.column_span();
        if cols.end > nx {
            return Err(IoError::WindowOutOfBounds {
                axis: "columns".to_string(),
                needed: cols.end - 1,
                len: nx,
            });
        }
        Ok(())
    }
}

fn inverse(nc: usize, origin: usize, skip: usize, extent: usize) -> Option<usize> {
    let offset = nc.checked_sub(origin)?;
    if skip == 0 || offset % skip != 0 {
        return None;
    }
    let idx = offset / skip;
    (idx < extent).then_some(idx)
}
