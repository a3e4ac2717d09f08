//! # cruak-io
//!
//! Read a rectangular, optionally strided sub-region of a monthly
//! temperature archive into memory, together with the archive's valid-date
//! bounds. Archives are reached through the [`ArchiveSource`] seam: a
//! netCDF implementation for files on disk and an in-memory one for hosts
//! that already hold the data.

mod error;
mod memory;
mod netcdf_read;
mod reader;
mod region;
mod source;
mod time_axis;

pub use error::IoError;
pub use memory::MemoryArchive;
pub use netcdf_read::NetcdfArchive;
pub use reader::{ArchiveWindow, load_window, read_netcdf_window};
pub use region::SubRegion;
pub use source::{ArchiveDims, ArchiveSource, LAT_VAR, LON_VAR, TEMP_VAR, TIME_UNITS_ATTRS, TIME_VAR};
pub use time_axis::{ValidRange, find_reference_date};
