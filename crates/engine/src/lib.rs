//! # cruak-engine
//!
//! Steps a run through a monthly temperature archive one year at a time.
//! At each date the engine publishes the temperature of the current month,
//! the twelve trailing months ending at it, their January and July entries,
//! and the trailing-year mean.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     CFG[.cfg / .toml] --> RC[RunConfig]
//!     RC --> SR[SubRegion]
//!     SR --> W[ArchiveWindow]
//!     RC --> CL[SimulationClock]
//!     W --> TM[TemperatureModel]
//!     CL --> TM
//!     TM --> G[DerivedGrids]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use cruak_engine::TemperatureModel;
//!
//! let mut model = TemperatureModel::from_config_file(Path::new("alaska_cruAKtemp_model.cfg"))?;
//! while model.current_date() < model.last_date() {
//!     model.update(None)?;
//! }
//! println!("mean of trailing year at (0, 0): {}", model.prior_year()[[0, 0]]);
//! # Ok::<(), cruak_engine::EngineError>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `config` | [`RunConfig`] builder, TOML loading and writing, archive resolution |
//! | `legacy` | Pipe-delimited `.cfg` reader |
//! | `clock` | [`SimulationClock`]: run dates and whole-year timesteps |
//! | `grids` | [`DerivedGrids`], [`OutputGrid`], [`GridSnapshot`] |
//! | `model` | [`TemperatureModel`]: time indexing and grid refresh |
//! | `error` | [`EngineError`] |

mod clock;
mod config;
mod error;
mod grids;
mod legacy;
mod model;

pub use clock::SimulationClock;
pub use config::{
    ALASKA_LOWRES_ARCHIVE, DEFAULT_CONFIG_FILE, FracStepMode, GridType, RunConfig,
    archive_file_name, load_config, write_config, write_default_config,
};
pub use error::EngineError;
pub use grids::{
    DerivedGrids, GridSnapshot, OutputGrid, PRIOR_JAN_INDEX, PRIOR_JUL_INDEX, PRIOR_MONTHS,
};
pub use legacy::{parse_legacy_config, read_legacy_config};
pub use model::{TemperatureModel, round_half_up};
