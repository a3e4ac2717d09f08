//! # cruak-bmi
//!
//! Basic Model Interface (BMI) surface for the CRU Alaska monthly air
//! temperature engine. A coupling framework drives the component through
//! `initialize` / `update` / `update_until` / `finalize` and reads the four
//! published temperature grids by their standard names.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     F[Framework] -->|name| V[OutputVar]
//!     F --> A[AlaskaTemperatureBmi]
//!     V --> A
//!     A --> M[TemperatureModel]
//!     M --> G[Output grids]
//!     A -->|borrowed views| F
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `adapter` | [`AlaskaTemperatureBmi`] |
//! | `vars` | [`OutputVar`]: BMI names, units, grids |
//! | `attributes` | Static component metadata |
//! | `error` | [`BmiError`] |

mod adapter;
mod attributes;
mod error;
mod vars;

pub use adapter::{AlaskaTemperatureBmi, GRID_ORIGIN, GRID_SPACING};
pub use attributes::{ATTRIBUTES, attribute};
pub use error::BmiError;
pub use vars::{INPUT_VAR_NAMES, OUTPUT_VAR_NAMES, OutputVar};
