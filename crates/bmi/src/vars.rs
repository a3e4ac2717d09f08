//! Exchange-item table: BMI names, units, grids, and model variables.

use cruak_engine::OutputGrid;

use crate::error::BmiError;

/// A variable the component exposes.
///
/// The four temperature grids are the published outputs. The two
/// `datetime__*` scalars are readable by name but not listed as outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputVar {
    /// `atmosphere_bottom_air__temperature`
    AirTemperature,
    /// `atmosphere_bottom_air__temperature_mean_jan`
    MeanJan,
    /// `atmosphere_bottom_air__temperature_mean_jul`
    MeanJul,
    /// `atmosphere_bottom_air__temperature_year`
    Year,
    /// `datetime__start`
    DatetimeStart,
    /// `datetime__end`
    DatetimeEnd,
}

struct VarInfo {
    var: OutputVar,
    name: &'static str,
    model_name: &'static str,
    units: &'static str,
}

static TABLE: [VarInfo; 6] = [
    VarInfo {
        var: OutputVar::AirTemperature,
        name: "atmosphere_bottom_air__temperature",
        model_name: "T_air",
        units: "deg_C",
    },
    VarInfo {
        var: OutputVar::MeanJan,
        name: "atmosphere_bottom_air__temperature_mean_jan",
        model_name: "T_air_prior_jan",
        units: "deg_C",
    },
    VarInfo {
        var: OutputVar::MeanJul,
        name: "atmosphere_bottom_air__temperature_mean_jul",
        model_name: "T_air_prior_jul",
        units: "deg_C",
    },
    VarInfo {
        var: OutputVar::Year,
        name: "atmosphere_bottom_air__temperature_year",
        model_name: "T_air_prior_year",
        units: "deg_C",
    },
    VarInfo {
        var: OutputVar::DatetimeStart,
        name: "datetime__start",
        model_name: "first_date",
        units: "days",
    },
    VarInfo {
        var: OutputVar::DatetimeEnd,
        name: "datetime__end",
        model_name: "last_date",
        units: "days",
    },
];

/// Names published by `get_output_var_names`, in grid order.
pub const OUTPUT_VAR_NAMES: [&str; 4] = [
    "atmosphere_bottom_air__temperature",
    "atmosphere_bottom_air__temperature_mean_jan",
    "atmosphere_bottom_air__temperature_mean_jul",
    "atmosphere_bottom_air__temperature_year",
];

/// The component takes no inputs.
pub const INPUT_VAR_NAMES: [&str; 0] = [];

impl OutputVar {
    /// Every variable, indexed by grid identifier.
    pub const ALL: [OutputVar; 6] = [
        OutputVar::AirTemperature,
        OutputVar::MeanJan,
        OutputVar::MeanJul,
        OutputVar::Year,
        OutputVar::DatetimeStart,
        OutputVar::DatetimeEnd,
    ];

    fn info(self) -> &'static VarInfo {
        &TABLE[self.grid_id()]
    }

    /// Looks up a variable by its BMI name.
    pub fn from_name(name: &str) -> Result<Self, BmiError> {
        TABLE
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.var)
            .ok_or_else(|| BmiError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Looks up the variable living on grid `grid`.
    pub fn from_grid(grid: usize) -> Result<Self, BmiError> {
        Self::ALL
            .get(grid)
            .copied()
            .ok_or(BmiError::UnknownGrid { grid })
    }

    /// BMI name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Name of the backing model variable.
    pub fn model_name(self) -> &'static str {
        self.info().model_name
    }

    pub fn units(self) -> &'static str {
        self.info().units
    }

    /// Grid identifier; each variable has its own grid.
    pub fn grid_id(self) -> usize {
        match self {
            OutputVar::AirTemperature => 0,
            OutputVar::MeanJan => 1,
            OutputVar::MeanJul => 2,
            OutputVar::Year => 3,
            OutputVar::DatetimeStart => 4,
            OutputVar::DatetimeEnd => 5,
        }
    }

    /// The engine grid behind this variable, or `None` for the date scalars.
    pub fn output_grid(self) -> Option<OutputGrid> {
        match self {
            OutputVar::AirTemperature => Some(OutputGrid::Current),
            OutputVar::MeanJan => Some(OutputGrid::PriorJan),
            OutputVar::MeanJul => Some(OutputGrid::PriorJul),
            OutputVar::Year => Some(OutputGrid::PriorYear),
            OutputVar::DatetimeStart | OutputVar::DatetimeEnd => None,
        }
    }

    /// BMI grid type of this variable's grid.
    pub fn grid_type(self) -> &'static str {
        match self.output_grid() {
            Some(_) => "uniform_rectilinear",
            None => "scalar",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_grid() {
        for (id, var) in OutputVar::ALL.iter().enumerate() {
            assert_eq!(var.grid_id(), id);
            assert_eq!(TABLE[id].var, *var);
            assert_eq!(OutputVar::from_grid(id).unwrap(), *var);
        }
        assert!(matches!(OutputVar::from_grid(6), Err(BmiError::UnknownGrid { grid: 6 })));
    }

    #[test]
    fn names_round_trip() {
        for var in OutputVar::ALL {
            assert_eq!(OutputVar::from_name(var.name()).unwrap(), var);
        }
        assert!(OutputVar::from_name("T_air").is_err());
    }

    #[test]
    fn outputs_are_the_temperature_grids() {
        for name in OUTPUT_VAR_NAMES {
            let var = OutputVar::from_name(name).unwrap();
            assert!(var.output_grid().is_some());
            assert_eq!(var.units(), "deg_C");
        }
    }

    #[test]
    fn model_names() {
        assert_eq!(OutputVar::AirTemperature.model_name(), "T_air");
        assert_eq!(OutputVar::MeanJan.model_name(), "T_air_prior_jan");
        assert_eq!(OutputVar::MeanJul.model_name(), "T_air_prior_jul");
        assert_eq!(OutputVar::Year.model_name(), "T_air_prior_year");
        assert_eq!(OutputVar::DatetimeStart.units(), "days");
        assert_eq!(OutputVar::DatetimeEnd.grid_type(), "scalar");
    }
}
