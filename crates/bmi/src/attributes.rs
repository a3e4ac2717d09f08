//! Static component metadata.

/// Attribute names and values, looked up case-insensitively.
///
/// The `grid_type` value is spelled `uniform_rectlinear`; per-grid types
/// reported by `get_grid_type` use `uniform_rectilinear`.
pub const ATTRIBUTES: [(&str, &str); 10] = [
    ("model_name", "PermaModel_cruAKtemp"),
    ("version", "0.1"),
    ("author_name", "J. Scott Stewart"),
    ("grid_type", "uniform_rectlinear"),
    ("time_step_type", "fixed"),
    ("step_method", "explicit"),
    ("comp_name", "AlaskaTemperatureBMI"),
    ("model_family", "PermaModel"),
    ("cfg_extension", "_cruAKtemp_model.cfg"),
    ("time_units", "days"),
];

/// Component name before initialization.
pub const NAME_UNINITIALIZED: &str = "AlaskaTemperature";

/// Component name once a model is loaded.
pub const NAME_INITIALIZED: &str = "Permamodel CRU-AK Temperature Component";

/// Value of attribute `name`, if defined.
pub fn attribute(name: &str) -> Option<&'static str> {
    let key = name.to_ascii_lowercase();
    ATTRIBUTES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}
