//! Error types for cruak-bmi.

/// Error type for all fallible operations in the cruak-bmi crate.
#[derive(Debug, thiserror::Error)]
pub enum BmiError {
    /// Returned when a call needs a model but `initialize` has not run
    /// (or `finalize` already has).
    #[error("component is not initialized")]
    NotInitialized,

    /// Returned when a variable name is not one the component exposes.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// The requested name.
        name: String,
    },

    /// Returned when a grid identifier does not exist.
    #[error("unknown grid {grid}")]
    UnknownGrid {
        /// The requested grid identifier.
        grid: usize,
    },

    /// Returned when an attribute name is not in the component's metadata.
    #[error("could not find attribute '{name}'")]
    UnknownAttribute {
        /// The requested attribute.
        name: String,
    },

    /// Returned when a flat index falls outside a variable's grid.
    #[error("index {index} out of bounds for '{name}' of size {size}")]
    IndexOutOfBounds {
        /// Variable name.
        name: String,
        /// Offending flat index.
        index: usize,
        /// Number of elements in the variable.
        size: usize,
    },

    /// Returned when a buffer length does not match what the call needs.
    #[error("size mismatch for '{name}': expected {expected}, got {got}")]
    SizeMismatch {
        /// Variable name.
        name: String,
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Returned when writing to a variable that cannot be set.
    #[error("variable '{name}' is read-only")]
    ReadOnly {
        /// Variable name.
        name: String,
    },

    /// Wraps an error originating from the cruak-engine crate.
    #[error("engine error: {reason}")]
    Engine {
        /// Description of the underlying engine failure.
        reason: String,
    },
}

impl From<cruak_engine::EngineError> for BmiError {
    fn from(e: cruak_engine::EngineError) -> Self {
        BmiError::Engine {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            BmiError::NotInitialized.to_string(),
            "component is not initialized"
        );
        assert_eq!(
            BmiError::UnknownVariable {
                name: "snow".to_string()
            }
            .to_string(),
            "unknown variable 'snow'"
        );
        assert_eq!(
            BmiError::IndexOutOfBounds {
                name: "atmosphere_bottom_air__temperature".to_string(),
                index: 800,
                size: 800,
            }
            .to_string(),
            "index 800 out of bounds for 'atmosphere_bottom_air__temperature' of size 800"
        );
    }

    #[test]
    fn from_engine_error() {
        let engine = cruak_engine::EngineError::MissingKey {
            key: "i_ul".to_string(),
        };
        let err: BmiError = engine.into();
        assert!(matches!(err, BmiError::Engine { .. }));
        assert!(err.to_string().contains("i_ul"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<BmiError>();
    }
}
