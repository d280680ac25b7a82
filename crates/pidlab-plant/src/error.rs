//! Error types for plant model construction and use.

use thiserror::Error;

/// Errors that can occur when building or querying plant models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    /// Construction received a type tag that names no known plant.
    /// Deliberately fatal: silently defaulting would mask caller bugs.
    #[error("Unknown system type: {name}")]
    UnknownSystemType { name: String },

    /// A parameter value the dynamics cannot be evaluated with.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },
}

pub type PlantResult<T> = Result<T, PlantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlantError::UnknownSystemType {
            name: "Third Order".to_string(),
        };
        assert!(err.to_string().contains("Third Order"));

        let err = PlantError::InvalidParameter {
            what: "time_constant must be nonzero",
        };
        assert!(err.to_string().contains("time_constant"));
    }
}
