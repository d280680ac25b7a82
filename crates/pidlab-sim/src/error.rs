//! Error types for simulation runs.

use pidlab_core::CoreError;
use pidlab_plant::PlantError;
use thiserror::Error;

/// Errors encountered when driving a closed-loop simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Plant(#[from] PlantError),
}

pub type SimResult<T> = Result<T, SimError>;
