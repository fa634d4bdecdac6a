//! Simulation Error Module
//!
//! Error handling for the simulator contract consumed by the analysis
//! engine. These errors originate in the external oracle or in the
//! validation of its inputs and outputs.

use thiserror::Error;

use super::setup::IntegrationMethod;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Integration method '{0}' is not supported by this simulator")]
    UnsupportedMethod(IntegrationMethod),
    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("Trajectory shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Integration failed: {0}")]
    IntegrationFailure(String),
    #[error("Other error: {0}")]
    Other(String),
}
