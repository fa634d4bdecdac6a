use thiserror::Error;

use crate::simulation::error::SimulationError;

#[derive(Error, Debug)]
pub enum IdentifiabilityError {
    #[error("Simulation failed during sensitivity analysis")]
    SimulationError(#[from] SimulationError),
    #[error("No observables discoverable; nothing to differentiate against")]
    NoObservables,
    #[error("No parameters selected; nothing to analyze")]
    NoParameters,
    #[error("Observable '{0}' not found in the oracle's output layout")]
    ObservableNotFound(String),
    #[error("No base value for parameter '{0}'")]
    MissingBaseValue(String),
    #[error("Perturbed trajectory has {found} time points, expected {expected}")]
    TrajectoryShapeMismatch { expected: usize, found: usize },
}
