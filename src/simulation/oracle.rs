//! Simulation Oracle Module
//!
//! This module defines the [`SimulationOracle`] trait, the contract the
//! analysis engine consumes to obtain observable trajectories from an
//! external kinetic simulator. The crate never integrates a model itself;
//! any simulator (CVODE-backed, fixed-step, or closed-form) can drive the
//! analysis by implementing this trait.
//!
//! # Reproducibility contract
//!
//! The finite-difference estimator is only valid if repeated calls with
//! identical parameters produce identical trajectories. Implementations
//! must therefore reset any interfering internal state (initial
//! conditions, accumulated values) at the start of every
//! [`simulate`](SimulationOracle::simulate) call, on every exit path.
//! The analysis engine holds the oracle through `&mut self` for the whole
//! run, making the sequential reset-between-calls requirement explicit in
//! the type rather than an implicit convention.

use std::collections::HashMap;

use super::{error::SimulationError, result::Trajectory, setup::SimulationSetup};

/// Contract for the external kinetic simulator.
///
/// The analysis engine invokes the oracle as a blocking, sequential
/// black box: one `configure` per run, then one `simulate` per
/// perturbation. Trajectories are read back as dense matrices with named
/// columns; which columns count as observables is discovered through
/// [`list_observables`](SimulationOracle::list_observables).
pub trait SimulationOracle {
    /// Establishes a deterministic, reproducible integration
    /// configuration for the run.
    ///
    /// Must fail with [`SimulationError::UnsupportedMethod`] before any
    /// simulation work if the requested method is not available.
    fn configure(&mut self, setup: &SimulationSetup) -> Result<(), SimulationError>;

    /// Returns the ordered set of tunable parameter names.
    fn list_parameters(&self) -> Vec<String>;

    /// Returns the ordered set of observable output names.
    fn list_observables(&self) -> Vec<String>;

    /// Reads the current values of the named parameters.
    fn snapshot_parameters(&self, names: &[String])
        -> Result<HashMap<String, f64>, SimulationError>;

    /// Simulates the model over the configured time grid and returns one
    /// trajectory row per sample time.
    ///
    /// `overrides` replace the stored parameter values for this call
    /// only; the oracle must return to its baseline state afterwards.
    /// Implementations must reset initial conditions and any prior
    /// accumulated state before integrating, so that repeated calls with
    /// the same arguments are exactly reproducible.
    fn simulate(
        &mut self,
        setup: &SimulationSetup,
        overrides: Option<&HashMap<String, f64>>,
    ) -> Result<Trajectory, SimulationError>;
}
