//! Kinident Rust Library
//!
//! This library estimates how well the parameters of a kinetic (ODE-based)
//! model can be determined from a set of observable outputs, including:
//! - Building sensitivity (Jacobian) matrices from perturbed simulations
//! - Assembling and decomposing the Fisher Information Matrix (FIM)
//! - Classifying parameters as identifiable or unidentifiable
//! - Detecting near-null parameter combinations
//! - Ranking pairwise parameter correlations
//!
//! The ODE simulator itself is an external collaborator consumed through
//! the [`SimulationOracle`](crate::simulation::oracle::SimulationOracle)
//! trait; this crate never integrates a model on its own.

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::identifiability::analysis::*;
    pub use crate::identifiability::classify::*;
    pub use crate::identifiability::correlation::*;
    pub use crate::identifiability::decomposition::*;
    pub use crate::identifiability::error::*;
    pub use crate::identifiability::jacobian::*;
    pub use crate::identifiability::results::*;
    pub use crate::identifiability::settings::*;
    pub use crate::simulation::error::*;
    pub use crate::simulation::oracle::*;
    pub use crate::simulation::result::*;
    pub use crate::simulation::setup::*;
}

/// Oracle-facing side: simulation configuration and the simulator contract
pub mod simulation {
    pub use crate::simulation::setup::SimulationSetup;

    /// Error types for simulation failures
    pub mod error;
    /// The external simulator contract consumed by the analysis engine
    pub mod oracle;
    /// Trajectory data returned by the oracle
    pub mod result;
    /// Simulation setup and time-grid configuration
    pub mod setup;
}

/// Sensitivity and identifiability analysis engine
pub mod identifiability {
    pub use crate::identifiability::analysis::*;
    pub use crate::identifiability::results::AnalysisReport;
    pub use crate::identifiability::settings::AnalysisSettings;

    /// Pipeline entry point wiring all components together
    pub mod analysis;
    /// Identifiable/unidentifiable classification and nullspace detection
    pub mod classify;
    /// Ranking of correlated parameter pairs
    pub mod correlation;
    /// FIM assembly, eigendecomposition, covariance and correlations
    pub mod decomposition;
    /// Error types for identifiability analysis
    pub mod error;
    /// Finite-difference sensitivity matrix construction
    pub mod jacobian;
    /// Aggregated analysis results and console rendering
    pub mod results;
    /// Numerical tolerances and analysis settings
    pub mod settings;
}
