//! Setup module for configuring ODE simulations.
//!
//! This module provides the [`SimulationSetup`] struct and its builder for
//! configuring the time grid and numerical integration parameters handed
//! to the external simulator. It handles:
//!
//! - Time range specification (start and end times)
//! - Number of uniform integration steps
//! - Error tolerance settings (relative and absolute)
//! - Choice of integration method
//!
//! The oracle returns one trajectory row per sample time, so a setup with
//! `steps` steps produces `steps + 1` time points. A grid with fewer than
//! two points cannot support finite-difference sensitivities and is
//! rejected at build time.

use derive_builder::Builder;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Integration method requested from the external simulator
///
/// Which methods are actually available is up to the oracle; requesting an
/// unsupported method is a fatal configuration error raised by
/// [`configure`](super::oracle::SimulationOracle::configure) before any
/// sensitivity work begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// Adaptive stiff solver (CVODE-style)
    #[default]
    Cvode,
    /// Adaptive explicit Runge-Kutta
    Rk45,
    /// Fixed-step fourth-order Runge-Kutta
    Rk4,
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationMethod::Cvode => write!(f, "cvode"),
            IntegrationMethod::Rk45 => write!(f, "rk45"),
            IntegrationMethod::Rk4 => write!(f, "rk4"),
        }
    }
}

/// Configuration for numerical integration of ODE systems
///
/// This struct contains all the parameters needed to control the numerical
/// integration of an ODE system, including time range, step count, and
/// error tolerances.
///
/// # Fields
///
/// * `t0` - Start time of the simulation (default: 0.0)
/// * `t1` - End time of the simulation (default: 50.0)
/// * `steps` - Number of uniform integration steps (default: 500)
/// * `rtol` - Relative tolerance for error control (default: 1e-10)
/// * `atol` - Absolute tolerance for error control (default: 1e-12)
/// * `method` - Integration method to request (default: CVODE)
///
/// # Examples
///
/// ```
/// use kinident::prelude::SimulationSetupBuilder;
///
/// let setup = SimulationSetupBuilder::default()
///     .t0(0.0)
///     .t1(100.0)
///     .steps(1000)
///     .rtol(1e-8)
///     .atol(1e-10)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SimulationSetup {
    #[builder(default = "0.0")]
    pub t0: f64,
    #[builder(default = "50.0")]
    pub t1: f64,
    #[builder(default = "500")]
    pub steps: usize,
    #[builder(default = "1e-10")]
    pub rtol: f64,
    #[builder(default = "1e-12")]
    pub atol: f64,
    #[builder(default)]
    pub method: IntegrationMethod,
}

impl SimulationSetup {
    /// Returns the number of sample times on the grid (`steps + 1`).
    pub fn points(&self) -> usize {
        self.steps + 1
    }

    /// Returns the uniform time grid as an array of sample times.
    pub fn times(&self) -> Array1<f64> {
        Array1::linspace(self.t0, self.t1, self.points())
    }
}

impl SimulationSetupBuilder {
    /// Rejects grids that cannot support finite-difference sensitivities.
    fn validate(&self) -> Result<(), String> {
        if let Some(steps) = self.steps {
            if steps < 1 {
                return Err(
                    "at least one integration step (two time points) is required".to_string(),
                );
            }
        }
        if let (Some(t0), Some(t1)) = (self.t0, self.t1) {
            if t1 <= t0 {
                return Err(format!(
                    "end time {t1} must be greater than start time {t0}"
                ));
            }
        }
        Ok(())
    }
}
