//! Sensitivity Matrix Module
//!
//! Builds the stacked sensitivity (Jacobian) matrix of observable values
//! with respect to parameters by central finite differences over perturbed
//! oracle runs.
//!
//! # Row layout
//!
//! Rows are ordered time-major: row index = time_index * observable_count
//! + observable_index, columns follow the parameter order handed in. This
//! exact layout is part of the contract so downstream consumers can reason
//! about per-time-point blocks.
//!
//! # Numerical conventions
//!
//! - Perturbation step `eps = max(1e-8, |v| * rel_eps)`, so a parameter at
//!   exactly zero still receives a nonzero step.
//! - The lower perturbation is floored at zero: kinetic quantities are
//!   physical and non-negative.
//! - The actual denominator is `upper - lower`; when clipping collapses
//!   the interval the step size itself is used instead.
//! - Non-finite derivative estimates are recorded as zero sensitivity and
//!   counted, rather than propagating NaN/Inf into the FIM.

use std::collections::HashMap;

use log::debug;
use nalgebra::DMatrix;
use serde::Serialize;

use crate::simulation::{oracle::SimulationOracle, setup::SimulationSetup};

use super::{error::IdentifiabilityError, settings::PERTURBATION_FLOOR};

/// Stacked sensitivity matrix across all time points and observables.
///
/// Entry `(t * n_obs + o, j)` holds the central-difference estimate of
/// the derivative of observable `o` at time index `t` with respect to
/// parameter `j`. Built fresh per analysis run and never mutated
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityMatrix {
    /// The Jacobian, shape (time points * observables, parameters)
    pub matrix: DMatrix<f64>,
    /// Parameter names, one per column
    pub parameters: Vec<String>,
    /// Observable names defining the per-time-point row blocks
    pub observables: Vec<String>,
    /// Number of sample times covered by the rows
    pub time_points: usize,
    /// Count of non-finite derivative estimates replaced by zero
    pub non_finite_entries: usize,
}

impl SensitivityMatrix {
    /// Builds the Jacobian from perturbed oracle runs.
    ///
    /// Runs the oracle once at the base parameters, then twice per
    /// parameter (upper and lower perturbation). The oracle is expected
    /// to reset its state between calls; see
    /// [`SimulationOracle::simulate`].
    ///
    /// # Arguments
    ///
    /// * `oracle` - The external simulator
    /// * `setup` - Time-grid configuration (already applied via `configure`)
    /// * `parameters` - Ordered parameter names; defines column order
    /// * `observables` - Ordered observable names; defines row-block order
    /// * `base_values` - Snapshot of base parameter values
    /// * `rel_eps` - Relative perturbation fraction
    ///
    /// # Errors
    ///
    /// Fails if an observable is missing from the oracle's output layout,
    /// if a base value is absent, if a perturbed trajectory disagrees with
    /// the baseline on the number of time points, or if any oracle call
    /// fails. No partial Jacobian is ever produced.
    pub fn build<O: SimulationOracle>(
        oracle: &mut O,
        setup: &SimulationSetup,
        parameters: &[String],
        observables: &[String],
        base_values: &HashMap<String, f64>,
        rel_eps: f64,
    ) -> Result<Self, IdentifiabilityError> {
        let baseline = oracle.simulate(setup, None)?;

        let column_indices = observables
            .iter()
            .map(|name| {
                baseline
                    .column_index(name)
                    .ok_or_else(|| IdentifiabilityError::ObservableNotFound(name.clone()))
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let time_points = baseline.len();
        let n_obs = observables.len();
        let mut matrix = DMatrix::zeros(time_points * n_obs, parameters.len());
        let mut non_finite_entries = 0;

        for (j, name) in parameters.iter().enumerate() {
            let base = *base_values
                .get(name)
                .ok_or_else(|| IdentifiabilityError::MissingBaseValue(name.clone()))?;

            let eps = PERTURBATION_FLOOR.max(base.abs() * rel_eps);
            let upper = base + eps;
            // Kinetic quantities are non-negative; clip the lower end.
            let lower = (base - eps).max(0.0);

            debug!("Perturbing '{name}': {lower} .. {upper} (eps = {eps})");

            let mut overrides = base_values.clone();
            overrides.insert(name.clone(), upper);
            let plus = oracle.simulate(setup, Some(&overrides))?;

            overrides.insert(name.clone(), lower);
            let minus = oracle.simulate(setup, Some(&overrides))?;

            for trajectory in [&plus, &minus] {
                if trajectory.len() != time_points {
                    return Err(IdentifiabilityError::TrajectoryShapeMismatch {
                        expected: time_points,
                        found: trajectory.len(),
                    });
                }
            }

            let mut denominator = upper - lower;
            if denominator == 0.0 {
                denominator = eps;
            }

            for ti in 0..time_points {
                for (oi, &ci) in column_indices.iter().enumerate() {
                    let derivative = (plus.values[[ti, ci]] - minus.values[[ti, ci]]) / denominator;
                    if derivative.is_finite() {
                        matrix[(ti * n_obs + oi, j)] = derivative;
                    } else {
                        non_finite_entries += 1;
                    }
                }
            }
        }

        Ok(Self {
            matrix,
            parameters: parameters.to_vec(),
            observables: observables.to_vec(),
            time_points,
            non_finite_entries,
        })
    }

    /// Number of rows (time points times observables).
    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of parameters (columns).
    pub fn n_parameters(&self) -> usize {
        self.matrix.ncols()
    }

    /// Forms the Fisher Information Matrix `F = JᵀJ`.
    pub fn fim(&self) -> DMatrix<f64> {
        self.matrix.transpose() * &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array2;

    use crate::simulation::{error::SimulationError, result::Trajectory};

    use super::*;

    /// Closed-form oracle with obs_y(t) = 2 * k * t and an optional
    /// poisoned region producing NaN outputs.
    struct LinearOracle {
        k: f64,
        poison_above: Option<f64>,
    }

    impl SimulationOracle for LinearOracle {
        fn configure(&mut self, _setup: &SimulationSetup) -> Result<(), SimulationError> {
            Ok(())
        }

        fn list_parameters(&self) -> Vec<String> {
            vec!["k_rate".to_string()]
        }

        fn list_observables(&self) -> Vec<String> {
            vec!["obs_y".to_string()]
        }

        fn snapshot_parameters(
            &self,
            names: &[String],
        ) -> Result<HashMap<String, f64>, SimulationError> {
            names
                .iter()
                .map(|n| match n.as_str() {
                    "k_rate" => Ok((n.clone(), self.k)),
                    _ => Err(SimulationError::UnknownParameter(n.clone())),
                })
                .collect()
        }

        fn simulate(
            &mut self,
            setup: &SimulationSetup,
            overrides: Option<&HashMap<String, f64>>,
        ) -> Result<Trajectory, SimulationError> {
            let k = overrides
                .and_then(|o| o.get("k_rate").copied())
                .unwrap_or(self.k);
            let times = setup.times();
            let values = times
                .iter()
                .map(|t| {
                    if self.poison_above.is_some_and(|limit| k > limit) {
                        f64::NAN
                    } else {
                        2.0 * k * t
                    }
                })
                .collect::<Vec<f64>>();
            Trajectory::new(
                times,
                vec!["obs_y".to_string()],
                Array2::from_shape_vec((setup.points(), 1), values)
                    .map_err(|e| SimulationError::ShapeMismatch(e.to_string()))?,
            )
        }
    }

    fn two_point_setup() -> SimulationSetup {
        crate::simulation::setup::SimulationSetupBuilder::default()
            .t0(1.0)
            .t1(2.0)
            .steps(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_linear_response_column() {
        let mut oracle = LinearOracle {
            k: 0.5,
            poison_above: None,
        };
        let setup = two_point_setup();
        let parameters = vec!["k_rate".to_string()];
        let base = oracle.snapshot_parameters(&parameters).unwrap();

        let sensitivity = SensitivityMatrix::build(
            &mut oracle,
            &setup,
            &parameters,
            &["obs_y".to_string()],
            &base,
            1e-4,
        )
        .unwrap();

        // d(2kt)/dk = 2t, exact for a linear response
        assert_eq!(sensitivity.rows(), 2);
        assert_relative_eq!(sensitivity.matrix[(0, 0)], 2.0, epsilon = 1e-9);
        assert_relative_eq!(sensitivity.matrix[(1, 0)], 4.0, epsilon = 1e-9);
        assert_eq!(sensitivity.non_finite_entries, 0);

        let fim = sensitivity.fim();
        assert_relative_eq!(fim[(0, 0)], 4.0 * (1.0 + 4.0), epsilon = 1e-8);
    }

    #[test]
    fn test_zero_base_value_gets_floor_step() {
        let mut oracle = LinearOracle {
            k: 0.0,
            poison_above: None,
        };
        let setup = two_point_setup();
        let parameters = vec!["k_rate".to_string()];
        let base = oracle.snapshot_parameters(&parameters).unwrap();

        let sensitivity = SensitivityMatrix::build(
            &mut oracle,
            &setup,
            &parameters,
            &["obs_y".to_string()],
            &base,
            1e-4,
        )
        .unwrap();

        // eps floors at 1e-8, lower end clips to 0, denominator stays finite
        assert!(sensitivity.matrix[(0, 0)].is_finite());
        assert_relative_eq!(sensitivity.matrix[(0, 0)], 2.0, epsilon = 1e-6);
        assert_relative_eq!(sensitivity.matrix[(1, 0)], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_observable_aborts() {
        let mut oracle = LinearOracle {
            k: 0.5,
            poison_above: None,
        };
        let setup = two_point_setup();
        let parameters = vec!["k_rate".to_string()];
        let base = oracle.snapshot_parameters(&parameters).unwrap();

        let result = SensitivityMatrix::build(
            &mut oracle,
            &setup,
            &parameters,
            &["obs_missing".to_string()],
            &base,
            1e-4,
        );

        assert!(matches!(
            result,
            Err(IdentifiabilityError::ObservableNotFound(name)) if name == "obs_missing"
        ));
    }

    #[test]
    fn test_non_finite_derivatives_become_zero() {
        // Upper perturbation lands in the poisoned region and yields NaN.
        let mut oracle = LinearOracle {
            k: 0.5,
            poison_above: Some(0.5),
        };
        let setup = two_point_setup();
        let parameters = vec!["k_rate".to_string()];
        let base = oracle.snapshot_parameters(&parameters).unwrap();

        let sensitivity = SensitivityMatrix::build(
            &mut oracle,
            &setup,
            &parameters,
            &["obs_y".to_string()],
            &base,
            1e-4,
        )
        .unwrap();

        assert_eq!(sensitivity.non_finite_entries, 2);
        assert_eq!(sensitivity.matrix[(0, 0)], 0.0);
        assert_eq!(sensitivity.matrix[(1, 0)], 0.0);
    }
}
