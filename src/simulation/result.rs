//! Trajectory Module
//!
//! This module provides the [`Trajectory`] struct, the dense matrix of
//! observable values over time returned by the external simulator.
//!
//! # Key Components
//!
//! - [`Trajectory`]: time axis, named columns, and a dense value matrix
//!   with one row per sample time and one column per output
//!
//! Column lookup by name is the seam used by the sensitivity builder to
//! locate each observable in the oracle's output layout; a missing name
//! there is a hard configuration error.

use ndarray::{Array1, Array2};

use super::error::SimulationError;

/// Dense matrix of simulator outputs over time.
///
/// Rows correspond to sample times (in the order of the time grid),
/// columns to the named outputs in `columns`. A trajectory is immutable
/// once returned by the oracle.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Sample times, one per row
    pub times: Array1<f64>,
    /// Output names, one per column
    pub columns: Vec<String>,
    /// Output values, shape (time points, outputs)
    pub values: Array2<f64>,
}

impl Trajectory {
    /// Creates a new trajectory, validating that the value matrix matches
    /// the time axis and column names.
    pub fn new(
        times: Array1<f64>,
        columns: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, SimulationError> {
        if values.nrows() != times.len() {
            return Err(SimulationError::ShapeMismatch(format!(
                "{} rows for {} time points",
                values.nrows(),
                times.len()
            )));
        }
        if values.ncols() != columns.len() {
            return Err(SimulationError::ShapeMismatch(format!(
                "{} columns for {} output names",
                values.ncols(),
                columns.len()
            )));
        }

        Ok(Self {
            times,
            columns,
            values,
        })
    }

    /// Returns the number of sample times.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Checks whether the trajectory holds any sample times.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the column index of a named output, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_column_lookup() {
        let trajectory = Trajectory::new(
            array![0.0, 1.0],
            vec!["obs_A".to_string(), "obs_B".to_string()],
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap();

        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.column_index("obs_B"), Some(1));
        assert_eq!(trajectory.column_index("obs_C"), None);
    }

    #[test]
    fn test_shape_validation() {
        let result = Trajectory::new(
            array![0.0, 1.0, 2.0],
            vec!["obs_A".to_string()],
            array![[1.0], [2.0]],
        );
        assert!(matches!(result, Err(SimulationError::ShapeMismatch(_))));
    }
}
