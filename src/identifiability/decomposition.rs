//! FIM Decomposition Module
//!
//! Forms the Fisher Information Matrix `F = JᵀJ` from the sensitivity
//! matrix, performs a symmetric eigendecomposition, and derives the
//! numerically robust summary quantities: raw and regularized condition
//! numbers, a pseudo-inverse covariance estimate restricted to the
//! significant eigenspace, and a normalized correlation matrix.
//!
//! A singular or near-singular FIM is not an error here; it is the
//! expected signal of structural unidentifiability and is absorbed by the
//! regularized condition number and the pseudo-inverse convention.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;

use super::settings::{AnalysisSettings, CONDITION_FLOOR};

/// Eigendecomposition of the FIM together with the derived covariance and
/// correlation estimates.
///
/// Eigenvalues are sorted descending and eigenvector columns follow the
/// same order; "mode 1" always refers to the largest eigenvalue. All
/// matrices are immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct FimDecomposition {
    /// The Fisher Information Matrix `JᵀJ`
    pub fim: DMatrix<f64>,
    /// Eigenvalues in descending order
    pub eigenvalues: DVector<f64>,
    /// Orthonormal eigenvectors, one column per mode
    pub eigenvectors: DMatrix<f64>,
    /// Pseudo-inverse covariance restricted to significant eigenmodes
    pub covariance: DMatrix<f64>,
    /// Correlation matrix; zero where a variance is not resolvable
    pub correlations: DMatrix<f64>,
    /// Raw condition number, infinite when the smallest eigenvalue is
    /// non-positive
    pub condition_number: f64,
    /// Condition number with the denominator floored against
    /// floating-point underflow
    pub regularized_condition: f64,
}

impl FimDecomposition {
    /// Decomposes `F = JᵀJ` for the given Jacobian.
    ///
    /// Uses a symmetric eigensolver; `F` is symmetric positive
    /// semidefinite by construction, so all eigenvalues are non-negative
    /// up to numerical noise.
    pub fn from_jacobian(jacobian: &DMatrix<f64>, settings: &AnalysisSettings) -> Self {
        let fim = jacobian.transpose() * jacobian;
        Self::from_fim(fim, settings)
    }

    /// Decomposes an already-assembled (symmetric PSD) FIM.
    pub fn from_fim(fim: DMatrix<f64>, settings: &AnalysisSettings) -> Self {
        let p = fim.nrows();
        let eigen = SymmetricEigen::new(fim.clone());

        // Descending eigenvalue order is part of the contract.
        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let eigenvalues = DVector::from_iterator(p, order.iter().map(|&i| eigen.eigenvalues[i]));
        let columns = order
            .iter()
            .map(|&i| eigen.eigenvectors.column(i).clone_owned())
            .collect::<Vec<_>>();
        let eigenvectors = DMatrix::from_columns(&columns);

        let max_eig = eigenvalues[0];
        let min_eig = eigenvalues[p - 1];

        let condition_number = if max_eig > 0.0 && min_eig > 0.0 {
            max_eig / min_eig
        } else {
            f64::INFINITY
        };
        let denominator_floor = (max_eig.abs() * settings.eigenvalue_cutoff).max(CONDITION_FLOOR);
        let regularized_condition = max_eig / min_eig.max(denominator_floor);

        let covariance = pseudo_inverse_covariance(&eigenvalues, &eigenvectors, settings);
        let correlations = normalize_correlations(&covariance);

        Self {
            fim,
            eigenvalues,
            eigenvectors,
            covariance,
            correlations,
            condition_number,
            regularized_condition,
        }
    }

    /// Largest eigenvalue (mode 1).
    pub fn max_eigenvalue(&self) -> f64 {
        self.eigenvalues[0]
    }

    /// Number of parameters covered by the decomposition.
    pub fn n_parameters(&self) -> usize {
        self.fim.nrows()
    }
}

/// Pseudo-inverse of the FIM restricted to the significant eigenspace.
///
/// Eigenpairs below the significance threshold contribute nothing: their
/// variance is treated as unbounded rather than zero, the standard
/// pseudo-inverse identifiability convention.
fn pseudo_inverse_covariance(
    eigenvalues: &DVector<f64>,
    eigenvectors: &DMatrix<f64>,
    settings: &AnalysisSettings,
) -> DMatrix<f64> {
    let p = eigenvalues.len();
    let threshold = settings.significance_threshold(eigenvalues[0]);

    let mut covariance = DMatrix::zeros(p, p);
    for k in 0..p {
        let lambda = eigenvalues[k];
        if lambda > threshold {
            let v = eigenvectors.column(k).clone_owned();
            covariance += (&v * v.transpose()) / lambda;
        }
    }

    covariance
}

/// Correlation matrix from the covariance estimate.
///
/// Entries are zero whenever either variance is not strictly positive: a
/// parameter with no resolvable variance is uncorrelated with everything
/// by convention, rather than producing NaN.
fn normalize_correlations(covariance: &DMatrix<f64>) -> DMatrix<f64> {
    let p = covariance.nrows();
    let mut correlations = DMatrix::zeros(p, p);

    for i in 0..p {
        for j in 0..p {
            let var_i = covariance[(i, i)];
            let var_j = covariance[(j, j)];
            if var_i > 0.0 && var_j > 0.0 {
                correlations[(i, j)] = covariance[(i, j)] / (var_i * var_j).sqrt();
            }
        }
    }

    correlations
}
