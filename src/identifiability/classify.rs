//! Identifiability Classification Module
//!
//! Uses the FIM eigendecomposition to partition parameters into
//! identifiable and unidentifiable sets and to extract near-null
//! eigenvector combinations as candidate non-identifiable parameter
//! groupings.
//!
//! The contribution score of parameter `i` is the diagonal of the portion
//! of `F` reconstructed from significant modes,
//! `Σ_k eigenvector[i,k]² * λ_k`, i.e. how much information the parameter
//! individually receives. The classification cutoff is deliberately
//! looser than the eigenvalue significance cutoff.

use serde::Serialize;

use super::{decomposition::FimDecomposition, settings::AnalysisSettings};

/// A single parameter's weight inside a near-null eigenvector.
#[derive(Debug, Clone, Serialize)]
pub struct NullspaceComponent {
    pub parameter: String,
    pub loading: f64,
}

/// A near-null eigenvector reported as a candidate non-identifiable
/// parameter combination, tagged with its eigenvalue.
///
/// Components are sorted by descending magnitude; components below the
/// noise-suppression fraction of the largest magnitude are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct NullspaceCombination {
    pub eigenvalue: f64,
    pub components: Vec<NullspaceComponent>,
}

/// Partition of the parameters plus the ordered nullspace combinations.
///
/// Combinations are ordered from the smallest eigenvalue outward, so the
/// most degenerate direction comes first.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifiabilitySummary {
    pub identifiable: Vec<String>,
    pub unidentifiable: Vec<String>,
    pub nullspace_combinations: Vec<NullspaceCombination>,
}

impl IdentifiabilitySummary {
    /// Classifies parameters from the FIM decomposition.
    ///
    /// `parameters` must be index-aligned with the eigenvector rows, i.e.
    /// in the same order as the Jacobian columns.
    pub fn from_decomposition(
        decomposition: &FimDecomposition,
        parameters: &[String],
        settings: &AnalysisSettings,
    ) -> Self {
        let eigenvalues = &decomposition.eigenvalues;
        let eigenvectors = &decomposition.eigenvectors;
        let p = parameters.len();

        let max_eig = decomposition.max_eigenvalue();
        let significance = settings.significance_threshold(max_eig);
        let contribution_cutoff = settings.contribution_threshold(max_eig);

        let mut identifiable = Vec::new();
        let mut unidentifiable = Vec::new();

        for (i, name) in parameters.iter().enumerate() {
            let contribution: f64 = (0..p)
                .filter(|&k| eigenvalues[k] > significance)
                .map(|k| eigenvectors[(i, k)].powi(2) * eigenvalues[k])
                .sum();

            if contribution > contribution_cutoff {
                identifiable.push(name.clone());
            } else {
                unidentifiable.push(name.clone());
            }
        }

        // Scan from the tail of the descending spectrum; stop at the
        // first eigenvalue above the near-null tolerance.
        let null_tolerance = settings.null_threshold(max_eig);
        let mut nullspace_combinations = Vec::new();
        for k in (0..p).rev() {
            let lambda = eigenvalues[k];
            if lambda > null_tolerance {
                break;
            }

            let vector = eigenvectors.column(k);
            let max_abs = vector.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
            let threshold = max_abs * settings.component_fraction;

            let mut components = parameters
                .iter()
                .enumerate()
                .filter(|(i, _)| vector[*i].is_finite() && vector[*i].abs() >= threshold)
                .map(|(i, name)| NullspaceComponent {
                    parameter: name.clone(),
                    loading: vector[i],
                })
                .collect::<Vec<_>>();
            components.sort_by(|a, b| {
                b.loading
                    .abs()
                    .partial_cmp(&a.loading.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            nullspace_combinations.push(NullspaceCombination {
                eigenvalue: lambda,
                components,
            });
        }

        Self {
            identifiable,
            unidentifiable,
            nullspace_combinations,
        }
    }

    /// Checks whether a parameter was classified identifiable.
    pub fn is_identifiable(&self, name: &str) -> bool {
        self.identifiable.iter().any(|p| p == name)
    }
}
