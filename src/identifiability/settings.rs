//! Numerical tolerances and analysis settings.
//!
//! All cutoffs used by the analysis engine live here as named constants
//! with an overridable [`AnalysisSettings`] on top. The relative cutoffs
//! (1e-12, 1e-6, 1e-4) and absolute floors (1e-8, 1e-12, 1e-16) are
//! empirically chosen tolerances shared with a companion JavaScript
//! implementation so results can be cross-validated; small mismatches
//! between the two are expected from solver and floating-point
//! differences.

use serde::Serialize;

/// Default relative perturbation fraction for finite differences.
pub const DEFAULT_REL_EPS: f64 = 1e-4;

/// Absolute floor for the perturbation step, so a parameter with base
/// value zero still receives a nonzero step.
pub const PERTURBATION_FLOOR: f64 = 1e-8;

/// Relative cutoff below which an eigenvalue is treated as numerically
/// insignificant (pseudo-inverse convention).
pub const EIGENVALUE_RELATIVE_CUTOFF: f64 = 1e-12;

/// Absolute floor for the eigenvalue significance threshold.
pub const EIGENVALUE_FLOOR: f64 = 1e-12;

/// Absolute floor for the regularized condition-number denominator.
pub const CONDITION_FLOOR: f64 = 1e-16;

/// Relative cutoff on a parameter's contribution score below which it is
/// classified unidentifiable. Deliberately looser than the eigenvalue
/// significance cutoff: a parameter can carry low but real information.
pub const CONTRIBUTION_RELATIVE_CUTOFF: f64 = 1e-6;

/// Relative cutoff below which an eigenvalue counts as near-null for
/// nullspace-combination detection.
pub const NULLSPACE_RELATIVE_CUTOFF: f64 = 1e-4;

/// Fraction of the largest eigenvector component below which components
/// are suppressed from a nullspace combination (noise suppression).
pub const COMPONENT_MAGNITUDE_FRACTION: f64 = 0.1;

/// Default number of top correlated parameter pairs to report.
pub const DEFAULT_PAIR_LIMIT: usize = 3;

/// Tunable settings for a single identifiability analysis run.
///
/// Every field defaults to the reference constant above; the component
/// fraction and pair limit are presentation policies with no deeper
/// numerical derivation and are kept configurable for that reason.
///
/// # Examples
///
/// ```
/// use kinident::prelude::AnalysisSettings;
///
/// let settings = AnalysisSettings::builder()
///     .rel_eps(1e-3)
///     .pair_limit(5)
///     .build();
/// ```
#[derive(Debug, Clone, bon::Builder, Serialize)]
pub struct AnalysisSettings {
    /// Relative perturbation fraction for finite differences
    #[builder(default = DEFAULT_REL_EPS)]
    pub rel_eps: f64,

    /// Relative eigenvalue significance cutoff (pseudo-inverse and
    /// regularized condition number)
    #[builder(default = EIGENVALUE_RELATIVE_CUTOFF)]
    pub eigenvalue_cutoff: f64,

    /// Relative contribution cutoff for the identifiable partition
    #[builder(default = CONTRIBUTION_RELATIVE_CUTOFF)]
    pub contribution_cutoff: f64,

    /// Relative cutoff for near-null eigenvalues
    #[builder(default = NULLSPACE_RELATIVE_CUTOFF)]
    pub nullspace_cutoff: f64,

    /// Magnitude fraction below which nullspace components are dropped
    #[builder(default = COMPONENT_MAGNITUDE_FRACTION)]
    pub component_fraction: f64,

    /// Number of top correlated pairs to report
    #[builder(default = DEFAULT_PAIR_LIMIT)]
    pub pair_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AnalysisSettings {
    /// Threshold above which an eigenvalue contributes to the
    /// pseudo-inverse covariance and to contribution scores.
    pub fn significance_threshold(&self, max_eigenvalue: f64) -> f64 {
        EIGENVALUE_FLOOR.max(max_eigenvalue * self.eigenvalue_cutoff)
    }

    /// Threshold below which an eigenvalue counts as near-null.
    pub fn null_threshold(&self, max_eigenvalue: f64) -> f64 {
        EIGENVALUE_FLOOR.max(max_eigenvalue.abs() * self.nullspace_cutoff)
    }

    /// Contribution score below which a parameter is unidentifiable.
    pub fn contribution_threshold(&self, max_eigenvalue: f64) -> f64 {
        max_eigenvalue * self.contribution_cutoff
    }
}
