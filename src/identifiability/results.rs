//! Analysis Results Module
//!
//! This module provides the [`AnalysisReport`] aggregate returned by the
//! pipeline, its console rendering, and JSON export. The rendering
//! covers eigenvalues, both condition numbers, the identifiable and
//! unidentifiable partition, near-null modes with per-parameter
//! loadings, the top correlated pairs, and the correlation matrix.

use std::collections::HashMap;
use std::fmt::{self, Display};

use colored::Colorize;
use nalgebra::DMatrix;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use super::{
    classify::IdentifiabilitySummary, correlation::CorrelationPair,
    decomposition::FimDecomposition, jacobian::SensitivityMatrix,
};

/// Complete results of one identifiability analysis run.
///
/// Everything is derived in a single pass from one base parameter
/// snapshot and one time-grid configuration; a new run recomputes all of
/// it from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Parameter names, in Jacobian column order
    pub parameters: Vec<String>,
    /// Observable names, in row-block order
    pub observables: Vec<String>,
    /// Base parameter snapshot the run was performed at
    pub base_values: HashMap<String, f64>,
    /// The sensitivity matrix the FIM was built from
    pub sensitivity: SensitivityMatrix,
    /// FIM eigendecomposition, covariance and correlations
    pub decomposition: FimDecomposition,
    /// Identifiable/unidentifiable partition and nullspace combinations
    pub identifiability: IdentifiabilitySummary,
    /// Ranked most strongly correlated parameter pairs
    pub correlated_pairs: Vec<CorrelationPair>,
}

impl AnalysisReport {
    /// Serializes the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FIM eigenvalues (descending):")?;
        for (idx, value) in self.decomposition.eigenvalues.iter().enumerate() {
            writeln!(f, "  λ{}: {:.6e}", idx + 1, value)?;
        }
        writeln!(f)?;

        writeln!(f, "Condition number (raw / regularized):")?;
        writeln!(
            f,
            "  {:.6e} / {:.6e}",
            self.decomposition.condition_number, self.decomposition.regularized_condition
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Identifiable parameters: {}",
            join_or_none(&self.identifiability.identifiable).green()
        )?;
        writeln!(
            f,
            "Unidentifiable parameters: {}",
            join_or_none(&self.identifiability.unidentifiable).red()
        )?;
        writeln!(f)?;

        if !self.identifiability.nullspace_combinations.is_empty() {
            writeln!(
                f,
                "Near-null eigenvectors (suggesting unidentifiable combinations):"
            )?;
            for (mode, combination) in self.identifiability.nullspace_combinations.iter().enumerate()
            {
                writeln!(f, "  Mode {} (λ = {:.6e}):", mode + 1, combination.eigenvalue)?;
                for component in &combination.components {
                    writeln!(f, "    {}: {:.4}", component.parameter, component.loading)?;
                }
            }
            writeln!(f)?;
        }

        if !self.correlated_pairs.is_empty() {
            writeln!(f, "Top correlated parameter pairs:")?;
            for pair in &self.correlated_pairs {
                writeln!(
                    f,
                    "  {} vs {}: corr = {:.4}",
                    pair.first, pair.second, pair.correlation
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Correlation matrix:")?;
        writeln!(
            f,
            "{}",
            matrix_table(&self.decomposition.correlations, &self.parameters)
        )?;
        writeln!(f)?;

        writeln!(f, "FIM matrix:")?;
        writeln!(f, "{}", matrix_table(&self.decomposition.fim, &self.parameters))?;

        if self.sensitivity.non_finite_entries > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "{}",
                format!(
                    "Warning: {} non-finite sensitivity entries were replaced by zero; \
                     the perturbation region may be unstable",
                    self.sensitivity.non_finite_entries
                )
                .yellow()
            )?;
        }

        Ok(())
    }
}

/// Renders a square parameter-indexed matrix as a labelled table.
fn matrix_table(matrix: &DMatrix<f64>, parameters: &[String]) -> String {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(parameters.iter().cloned());
    builder.push_record(header);

    for (i, name) in parameters.iter().enumerate() {
        let mut record = vec![name.clone()];
        for j in 0..parameters.len() {
            record.push(format!("{:.3e}", matrix[(i, j)]));
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
