//! Analysis Pipeline Module
//!
//! Wires the components together into a single forward pass: configure
//! the oracle, discover observables, snapshot the base parameters, build
//! the sensitivity matrix, decompose the FIM, classify identifiability,
//! and rank correlated pairs. Data flows strictly forward; nothing is
//! cached or mutated across runs.

use log::{info, warn};

use crate::simulation::{oracle::SimulationOracle, setup::SimulationSetup};

use super::{
    classify::IdentifiabilitySummary, correlation::top_correlated_pairs,
    decomposition::FimDecomposition, error::IdentifiabilityError, jacobian::SensitivityMatrix,
    results::AnalysisReport, settings::AnalysisSettings,
};

/// Runs the full identifiability analysis for the given parameter set.
///
/// The oracle is held mutably for the whole run: every perturbed
/// simulation reuses its shared state, which must be reset between calls
/// (see [`SimulationOracle::simulate`]).
///
/// # Arguments
///
/// * `oracle` - The external simulator
/// * `setup` - Time-grid and integration configuration
/// * `parameters` - Ordered parameter names to analyze; their order
///   defines the Jacobian column order and all index correspondences in
///   the report
/// * `settings` - Numerical tolerances and presentation limits
///
/// # Errors
///
/// Fails before any simulation when the oracle rejects the configuration,
/// when no observables are discoverable, or when the parameter set is
/// empty. Any oracle failure mid-run aborts the whole analysis; no
/// partial Jacobian is produced.
pub fn analyze<O: SimulationOracle>(
    oracle: &mut O,
    setup: &SimulationSetup,
    parameters: &[String],
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, IdentifiabilityError> {
    oracle.configure(setup)?;

    let observables = oracle.list_observables();
    if observables.is_empty() {
        return Err(IdentifiabilityError::NoObservables);
    }
    if parameters.is_empty() {
        return Err(IdentifiabilityError::NoParameters);
    }

    let base_values = oracle.snapshot_parameters(parameters)?;

    info!(
        "Building sensitivity matrix: {} parameters x {} observables over {} time points",
        parameters.len(),
        observables.len(),
        setup.points()
    );

    let sensitivity = SensitivityMatrix::build(
        oracle,
        setup,
        parameters,
        &observables,
        &base_values,
        settings.rel_eps,
    )?;

    if sensitivity.non_finite_entries > 0 {
        warn!(
            "{} non-finite sensitivity entries were replaced by zero; \
             the perturbation region may be unstable",
            sensitivity.non_finite_entries
        );
    }

    let decomposition = FimDecomposition::from_jacobian(&sensitivity.matrix, settings);
    if !decomposition.condition_number.is_finite() {
        warn!("FIM is numerically singular; expect unidentifiable directions");
    }

    let identifiability =
        IdentifiabilitySummary::from_decomposition(&decomposition, parameters, settings);
    let correlated_pairs =
        top_correlated_pairs(&decomposition.correlations, parameters, settings.pair_limit);

    Ok(AnalysisReport {
        parameters: parameters.to_vec(),
        observables,
        base_values,
        sensitivity,
        decomposition,
        identifiability,
        correlated_pairs,
    })
}

/// Default analysis set by naming convention: kinetic rate constants are
/// the `k_`-prefixed tunable quantities, excluding exported observables.
///
/// This is caller-level policy, not part of the core algorithm; pass an
/// explicit parameter list to [`analyze`] to override it.
pub fn kinetic_parameter_candidates<O: SimulationOracle>(oracle: &O) -> Vec<String> {
    oracle
        .list_parameters()
        .into_iter()
        .filter(|name| !name.starts_with("obs_"))
        .filter(|name| name.starts_with("k_"))
        .collect()
}
