//! Correlation Ranking Module
//!
//! Extracts the most strongly correlated parameter pairs from the
//! normalized correlation matrix. Pairs are ranked by absolute
//! correlation magnitude; ties keep the i < j enumeration order via a
//! stable sort, so the ranking is deterministic.

use itertools::Itertools;
use nalgebra::DMatrix;
use serde::Serialize;

/// A pair of parameters and their correlation estimate.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub correlation: f64,
}

/// Returns the top `limit` parameter pairs by absolute correlation,
/// descending.
///
/// `parameters` must be index-aligned with the correlation matrix.
pub fn top_correlated_pairs(
    correlations: &DMatrix<f64>,
    parameters: &[String],
    limit: usize,
) -> Vec<CorrelationPair> {
    let mut pairs = (0..parameters.len())
        .tuple_combinations()
        .map(|(i, j)| CorrelationPair {
            first: parameters[i].clone(),
            second: parameters[j].clone(),
            correlation: correlations[(i, j)],
        })
        .collect::<Vec<_>>();

    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs.truncate(limit);

    pairs
}
