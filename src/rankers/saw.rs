//! Simple Additive Weighting: weighted sum of linearly normalized values.

use ndarray::Array1;
use tracing::debug;

use super::{Ranker, RankingMethod};
use crate::core::matrix::DecisionMatrix;
use crate::core::normalization::linear_normalize;

/// SAW ranker
#[derive(Debug, Clone, Copy, Default)]
pub struct SawRanker;

impl Ranker for SawRanker {
    fn method(&self) -> RankingMethod {
        RankingMethod::Saw
    }

    fn scores(&self, matrix: &DecisionMatrix, weights: &Array1<f64>) -> Array1<f64> {
        debug!(alternatives = matrix.n_alternatives(), "Running SAW");
        let normalized = linear_normalize(matrix.values(), &matrix.criteria().directions());
        normalized.dot(weights)
    }
}
