//! TOPSIS ranking.
//!
//! The pipeline is split into its steps (normalize, weight, ideal/anti-ideal,
//! separation, closeness) so the sensitivity and Monte Carlo stages can
//! normalize once and re-run only the weight-dependent part.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use super::{Ranker, RankingMethod};
use crate::core::criteria::Direction;
use crate::core::matrix::DecisionMatrix;
use crate::core::normalization::vector_normalize;

/// Ideal and anti-ideal points of a weighted matrix
#[derive(Debug, Clone, PartialEq)]
pub struct IdealSolutions {
    /// Best weighted value per criterion
    pub ideal: Array1<f64>,
    /// Worst weighted value per criterion
    pub anti_ideal: Array1<f64>,
}

/// Every intermediate of one TOPSIS evaluation
#[derive(Debug, Clone)]
pub struct TopsisBreakdown {
    /// Weighted, vector-normalized matrix
    pub weighted: Array2<f64>,
    /// Ideal and anti-ideal points
    pub solutions: IdealSolutions,
    /// Euclidean distance of each alternative to the ideal
    pub distance_to_ideal: Array1<f64>,
    /// Euclidean distance of each alternative to the anti-ideal
    pub distance_to_anti_ideal: Array1<f64>,
    /// Relative closeness in [0, 1]
    pub scores: Array1<f64>,
}

/// Scale each normalized column by its criterion weight
pub fn weighted_matrix(normalized: &Array2<f64>, weights: &Array1<f64>) -> Array2<f64> {
    normalized * &weights.view().insert_axis(Axis(0))
}

/// Column-wise best (ideal) and worst (anti-ideal) weighted values
pub fn ideal_solutions(weighted: &Array2<f64>, directions: &[Direction]) -> IdealSolutions {
    let mut ideal = Array1::zeros(weighted.ncols());
    let mut anti_ideal = Array1::zeros(weighted.ncols());

    for (j, (column, direction)) in weighted.axis_iter(Axis(1)).zip(directions).enumerate() {
        let max = column.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let min = column.fold(f64::INFINITY, |acc, &v| acc.min(v));
        let (best, worst) = if direction.is_benefit() {
            (max, min)
        } else {
            (min, max)
        };
        ideal[j] = best;
        anti_ideal[j] = worst;
    }

    IdealSolutions { ideal, anti_ideal }
}

fn euclidean_distance(row: ArrayView1<'_, f64>, point: &Array1<f64>) -> f64 {
    row.iter()
        .zip(point.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Distances of every row to the ideal and to the anti-ideal point
pub fn separation_measures(
    weighted: &Array2<f64>,
    solutions: &IdealSolutions,
) -> (Array1<f64>, Array1<f64>) {
    let to_ideal = weighted
        .axis_iter(Axis(0))
        .map(|row| euclidean_distance(row, &solutions.ideal))
        .collect();
    let to_anti_ideal = weighted
        .axis_iter(Axis(0))
        .map(|row| euclidean_distance(row, &solutions.anti_ideal))
        .collect();
    (to_ideal, to_anti_ideal)
}

/// Relative closeness `d- / (d+ + d-)`.
///
/// When both distances are exactly zero the alternative coincides with the
/// ideal point and scores 1.0. Any nonzero separation is divided through, so
/// a dominating alternative keeps its lead however small the difference.
pub fn relative_closeness(to_ideal: &Array1<f64>, to_anti_ideal: &Array1<f64>) -> Array1<f64> {
    to_ideal
        .iter()
        .zip(to_anti_ideal.iter())
        .enumerate()
        .map(|(row, (&d_plus, &d_minus))| {
            let total = d_plus + d_minus;
            if total > 0.0 {
                d_minus / total
            } else {
                debug!(row, "Ideal and anti-ideal distances vanish, scoring 1.0");
                1.0
            }
        })
        .collect()
}

/// TOPSIS ranker
#[derive(Debug, Clone, Copy, Default)]
pub struct TopsisRanker;

impl TopsisRanker {
    /// Run the weight-dependent steps on an already normalized matrix
    pub fn evaluate_normalized(
        normalized: &Array2<f64>,
        directions: &[Direction],
        weights: &Array1<f64>,
    ) -> TopsisBreakdown {
        let weighted = weighted_matrix(normalized, weights);
        let solutions = ideal_solutions(&weighted, directions);
        let (distance_to_ideal, distance_to_anti_ideal) = separation_measures(&weighted, &solutions);
        let scores = relative_closeness(&distance_to_ideal, &distance_to_anti_ideal);

        TopsisBreakdown {
            weighted,
            solutions,
            distance_to_ideal,
            distance_to_anti_ideal,
            scores,
        }
    }

    /// Run the full pipeline and keep every intermediate
    pub fn breakdown(matrix: &DecisionMatrix, weights: &Array1<f64>) -> TopsisBreakdown {
        let normalized = vector_normalize(matrix.values());
        Self::evaluate_normalized(&normalized, &matrix.criteria().directions(), weights)
    }
}

impl Ranker for TopsisRanker {
    fn method(&self) -> RankingMethod {
        RankingMethod::Topsis
    }

    fn scores(&self, matrix: &DecisionMatrix, weights: &Array1<f64>) -> Array1<f64> {
        debug!(
            alternatives = matrix.n_alternatives(),
            criteria = matrix.n_criteria(),
            "Running TOPSIS"
        );
        Self::breakdown(matrix, weights).scores
    }
}

#[cfg(test)]
#[path = "topsis_tests.rs"]
mod tests;
