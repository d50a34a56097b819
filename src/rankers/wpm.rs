//! Weighted Product Model.
//!
//! Scores are `Π value^w` over benefit criteria times `Π (1/value)^w` over cost
//! criteria, computed on raw values. Every value is clamped to
//! [`EPSILON`](crate::core::numeric::EPSILON) first, so zeros and negatives
//! cannot produce an infinite or NaN score.

use ndarray::{Array1, Axis};
use tracing::debug;

use super::{Ranker, RankingMethod};
use crate::core::matrix::DecisionMatrix;
use crate::core::numeric::clamp_positive;

/// WPM ranker
#[derive(Debug, Clone, Copy, Default)]
pub struct WpmRanker;

impl Ranker for WpmRanker {
    fn method(&self) -> RankingMethod {
        RankingMethod::Wpm
    }

    fn scores(&self, matrix: &DecisionMatrix, weights: &Array1<f64>) -> Array1<f64> {
        debug!(alternatives = matrix.n_alternatives(), "Running WPM");
        let directions = matrix.criteria().directions();

        matrix
            .values()
            .axis_iter(Axis(0))
            .map(|row| {
                row.iter()
                    .zip(weights.iter())
                    .zip(&directions)
                    .map(|((&value, &weight), direction)| {
                        let value = clamp_positive(value);
                        if direction.is_benefit() {
                            value.powf(weight)
                        } else {
                            value.recip().powf(weight)
                        }
                    })
                    .product::<f64>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{CriteriaSet, Criterion, WeightVector};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn two_criteria() -> CriteriaSet {
        CriteriaSet::new(vec![Criterion::benefit("throughput"), Criterion::cost("price")]).unwrap()
    }

    #[test]
    fn wpm_multiplies_weighted_powers() {
        let matrix = DecisionMatrix::from_table(
            vec!["a".to_string(), "b".to_string()],
            array![[16.0, 4.0], [9.0, 1.0]],
            two_criteria(),
        )
        .unwrap();
        let weights = WeightVector::from_pairs([("throughput", 0.5), ("price", 0.5)]);
        let outcome = WpmRanker.optimize(&matrix, &weights).unwrap();

        // a: 4 * 0.5, b: 3 * 1
        assert_relative_eq!(outcome.score_of("a").unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(outcome.score_of("b").unwrap(), 3.0, epsilon = 1e-12);
        assert_eq!(outcome.best_alternative, "b");
    }

    #[test]
    fn wpm_zero_and_negative_values_are_clamped() {
        let matrix = DecisionMatrix::from_table(
            vec!["zero".to_string(), "negative".to_string()],
            array![[0.0, 0.0], [-5.0, -1.0]],
            two_criteria(),
        )
        .unwrap();
        let weights = WeightVector::from_pairs([("throughput", 0.5), ("price", 0.5)]);
        let outcome = WpmRanker.optimize(&matrix, &weights).unwrap();

        for result in &outcome.results {
            assert!(result.score.is_finite());
            assert!(result.score > 0.0);
        }
    }

    #[test]
    fn wpm_zero_weight_criterion_is_ignored() {
        let matrix = DecisionMatrix::from_table(
            vec!["a".to_string(), "b".to_string()],
            array![[10.0, 1000.0], [20.0, 0.001]],
            two_criteria(),
        )
        .unwrap();
        let weights = WeightVector::from_pairs([("throughput", 1.0), ("price", 0.0)]);
        let outcome = WpmRanker.optimize(&matrix, &weights).unwrap();

        assert_relative_eq!(outcome.score_of("a").unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(outcome.score_of("b").unwrap(), 20.0, epsilon = 1e-12);
    }
}
