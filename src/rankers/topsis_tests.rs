use super::*;
use crate::core::criteria::{
    CriteriaSet, Criterion, WeightVector, COST, CPU_USAGE, MEMORY_USAGE, PERFORMANCE,
    RESPONSE_TIME,
};
use crate::core::errors::McdmError;
use crate::core::matrix::Alternative;
use approx::assert_abs_diff_eq;
use ndarray::array;

fn instance(name: &str, values: [f64; 5]) -> Alternative {
    Alternative::new(
        name,
        [PERFORMANCE, RESPONSE_TIME, CPU_USAGE, MEMORY_USAGE, COST]
            .into_iter()
            .zip(values),
    )
}

fn benchmark_matrix() -> DecisionMatrix {
    DecisionMatrix::from_alternatives(
        vec![
            instance("t3.micro", [150.0, 0.080, 45.0, 35.0, 0.0104]),
            instance("t3.small", [300.0, 0.050, 35.0, 28.0, 0.0208]),
            instance("t3.medium", [520.0, 0.035, 30.0, 22.0, 0.0416]),
        ],
        CriteriaSet::default(),
    )
    .unwrap()
}

#[test]
fn test_topsis_scores_in_unit_range_and_ranks_are_permutation() {
    let matrix = benchmark_matrix();
    let outcome = TopsisRanker
        .optimize(&matrix, &WeightVector::default())
        .unwrap();

    assert_eq!(outcome.method, RankingMethod::Topsis);
    assert_eq!(outcome.results.len(), 3);
    let mut ranks: Vec<usize> = outcome.results.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);

    for pair in outcome.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for result in &outcome.results {
        assert!((0.0..=1.0).contains(&result.score));
    }
    assert_eq!(outcome.best_alternative, outcome.results[0].alternative);
}

#[test]
fn test_topsis_dominant_alternative_scores_one() {
    let matrix = DecisionMatrix::from_alternatives(
        vec![
            instance("dominant", [500.0, 0.02, 20.0, 15.0, 0.01]),
            instance("weak", [100.0, 0.09, 60.0, 50.0, 0.05]),
            instance("middle", [300.0, 0.05, 40.0, 30.0, 0.03]),
        ],
        CriteriaSet::default(),
    )
    .unwrap();

    let breakdown = TopsisRanker::breakdown(&matrix, &WeightVector::default().to_array(matrix.criteria()));
    assert_abs_diff_eq!(breakdown.distance_to_ideal[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(breakdown.scores[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(breakdown.distance_to_anti_ideal[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(breakdown.scores[1], 0.0, epsilon = 1e-12);
}

#[test]
fn test_topsis_single_alternative_ranks_first() {
    let matrix = DecisionMatrix::from_alternatives(
        vec![instance("only", [150.0, 0.08, 45.0, 35.0, 0.0104])],
        CriteriaSet::default(),
    )
    .unwrap();

    let outcome = TopsisRanker
        .optimize(&matrix, &WeightVector::default())
        .unwrap();
    assert_eq!(outcome.results[0].rank, 1);
    assert_eq!(outcome.results[0].score, 1.0);
    assert_eq!(outcome.recommendation.runner_up, None);
    assert_eq!(outcome.recommendation.margin, None);
}

#[test]
fn test_topsis_identical_alternatives_tie_by_input_order() {
    let values = [200.0, 0.05, 35.0, 30.0, 0.02];
    let matrix = DecisionMatrix::from_alternatives(
        vec![instance("A", values), instance("B", values)],
        CriteriaSet::default(),
    )
    .unwrap();

    let outcome = TopsisRanker
        .optimize(&matrix, &WeightVector::default())
        .unwrap();
    assert_eq!(outcome.results[0].alternative, "A");
    assert_eq!(outcome.results[1].alternative, "B");
    assert_eq!(outcome.results[0].score, outcome.results[1].score);
    assert_eq!(outcome.recommendation.margin, Some(0.0));
}

#[test]
fn test_topsis_rejects_invalid_weights() {
    let matrix = benchmark_matrix();
    let weights = WeightVector::from_pairs([
        (PERFORMANCE, 0.5),
        (RESPONSE_TIME, 0.5),
        (CPU_USAGE, 0.5),
        (MEMORY_USAGE, 0.0),
        (COST, 0.0),
    ]);
    let err = TopsisRanker.optimize(&matrix, &weights).unwrap_err();
    assert!(matches!(err, McdmError::InvalidWeights { .. }));

    let unknown = WeightVector::from_pairs([
        (PERFORMANCE, 0.35),
        (RESPONSE_TIME, 0.25),
        (CPU_USAGE, 0.15),
        (MEMORY_USAGE, 0.15),
        ("latency_p99", 0.10),
    ]);
    let err = TopsisRanker.optimize(&matrix, &unknown).unwrap_err();
    if let McdmError::InvalidWeights { criterion, .. } = err {
        assert_eq!(criterion.as_deref(), Some("latency_p99"));
    } else {
        panic!("Expected InvalidWeights error");
    }
}

#[test]
fn test_ideal_solutions_follow_direction() {
    let weighted = array![[1.0, 5.0], [3.0, 2.0]];
    let solutions = ideal_solutions(&weighted, &[Direction::Benefit, Direction::Cost]);
    assert_eq!(solutions.ideal, array![3.0, 2.0]);
    assert_eq!(solutions.anti_ideal, array![1.0, 5.0]);
}

#[test]
fn test_zero_norm_column_adds_no_distance() {
    let criteria = CriteriaSet::new(vec![Criterion::benefit("throughput"), Criterion::cost("idle")]).unwrap();
    let matrix = DecisionMatrix::from_table(
        vec!["x".to_string(), "y".to_string()],
        array![[10.0, 0.0], [20.0, 0.0]],
        criteria,
    )
    .unwrap();

    let breakdown = TopsisRanker::breakdown(&matrix, &array![0.5, 0.5]);
    assert!(breakdown.scores.iter().all(|s| s.is_finite()));
    assert_abs_diff_eq!(breakdown.scores[1], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(breakdown.scores[0], 0.0, epsilon = 1e-12);
}

#[test]
fn test_weighted_matrix_scales_columns() {
    let normalized = array![[0.6, 0.8], [0.8, 0.6]];
    let weighted = weighted_matrix(&normalized, &array![0.25, 0.75]);
    assert_abs_diff_eq!(weighted[[0, 0]], 0.15, epsilon = 1e-12);
    assert_abs_diff_eq!(weighted[[1, 1]], 0.45, epsilon = 1e-12);
}

#[test]
fn test_relative_closeness_only_falls_back_on_exact_zero() {
    let scores = relative_closeness(&array![0.0, 3e-12, 0.2], &array![0.0, 1e-12, 0.6]);
    assert_eq!(scores[0], 1.0);
    assert_abs_diff_eq!(scores[1], 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(scores[2], 0.75, epsilon = 1e-12);
}

#[test]
fn test_topsis_marginal_dominance_is_not_a_tie() {
    let base = [100.0, 0.05, 40.0, 30.0, 0.01];
    let mut better = base;
    better[0] = 100.0 * (1.0 + 1e-9);
    let matrix = DecisionMatrix::from_alternatives(
        vec![instance("baseline", base), instance("marginally_faster", better)],
        CriteriaSet::default(),
    )
    .unwrap();

    let outcome = TopsisRanker
        .optimize(&matrix, &WeightVector::default())
        .unwrap();

    assert_eq!(outcome.best_alternative, "marginally_faster");
    assert_eq!(outcome.score_of("marginally_faster"), Some(1.0));
    assert_eq!(outcome.score_of("baseline"), Some(0.0));
}
