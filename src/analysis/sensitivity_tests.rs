use super::*;
use crate::core::criteria::{CriteriaSet, COST, CPU_USAGE, MEMORY_USAGE, PERFORMANCE, RESPONSE_TIME};
use crate::core::matrix::Alternative;
use approx::assert_abs_diff_eq;

fn instance(name: &str, values: [f64; 5]) -> Alternative {
    Alternative::new(
        name,
        [PERFORMANCE, RESPONSE_TIME, CPU_USAGE, MEMORY_USAGE, COST]
            .into_iter()
            .zip(values),
    )
}

/// `lean` wins on everything but throughput, `fast` only on throughput
fn tradeoff_matrix() -> DecisionMatrix {
    DecisionMatrix::from_alternatives(
        vec![
            instance("lean", [100.0, 0.02, 20.0, 15.0, 0.01]),
            instance("balanced", [300.0, 0.05, 40.0, 30.0, 0.03]),
            instance("fast", [600.0, 0.09, 60.0, 50.0, 0.05]),
        ],
        CriteriaSet::default(),
    )
    .unwrap()
}

fn dominated_matrix() -> DecisionMatrix {
    DecisionMatrix::from_alternatives(
        vec![
            instance("best", [500.0, 0.02, 20.0, 15.0, 0.01]),
            instance("mid", [300.0, 0.05, 40.0, 30.0, 0.03]),
            instance("worst", [100.0, 0.09, 60.0, 50.0, 0.05]),
        ],
        CriteriaSet::default(),
    )
    .unwrap()
}

#[test]
fn redistribution_keeps_proportions_and_sum() {
    let base = [0.35, 0.25, 0.15, 0.15, 0.10];
    let weights = redistribute_weights(&base, 0, 0.7);

    assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(weights[0], 0.7, epsilon = 1e-12);
    // others share 0.3 in the ratio 0.25 : 0.15 : 0.15 : 0.10
    assert_abs_diff_eq!(weights[1], 0.3 * 0.25 / 0.65, epsilon = 1e-12);
    assert_abs_diff_eq!(weights[1] / weights[4], 2.5, epsilon = 1e-12);
}

#[test]
fn redistribution_splits_equally_when_others_have_no_weight() {
    let weights = redistribute_weights(&[1.0, 0.0, 0.0], 0, 0.4);
    assert_abs_diff_eq!(weights[0], 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(weights[1], 0.3, epsilon = 1e-12);
    assert_abs_diff_eq!(weights[2], 0.3, epsilon = 1e-12);
}

#[test]
fn weight_grid_spans_configured_range() {
    let grid = weight_grid(&SensitivityConfig::default(), 20);
    assert_eq!(grid.len(), 20);
    assert_abs_diff_eq!(grid[0], 0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(grid[19], 0.70, epsilon = 1e-12);
    assert!(grid.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn sweep_records_every_alternative_at_every_step() {
    let matrix = tradeoff_matrix();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    let sweep = analyzer.vary_single_criterion(PERFORMANCE, 20).unwrap();

    assert_eq!(sweep.weight_values.len(), 20);
    for name in matrix.names() {
        assert_eq!(sweep.rankings[name.as_str()].len(), 20);
        assert_eq!(sweep.scores[name.as_str()].len(), 20);
    }
    for step in 0..20 {
        let mut ranks: Vec<usize> = sweep.rankings.values().map(|r| r[step]).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}

#[test]
fn performance_sweep_finds_leader_change() {
    let matrix = tradeoff_matrix();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    let breakpoints = analyzer.identify_breakpoints(PERFORMANCE).unwrap();

    assert_eq!(breakpoints.len(), 1);
    let breakpoint = &breakpoints[0];
    assert_eq!(breakpoint.previous_leader, "lean");
    assert_eq!(breakpoint.new_leader, "fast");
    assert_eq!(breakpoint.criterion, PERFORMANCE);
    assert!(breakpoint.weight > 0.05 && breakpoint.weight < 0.70);
}

#[test]
fn dominated_ranking_is_perfectly_stable() {
    let matrix = dominated_matrix();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    let report = analyzer.analyze().unwrap();

    for index in report.stability_indices.values() {
        assert_abs_diff_eq!(*index, 1.0, epsilon = 1e-12);
    }
    assert!(report.breakpoints.is_empty());
    assert_eq!(report.sensitivity_results.len(), 5);
    assert_eq!(report.sensitivity_results[PERFORMANCE].weight_values.len(), 20);
}

#[test]
fn stability_indices_are_bounded_and_deterministic() {
    let matrix = tradeoff_matrix();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();

    let first = analyzer.stability_indices().unwrap();
    let second = analyzer.stability_indices().unwrap();
    assert_eq!(first, second);
    for index in first.values() {
        assert!((0.0..=1.0).contains(index));
    }
    assert!(first["lean"] < 1.0);
}

#[test]
fn sequential_and_parallel_sweeps_agree() {
    let matrix = tradeoff_matrix();
    let parallel =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    let sequential = SensitivityAnalyzer::new(
        &matrix,
        WeightVector::default(),
        SensitivityConfig {
            parallel: false,
            ..SensitivityConfig::default()
        },
    )
    .unwrap();

    assert_eq!(parallel.analyze().unwrap(), sequential.analyze().unwrap());
}

#[test]
fn single_alternative_is_stable() {
    let matrix = DecisionMatrix::from_alternatives(
        vec![instance("only", [100.0, 0.05, 40.0, 30.0, 0.01])],
        CriteriaSet::default(),
    )
    .unwrap();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    assert_eq!(analyzer.stability_indices().unwrap()["only"], 1.0);
}

#[test]
fn unknown_criterion_is_rejected() {
    let matrix = tradeoff_matrix();
    let analyzer =
        SensitivityAnalyzer::new(&matrix, WeightVector::default(), SensitivityConfig::default()).unwrap();
    let err = analyzer.vary_single_criterion("disk_io", 10).unwrap_err();
    assert!(matches!(err, McdmError::InvalidWeights { .. }));
}
