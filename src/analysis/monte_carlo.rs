//! Monte Carlo validation of the TOPSIS ranking under random weights.
//!
//! Weight vectors are drawn from a symmetric Dirichlet distribution, so every
//! draw is non-negative and sums to one. All draws are taken from a single
//! ChaCha8 stream before any trial runs; trials are then independent and may be
//! evaluated on the rayon pool without changing the result for a given seed.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Dirichlet, Distribution};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::MonteCarloConfig;
use crate::core::criteria::Direction;
use crate::core::errors::{McdmError, Result};
use crate::core::matrix::DecisionMatrix;
use crate::core::normalization::vector_normalize;
use crate::core::statistics::{
    independent_t_test, one_way_anova, shapiro_wilk, t_confidence_interval, ConfidenceInterval,
    SampleSummary,
};
use crate::rankers::ordinal_ranks;
use crate::rankers::topsis::TopsisRanker;

/// Aggregated simulation outcome for one alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeStatistics {
    /// Mean TOPSIS score
    pub mean_score: f64,
    /// Population standard deviation of the score
    pub std_score: f64,
    /// Median score
    pub median_score: f64,
    /// t-based interval for the mean score
    pub confidence_interval: ConfidenceInterval,
    /// Share of trials at each observed rank
    pub rank_distribution: BTreeMap<usize, f64>,
    /// Share of trials ranked first
    pub probability_best: f64,
    /// Average rank over all trials
    pub mean_rank: f64,
}

/// Shapiro–Wilk result for one alternative's scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityCheck {
    /// W statistic
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Observations tested (capped)
    pub sample_size: usize,
    /// Whether normality is not rejected at the significance level
    pub is_normal: bool,
}

/// One-way ANOVA across all alternatives' scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaCheck {
    /// F statistic; absent when every score distribution is constant
    pub f_statistic: Option<f64>,
    /// p-value
    pub p_value: f64,
    /// Between-group degrees of freedom
    pub df_between: usize,
    /// Within-group degrees of freedom
    pub df_within: usize,
    /// Whether the mean scores differ at the significance level
    pub significant_difference: bool,
}

/// Independent t-test between two alternatives' scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseCheck {
    /// t statistic; absent when both score distributions are constant
    pub t_statistic: Option<f64>,
    /// Two-sided p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub df: usize,
    /// Whether the difference is significant
    pub significant: bool,
}

/// Significance tests over the simulated scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalTests {
    /// Normality of each alternative's scores
    pub normality: IndexMap<String, NormalityCheck>,
    /// Only run with more than two alternatives
    pub anova: Option<AnovaCheck>,
    /// Every pair of alternatives, keyed `"A_vs_B"`
    pub pairwise: IndexMap<String, PairwiseCheck>,
}

/// Full Monte Carlo report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    /// Number of weight draws
    pub num_simulations: usize,
    /// Confidence level of the intervals
    pub confidence_level: f64,
    /// Seed used, when fixed
    pub seed: Option<u64>,
    /// Per alternative statistics
    pub alternatives: IndexMap<String, AlternativeStatistics>,
    /// Share of trials won by each alternative
    pub winner_distribution: IndexMap<String, f64>,
    /// Normality, ANOVA and pairwise tests
    pub statistical_tests: StatisticalTests,
}

impl MonteCarloReport {
    /// Alternative with the highest probability of ranking first
    pub fn most_likely_winner(&self) -> Option<&str> {
        self.winner_distribution
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.as_str())
    }
}

struct Trial {
    scores: Vec<f64>,
    ranks: Vec<usize>,
}

/// Re-ranks a decision matrix under many random weight vectors
#[derive(Debug, Clone)]
pub struct MonteCarloValidator {
    config: MonteCarloConfig,
}

impl MonteCarloValidator {
    /// Create a validator; the configuration is validated here
    pub fn new(config: MonteCarloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Simulation settings
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Draw `num_simulations` weight vectors over `n_criteria` criteria
    pub fn draw_weights(&self, n_criteria: usize) -> Result<Vec<Array1<f64>>> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let count = self.config.num_simulations;

        match n_criteria {
            0 => Err(McdmError::invalid_weights("No criteria to draw weights for")),
            1 => Ok(vec![Array1::ones(1); count]),
            _ => {
                let dirichlet = Dirichlet::new_with_size(self.config.dirichlet_alpha, n_criteria)
                    .map_err(|e| {
                        McdmError::math_with_context(e.to_string(), "Dirichlet weight sampling")
                    })?;
                (0..count)
                    .map(|_| draw_simplex_point(&dirichlet, &mut rng))
                    .collect()
            }
        }
    }

    /// Run the simulation and aggregate scores, ranks and significance tests
    pub fn run(&self, matrix: &DecisionMatrix) -> Result<MonteCarloReport> {
        let k = self.config.num_simulations;
        info!(
            simulations = k,
            alternatives = matrix.n_alternatives(),
            seed = ?self.config.seed,
            "Starting Monte Carlo validation"
        );

        let draws = self.draw_weights(matrix.n_criteria())?;
        let normalized = vector_normalize(matrix.values());
        let directions = matrix.criteria().directions();

        let trials: Vec<Trial> = if self.config.parallel {
            draws
                .par_iter()
                .map(|weights| run_trial(&normalized, &directions, weights))
                .collect()
        } else {
            draws
                .iter()
                .map(|weights| run_trial(&normalized, &directions, weights))
                .collect()
        };
        debug!(trials = trials.len(), "Monte Carlo trials evaluated");

        let names = matrix.names();
        let scores_by_alternative: Vec<Vec<f64>> = (0..names.len())
            .map(|row| trials.iter().map(|t| t.scores[row]).collect())
            .collect();
        let ranks_by_alternative: Vec<Vec<usize>> = (0..names.len())
            .map(|row| trials.iter().map(|t| t.ranks[row]).collect())
            .collect();

        let mut alternatives = IndexMap::with_capacity(names.len());
        let mut winner_distribution = IndexMap::with_capacity(names.len());
        for (row, name) in names.iter().enumerate() {
            let stats = self.summarize(&scores_by_alternative[row], &ranks_by_alternative[row])?;
            winner_distribution.insert(name.clone(), stats.probability_best);
            alternatives.insert(name.clone(), stats);
        }

        let statistical_tests = self.significance_tests(names, &scores_by_alternative)?;

        let report = MonteCarloReport {
            num_simulations: k,
            confidence_level: self.config.confidence_level,
            seed: self.config.seed,
            alternatives,
            winner_distribution,
            statistical_tests,
        };
        info!(
            winner = report.most_likely_winner().unwrap_or_default(),
            "Monte Carlo validation complete"
        );
        Ok(report)
    }

    fn summarize(&self, scores: &[f64], ranks: &[usize]) -> Result<AlternativeStatistics> {
        let k = scores.len() as f64;
        let summary = SampleSummary::from_values(scores);
        let confidence_interval = t_confidence_interval(&summary, self.config.confidence_level)?;

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for &rank in ranks {
            *counts.entry(rank).or_default() += 1;
        }
        let rank_distribution: BTreeMap<usize, f64> = counts
            .into_iter()
            .map(|(rank, count)| (rank, count as f64 / k))
            .collect();
        let probability_best = rank_distribution.get(&1).copied().unwrap_or(0.0);
        let mean_rank = ranks.iter().sum::<usize>() as f64 / k;

        Ok(AlternativeStatistics {
            mean_score: summary.mean,
            std_score: summary.std_dev,
            median_score: summary.median,
            confidence_interval,
            rank_distribution,
            probability_best,
            mean_rank,
        })
    }

    fn significance_tests(&self, names: &[String], scores: &[Vec<f64>]) -> Result<StatisticalTests> {
        let alpha = self.config.significance_level;

        let mut normality = IndexMap::with_capacity(names.len());
        for (name, sample) in names.iter().zip(scores) {
            let capped = &sample[..sample.len().min(self.config.normality_sample_cap)];
            let result = shapiro_wilk(capped)?;
            normality.insert(
                name.clone(),
                NormalityCheck {
                    statistic: result.statistic,
                    p_value: result.p_value,
                    sample_size: capped.len(),
                    is_normal: result.p_value > alpha,
                },
            );
        }

        let anova = if names.len() > 2 {
            let groups: Vec<&[f64]> = scores.iter().map(Vec::as_slice).collect();
            let outcome = one_way_anova(&groups)?;
            Some(AnovaCheck {
                f_statistic: outcome.f_statistic,
                p_value: outcome.p_value,
                df_between: outcome.df_between,
                df_within: outcome.df_within,
                significant_difference: outcome.p_value < alpha,
            })
        } else {
            None
        };

        let mut pairwise = IndexMap::new();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let outcome = independent_t_test(&scores[i], &scores[j])?;
                pairwise.insert(
                    format!("{}_vs_{}", names[i], names[j]),
                    PairwiseCheck {
                        t_statistic: outcome.t_statistic,
                        p_value: outcome.p_value,
                        df: outcome.df,
                        significant: outcome.p_value < alpha,
                    },
                );
            }
        }

        Ok(StatisticalTests {
            normality,
            anova,
            pairwise,
        })
    }
}

/// Redraws allowed for one weight vector before sampling gives up
const MAX_REDRAWS: usize = 64;

/// One Dirichlet draw with only finite components.
///
/// With a small concentration every gamma variate can underflow to zero and
/// the normalized draw comes back as NaN or infinity; such draws are discarded.
fn draw_simplex_point(dirichlet: &Dirichlet<f64>, rng: &mut ChaCha8Rng) -> Result<Array1<f64>> {
    for _ in 0..MAX_REDRAWS {
        let draw = dirichlet.sample(rng);
        if draw.iter().all(|w| w.is_finite()) {
            return Ok(Array1::from(draw));
        }
    }
    Err(McdmError::math_with_context(
        format!("no finite weight vector after {MAX_REDRAWS} draws"),
        "Dirichlet weight sampling",
    ))
}

fn run_trial(normalized: &Array2<f64>, directions: &[Direction], weights: &Array1<f64>) -> Trial {
    let scores = TopsisRanker::evaluate_normalized(normalized, directions, weights)
        .scores
        .to_vec();
    let ranks = ordinal_ranks(&scores);
    Trial { scores, ranks }
}

#[cfg(test)]
#[path = "monte_carlo_tests.rs"]
mod tests;
