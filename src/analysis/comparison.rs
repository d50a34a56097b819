//! Cross-method agreement between TOPSIS, SAW and WPM.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::ConsensusThresholds;
use crate::core::criteria::WeightVector;
use crate::core::errors::Result;
use crate::core::matrix::DecisionMatrix;
use crate::core::statistics::kendall_tau;
use crate::rankers::{RankingMethod, RankingOutcome};

/// Qualitative agreement between the methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    /// Average correlation above the high threshold
    High,
    /// Average correlation above the medium threshold
    Medium,
    /// Anything else
    Low,
}

impl ConsensusLevel {
    /// Bucket an average rank correlation (strict inequalities)
    pub fn from_correlation(average: f64, thresholds: &ConsensusThresholds) -> Self {
        if average > thresholds.high {
            Self::High
        } else if average > thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Agreement summary across methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    /// Whether every method picked the same leader
    pub unanimous_leader: bool,
    /// Leader chosen by each method
    pub leaders: IndexMap<RankingMethod, String>,
    /// Kendall tau-b per method pair, keyed `"A_vs_B"`
    pub rank_correlations: IndexMap<String, f64>,
    /// Mean of the pairwise correlations
    pub average_correlation: f64,
    /// Bucketed average correlation
    pub consensus_level: ConsensusLevel,
}

/// Output of [`MethodComparator::compare`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    /// Full ranking of each method
    pub methods: IndexMap<RankingMethod, RankingOutcome>,
    /// Rank of every alternative under every method
    pub ranking_comparison: IndexMap<String, IndexMap<RankingMethod, usize>>,
    /// Agreement summary
    pub consensus: Consensus,
}

/// Runs every ranking method on one matrix and measures their agreement
#[derive(Debug, Clone, Default)]
pub struct MethodComparator {
    thresholds: ConsensusThresholds,
}

impl MethodComparator {
    /// Create a comparator with the given consensus thresholds
    pub fn new(thresholds: ConsensusThresholds) -> Self {
        Self { thresholds }
    }

    /// Rank with TOPSIS, SAW and WPM and compare the rankings
    pub fn compare(&self, matrix: &DecisionMatrix, weights: &WeightVector) -> Result<MethodComparison> {
        let methods = RankingMethod::ALL
            .into_iter()
            .map(|method| Ok((method, method.ranker().optimize(matrix, weights)?)))
            .collect::<Result<IndexMap<_, _>>>()?;

        let ranking_comparison: IndexMap<String, IndexMap<RankingMethod, usize>> = matrix
            .names()
            .iter()
            .map(|name| {
                let ranks = methods
                    .iter()
                    .filter_map(|(&method, outcome)| Some((method, outcome.rank_of(name)?)))
                    .collect();
                (name.clone(), ranks)
            })
            .collect();

        let consensus = self.consensus(matrix, &methods)?;
        info!(
            unanimous = consensus.unanimous_leader,
            average_correlation = consensus.average_correlation,
            "Method comparison complete"
        );

        Ok(MethodComparison {
            methods,
            ranking_comparison,
            consensus,
        })
    }

    fn consensus(
        &self,
        matrix: &DecisionMatrix,
        methods: &IndexMap<RankingMethod, RankingOutcome>,
    ) -> Result<Consensus> {
        let leaders: IndexMap<RankingMethod, String> = methods
            .iter()
            .map(|(&method, outcome)| (method, outcome.best_alternative.clone()))
            .collect();
        let unanimous_leader = leaders
            .values()
            .all(|leader| Some(leader) == leaders.values().next());

        // ranks per method in matrix row order
        let rank_vectors: Vec<(RankingMethod, Vec<f64>)> = methods
            .iter()
            .map(|(&method, outcome)| {
                let ranks = matrix
                    .names()
                    .iter()
                    .map(|name| outcome.rank_of(name).unwrap_or(0) as f64)
                    .collect();
                (method, ranks)
            })
            .collect();

        let mut rank_correlations = IndexMap::new();
        for (i, (first, first_ranks)) in rank_vectors.iter().enumerate() {
            for (second, second_ranks) in &rank_vectors[i + 1..] {
                rank_correlations.insert(
                    format!("{first}_vs_{second}"),
                    kendall_tau(first_ranks, second_ranks)?,
                );
            }
        }

        let average_correlation = if rank_correlations.is_empty() {
            1.0
        } else {
            rank_correlations.values().sum::<f64>() / rank_correlations.len() as f64
        };

        Ok(Consensus {
            unanimous_leader,
            leaders,
            rank_correlations,
            average_correlation,
            consensus_level: ConsensusLevel::from_correlation(average_correlation, &self.thresholds),
        })
    }
}
