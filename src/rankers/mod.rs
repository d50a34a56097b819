//! Ranking strategies.
//!
//! TOPSIS, SAW and WPM all take a [`DecisionMatrix`] and a [`WeightVector`] and
//! produce a [`RankingOutcome`]. They share the [`Ranker`] trait so the method
//! comparison can drive them uniformly.

pub mod saw;
pub mod topsis;
pub mod wpm;

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::criteria::WeightVector;
use crate::core::errors::Result;
use crate::core::matrix::{DecisionMatrix, Measurements};

pub use saw::SawRanker;
pub use topsis::TopsisRanker;
pub use wpm::WpmRanker;

/// Available ranking methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankingMethod {
    /// Technique for Order of Preference by Similarity to Ideal Solution
    #[serde(rename = "TOPSIS")]
    Topsis,
    /// Simple Additive Weighting
    #[serde(rename = "SAW")]
    Saw,
    /// Weighted Product Model
    #[serde(rename = "WPM")]
    Wpm,
}

impl RankingMethod {
    /// All methods in comparison order
    pub const ALL: [RankingMethod; 3] = [Self::Topsis, Self::Saw, Self::Wpm];

    /// Upper-case method label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topsis => "TOPSIS",
            Self::Saw => "SAW",
            Self::Wpm => "WPM",
        }
    }

    /// Ranker implementing this method
    pub fn ranker(self) -> Box<dyn Ranker> {
        match self {
            Self::Topsis => Box::new(TopsisRanker),
            Self::Saw => Box::new(SawRanker),
            Self::Wpm => Box::new(WpmRanker),
        }
    }
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring strategy over a decision matrix.
///
/// Implementors only provide [`Ranker::scores`]; weight validation, ordinal
/// ranking and result assembly are shared through [`Ranker::optimize`].
pub trait Ranker: Send + Sync {
    /// Method implemented by this ranker
    fn method(&self) -> RankingMethod;

    /// Score every alternative (higher is better), in matrix row order.
    ///
    /// `weights` are already validated against the matrix criteria.
    fn scores(&self, matrix: &DecisionMatrix, weights: &Array1<f64>) -> Array1<f64>;

    /// Validate weights, score and rank the alternatives
    fn optimize(&self, matrix: &DecisionMatrix, weights: &WeightVector) -> Result<RankingOutcome> {
        weights.validate(matrix.criteria())?;
        let weight_array = weights.to_array(matrix.criteria());
        let scores = self.scores(matrix, &weight_array);
        Ok(RankingOutcome::from_scores(
            self.method(),
            matrix,
            weights,
            &scores,
        ))
    }
}

/// Score and rank of one alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Alternative name
    pub alternative: String,
    /// Method score (higher is better)
    pub score: f64,
    /// 1-based rank
    pub rank: usize,
    /// Measured values as supplied
    pub criteria: Measurements,
}

/// Short verdict attached to every ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Rank 1 alternative
    pub best_alternative: String,
    /// Its score
    pub score: f64,
    /// Rank 2 alternative, when there is one
    pub runner_up: Option<String>,
    /// Score lead over the runner-up
    pub margin: Option<f64>,
}

/// Full output of one ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Method that produced the scores
    pub method: RankingMethod,
    /// Weights the scores were computed with
    pub criteria_weights: WeightVector,
    /// Results sorted by rank
    pub results: Vec<RankedResult>,
    /// Name of the rank 1 alternative
    pub best_alternative: String,
    /// Best alternative with its lead over the runner-up
    pub recommendation: Recommendation,
}

impl RankingOutcome {
    /// Assemble an outcome from per-row scores
    pub fn from_scores(
        method: RankingMethod,
        matrix: &DecisionMatrix,
        weights: &WeightVector,
        scores: &Array1<f64>,
    ) -> Self {
        let order = ordinal_order(&scores.to_vec());
        let results: Vec<RankedResult> = order
            .iter()
            .enumerate()
            .map(|(position, &row)| RankedResult {
                alternative: matrix.names()[row].clone(),
                score: scores[row],
                rank: position + 1,
                criteria: matrix.measurements(row).clone(),
            })
            .collect();

        let best = &results[0];
        let runner_up = results.get(1);
        let recommendation = Recommendation {
            best_alternative: best.alternative.clone(),
            score: best.score,
            runner_up: runner_up.map(|r| r.alternative.clone()),
            margin: runner_up.map(|r| best.score - r.score),
        };

        Self {
            method,
            criteria_weights: weights.clone(),
            best_alternative: best.alternative.clone(),
            recommendation,
            results,
        }
    }

    /// Rank of an alternative, if present
    pub fn rank_of(&self, alternative: &str) -> Option<usize> {
        self.results
            .iter()
            .find(|r| r.alternative == alternative)
            .map(|r| r.rank)
    }

    /// Score of an alternative, if present
    pub fn score_of(&self, alternative: &str) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.alternative == alternative)
            .map(|r| r.score)
    }
}

/// Row indices sorted by descending score; equal scores keep input order.
pub fn ordinal_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// 1-based rank of every row, in row order.
pub fn ordinal_ranks(scores: &[f64]) -> Vec<usize> {
    let mut ranks = vec![0; scores.len()];
    for (position, row) in ordinal_order(scores).into_iter().enumerate() {
        ranks[row] = position + 1;
    }
    ranks
}
