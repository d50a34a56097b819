//! Weight sensitivity of the TOPSIS ranking.
//!
//! One criterion's weight is swept over an evenly spaced grid while the other
//! weights absorb the difference in proportion to their base share. The matrix
//! is normalized once; each grid point only re-runs the weight-dependent TOPSIS
//! steps.

use indexmap::IndexMap;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::SensitivityConfig;
use crate::core::criteria::{Direction, WeightVector};
use crate::core::errors::{McdmError, Result};
use crate::core::matrix::DecisionMatrix;
use crate::core::normalization::vector_normalize;
use crate::core::statistics::population_std;
use crate::rankers::ordinal_ranks;
use crate::rankers::topsis::TopsisRanker;

/// Scores and ranks of every alternative along one criterion's weight sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSweep {
    /// Criterion whose weight was varied
    pub criterion: String,
    /// Sampled weights of that criterion
    pub weight_values: Vec<f64>,
    /// Rank of each alternative at every sample point
    pub rankings: IndexMap<String, Vec<usize>>,
    /// TOPSIS score of each alternative at every sample point
    pub scores: IndexMap<String, Vec<f64>>,
}

impl CriterionSweep {
    /// Rank 1 alternative at every sample point
    pub fn leaders(&self) -> Vec<&str> {
        (0..self.weight_values.len())
            .map(|step| {
                self.rankings
                    .iter()
                    .find(|(_, ranks)| ranks[step] == 1)
                    .map(|(name, _)| name.as_str())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Sample points where the leader differs from the previous point's leader
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        let leaders = self.leaders();
        leaders
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(i, pair)| Breakpoint {
                weight: self.weight_values[i + 1],
                previous_leader: pair[0].to_string(),
                new_leader: pair[1].to_string(),
                criterion: self.criterion.clone(),
            })
            .collect()
    }
}

/// A weight at which the leading alternative changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// First sampled weight with the new leader
    pub weight: f64,
    /// Leader at the previous sample point
    pub previous_leader: String,
    /// Leader from this point on
    pub new_leader: String,
    /// Criterion being varied
    pub criterion: String,
}

/// Full sensitivity report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// Weights the sweeps start from
    pub base_weights: WeightVector,
    /// One sweep per criterion
    pub sensitivity_results: IndexMap<String, CriterionSweep>,
    /// Rank stability of each alternative in [0, 1]
    pub stability_indices: IndexMap<String, f64>,
    /// Leader changes, only for criteria that have any
    pub breakpoints: IndexMap<String, Vec<Breakpoint>>,
}

/// Replace one criterion's weight and rescale the others to keep the sum at 1.
///
/// Each other criterion keeps its share of the remainder `1 - new_weight`. If
/// the other criteria have no base weight at all, the remainder is split
/// equally among them.
pub fn redistribute_weights(base: &[f64], varied: usize, new_weight: f64) -> Vec<f64> {
    let others_total: f64 = base
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != varied)
        .map(|(_, w)| w)
        .sum();
    let n_others = base.len().saturating_sub(1);
    let remainder = 1.0 - new_weight;

    let mut weights: Vec<f64> = base
        .iter()
        .enumerate()
        .map(|(j, &w)| {
            if j == varied {
                new_weight
            } else if others_total > 0.0 {
                w * remainder / others_total
            } else {
                remainder / n_others as f64
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    }
    weights
}

/// Evenly spaced weights over the configured range
pub fn weight_grid(config: &SensitivityConfig, steps: usize) -> Vec<f64> {
    Array1::linspace(config.min_weight, config.max_weight, steps).to_vec()
}

/// Sweeps criterion weights and reports rank stability and leader changes
#[derive(Debug)]
pub struct SensitivityAnalyzer<'a> {
    matrix: &'a DecisionMatrix,
    base_weights: WeightVector,
    config: SensitivityConfig,
    normalized: Array2<f64>,
    directions: Vec<Direction>,
}

impl<'a> SensitivityAnalyzer<'a> {
    /// Prepare an analyzer; weights and sweep settings are validated here
    pub fn new(
        matrix: &'a DecisionMatrix,
        base_weights: WeightVector,
        config: SensitivityConfig,
    ) -> Result<Self> {
        base_weights.validate(matrix.criteria())?;
        config.validate()?;

        Ok(Self {
            normalized: vector_normalize(matrix.values()),
            directions: matrix.criteria().directions(),
            matrix,
            base_weights,
            config,
        })
    }

    /// Sweep one criterion's weight over `steps` evenly spaced points
    pub fn vary_single_criterion(&self, criterion: &str, steps: usize) -> Result<CriterionSweep> {
        let varied = self.matrix.criteria().index_of(criterion).ok_or_else(|| {
            McdmError::invalid_weight_for(criterion, format!("Unknown criterion '{criterion}'"))
        })?;
        if steps < 2 {
            return Err(McdmError::config_field(
                format!("A weight sweep needs at least 2 steps, got {steps}"),
                "sensitivity.steps",
            ));
        }

        let base = self.base_weights.to_array(self.matrix.criteria()).to_vec();
        let names = self.matrix.names();
        let mut rankings: IndexMap<String, Vec<usize>> = names
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(steps)))
            .collect();
        let mut scores: IndexMap<String, Vec<f64>> = names
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(steps)))
            .collect();

        let weight_values = weight_grid(&self.config, steps);
        for &weight in &weight_values {
            let weights = Array1::from(redistribute_weights(&base, varied, weight));
            let step_scores =
                TopsisRanker::evaluate_normalized(&self.normalized, &self.directions, &weights).scores;
            let step_scores = step_scores.to_vec();
            let ranks = ordinal_ranks(&step_scores);

            for (row, (&score, rank)) in step_scores.iter().zip(ranks).enumerate() {
                scores[row].push(score);
                rankings[row].push(rank);
            }
        }

        debug!(criterion, steps, "Weight sweep complete");
        Ok(CriterionSweep {
            criterion: criterion.to_string(),
            weight_values,
            rankings,
            scores,
        })
    }

    /// Sweep every criterion with the same number of steps
    pub fn sweep_all(&self, steps: usize) -> Result<IndexMap<String, CriterionSweep>> {
        let criteria: Vec<&str> = self.matrix.criteria().names().collect();
        let sweeps: Vec<CriterionSweep> = if self.config.parallel {
            criteria
                .par_iter()
                .map(|criterion| self.vary_single_criterion(criterion, steps))
                .collect::<Result<_>>()?
        } else {
            criteria
                .iter()
                .map(|criterion| self.vary_single_criterion(criterion, steps))
                .collect::<Result<_>>()?
        };

        Ok(sweeps
            .into_iter()
            .map(|sweep| (sweep.criterion.clone(), sweep))
            .collect())
    }

    /// Rank stability of every alternative.
    ///
    /// `max(0, 1 - mean_std / reference_std)` where `mean_std` averages the
    /// population std of the alternative's rank over each criterion sweep and
    /// `reference_std = sqrt((N² - 1) / 12)` is the std of ranks spread
    /// uniformly over `1..=N`. A lone alternative is perfectly stable.
    pub fn stability_indices(&self) -> Result<IndexMap<String, f64>> {
        let sweeps = self.sweep_all(self.config.stability_steps)?;
        Ok(stability_from_sweeps(self.matrix.names(), &sweeps))
    }

    /// Leader changes for one criterion, sampled at the breakpoint resolution
    pub fn identify_breakpoints(&self, criterion: &str) -> Result<Vec<Breakpoint>> {
        Ok(self
            .vary_single_criterion(criterion, self.config.breakpoint_steps)?
            .breakpoints())
    }

    /// Sweep every criterion and assemble the full report
    pub fn analyze(&self) -> Result<SensitivityReport> {
        info!(
            alternatives = self.matrix.n_alternatives(),
            criteria = self.matrix.n_criteria(),
            "Starting sensitivity analysis"
        );

        let sensitivity_results = self.sweep_all(self.config.steps)?;
        let stability_indices = self.stability_indices()?;

        let mut breakpoints = IndexMap::new();
        for (criterion, sweep) in self.sweep_all(self.config.breakpoint_steps)? {
            let found = sweep.breakpoints();
            if !found.is_empty() {
                breakpoints.insert(criterion, found);
            }
        }

        info!(
            breakpoint_criteria = breakpoints.len(),
            "Sensitivity analysis complete"
        );
        Ok(SensitivityReport {
            base_weights: self.base_weights.clone(),
            sensitivity_results,
            stability_indices,
            breakpoints,
        })
    }
}

fn stability_from_sweeps(
    names: &[String],
    sweeps: &IndexMap<String, CriterionSweep>,
) -> IndexMap<String, f64> {
    let n = names.len() as f64;
    let reference_std = ((n * n - 1.0) / 12.0).sqrt();

    names
        .iter()
        .map(|name| {
            if names.len() < 2 {
                return (name.clone(), 1.0);
            }
            let stds: Vec<f64> = sweeps
                .values()
                .filter_map(|sweep| sweep.rankings.get(name))
                .map(|ranks| {
                    let ranks: Vec<f64> = ranks.iter().map(|&r| r as f64).collect();
                    population_std(&ranks)
                })
                .collect();
            let mean_std = stds.iter().sum::<f64>() / stds.len().max(1) as f64;
            (name.clone(), (1.0 - mean_std / reference_std).max(0.0))
        })
        .collect()
}

#[cfg(test)]
#[path = "sensitivity_tests.rs"]
mod tests;
