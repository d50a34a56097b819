//! Decision engine facade.

use tracing::info;

use crate::analysis::comparison::{MethodComparator, MethodComparison};
use crate::analysis::monte_carlo::{MonteCarloReport, MonteCarloValidator};
use crate::analysis::sensitivity::{SensitivityAnalyzer, SensitivityReport};
use crate::api::request::OptimizationRequest;
use crate::core::config::EngineConfig;
use crate::core::criteria::WeightVector;
use crate::core::errors::Result;
use crate::core::matrix::DecisionMatrix;
use crate::rankers::{RankingMethod, RankingOutcome};

/// Entry point for ranking and analysing instance alternatives.
///
/// Every call builds a fresh [`DecisionMatrix`] from the request; the engine
/// itself only holds configuration.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        info!("Initializing decision engine");
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn prepare(&self, request: &OptimizationRequest) -> Result<(DecisionMatrix, WeightVector)> {
        let matrix = request.to_matrix(&self.config.criteria)?;
        let weights = request.resolve_weights(&self.config.weights, &self.config.criteria)?;
        Ok((matrix, weights))
    }

    /// Rank the request's alternatives with one method
    pub fn rank(&self, request: &OptimizationRequest, method: RankingMethod) -> Result<RankingOutcome> {
        let (matrix, weights) = self.prepare(request)?;
        info!(%method, alternatives = matrix.n_alternatives(), "Ranking alternatives");
        let outcome = method.ranker().optimize(&matrix, &weights)?;
        info!(%method, best = %outcome.best_alternative, "Ranking complete");
        Ok(outcome)
    }

    /// Rank with TOPSIS
    pub fn optimize(&self, request: &OptimizationRequest) -> Result<RankingOutcome> {
        self.rank(request, RankingMethod::Topsis)
    }

    /// Rank with every method and measure their agreement
    pub fn compare_methods(&self, request: &OptimizationRequest) -> Result<MethodComparison> {
        let (matrix, weights) = self.prepare(request)?;
        MethodComparator::new(self.config.consensus.clone()).compare(&matrix, &weights)
    }

    /// Sweep each criterion's weight around the request weights
    pub fn sensitivity(&self, request: &OptimizationRequest) -> Result<SensitivityReport> {
        let (matrix, weights) = self.prepare(request)?;
        SensitivityAnalyzer::new(&matrix, weights, self.config.sensitivity.clone())?.analyze()
    }

    /// Re-rank under random Dirichlet weights; request weights are not used
    pub fn monte_carlo(&self, request: &OptimizationRequest) -> Result<MonteCarloReport> {
        let (matrix, _) = self.prepare(request)?;
        MonteCarloValidator::new(self.config.monte_carlo.clone())?.run(&matrix)
    }
}
