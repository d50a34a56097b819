//! Engine configuration.
//!
//! [`EngineConfig`] carries the default weight vector and the tuning knobs of the
//! sensitivity and Monte Carlo stages. Every section deserializes with defaults,
//! so a YAML file only needs the fields it overrides.

pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::criteria::{CriteriaSet, WeightVector};
use crate::core::errors::{McdmError, Result};

pub use validation::{
    validate_min_usize, validate_open_unit_range, validate_ordered, validate_positive_f64,
    validate_unit_range,
};

/// Main configuration for the decision engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Criteria and their directions (column order of every decision matrix)
    #[serde(default)]
    pub criteria: CriteriaSet,

    /// Weights used when a request does not supply its own
    #[serde(default)]
    pub weights: WeightVector,

    /// Weight sweep settings
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Randomized weight validation settings
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,

    /// Correlation thresholds for the method comparison consensus level
    #[serde(default)]
    pub consensus: ConsensusThresholds,
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            McdmError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            McdmError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.weights.validate(&self.criteria).map_err(|e| {
            McdmError::config_field(format!("Invalid default weights: {e}"), "weights")
        })?;
        self.sensitivity.validate()?;
        self.monte_carlo.validate()?;
        self.consensus.validate()?;
        Ok(())
    }
}

/// Weight sweep configuration for sensitivity analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Lowest weight sampled for the varied criterion
    #[serde(default = "SensitivityConfig::default_min_weight")]
    pub min_weight: f64,

    /// Highest weight sampled for the varied criterion
    #[serde(default = "SensitivityConfig::default_max_weight")]
    pub max_weight: f64,

    /// Sample points per criterion in the full report
    #[serde(default = "SensitivityConfig::default_steps")]
    pub steps: usize,

    /// Sample points per criterion when computing stability indices
    #[serde(default = "SensitivityConfig::default_stability_steps")]
    pub stability_steps: usize,

    /// Sample points per criterion when searching for breakpoints
    #[serde(default = "SensitivityConfig::default_breakpoint_steps")]
    pub breakpoint_steps: usize,

    /// Sweep criteria on the rayon pool
    #[serde(default = "SensitivityConfig::default_parallel")]
    pub parallel: bool,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            min_weight: Self::default_min_weight(),
            max_weight: Self::default_max_weight(),
            steps: Self::default_steps(),
            stability_steps: Self::default_stability_steps(),
            breakpoint_steps: Self::default_breakpoint_steps(),
            parallel: Self::default_parallel(),
        }
    }
}

impl SensitivityConfig {
    const fn default_min_weight() -> f64 {
        0.05
    }

    const fn default_max_weight() -> f64 {
        0.70
    }

    const fn default_steps() -> usize {
        20
    }

    const fn default_stability_steps() -> usize {
        30
    }

    const fn default_breakpoint_steps() -> usize {
        50
    }

    const fn default_parallel() -> bool {
        true
    }

    /// Validate sweep bounds and step counts
    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.min_weight, "sensitivity.min_weight")?;
        validate_unit_range(self.max_weight, "sensitivity.max_weight")?;
        validate_ordered(self.min_weight, self.max_weight, "sensitivity")?;
        validate_min_usize(self.steps, 2, "sensitivity.steps")?;
        validate_min_usize(self.stability_steps, 2, "sensitivity.stability_steps")?;
        validate_min_usize(self.breakpoint_steps, 2, "sensitivity.breakpoint_steps")?;
        Ok(())
    }
}

/// Monte Carlo validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of random weight draws
    #[serde(default = "MonteCarloConfig::default_num_simulations")]
    pub num_simulations: usize,

    /// Confidence level of the per-alternative score intervals
    #[serde(default = "MonteCarloConfig::default_confidence_level")]
    pub confidence_level: f64,

    /// Fixed RNG seed; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,

    /// Symmetric Dirichlet concentration
    #[serde(default = "MonteCarloConfig::default_dirichlet_alpha")]
    pub dirichlet_alpha: f64,

    /// Largest sample handed to the normality test
    #[serde(default = "MonteCarloConfig::default_normality_sample_cap")]
    pub normality_sample_cap: usize,

    /// p-value below which a pairwise difference is flagged significant
    #[serde(default = "MonteCarloConfig::default_significance_level")]
    pub significance_level: f64,

    /// Evaluate trials on the rayon pool
    #[serde(default = "MonteCarloConfig::default_parallel")]
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            num_simulations: Self::default_num_simulations(),
            confidence_level: Self::default_confidence_level(),
            seed: None,
            dirichlet_alpha: Self::default_dirichlet_alpha(),
            normality_sample_cap: Self::default_normality_sample_cap(),
            significance_level: Self::default_significance_level(),
            parallel: Self::default_parallel(),
        }
    }
}

impl MonteCarloConfig {
    const fn default_num_simulations() -> usize {
        10_000
    }

    const fn default_confidence_level() -> f64 {
        0.95
    }

    const fn default_dirichlet_alpha() -> f64 {
        1.0
    }

    const fn default_normality_sample_cap() -> usize {
        5000
    }

    const fn default_significance_level() -> f64 {
        0.05
    }

    const fn default_parallel() -> bool {
        true
    }

    /// Same settings with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate simulation parameters
    pub fn validate(&self) -> Result<()> {
        validate_min_usize(self.num_simulations, 3, "monte_carlo.num_simulations")?;
        validate_open_unit_range(self.confidence_level, "monte_carlo.confidence_level")?;
        validate_positive_f64(self.dirichlet_alpha, "monte_carlo.dirichlet_alpha")?;
        validate_min_usize(self.normality_sample_cap, 3, "monte_carlo.normality_sample_cap")?;
        if self.normality_sample_cap > crate::core::statistics::SHAPIRO_WILK_MAX_SAMPLES {
            return Err(McdmError::config_field(
                format!(
                    "monte_carlo.normality_sample_cap must not exceed {}",
                    crate::core::statistics::SHAPIRO_WILK_MAX_SAMPLES
                ),
                "monte_carlo.normality_sample_cap",
            ));
        }
        validate_open_unit_range(self.significance_level, "monte_carlo.significance_level")?;
        Ok(())
    }
}

/// Average rank correlation thresholds for the consensus level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusThresholds {
    /// Average correlation above which consensus is high
    #[serde(default = "ConsensusThresholds::default_high")]
    pub high: f64,

    /// Average correlation above which consensus is medium
    #[serde(default = "ConsensusThresholds::default_medium")]
    pub medium: f64,
}

impl Default for ConsensusThresholds {
    fn default() -> Self {
        Self {
            high: Self::default_high(),
            medium: Self::default_medium(),
        }
    }
}

impl ConsensusThresholds {
    const fn default_high() -> f64 {
        0.8
    }

    const fn default_medium() -> f64 {
        0.5
    }

    /// Validate that `-1 ≤ medium < high ≤ 1`
    pub fn validate(&self) -> Result<()> {
        for (value, field) in [(self.high, "consensus.high"), (self.medium, "consensus.medium")] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(McdmError::config_field(
                    format!("{field} must be a correlation between -1.0 and 1.0, got {value}"),
                    field,
                ));
            }
        }
        validate_ordered(self.medium, self.high, "consensus")
    }
}
