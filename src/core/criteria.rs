//! Criteria definitions and weight vectors.
//!
//! A [`CriteriaSet`] fixes the order and direction of the comparison dimensions;
//! a [`WeightVector`] assigns each of them a non-negative weight summing to 1.0.

use std::fmt;

use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::errors::{McdmError, Result};

/// Allowed deviation of a weight vector's sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Throughput in requests per second (benefit).
pub const PERFORMANCE: &str = "performance";
/// Mean response time (cost).
pub const RESPONSE_TIME: &str = "response_time";
/// Mean CPU utilisation in percent (cost).
pub const CPU_USAGE: &str = "cpu_usage";
/// Mean memory utilisation in percent (cost).
pub const MEMORY_USAGE: &str = "memory_usage";
/// Hourly price in USD (cost).
pub const COST: &str = "cost";

/// Whether larger or smaller raw values are preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Higher is better
    Benefit,
    /// Lower is better
    Cost,
}

impl Direction {
    /// True for benefit criteria
    pub fn is_benefit(self) -> bool {
        matches!(self, Self::Benefit)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Benefit => write!(f, "benefit"),
            Self::Cost => write!(f, "cost"),
        }
    }
}

/// A named comparison dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion name as it appears in alternative measurements
    pub name: String,
    /// Preference direction
    pub direction: Direction,
}

impl Criterion {
    /// Create a benefit criterion
    pub fn benefit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Benefit,
        }
    }

    /// Create a cost criterion
    pub fn cost(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Cost,
        }
    }
}

/// Ordered set of criteria shared by every alternative of a decision matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaSet {
    criteria: Vec<Criterion>,
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self::instance_benchmark()
    }
}

impl CriteriaSet {
    /// Build a criteria set, rejecting duplicate or empty names
    pub fn new(criteria: Vec<Criterion>) -> Result<Self> {
        if criteria.is_empty() {
            return Err(McdmError::validation("A criteria set needs at least one criterion"));
        }
        for (i, criterion) in criteria.iter().enumerate() {
            if criterion.name.is_empty() {
                return Err(McdmError::validation("Criterion names must not be empty"));
            }
            if criteria[..i].iter().any(|c| c.name == criterion.name) {
                return Err(McdmError::validation_field(
                    format!("Duplicate criterion '{}'", criterion.name),
                    criterion.name.clone(),
                ));
            }
        }
        Ok(Self { criteria })
    }

    /// The fixed criteria used for instance benchmarking:
    /// performance (benefit), response_time, cpu_usage, memory_usage and cost (all cost).
    pub fn instance_benchmark() -> Self {
        Self {
            criteria: vec![
                Criterion::benefit(PERFORMANCE),
                Criterion::cost(RESPONSE_TIME),
                Criterion::cost(CPU_USAGE),
                Criterion::cost(MEMORY_USAGE),
                Criterion::cost(COST),
            ],
        }
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// True when the set has no criteria
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Iterate criteria in column order
    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    /// Criterion names in column order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.criteria.iter().map(|c| c.name.as_str())
    }

    /// Column index of a criterion
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.criteria.iter().position(|c| c.name == name)
    }

    /// Whether the set contains a criterion
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Directions in column order
    pub fn directions(&self) -> Vec<Direction> {
        self.criteria.iter().map(|c| c.direction).collect()
    }
}

/// Mapping from criterion name to weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: IndexMap<String, f64>,
}

impl Default for WeightVector {
    /// Default tradeoff: performance 0.35, response_time 0.25, cpu_usage 0.15,
    /// memory_usage 0.15, cost 0.10.
    fn default() -> Self {
        Self::from_pairs([
            (PERFORMANCE, 0.35),
            (RESPONSE_TIME, 0.25),
            (CPU_USAGE, 0.15),
            (MEMORY_USAGE, 0.15),
            (COST, 0.10),
        ])
    }
}

impl WeightVector {
    /// Build and validate a weight vector against a criteria set
    pub fn new(weights: IndexMap<String, f64>, criteria: &CriteriaSet) -> Result<Self> {
        let vector = Self { weights };
        vector.validate(criteria)?;
        Ok(vector.ordered_by(criteria))
    }

    /// Build a weight vector without validation
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            weights: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Weight of a criterion
    pub fn get(&self, criterion: &str) -> Option<f64> {
        self.weights.get(criterion).copied()
    }

    /// Iterate `(criterion, weight)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of weighted criteria
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no weights are present
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Check that the weights cover exactly the criteria set, are non-negative and
    /// sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`]
    pub fn validate(&self, criteria: &CriteriaSet) -> Result<()> {
        if self.weights.is_empty() {
            return Err(McdmError::invalid_weights("No criterion weights supplied"));
        }

        for (name, &weight) in &self.weights {
            if !criteria.contains(name) {
                return Err(McdmError::invalid_weight_for(
                    name.clone(),
                    format!("Unknown criterion '{name}'"),
                ));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(McdmError::invalid_weight_for(
                    name.clone(),
                    format!("Weight for '{name}' must be a non-negative number, got {weight}"),
                ));
            }
        }

        if let Some(missing) = criteria.names().find(|name| !self.weights.contains_key(*name)) {
            return Err(McdmError::invalid_weight_for(
                missing,
                format!("Missing weight for criterion '{missing}'"),
            ));
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(McdmError::invalid_weights(format!(
                "Weights must sum to 1.0 (±{WEIGHT_SUM_TOLERANCE}), got {total:.4}"
            )));
        }

        Ok(())
    }

    /// Weights laid out in the column order of `criteria`; absent criteria get 0.0
    pub fn to_array(&self, criteria: &CriteriaSet) -> Array1<f64> {
        criteria
            .names()
            .map(|name| self.get(name).unwrap_or(0.0))
            .collect()
    }

    fn ordered_by(self, criteria: &CriteriaSet) -> Self {
        Self {
            weights: criteria
                .names()
                .map(|name| (name.to_string(), self.get(name).unwrap_or(0.0)))
                .collect(),
        }
    }
}
