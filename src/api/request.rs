//! Optimization request payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::criteria::{CriteriaSet, WeightVector};
use crate::core::errors::{Result, ResultExt};
use crate::core::matrix::{Alternative, DecisionMatrix, Measurements};
use crate::profiling::profile::InstanceProfile;

/// Alternatives to rank plus optional weights.
///
/// JSON form: `{"alternatives": {name: {criterion: value}}, "weights": {criterion: value}}`.
/// Alternative order is preserved as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Measured criterion values by alternative name
    pub alternatives: IndexMap<String, Measurements>,
    /// Weights overriding the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<IndexMap<String, f64>>,
}

impl OptimizationRequest {
    /// Request over the given alternatives with default weights
    pub fn new(alternatives: impl IntoIterator<Item = Alternative>) -> Self {
        Self {
            alternatives: alternatives
                .into_iter()
                .map(|alt| (alt.name, alt.criteria))
                .collect(),
            weights: None,
        }
    }

    /// Request built from benchmark profiles
    pub fn from_profiles(profiles: impl IntoIterator<Item = InstanceProfile>) -> Self {
        Self::new(profiles.into_iter().map(InstanceProfile::into_alternative))
    }

    /// Parse a JSON request
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse optimization request")
    }

    /// Override the weights
    pub fn with_weights<K, I>(mut self, weights: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        self.weights = Some(weights.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    /// Build the decision matrix over `criteria`
    pub fn to_matrix(&self, criteria: &CriteriaSet) -> Result<DecisionMatrix> {
        DecisionMatrix::from_map(&self.alternatives, criteria.clone())
    }

    /// Request weights validated against `criteria`, or `default` when absent
    pub fn resolve_weights(&self, default: &WeightVector, criteria: &CriteriaSet) -> Result<WeightVector> {
        match &self.weights {
            Some(weights) => WeightVector::new(weights.clone(), criteria),
            None => {
                default.validate(criteria)?;
                Ok(default.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{COST, PERFORMANCE};
    use crate::core::errors::McdmError;

    const REQUEST: &str = r#"{
        "alternatives": {
            "t3.small": {"performance": 300, "response_time": 0.05, "cpu_usage": 35, "memory_usage": 28, "cost": 0.0208},
            "t3.micro": {"performance": 150, "response_time": 0.08, "cpu_usage": 45, "memory_usage": 35, "cost": 0.0104}
        }
    }"#;

    #[test]
    fn json_keeps_alternative_order() {
        let request = OptimizationRequest::from_json_str(REQUEST).unwrap();
        let names: Vec<&str> = request.alternatives.keys().map(String::as_str).collect();
        assert_eq!(names, ["t3.small", "t3.micro"]);
        assert!(request.weights.is_none());

        let matrix = request.to_matrix(&CriteriaSet::default()).unwrap();
        assert_eq!(matrix.names()[0], "t3.small");
    }

    #[test]
    fn missing_weights_fall_back_to_default() {
        let request = OptimizationRequest::from_json_str(REQUEST).unwrap();
        let weights = request
            .resolve_weights(&WeightVector::default(), &CriteriaSet::default())
            .unwrap();
        assert_eq!(weights, WeightVector::default());
    }

    #[test]
    fn request_weights_are_validated() {
        let request = OptimizationRequest::from_json_str(REQUEST)
            .unwrap()
            .with_weights([(PERFORMANCE, 0.9), (COST, 0.1)]);
        let err = request
            .resolve_weights(&WeightVector::default(), &CriteriaSet::default())
            .unwrap_err();
        assert!(matches!(err, McdmError::InvalidWeights { .. }));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = OptimizationRequest::from_json_str("{\"alternatives\": [").unwrap_err();
        assert!(matches!(err, McdmError::Serialization { .. }));
        assert!(format!("{err}").contains("optimization request"));
    }
}
