//! Decision matrix: alternatives × criteria.

use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::core::criteria::CriteriaSet;
use crate::core::errors::{McdmError, Result};

/// Raw measurements of one alternative, keyed by criterion name
pub type Measurements = IndexMap<String, f64>;

/// A named entity (e.g. an instance type) with measured criterion values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// Alternative name
    pub name: String,
    /// Measured values; keys outside the criteria set are kept for traceability
    pub criteria: Measurements,
}

impl Alternative {
    /// Create an alternative from `(criterion, value)` pairs
    pub fn new<K, I>(name: impl Into<String>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            name: name.into(),
            criteria: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ordered alternatives paired with their numeric criteria table.
///
/// Rows follow the input order of the alternatives, columns follow the order
/// of the [`CriteriaSet`]. The matrix is immutable once built.
#[derive(Debug, Clone)]
pub struct DecisionMatrix {
    names: Vec<String>,
    criteria: CriteriaSet,
    values: Array2<f64>,
    measurements: Vec<Measurements>,
}

impl DecisionMatrix {
    /// Build a matrix from alternatives, validating that every alternative covers
    /// the criteria set with finite values
    pub fn from_alternatives<I>(alternatives: I, criteria: CriteriaSet) -> Result<Self>
    where
        I: IntoIterator<Item = Alternative>,
    {
        let alternatives: Vec<Alternative> = alternatives.into_iter().collect();
        if alternatives.is_empty() {
            return Err(McdmError::insufficient_alternatives(1, 0, "ranking"));
        }

        let n_criteria = criteria.len();
        let mut values = Array2::zeros((alternatives.len(), n_criteria));
        let mut names = Vec::with_capacity(alternatives.len());
        let mut measurements = Vec::with_capacity(alternatives.len());

        for (row, alternative) in alternatives.into_iter().enumerate() {
            if names.contains(&alternative.name) {
                return Err(McdmError::validation_field(
                    format!("Duplicate alternative '{}'", alternative.name),
                    alternative.name,
                ));
            }

            for (col, criterion) in criteria.names().enumerate() {
                let value = *alternative
                    .criteria
                    .get(criterion)
                    .ok_or_else(|| McdmError::missing_criterion(&alternative.name, criterion))?;
                if !value.is_finite() {
                    return Err(McdmError::degenerate_value(&alternative.name, criterion, value));
                }
                values[[row, col]] = value;
            }

            names.push(alternative.name);
            measurements.push(alternative.criteria);
        }

        Ok(Self {
            names,
            criteria,
            values,
            measurements,
        })
    }

    /// Build a matrix from a name → measurements map, preserving map order
    pub fn from_map(alternatives: &IndexMap<String, Measurements>, criteria: CriteriaSet) -> Result<Self> {
        Self::from_alternatives(
            alternatives.iter().map(|(name, values)| Alternative {
                name: name.clone(),
                criteria: values.clone(),
            }),
            criteria,
        )
    }

    /// Build a matrix directly from a numeric table
    pub fn from_table(names: Vec<String>, values: Array2<f64>, criteria: CriteriaSet) -> Result<Self> {
        if values.nrows() != names.len() || values.ncols() != criteria.len() {
            return Err(McdmError::validation(format!(
                "Table shape {:?} does not match {} alternatives × {} criteria",
                values.shape(),
                names.len(),
                criteria.len()
            )));
        }

        let alternatives = names.into_iter().enumerate().map(|(row, name)| {
            Alternative::new(
                name,
                criteria
                    .names()
                    .enumerate()
                    .map(|(col, criterion)| (criterion.to_string(), values[[row, col]]))
                    .collect::<Vec<_>>(),
            )
        });
        Self::from_alternatives(alternatives.collect::<Vec<_>>(), criteria)
    }

    /// Alternative names in row order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Criteria in column order
    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    /// Numeric table (rows = alternatives, columns = criteria)
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Row of criterion values for one alternative
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Measurements as originally supplied for one alternative
    pub fn measurements(&self, index: usize) -> &Measurements {
        &self.measurements[index]
    }

    /// Number of alternatives
    pub fn n_alternatives(&self) -> usize {
        self.names.len()
    }

    /// Number of criteria
    pub fn n_criteria(&self) -> usize {
        self.criteria.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{COST, CPU_USAGE, MEMORY_USAGE, PERFORMANCE, RESPONSE_TIME};

    fn micro() -> Alternative {
        Alternative::new(
            "t3.micro",
            [
                (PERFORMANCE, 150.0),
                (RESPONSE_TIME, 0.08),
                (CPU_USAGE, 45.0),
                (MEMORY_USAGE, 35.0),
                (COST, 0.0104),
            ],
        )
    }

    #[test]
    fn builds_rows_in_input_order() {
        let mut small = micro();
        small.name = "t3.small".to_string();
        small.criteria.insert(PERFORMANCE.to_string(), 300.0);

        let matrix =
            DecisionMatrix::from_alternatives(vec![micro(), small], CriteriaSet::default()).unwrap();
        assert_eq!(matrix.names(), &["t3.micro".to_string(), "t3.small".to_string()]);
        assert_eq!(matrix.values().shape(), &[2, 5]);
        assert_eq!(matrix.values()[[1, 0]], 300.0);
        assert_eq!(matrix.values()[[0, 4]], 0.0104);
    }

    #[test]
    fn rejects_empty_input() {
        let err = DecisionMatrix::from_alternatives(Vec::new(), CriteriaSet::default()).unwrap_err();
        assert!(matches!(
            err,
            McdmError::InsufficientAlternatives {
                required: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_criterion() {
        let mut alt = micro();
        alt.criteria.shift_remove(MEMORY_USAGE);
        let err = DecisionMatrix::from_alternatives(vec![alt], CriteriaSet::default()).unwrap_err();

        if let McdmError::MissingCriterion {
            alternative,
            criterion,
        } = err
        {
            assert_eq!(alternative, "t3.micro");
            assert_eq!(criterion, MEMORY_USAGE);
        } else {
            panic!("Expected MissingCriterion error");
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut alt = micro();
        alt.criteria.insert(COST.to_string(), f64::INFINITY);
        let err = DecisionMatrix::from_alternatives(vec![alt], CriteriaSet::default()).unwrap_err();
        assert!(matches!(err, McdmError::DegenerateInput { .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err =
            DecisionMatrix::from_alternatives(vec![micro(), micro()], CriteriaSet::default()).unwrap_err();
        assert!(format!("{err}").contains("Duplicate alternative"));
    }

    #[test]
    fn keeps_extra_measurements_for_traceability() {
        let mut alt = micro();
        alt.criteria.insert("success_rate".to_string(), 99.5);
        let matrix = DecisionMatrix::from_alternatives(vec![alt], CriteriaSet::default()).unwrap();
        assert_eq!(matrix.measurements(0).get("success_rate"), Some(&99.5));
        assert_eq!(matrix.n_criteria(), 5);
    }

    #[test]
    fn from_table_checks_shape() {
        let err = DecisionMatrix::from_table(
            vec!["a".to_string()],
            Array2::zeros((2, 5)),
            CriteriaSet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, McdmError::Validation { .. }));
    }
}
