//! Column normalization strategies shared by the rankers.
//!
//! Both strategies take the raw decision table and return a table of the same
//! shape. Vanishing denominators are routed through [`safe_divide`] and
//! [`clamp_positive`] so no NaN or infinity reaches the scoring stage.

use ndarray::{Array2, Axis};
use tracing::debug;

use crate::core::criteria::Direction;
use crate::core::numeric::{clamp_positive, safe_divide, EPSILON};

/// Divide each column by its Euclidean norm.
///
/// A column whose norm vanishes becomes all zeros, so it adds nothing to the
/// distances computed from the normalized table.
pub fn vector_normalize(matrix: &Array2<f64>) -> Array2<f64> {
    let mut normalized = matrix.clone();

    for (j, mut column) in normalized.axis_iter_mut(Axis(1)).enumerate() {
        let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm < EPSILON {
            debug!(column = j, "Zero-norm column in vector normalization");
        }
        column.mapv_inplace(|v| safe_divide(v, norm, 0.0));
    }

    normalized
}

/// Linear (max/min) normalization.
///
/// Benefit columns map to `value / max(column)`; a column whose maximum
/// vanishes becomes all zeros. Cost columns map to `min(column) / value` with
/// both operands clamped to at least [`EPSILON`](crate::core::numeric::EPSILON),
/// so a zero cost scores 1.0 instead of dividing by zero.
pub fn linear_normalize(matrix: &Array2<f64>, directions: &[Direction]) -> Array2<f64> {
    debug_assert_eq!(matrix.ncols(), directions.len());
    let mut normalized = matrix.clone();

    for (mut column, direction) in normalized.axis_iter_mut(Axis(1)).zip(directions) {
        if direction.is_benefit() {
            let max = column.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            column.mapv_inplace(|v| safe_divide(v, max, 0.0));
        } else {
            let min = clamp_positive(column.fold(f64::INFINITY, |acc, &v| acc.min(v)));
            column.mapv_inplace(|v| min / clamp_positive(v));
        }
    }

    normalized
}
