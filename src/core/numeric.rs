//! Shared numeric guards.
//!
//! Every place in the engine where a denominator can vanish goes through these
//! helpers so that all rankers apply the same finite fallback.

/// Magnitude below which a denominator is treated as zero, and the floor applied
/// to non-positive values before they are inverted or exponentiated.
pub const EPSILON: f64 = 1e-9;

/// Divide `numerator` by `denominator`, returning `fallback` when the denominator
/// is smaller than [`EPSILON`] in magnitude.
#[inline]
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < EPSILON {
        fallback
    } else {
        numerator / denominator
    }
}

/// Clamp a value to at least [`EPSILON`].
#[inline]
pub fn clamp_positive(value: f64) -> f64 {
    value.max(EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_divide_regular() {
        assert_eq!(safe_divide(6.0, 3.0, -1.0), 2.0);
        assert_eq!(safe_divide(-6.0, 3.0, -1.0), -2.0);
    }

    #[test]
    fn test_safe_divide_vanishing_denominator() {
        assert_eq!(safe_divide(1.0, 0.0, 0.5), 0.5);
        assert_eq!(safe_divide(1.0, 1e-12, 0.0), 0.0);
        assert_eq!(safe_divide(1.0, -1e-12, 0.0), 0.0);
    }

    #[test]
    fn test_clamp_positive() {
        assert_eq!(clamp_positive(0.0), EPSILON);
        assert_eq!(clamp_positive(-5.0), EPSILON);
        assert_eq!(clamp_positive(0.25), 0.25);
    }
}
