//! Statistical routines used by the comparison and validation stages.
//!
//! Descriptive summaries, Student-t confidence intervals, Kendall's tau-b rank
//! correlation, the Shapiro–Wilk normality test (Royston's approximation), one-way
//! ANOVA and the pooled-variance independent two-sample t-test. Distribution
//! functions come from `statrs`.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::core::errors::{McdmError, Result};
use crate::core::numeric::{safe_divide, EPSILON};

/// Largest sample accepted by [`shapiro_wilk`].
pub const SHAPIRO_WILK_MAX_SAMPLES: usize = 5000;

/// Descriptive statistics for one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Sample mean
    pub mean: f64,
    /// Population standard deviation (ddof = 0)
    pub std_dev: f64,
    /// Sample standard deviation (ddof = 1)
    pub sample_std_dev: f64,
    /// Median
    pub median: f64,
    /// Minimum value observed
    pub min: f64,
    /// Maximum value observed
    pub max: f64,
    /// Number of samples
    pub n_samples: usize,
}

impl SampleSummary {
    /// Calculate statistics from a slice of values
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = mean(values);
        let sum_sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
        let std_dev = (sum_sq / n as f64).sqrt();
        let sample_std_dev = if n > 1 {
            (sum_sq / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self {
            mean,
            std_dev,
            sample_std_dev,
            median: percentile(&sorted, 0.5),
            min: sorted[0],
            max: sorted[n - 1],
            n_samples: n,
        }
    }

    /// Statistics of an empty sample
    pub fn empty() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            sample_std_dev: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            n_samples: 0,
        }
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        if self.n_samples == 0 {
            0.0
        } else {
            self.sample_std_dev / (self.n_samples as f64).sqrt()
        }
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation (ddof = 0); 0.0 for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Linearly interpolated percentile of sorted values
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let n = sorted_values.len();
    let index = p * (n - 1) as f64;
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index || upper_index >= n {
        sorted_values[lower_index.min(n - 1)]
    } else {
        let weight = index - lower_index as f64;
        sorted_values[lower_index] * (1.0 - weight) + sorted_values[upper_index] * weight
    }
}

/// Two-sided confidence interval for the mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level the bounds were computed for
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether a value lies inside the interval (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Interval width
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Student-t confidence interval `mean ± t · s/√n` for the mean of `summary`.
///
/// The interval collapses onto the mean when the sample has no spread.
pub fn t_confidence_interval(summary: &SampleSummary, level: f64) -> Result<ConfidenceInterval> {
    if summary.n_samples < 2 {
        return Err(McdmError::math_with_context(
            format!("need at least 2 samples, got {}", summary.n_samples),
            "t confidence interval",
        ));
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(McdmError::math_with_context(
            format!("confidence level must be in (0, 1), got {level}"),
            "t confidence interval",
        ));
    }

    let sem = summary.standard_error();
    if sem < EPSILON {
        return Ok(ConfidenceInterval {
            lower: summary.mean,
            upper: summary.mean,
            level,
        });
    }

    let dist = StudentsT::new(0.0, 1.0, (summary.n_samples - 1) as f64)?;
    let critical = dist.inverse_cdf(0.5 + level / 2.0);
    let half_width = critical * sem;

    Ok(ConfidenceInterval {
        lower: summary.mean - half_width,
        upper: summary.mean + half_width,
        level,
    })
}

/// Kendall's tau-b rank correlation between two paired samples.
///
/// Fewer than two pairs agree trivially and yield 1.0. If either sample is
/// constant the coefficient is undefined and 0.0 is returned.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(McdmError::validation(format!(
            "Kendall tau needs paired samples, got lengths {} and {}",
            x.len(),
            y.len()
        )));
    }

    let n = x.len();
    if n < 2 {
        return Ok(1.0);
    }

    let mut concordant = 0_i64;
    let mut discordant = 0_i64;
    let mut ties_x = 0_i64;
    let mut ties_y = 0_i64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            match (dx == 0.0, dy == 0.0) {
                (true, true) => {
                    ties_x += 1;
                    ties_y += 1;
                }
                (true, false) => ties_x += 1,
                (false, true) => ties_y += 1,
                (false, false) => {
                    if (dx > 0.0) == (dy > 0.0) {
                        concordant += 1;
                    } else {
                        discordant += 1;
                    }
                }
            }
        }
    }

    let n0 = (n * (n - 1) / 2) as f64;
    let denominator = ((n0 - ties_x as f64) * (n0 - ties_y as f64)).sqrt();
    Ok(safe_divide((concordant - discordant) as f64, denominator, 0.0))
}

/// Outcome of the Shapiro–Wilk normality test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    /// W statistic in (0, 1]
    pub statistic: f64,
    /// Probability of a W this small under normality
    pub p_value: f64,
}

// Royston (1995) polynomial coefficients
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Shapiro–Wilk test for normality using Royston's approximation (AS R94).
///
/// Accepts 3 to [`SHAPIRO_WILK_MAX_SAMPLES`] observations. A sample with zero
/// range reports `W = 1` and `p = 1`.
pub fn shapiro_wilk(values: &[f64]) -> Result<ShapiroWilk> {
    let n = values.len();
    if !(3..=SHAPIRO_WILK_MAX_SAMPLES).contains(&n) {
        return Err(McdmError::math_with_context(
            format!("sample size must be between 3 and {SHAPIRO_WILK_MAX_SAMPLES}, got {n}"),
            "Shapiro-Wilk",
        ));
    }

    if values.iter().any(|v| !v.is_finite()) {
        return Err(McdmError::math_with_context(
            "sample contains non-finite values",
            "Shapiro-Wilk",
        ));
    }

    let mut x = values.to_vec();
    x.sort_by(f64::total_cmp);

    let range = x[n - 1] - x[0];
    if range < EPSILON {
        return Ok(ShapiroWilk {
            statistic: 1.0,
            p_value: 1.0,
        });
    }

    let coefficients = shapiro_wilk_coefficients(n)?;
    let half = n / 2;
    let numerator: f64 = (0..half)
        .map(|i| coefficients[i] * (x[n - 1 - i] - x[i]))
        .sum();
    let m = mean(&x);
    let ssq: f64 = x.iter().map(|v| (v - m).powi(2)).sum();
    let w = (numerator * numerator / ssq).min(1.0);

    Ok(ShapiroWilk {
        statistic: w,
        p_value: shapiro_wilk_p_value(w, n)?,
    })
}

/// Coefficients `a_i` for the pairs `(x[n-1-i], x[i])`, `i < n/2`.
fn shapiro_wilk_coefficients(n: usize) -> Result<Vec<f64>> {
    let half = n / 2;
    if n == 3 {
        return Ok(vec![std::f64::consts::FRAC_1_SQRT_2]);
    }

    let standard = Normal::new(0.0, 1.0)?;
    let an25 = n as f64 + 0.25;
    let mut m: Vec<f64> = (1..=half)
        .map(|i| standard.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();
    let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&SW_C2, rsn);
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        m[1] = a2;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };
    m[0] = a1;
    for value in m.iter_mut().skip(first_scaled) {
        *value = -*value / fac;
    }

    Ok(m)
}

fn shapiro_wilk_p_value(w: f64, n: usize) -> Result<f64> {
    if n == 3 {
        const SIX_OVER_PI: f64 = 1.909_859_317_102_74;
        const ASIN_SQRT_THREE_QUARTERS: f64 = std::f64::consts::FRAC_PI_3;
        let p = SIX_OVER_PI * (w.sqrt().asin() - ASIN_SQRT_THREE_QUARTERS);
        return Ok(p.clamp(0.0, 1.0));
    }

    let an = n as f64;
    let mut y = (1.0 - w).max(f64::MIN_POSITIVE).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&SW_G, an);
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&SW_C3, an), poly(&SW_C4, an).exp())
    } else {
        let ln_n = an.ln();
        (poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
    };

    let dist = Normal::new(m, s)?;
    Ok((1.0 - dist.cdf(y)).clamp(0.0, 1.0))
}

/// Outcome of a one-way analysis of variance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaOutcome {
    /// F statistic; `None` when the within-group variance vanishes
    pub f_statistic: Option<f64>,
    /// p-value of the F test
    pub p_value: f64,
    /// Between-group degrees of freedom
    pub df_between: usize,
    /// Within-group degrees of freedom
    pub df_within: usize,
}

/// One-way ANOVA across two or more groups.
///
/// When every group is constant the F statistic is undefined: the p-value is
/// 0.0 if the group means differ and 1.0 if they coincide.
pub fn one_way_anova(groups: &[&[f64]]) -> Result<AnovaOutcome> {
    let k = groups.len();
    if k < 2 {
        return Err(McdmError::insufficient_alternatives(2, k, "one-way ANOVA"));
    }
    if let Some(empty) = groups.iter().position(|g| g.is_empty()) {
        return Err(McdmError::validation(format!(
            "ANOVA group {empty} has no observations"
        )));
    }

    let total: usize = groups.iter().map(|g| g.len()).sum();
    if total <= k {
        return Err(McdmError::math_with_context(
            format!("{total} observations leave no within-group degrees of freedom"),
            "one-way ANOVA",
        ));
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = total - k;

    if ss_within < EPSILON {
        return Ok(AnovaOutcome {
            f_statistic: None,
            p_value: if ss_between < EPSILON { 1.0 } else { 0.0 },
            df_between,
            df_within,
        });
    }

    let f = finite_statistic(
        (ss_between / df_between as f64) / (ss_within / df_within as f64),
        "one-way ANOVA",
    )?;
    let dist = FisherSnedecor::new(df_between as f64, df_within as f64)?;

    Ok(AnovaOutcome {
        f_statistic: Some(f),
        p_value: (1.0 - dist.cdf(f)).clamp(0.0, 1.0),
        df_between,
        df_within,
    })
}

/// Outcome of an independent two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestOutcome {
    /// t statistic; `None` when the pooled variance vanishes
    pub t_statistic: Option<f64>,
    /// Two-sided p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub df: usize,
}

/// Independent two-sample Student t-test with pooled variance (two-sided).
///
/// With no spread in either sample the statistic is undefined: the p-value is
/// 0.0 if the means differ and 1.0 if they coincide.
pub fn independent_t_test(a: &[f64], b: &[f64]) -> Result<TTestOutcome> {
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 || n1 + n2 < 3 {
        return Err(McdmError::insufficient_alternatives(
            3,
            n1 + n2,
            "independent t-test samples",
        ));
    }

    let (m1, m2) = (mean(a), mean(b));
    let ss1: f64 = a.iter().map(|x| (x - m1).powi(2)).sum();
    let ss2: f64 = b.iter().map(|x| (x - m2).powi(2)).sum();
    let df = n1 + n2 - 2;
    let pooled_variance = (ss1 + ss2) / df as f64;
    let se = (pooled_variance * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();

    if se < EPSILON {
        return Ok(TTestOutcome {
            t_statistic: None,
            p_value: if (m1 - m2).abs() < EPSILON { 1.0 } else { 0.0 },
            df,
        });
    }

    let t = finite_statistic((m1 - m2) / se, "independent t-test")?;
    let dist = StudentsT::new(0.0, 1.0, df as f64)?;

    Ok(TTestOutcome {
        t_statistic: Some(t),
        p_value: (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        df,
    })
}

/// NaN or infinite test statistics come from non-finite samples and have no
/// distribution value.
fn finite_statistic(value: f64, context: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(McdmError::math_with_context(
            format!("test statistic is not finite ({value})"),
            context,
        ))
    }
}

#[cfg(test)]
#[path = "statistics_tests.rs"]
mod tests;
