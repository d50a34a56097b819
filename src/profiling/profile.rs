//! Turning raw benchmark output into decision-matrix alternatives.

use serde::{Deserialize, Serialize};

use crate::core::criteria::{COST, CPU_USAGE, MEMORY_USAGE, PERFORMANCE, RESPONSE_TIME};
use crate::core::errors::{McdmError, Result};
use crate::core::matrix::Alternative;

/// Key under which the success rate is kept on a profiled alternative
pub const SUCCESS_RATE: &str = "success_rate";

/// Summary written by the load generator; times are in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestSummary {
    /// Requests sent
    pub total_requests: u64,
    /// Requests answered successfully
    pub successful_requests: u64,
    /// Requests that failed
    pub failed_requests: u64,
    /// Mean response time
    pub avg_response_time: f64,
    /// Fastest response
    pub min_response_time: f64,
    /// Slowest response
    pub max_response_time: f64,
    /// Achieved requests per second
    pub rps: f64,
    /// Test duration
    pub duration: f64,
}

/// Load test results with derived rates; times are in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultsAnalysis {
    /// Requests sent
    pub total_requests: u64,
    /// Requests answered successfully
    pub successful_requests: u64,
    /// Requests that failed
    pub failed_requests: u64,
    /// Successful share of all requests, in percent
    pub success_rate: f64,
    /// Mean response time
    pub avg_response_time_ms: f64,
    /// Fastest response
    pub min_response_time_ms: f64,
    /// Slowest response
    pub max_response_time_ms: f64,
    /// Achieved requests per second
    pub rps: f64,
    /// Test duration in seconds
    pub duration: f64,
}

impl TestResultsAnalysis {
    /// Derive success rate and millisecond timings. No requests means a 0 % success rate.
    pub fn from_summary(summary: &LoadTestSummary) -> Self {
        let success_rate = if summary.total_requests > 0 {
            summary.successful_requests as f64 / summary.total_requests as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_requests: summary.total_requests,
            successful_requests: summary.successful_requests,
            failed_requests: summary.failed_requests,
            success_rate,
            avg_response_time_ms: summary.avg_response_time * 1000.0,
            min_response_time_ms: summary.min_response_time * 1000.0,
            max_response_time_ms: summary.max_response_time * 1000.0,
            rps: summary.rps,
            duration: summary.duration,
        }
    }
}

/// One server-side resource sample, both values in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    /// CPU usage
    pub cpu_percent: f64,
    /// Memory usage
    pub memory_percent: f64,
}

/// Average, minimum and maximum of one resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Mean over all samples
    pub avg: f64,
    /// Lowest sample
    pub min: f64,
    /// Highest sample
    pub max: f64,
}

impl UsageStats {
    fn from_values(values: impl Iterator<Item = f64> + Clone) -> Self {
        let count = values.clone().count().max(1) as f64;
        Self {
            avg: values.clone().sum::<f64>() / count,
            min: values.clone().fold(f64::INFINITY, f64::min),
            max: values.fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Resource usage over a load test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// CPU percentages
    pub cpu: UsageStats,
    /// Memory percentages
    pub memory: UsageStats,
    /// Number of samples aggregated
    pub samples: usize,
}

impl ResourceUsage {
    /// Aggregate metric samples; at least one sample is required
    pub fn from_samples(samples: &[MetricsSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(McdmError::validation_field(
                "No metrics samples collected",
                "metrics",
            ));
        }

        Ok(Self {
            cpu: UsageStats::from_values(samples.iter().map(|s| s.cpu_percent)),
            memory: UsageStats::from_values(samples.iter().map(|s| s.memory_percent)),
            samples: samples.len(),
        })
    }
}

/// How well a resource was used during the test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationVerdict {
    /// A smaller instance would do
    Underutilized,
    /// Within the healthy band
    Optimal,
    /// Saturated
    Overloaded,
}

impl UtilizationVerdict {
    /// CPU: below 20 % is underutilized, above 80 % overloaded
    pub fn for_cpu(avg_percent: f64) -> Self {
        Self::classify(avg_percent, 20.0, 80.0)
    }

    /// Memory: below 30 % is underutilized, above 80 % overloaded
    pub fn for_memory(avg_percent: f64) -> Self {
        Self::classify(avg_percent, 30.0, 80.0)
    }

    fn classify(value: f64, low: f64, high: f64) -> Self {
        if value < low {
            Self::Underutilized
        } else if value > high {
            Self::Overloaded
        } else {
            Self::Optimal
        }
    }
}

/// Measured profile of one instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceProfile {
    /// Instance type name, e.g. `t3.small`
    pub instance_type: String,
    /// Requests per second
    pub performance: f64,
    /// Mean response time in ms
    pub response_time: f64,
    /// Mean CPU usage in percent
    pub cpu_usage: f64,
    /// Mean memory usage in percent
    pub memory_usage: f64,
    /// Hourly price in USD
    pub cost: f64,
    /// Successful requests in percent
    pub success_rate: f64,
}

impl InstanceProfile {
    /// Combine load test results, resource usage and price
    pub fn new(
        instance_type: impl Into<String>,
        results: &TestResultsAnalysis,
        usage: &ResourceUsage,
        cost_per_hour: f64,
    ) -> Self {
        Self {
            instance_type: instance_type.into(),
            performance: results.rps,
            response_time: results.avg_response_time_ms,
            cpu_usage: usage.cpu.avg,
            memory_usage: usage.memory.avg,
            cost: cost_per_hour,
            success_rate: results.success_rate,
        }
    }

    /// CPU and memory verdicts
    pub fn utilization(&self) -> (UtilizationVerdict, UtilizationVerdict) {
        (
            UtilizationVerdict::for_cpu(self.cpu_usage),
            UtilizationVerdict::for_memory(self.memory_usage),
        )
    }

    /// Alternative with the five benchmark criteria; the success rate rides along
    pub fn into_alternative(self) -> Alternative {
        Alternative::new(
            self.instance_type,
            [
                (PERFORMANCE, self.performance),
                (RESPONSE_TIME, self.response_time),
                (CPU_USAGE, self.cpu_usage),
                (MEMORY_USAGE, self.memory_usage),
                (COST, self.cost),
                (SUCCESS_RATE, self.success_rate),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn summary() -> LoadTestSummary {
        LoadTestSummary {
            total_requests: 1000,
            successful_requests: 990,
            failed_requests: 10,
            avg_response_time: 0.045,
            min_response_time: 0.012,
            max_response_time: 0.310,
            rps: 480.0,
            duration: 60.0,
        }
    }

    #[test]
    fn analysis_converts_to_milliseconds() {
        let analysis = TestResultsAnalysis::from_summary(&summary());
        assert_abs_diff_eq!(analysis.success_rate, 99.0, epsilon = 1e-12);
        assert_abs_diff_eq!(analysis.avg_response_time_ms, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(analysis.max_response_time_ms, 310.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_requests_give_zero_success_rate() {
        let mut empty = summary();
        empty.total_requests = 0;
        empty.successful_requests = 0;
        assert_eq!(TestResultsAnalysis::from_summary(&empty).success_rate, 0.0);
    }

    #[test]
    fn resource_usage_aggregates_samples() {
        let samples = [
            MetricsSample {
                cpu_percent: 40.0,
                memory_percent: 30.0,
            },
            MetricsSample {
                cpu_percent: 60.0,
                memory_percent: 34.0,
            },
        ];
        let usage = ResourceUsage::from_samples(&samples).unwrap();
        assert_eq!(usage.samples, 2);
        assert_abs_diff_eq!(usage.cpu.avg, 50.0, epsilon = 1e-12);
        assert_eq!(usage.cpu.min, 40.0);
        assert_eq!(usage.memory.max, 34.0);
    }

    #[test]
    fn resource_usage_requires_samples() {
        let err = ResourceUsage::from_samples(&[]).unwrap_err();
        assert!(matches!(err, McdmError::Validation { .. }));
    }

    #[test]
    fn utilization_thresholds() {
        assert_eq!(UtilizationVerdict::for_cpu(15.0), UtilizationVerdict::Underutilized);
        assert_eq!(UtilizationVerdict::for_cpu(20.0), UtilizationVerdict::Optimal);
        assert_eq!(UtilizationVerdict::for_cpu(85.0), UtilizationVerdict::Overloaded);
        assert_eq!(UtilizationVerdict::for_memory(25.0), UtilizationVerdict::Underutilized);
        assert_eq!(UtilizationVerdict::for_memory(80.0), UtilizationVerdict::Optimal);
    }

    #[test]
    fn profile_becomes_alternative() {
        let analysis = TestResultsAnalysis::from_summary(&summary());
        let usage = ResourceUsage::from_samples(&[MetricsSample {
            cpu_percent: 55.0,
            memory_percent: 40.0,
        }])
        .unwrap();
        let profile = InstanceProfile::new("t3.small", &analysis, &usage, 0.0208);
        assert_eq!(
            profile.utilization(),
            (UtilizationVerdict::Optimal, UtilizationVerdict::Optimal)
        );

        let alternative = profile.into_alternative();
        assert_eq!(alternative.name, "t3.small");
        assert_eq!(alternative.criteria[PERFORMANCE], 480.0);
        assert_abs_diff_eq!(alternative.criteria[RESPONSE_TIME], 45.0, epsilon = 1e-9);
        assert_eq!(alternative.criteria[COST], 0.0208);
        assert_eq!(alternative.criteria[SUCCESS_RATE], 99.0);
    }
}
