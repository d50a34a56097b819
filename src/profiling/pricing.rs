//! Hourly pricing and benchmark cost estimates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{McdmError, Result};
use crate::core::numeric::safe_divide;

/// Instance type every load generator client runs on
pub const CLIENT_INSTANCE: &str = "t3.micro";

/// Setup and teardown time charged per benchmarked instance, in hours
pub const SETUP_HOURS_PER_INSTANCE: f64 = 5.0 / 60.0;

/// Days in a projected month
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Default benchmark budget in USD
pub const DEFAULT_BUDGET: f64 = 120.0;

/// Approximate sustained throughput (requests per second) of the t3 family,
/// used when no benchmark figures are available
pub const REFERENCE_THROUGHPUT: [(&str, f64); 5] = [
    ("t3.micro", 200.0),
    ("t3.small", 400.0),
    ("t3.medium", 800.0),
    ("t3.large", 1600.0),
    ("t3.xlarge", 3200.0),
];

/// [`REFERENCE_THROUGHPUT`] as an instance type map
pub fn reference_throughput() -> IndexMap<String, f64> {
    REFERENCE_THROUGHPUT
        .into_iter()
        .map(|(name, rps)| (name.to_string(), rps))
        .collect()
}

/// Hourly on-demand prices plus data transfer rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalog {
    /// USD per hour by instance type
    pub hourly_rates: IndexMap<String, f64>,
    /// USD per GB transferred out
    pub data_transfer_out: f64,
}

impl Default for PriceCatalog {
    /// eu-central-1 on-demand prices for the t3 family
    fn default() -> Self {
        let hourly_rates = [
            ("t3.micro", 0.0104),
            ("t3.small", 0.0208),
            ("t3.medium", 0.0416),
            ("t3.large", 0.0832),
            ("t3.xlarge", 0.1664),
            ("t3.2xlarge", 0.3328),
        ]
        .into_iter()
        .map(|(name, rate)| (name.to_string(), rate))
        .collect();

        Self {
            hourly_rates,
            data_transfer_out: 0.09,
        }
    }
}

/// Compute, transfer and total cost of one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCost {
    /// Instance under test
    pub instance_type: String,
    /// Test length in hours
    pub duration_hours: f64,
    /// Hourly rate applied
    pub hourly_rate: f64,
    /// Instance time
    pub compute: f64,
    /// Data transferred out
    pub data_transfer: f64,
    /// Sum of both
    pub total: f64,
}

/// A benchmark run: every instance tested at every request rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitePlan {
    /// Instance types to benchmark
    pub instances: Vec<String>,
    /// Target request rates per test
    pub rps_levels: Vec<u32>,
    /// Length of each test in seconds
    #[serde(default = "SuitePlan::default_test_duration")]
    pub test_duration: f64,
    /// Data transferred out per test, in GB
    #[serde(default = "SuitePlan::default_transfer_gb")]
    pub data_transfer_per_test_gb: f64,
    /// Budget the suite is charged against
    #[serde(default = "SuitePlan::default_budget")]
    pub budget: f64,
}

impl SuitePlan {
    fn default_test_duration() -> f64 {
        60.0
    }

    fn default_transfer_gb() -> f64 {
        0.5
    }

    fn default_budget() -> f64 {
        DEFAULT_BUDGET
    }

    /// Number of individual tests
    pub fn test_count(&self) -> usize {
        self.instances.len() * self.rps_levels.len()
    }
}

/// How much of the budget an estimate consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Under half the budget
    Safe,
    /// Under 80 % of the budget
    Warning,
    /// 80 % or more
    Critical,
}

/// Estimated cost relative to a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetImpact {
    /// Budget in USD
    pub total_budget: f64,
    /// Estimated cost in USD
    pub estimated_cost: f64,
    /// Share of the budget used, in percent
    pub percentage_used: f64,
    /// Budget left after the estimate
    pub remaining: f64,
    /// Bucketed share
    pub status: BudgetStatus,
}

impl BudgetImpact {
    /// Compare a cost against a positive budget
    pub fn new(cost: f64, total_budget: f64) -> Result<Self> {
        if total_budget.is_nan() || total_budget <= 0.0 {
            return Err(McdmError::validation_field(
                format!("Budget must be positive, got {total_budget}"),
                "budget",
            ));
        }

        let percentage_used = cost / total_budget * 100.0;
        let status = if percentage_used < 50.0 {
            BudgetStatus::Safe
        } else if percentage_used < 80.0 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Critical
        };

        Ok(Self {
            total_budget,
            estimated_cost: cost,
            percentage_used,
            remaining: total_budget - cost,
            status,
        })
    }
}

/// Cost estimate for a whole benchmark suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteEstimate {
    /// Number of tests
    pub test_count: usize,
    /// Instance time under test
    pub compute: f64,
    /// Data transferred out
    pub data_transfer: f64,
    /// Load generator clients
    pub client_overhead: f64,
    /// Setup and teardown of each instance
    pub setup_teardown: f64,
    /// Sum of all of the above
    pub total: f64,
    /// Each individual test
    pub per_test: Vec<TestCost>,
    /// Total against the plan budget
    pub budget_impact: BudgetImpact,
}

/// Instance type that meets a throughput floor within a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCandidate {
    /// Instance type
    pub instance_type: String,
    /// Expected requests per second
    pub estimated_performance: f64,
    /// Cost of one test in USD
    pub cost: f64,
    /// Requests per second per dollar of test cost
    pub efficiency: f64,
}

/// Projected monthly cost of one instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLine {
    /// Hours run per day
    pub hours_per_day: f64,
    /// Hourly rate applied
    pub hourly_rate: f64,
    /// Cost per day
    pub daily_cost: f64,
    /// Cost over [`DAYS_PER_MONTH`] days
    pub monthly_cost: f64,
}

/// Projected monthly cost of a usage pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    /// Per instance type
    pub instances: IndexMap<String, MonthlyLine>,
    /// Sum over instance types
    pub total_monthly_cost: f64,
    /// Total divided by the days in the month
    pub daily_average: f64,
}

impl PriceCatalog {
    /// Hourly rate of an instance type, if listed
    pub fn hourly_rate(&self, instance_type: &str) -> Option<f64> {
        self.hourly_rates.get(instance_type).copied()
    }

    fn require_rate(&self, instance_type: &str) -> Result<f64> {
        self.hourly_rate(instance_type).ok_or_else(|| {
            McdmError::validation_field(
                format!("No price listed for instance type '{instance_type}'"),
                instance_type,
            )
        })
    }

    /// Cost of one test of `duration_seconds` transferring `transfer_gb` out
    pub fn test_cost(&self, instance_type: &str, duration_seconds: f64, transfer_gb: f64) -> Result<TestCost> {
        let hourly_rate = self.require_rate(instance_type)?;
        let duration_hours = duration_seconds / 3600.0;
        let compute = hourly_rate * duration_hours;
        let data_transfer = transfer_gb * self.data_transfer_out;

        Ok(TestCost {
            instance_type: instance_type.to_string(),
            duration_hours,
            hourly_rate,
            compute,
            data_transfer,
            total: compute + data_transfer,
        })
    }

    /// Estimate a suite: every test, one client instance per test and
    /// setup/teardown per benchmarked instance
    pub fn estimate_suite(&self, plan: &SuitePlan) -> Result<SuiteEstimate> {
        let mut per_test = Vec::with_capacity(plan.test_count());
        for instance in &plan.instances {
            for _ in &plan.rps_levels {
                per_test.push(self.test_cost(
                    instance,
                    plan.test_duration,
                    plan.data_transfer_per_test_gb,
                )?);
            }
        }

        let compute: f64 = per_test.iter().map(|t| t.compute).sum();
        let data_transfer: f64 = per_test.iter().map(|t| t.data_transfer).sum();
        let client_overhead = self.require_rate(CLIENT_INSTANCE)?
            * (plan.test_duration / 3600.0)
            * plan.test_count() as f64;
        let setup_teardown = plan
            .instances
            .iter()
            .map(|instance| self.require_rate(instance))
            .sum::<Result<f64>>()?
            * SETUP_HOURS_PER_INSTANCE;
        let total = compute + data_transfer + client_overhead + setup_teardown;

        debug!(tests = plan.test_count(), total, "Estimated suite cost");
        Ok(SuiteEstimate {
            test_count: plan.test_count(),
            compute,
            data_transfer,
            client_overhead,
            setup_teardown,
            total,
            per_test,
            budget_impact: BudgetImpact::new(total, plan.budget)?,
        })
    }

    /// Instances whose throughput reaches `required_rps` and whose test of
    /// `duration_seconds` costs at most `budget`, most requests per dollar first.
    ///
    /// `throughput` maps instance types to expected requests per second (see
    /// [`reference_throughput`]). Equal efficiencies keep the map order.
    pub fn fit_budget(
        &self,
        budget: f64,
        duration_seconds: f64,
        required_rps: f64,
        throughput: &IndexMap<String, f64>,
    ) -> Result<Vec<BudgetCandidate>> {
        if budget.is_nan() || budget <= 0.0 {
            return Err(McdmError::validation_field(
                format!("Budget must be positive, got {budget}"),
                "budget",
            ));
        }
        if duration_seconds.is_nan() || duration_seconds <= 0.0 {
            return Err(McdmError::validation_field(
                format!("Test duration must be positive, got {duration_seconds}"),
                "duration_seconds",
            ));
        }

        let mut candidates = Vec::new();
        for (instance_type, &rps) in throughput {
            if rps < required_rps {
                continue;
            }
            let cost = self.test_cost(instance_type, duration_seconds, 0.0)?.total;
            if cost > budget {
                continue;
            }
            candidates.push(BudgetCandidate {
                instance_type: instance_type.clone(),
                estimated_performance: rps,
                cost,
                efficiency: safe_divide(rps, cost, 0.0),
            });
        }

        candidates.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
        debug!(
            candidates = candidates.len(),
            budget, required_rps, "Filtered instances by budget"
        );
        Ok(candidates)
    }

    /// Project a month of daily usage (hours per day by instance type)
    pub fn project_monthly(&self, daily_hours: &IndexMap<String, f64>) -> Result<MonthlyProjection> {
        let mut instances = IndexMap::with_capacity(daily_hours.len());
        let mut total_monthly_cost = 0.0;

        for (instance_type, &hours_per_day) in daily_hours {
            let hourly_rate = self.require_rate(instance_type)?;
            let daily_cost = hours_per_day * hourly_rate;
            let monthly_cost = daily_cost * DAYS_PER_MONTH;
            total_monthly_cost += monthly_cost;
            instances.insert(
                instance_type.clone(),
                MonthlyLine {
                    hours_per_day,
                    hourly_rate,
                    daily_cost,
                    monthly_cost,
                },
            );
        }

        Ok(MonthlyProjection {
            instances,
            total_monthly_cost,
            daily_average: total_monthly_cost / DAYS_PER_MONTH,
        })
    }
}
