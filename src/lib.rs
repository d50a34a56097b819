//! # mcdm-rs: Multi-Criteria Decision Engine for Instance Selection
//!
//! Ranks benchmarked cloud instance types by weighing throughput, latency,
//! resource usage and price against each other, and checks how much that
//! ranking depends on the chosen weights:
//!
//! - **Ranking**: TOPSIS, with SAW and WPM for cross-validation
//! - **Method Comparison**: Kendall tau-b agreement and a consensus level
//! - **Sensitivity Analysis**: one-criterion weight sweeps, stability indices and leader breakpoints
//! - **Monte Carlo Validation**: Dirichlet weight draws, confidence intervals and significance tests
//! - **Profiling**: load test summaries and prices turned into decision-matrix rows
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 API Layer (DecisionEngine)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Core          │  Rankers   │  Analysis       │  Profiling  │
//! │ • Criteria     │ • TOPSIS   │ • Comparison    │ • Profiles  │
//! │ • Matrix       │ • SAW      │ • Sensitivity   │ • Pricing   │
//! │ • Statistics   │ • WPM      │ • Monte Carlo   │             │
//! │ • Config       │            │                 │             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcdm_rs::{DecisionEngine, EngineConfig, OptimizationRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = OptimizationRequest::from_json_str(
//!         r#"{"alternatives": {
//!             "t3.micro": {"performance": 150, "response_time": 80, "cpu_usage": 45, "memory_usage": 35, "cost": 0.0104},
//!             "t3.small": {"performance": 300, "response_time": 50, "cpu_usage": 35, "memory_usage": 28, "cost": 0.0208}
//!         }}"#,
//!     )?;
//!
//!     let engine = DecisionEngine::new(EngineConfig::default())?;
//!     let outcome = engine.optimize(&request)?;
//!
//!     println!("Best instance: {}", outcome.best_alternative);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core data model and numerics
pub mod core {
    //! Decision matrix, criteria, normalization and statistics.

    pub mod config;
    pub mod criteria;
    pub mod errors;
    pub mod matrix;
    pub mod normalization;
    pub mod numeric;
    pub mod statistics;
}

// Ranking methods
pub mod rankers;

// Robustness analyses over the rankers
pub mod analysis {
    //! Method comparison, weight sensitivity and Monte Carlo validation.

    pub mod comparison;
    pub mod monte_carlo;
    pub mod sensitivity;
}

// Benchmark data preparation
pub mod profiling {
    //! Instance profiles and price estimates from benchmark output.

    pub mod pricing;
    pub mod profile;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod request;
}

// Re-export primary types for convenience
pub use api::engine::DecisionEngine;
pub use api::request::OptimizationRequest;
pub use core::config::EngineConfig;
pub use core::criteria::{CriteriaSet, Criterion, Direction, WeightVector};
pub use core::errors::{McdmError, Result, ResultExt};
pub use core::matrix::{Alternative, DecisionMatrix};
pub use rankers::{Ranker, RankingMethod, RankingOutcome};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
