//! Flagship school financial model - 10-year projection engine
//!
//! This library provides:
//! - Parameter sets and the pessimistic/realistic/optimistic presets
//! - A pure year calculator with sparse per-year overrides
//! - Projection builder over years 0..=N
//! - Investment analytics (IRR, NPV, payback, summary aggregates)
//! - Scenario comparison and CSV report tables

pub mod error;
pub mod parameters;
pub mod projection;
pub mod analytics;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{ModelError, Result};
pub use parameters::{ParameterSet, Scenario, YearOverride, YearlyOverrides};
pub use projection::{calculate_projection, calculate_year_data, ProjectionConfig, ProjectionEngine, YearRecord};
pub use analytics::{ModelOutput, ProjectionSummary};
pub use scenario::ScenarioRunner;
