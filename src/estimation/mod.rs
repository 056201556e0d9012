//! Effort estimation and crew sizing.
//!
//! Three layers, each built on the one before:
//!
//! - **`CrewEfficiencyModel`**: crew size → moving throughput (m³/hour).
//! - **`EffortEstimator`**: job attributes + crew size → hour breakdown.
//! - **`CrewOptimizer`**: runs the estimator across crew sizes and
//!   recommends one.
//!
//! Pricing, CRM job views and dispatch all go through these types so
//! every caller sees the same numbers.

mod effort;
mod optimizer;
mod throughput;

pub(crate) use effort::validate_job;
pub use effort::{estimate_effort, EffortEstimator, Estimate};
pub use optimizer::{
    optimize_crew_size, CrewOptimization, CrewOptimizer, CrewSizeEvaluation, EfficiencyRating,
};
pub use throughput::{ClampedSize, CrewEfficiencyModel};
