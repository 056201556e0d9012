//! Job effort estimation and crew scheduling for a moving company.
//!
//! Turns a move request into an hour estimate, recommends a crew size,
//! books the best crew and date from a roster, and compares the estimate
//! with a market baseline. Everything is synchronous and deterministic:
//! roster and configuration are passed into every call.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `MoveJobRequest`, `Crew`,
//!   `EffortBreakdown`, `ScheduleResult`, `Coordinates`
//! - **`estimation`**: Throughput model, effort estimator, crew-size optimizer
//! - **`scheduler`**: Eligibility, scoring, slot matching, batch booking, KPIs
//! - **`benchmark`**: Competitive positioning against the market baseline
//! - **`config`**: Tunable parameters with JSON loading
//! - **`validation`**: Roster and job integrity checks
//! - **`error`**: Error and warning types
//!
//! # Data Flow
//!
//! ```text
//! MoveJobRequest ─▶ EffortEstimator ─▶ CrewOptimizer
//!        │                 ▲
//!        ▼                 │ (per candidate crew)
//!   SlotMatcher ───────────┘ ─▶ ScheduleResult ─▶ benchmark
//! ```
//!
//! # Example
//!
//! ```
//! use crew_planner::{estimate_effort, schedule_job, PlannerConfig};
//! use crew_planner::models::{Crew, MoveJobRequest};
//! use chrono::NaiveDate;
//!
//! let config = PlannerConfig::default();
//! let job = MoveJobRequest::new("J1", 24.0, 26.8)
//!     .with_preferred_date(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
//!
//! let estimate = estimate_effort(&job, 2, &config.estimator).unwrap();
//! assert_eq!(estimate.total_hours(), 6.75);
//!
//! let roster = vec![Crew::new("C1", 2).with_skill("moving").with_vehicle_capacity(30.0)];
//! let result = schedule_job(&job, &roster, &config).unwrap();
//! assert_eq!(result.total_duration_hours, 6.75);
//! ```

pub mod benchmark;
pub mod config;
pub mod error;
pub mod estimation;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use benchmark::{benchmark, CompetitiveAnalysis, CompetitivePosition};
pub use config::{BenchmarkConfig, EstimatorConfig, PlannerConfig, SchedulerConfig};
pub use error::{ConfigError, EstimateError, EstimateWarning, ScheduleError};
pub use estimation::{estimate_effort, optimize_crew_size};
pub use scheduler::{schedule_batch, schedule_job};
pub use validation::{validate_job, validate_roster};
