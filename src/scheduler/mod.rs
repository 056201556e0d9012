//! Crew and time-slot scheduling.
//!
//! # Pipeline
//!
//! - **`eligibility`**: skills and vehicle capacity filter.
//! - **`scoring`**: weighted travel / crew performance / date fit rules.
//! - **`matcher`**: one job → best crew and date, plus alternatives.
//! - **`batch`**: many jobs → greedy booking without double booking.
//! - **`kpi`**: batch quality metrics.
//!
//! "No crew" and "no slot" are `ScheduleError` values, never panics or
//! truncated slots.

mod batch;
mod eligibility;
mod kpi;
mod matcher;
mod scoring;

pub use batch::{schedule_batch, BatchSchedule, BatchScheduler, JobOutcome};
pub use eligibility::{check_eligibility, required_skills, Ineligibility};
pub use kpi::BatchKpi;
pub use matcher::{schedule_job, SlotMatcher};
pub use scoring::{
    rank_options, CrewPerformance, DateFit, ScoreCard, SchedulingOption, ScoringContext,
    ScoringRule, TravelProximity,
};
