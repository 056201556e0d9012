//! Greedy batch scheduler.
//!
//! # Algorithm
//!
//! 1. Sort jobs by priority (high first), then preferred date, then id.
//! 2. Schedule each job with the slot matcher against the roster as
//!    booked so far.
//! 3. Mark the assigned roster entry unavailable on the booked date, so
//!    one crew takes at most one job per day. Entries are tracked by roster
//!    index, so duplicate crew ids cannot be confused.
//!
//! Not optimal: an early job can take the only crew a later job could
//! use. It is deterministic and fast, which is what dispatch needs.
//!
//! # Complexity
//! O(n · c · d) for n jobs, c crews and d candidate dates per job.

use tracing::info;

use super::kpi::BatchKpi;
use super::matcher::SlotMatcher;
use crate::config::PlannerConfig;
use crate::error::{ConfigError, ScheduleError};
use crate::models::{Crew, MoveJobRequest, ScheduleResult};

/// Result for one job of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub job_id: String,
    pub result: Result<ScheduleResult, ScheduleError>,
}

/// Outcomes in scheduling order plus batch KPIs.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSchedule {
    pub outcomes: Vec<JobOutcome>,
    pub kpi: BatchKpi,
}

impl BatchSchedule {
    /// Outcome for a job id.
    pub fn outcome(&self, job_id: &str) -> Option<&JobOutcome> {
        self.outcomes.iter().find(|o| o.job_id == job_id)
    }

    /// Successfully scheduled jobs.
    pub fn scheduled(&self) -> impl Iterator<Item = &ScheduleResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Schedules many jobs against one roster without double booking.
///
/// # Example
///
/// ```
/// use crew_planner::scheduler::BatchScheduler;
/// use crew_planner::models::{Crew, MoveJobRequest};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
/// let jobs = vec![
///     MoveJobRequest::new("J1", 15.0, 10.0).with_preferred_date(date),
///     MoveJobRequest::new("J2", 15.0, 10.0).with_preferred_date(date),
/// ];
/// let roster = vec![Crew::new("C1", 3).with_skill("moving").with_vehicle_capacity(30.0)];
///
/// let batch = BatchScheduler::default().schedule(&jobs, &roster);
/// assert_eq!(batch.kpi.scheduled, 1);
/// assert_eq!(batch.kpi.unscheduled, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler {
    matcher: SlotMatcher,
}

impl BatchScheduler {
    /// Creates a batch scheduler from the full engine configuration.
    ///
    /// # Errors
    /// Any estimator or scheduler parameter that fails validation.
    pub fn new(config: &PlannerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: SlotMatcher::new(config)?,
        })
    }

    /// Uses a custom slot matcher.
    pub fn with_matcher(matcher: SlotMatcher) -> Self {
        Self { matcher }
    }

    /// Schedules all jobs in batch order.
    pub fn schedule(&self, jobs: &[MoveJobRequest], roster: &[Crew]) -> BatchSchedule {
        let mut order: Vec<&MoveJobRequest> = jobs.iter().collect();
        order.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.preferred_date.cmp(&b.preferred_date))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut booked: Vec<Crew> = roster.to_vec();
        let mut outcomes = Vec::with_capacity(jobs.len());

        for job in order {
            let result = self
                .matcher
                .schedule_indexed(job, &booked)
                .map(|(mut result, index)| {
                    booked[index]
                        .unavailable_dates
                        .insert(result.scheduled_slot.date);
                    // Report the crew as given, not as booked
                    result.assigned_crew = roster[index].clone();
                    result
                });
            outcomes.push(JobOutcome {
                job_id: job.id.clone(),
                result,
            });
        }

        let kpi = BatchKpi::calculate(&outcomes, roster);
        info!(
            jobs = jobs.len(),
            scheduled = kpi.scheduled,
            unscheduled = kpi.unscheduled,
            "batch scheduled"
        );

        BatchSchedule { outcomes, kpi }
    }
}

/// Schedules a batch of jobs under the given configuration.
///
/// # Errors
/// `ConfigError` if the configuration fails validation; per-job failures
/// are reported in the outcomes instead.
pub fn schedule_batch(
    jobs: &[MoveJobRequest],
    roster: &[Crew],
    config: &PlannerConfig,
) -> Result<BatchSchedule, ConfigError> {
    Ok(BatchScheduler::new(config)?.schedule(jobs, roster))
}
