//! Slot matcher.
//!
//! # Algorithm
//!
//! 1. Reject malformed jobs.
//! 2. Filter the roster by skills and vehicle capacity.
//!    Nothing left → `NoAvailableCrew`.
//! 3. For each eligible crew, re-run the estimator at the crew's size and
//!    drop the crew if the job does not fit its working-hours window.
//! 4. Expand each remaining crew into one option per bookable date in the
//!    job's flexibility window, and score it.
//!    Nothing left → `InfeasibleSlot`.
//! 5. Rank options (score desc, crew id asc, date asc); the top one is
//!    booked, the next K are alternatives.
//!
//! Step 3-4 are independent per crew and run on the rayon pool for large
//! rosters. Ranking happens after collection, so output does not depend
//! on thread count.
//!
//! # Complexity
//! O(c · d) options for c crews and d candidate dates, plus the sort.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rayon::prelude::*;
use tracing::{debug, info};

use super::eligibility::{check_eligibility, required_skills};
use super::scoring::{rank_options, ScoreCard, SchedulingOption, ScoringContext};
use crate::config::{PlannerConfig, SchedulerConfig, WeekendPolicy};
use crate::error::{ConfigError, EstimateWarning, ScheduleError};
use crate::estimation::{validate_job, EffortEstimator};
use crate::models::{
    AlternativeSlot, Crew, MoveJobRequest, Priority, ScheduleResult, ScheduledSlot,
};

/// Per-crew evaluation before date expansion.
struct CrewFit {
    crew_index: usize,
    total_hours: f64,
    warnings: Vec<EstimateWarning>,
    options: Vec<SchedulingOption>,
}

/// Matches jobs to crews and time slots.
///
/// # Example
///
/// ```
/// use crew_planner::scheduler::SlotMatcher;
/// use crew_planner::models::{Crew, MoveJobRequest, Coordinates};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
/// let job = MoveJobRequest::new("J1", 20.0, 15.0)
///     .with_location(Coordinates::new(59.33, 18.06))
///     .with_preferred_date(date);
/// let roster = vec![
///     Crew::new("C1", 3).with_skill("moving").with_vehicle_capacity(30.0),
///     Crew::new("C2", 2).with_skill("moving").with_vehicle_capacity(10.0),
/// ];
///
/// let result = SlotMatcher::default().schedule(&job, &roster).unwrap();
/// assert_eq!(result.crew_id(), "C1");
/// assert_eq!(result.scheduled_slot.date, date);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlotMatcher {
    estimator: EffortEstimator,
    config: SchedulerConfig,
}

impl SlotMatcher {
    /// Creates a matcher from the full engine configuration.
    ///
    /// # Errors
    /// Any estimator or scheduler parameter that fails validation.
    pub fn new(config: &PlannerConfig) -> Result<Self, ConfigError> {
        config.scheduler.validate()?;
        Ok(Self {
            estimator: EffortEstimator::new(config.estimator.clone())?,
            config: config.scheduler.clone(),
        })
    }

    /// Replaces the scheduler settings.
    ///
    /// The settings are validated on every `schedule` call.
    pub fn with_scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the estimator.
    pub fn with_estimator(mut self, estimator: EffortEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Scheduler settings in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules one job against a roster.
    ///
    /// # Errors
    /// - `InvalidConfig` if the scheduler settings are unusable.
    /// - `InvalidInput` if the job attributes are malformed.
    /// - `NoAvailableCrew` if no crew has the skills and capacity.
    /// - `InfeasibleSlot` if eligible crews exist but none can fit the job
    ///   into a working day on an acceptable date.
    pub fn schedule(
        &self,
        job: &MoveJobRequest,
        roster: &[Crew],
    ) -> Result<ScheduleResult, ScheduleError> {
        self.schedule_indexed(job, roster).map(|(result, _)| result)
    }

    /// Like [`schedule`](Self::schedule), also returning the roster index
    /// of the assigned crew.
    ///
    /// Crew ids need not be unique; the index identifies the entry.
    pub(crate) fn schedule_indexed(
        &self,
        job: &MoveJobRequest,
        roster: &[Crew],
    ) -> Result<(ScheduleResult, usize), ScheduleError> {
        self.config.validate()?;
        validate_job(job)?;

        let required = required_skills(job, &self.config);
        let eligible: Vec<usize> = roster
            .iter()
            .enumerate()
            .filter_map(|(i, crew)| match check_eligibility(crew, job, &required) {
                Ok(()) => Some(i),
                Err(reason) => {
                    debug!(job_id = %job.id, crew_id = %crew.id, ?reason, "crew ineligible");
                    None
                }
            })
            .collect();

        if eligible.is_empty() {
            info!(job_id = %job.id, roster = roster.len(), "no eligible crew");
            return Err(ScheduleError::NoAvailableCrew {
                job_id: job.id.clone(),
            });
        }

        let dates = self.candidate_dates(job);
        let card = ScoreCard::new(&self.config);
        let evaluate = |&i: &usize| self.evaluate_crew(job, &roster[i], i, &dates, &card);

        let fits: Vec<Result<CrewFit, ScheduleError>> =
            if eligible.len() >= self.config.parallel_threshold {
                eligible.par_iter().map(evaluate).collect()
            } else {
                eligible.iter().map(evaluate).collect()
            };

        let mut options = Vec::new();
        let mut warnings_by_crew = Vec::with_capacity(fits.len());
        let mut shortest_hours = f64::INFINITY;
        for fit in fits {
            let fit = fit?;
            shortest_hours = shortest_hours.min(fit.total_hours);
            options.extend(fit.options);
            warnings_by_crew.push((fit.crew_index, fit.warnings));
        }

        rank_options(&mut options);

        let mut ranked = options.into_iter();
        let Some(best) = ranked.next() else {
            info!(job_id = %job.id, eligible = eligible.len(), "no feasible slot");
            return Err(ScheduleError::InfeasibleSlot {
                job_id: job.id.clone(),
                required_hours: shortest_hours,
                preferred_date: job.preferred_date,
            });
        };

        let alternative_slots: Vec<AlternativeSlot> = ranked
            .take(self.config.alternative_count)
            .map(|opt| AlternativeSlot {
                slot: slot_for(&roster[opt.crew_index], opt.date, opt.total_minutes),
                crew_id: opt.crew_id,
                total_duration_hours: opt.total_hours,
                travel_time_hours: opt.travel_hours,
                score: opt.score.total,
            })
            .collect();

        let crew = &roster[best.crew_index];
        let notes = self.notes(job, crew, &best);
        let warnings = warnings_by_crew
            .into_iter()
            .find(|(index, _)| *index == best.crew_index)
            .map(|(_, warnings)| warnings)
            .unwrap_or_default();
        let scheduled_slot = slot_for(crew, best.date, best.total_minutes);

        info!(
            job_id = %job.id,
            crew_id = %crew.id,
            date = %scheduled_slot.date,
            score = best.score.total,
            alternatives = alternative_slots.len(),
            "job scheduled"
        );

        let result = ScheduleResult {
            job_id: job.id.clone(),
            assigned_crew: crew.clone(),
            scheduled_slot,
            total_duration_hours: best.total_hours,
            travel_time_hours: best.travel_hours,
            efficiency_score: best.score.total,
            score_breakdown: best.score,
            alternative_slots,
            notes,
            warnings,
        };
        Ok((result, best.crew_index))
    }

    /// Dates the job may be booked on, with their signed offsets.
    ///
    /// Weekends are dropped for non-high-priority jobs under
    /// `WeekendPolicy::HighPriorityOnly`.
    pub fn candidate_dates(&self, job: &MoveJobRequest) -> Vec<(NaiveDate, i64)> {
        let window = self.config.flexibility_days.days(job.flexibility) as i64;
        let weekends_allowed = match self.config.weekend_policy {
            WeekendPolicy::Allow => true,
            WeekendPolicy::HighPriorityOnly => job.priority == Priority::High,
        };

        (-window..=window)
            .filter_map(|offset| {
                job.preferred_date
                    .checked_add_signed(Duration::days(offset))
                    .map(|date| (date, offset))
            })
            .filter(|(date, _)| weekends_allowed || !is_weekend(*date))
            .collect()
    }

    fn evaluate_crew(
        &self,
        job: &MoveJobRequest,
        crew: &Crew,
        crew_index: usize,
        dates: &[(NaiveDate, i64)],
        card: &ScoreCard,
    ) -> Result<CrewFit, ScheduleError> {
        let estimate = self.estimator.estimate(job, crew.size)?;
        let total_hours = estimate.breakdown.total_hours;
        let total_minutes = estimate.breakdown.total_minutes();

        if !crew.working_hours.fits(total_minutes) {
            debug!(
                job_id = %job.id,
                crew_id = %crew.id,
                total_hours,
                window_hours = crew.working_hours.duration_hours(),
                "job does not fit working hours"
            );
            return Ok(CrewFit {
                crew_index,
                total_hours,
                warnings: estimate.warnings,
                options: Vec::new(),
            });
        }

        let travel_hours =
            crew.home_base.distance_km(&job.customer_location) / self.config.travel_speed_kmh;
        let window_days = self.config.flexibility_days.days(job.flexibility);

        let options = dates
            .iter()
            .filter(|(date, _)| crew.is_available_on(*date))
            .map(|&(date, day_offset)| {
                let ctx = ScoringContext {
                    job,
                    crew,
                    travel_hours,
                    day_offset,
                    window_days,
                };
                SchedulingOption {
                    crew_index,
                    crew_id: crew.id.clone(),
                    date,
                    day_offset,
                    total_hours,
                    total_minutes,
                    travel_hours,
                    score: card.score(&ctx),
                }
            })
            .collect();

        Ok(CrewFit {
            crew_index,
            total_hours,
            warnings: estimate.warnings,
            options,
        })
    }

    fn notes(&self, job: &MoveJobRequest, crew: &Crew, best: &SchedulingOption) -> Vec<String> {
        let mut notes = Vec::new();
        if best.score.total > 0.8 {
            notes.push("strong match between crew and job".to_string());
        }

        let cfg = self.estimator.config();
        let optimal = self.estimator.model().optimal_size(cfg.max_practical_crew_size);
        if crew.size == optimal {
            notes.push("crew size matches the recommended size".to_string());
        }

        if best.day_offset != 0 {
            let days = best.day_offset.unsigned_abs();
            let direction = if best.day_offset > 0 { "after" } else { "before" };
            let unit = if days == 1 { "day" } else { "days" };
            notes.push(format!("booked {days} {unit} {direction} the preferred date"));
        }

        if matches!(
            best.date.weekday(),
            Weekday::Tue | Weekday::Wed | Weekday::Thu
        ) {
            notes.push("mid-week date with lighter traffic".to_string());
        }

        if crew.vehicle_capacity_cubic_meters > job.volume_cubic_meters * 1.5 {
            notes.push("ample cargo space".to_string());
        }
        notes
    }
}

/// Schedules one job against a roster under the given configuration.
pub fn schedule_job(
    job: &MoveJobRequest,
    roster: &[Crew],
    config: &PlannerConfig,
) -> Result<ScheduleResult, ScheduleError> {
    SlotMatcher::new(config)?.schedule(job, roster)
}

/// Slot anchored at the start of the crew's working day.
///
/// Callers guarantee the duration fits the window.
fn slot_for(crew: &Crew, date: NaiveDate, total_minutes: i64) -> ScheduledSlot {
    let start = crew.working_hours.start;
    ScheduledSlot {
        date,
        start,
        end: start + Duration::minutes(total_minutes),
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
