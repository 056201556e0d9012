//! Schedule decision model.
//!
//! The result of matching one job against a crew roster: the chosen
//! crew, the booked slot, and ranked alternatives the dispatcher can
//! fall back to.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Crew;
use crate::error::EstimateWarning;

/// A booked time slot on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    /// Move date.
    pub date: NaiveDate,
    /// Crew arrival.
    pub start: NaiveTime,
    /// Expected completion.
    pub end: NaiveTime,
}

impl ScheduledSlot {
    /// Slot length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Per-factor contributions to an option's composite score.
///
/// Each field is already multiplied by its weight; `total` is their sum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Proximity of the crew's home base to the customer.
    pub travel: f64,
    /// Crew performance rating.
    pub efficiency: f64,
    /// Closeness of the slot date to the preferred date.
    pub date_fit: f64,
    /// Composite score.
    pub total: f64,
}

/// A ranked crew/slot combination other than the primary assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSlot {
    /// Crew that would take the job.
    pub crew_id: String,
    /// Slot on that crew's calendar.
    pub slot: ScheduledSlot,
    /// Duration for that crew's size (hours).
    pub total_duration_hours: f64,
    /// Travel from the crew's home base (hours).
    pub travel_time_hours: f64,
    /// Composite score.
    pub score: f64,
}

/// Outcome of scheduling one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Job that was scheduled.
    pub job_id: String,
    /// Crew that takes the job.
    pub assigned_crew: Crew,
    /// Booked slot.
    pub scheduled_slot: ScheduledSlot,
    /// Estimated job duration for the assigned crew (hours).
    pub total_duration_hours: f64,
    /// Travel from the crew's home base to the customer (hours).
    pub travel_time_hours: f64,
    /// Composite score of the chosen option.
    pub efficiency_score: f64,
    /// Weighted factor contributions behind `efficiency_score`.
    pub score_breakdown: ScoreBreakdown,
    /// Next-best options, best first. Never contains the primary.
    pub alternative_slots: Vec<AlternativeSlot>,
    /// Human-readable notes about the match.
    pub notes: Vec<String>,
    /// Estimator warnings for the assigned crew, e.g. a clamped crew size.
    #[serde(skip)]
    pub warnings: Vec<EstimateWarning>,
}

impl ScheduleResult {
    /// Id of the assigned crew.
    pub fn crew_id(&self) -> &str {
        &self.assigned_crew.id
    }
}
