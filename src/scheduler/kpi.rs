//! Batch schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled | Jobs with an assigned crew and slot |
//! | Unscheduled | Jobs that failed with a `ScheduleError` |
//! | Scheduling Rate | scheduled / total |
//! | Avg Travel | Mean home-base travel of scheduled jobs (hours) |
//! | Avg Efficiency Score | Mean composite score of scheduled jobs |
//! | Crew Share | Fraction of the roster with at least one booking |
//! | Crew Utilization | Booked hours / working hours on booked days, per crew |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::batch::JobOutcome;
use crate::models::Crew;

/// Batch performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchKpi {
    /// Jobs that received a slot.
    pub scheduled: usize,
    /// Jobs that did not.
    pub unscheduled: usize,
    /// Fraction of jobs scheduled (1.0 for an empty batch).
    pub scheduling_rate: f64,
    /// Mean travel time of scheduled jobs (hours).
    pub avg_travel_hours: f64,
    /// Mean composite score of scheduled jobs.
    pub avg_efficiency_score: f64,
    /// Fraction of the roster that received at least one job.
    pub crew_share: f64,
    /// Job hours booked per crew.
    pub booked_hours_by_crew: BTreeMap<String, f64>,
    /// Per-crew utilization of its working days (0.0..1.0).
    pub utilization_by_crew: BTreeMap<String, f64>,
}

impl BatchKpi {
    /// Computes KPIs from batch outcomes and the roster they ran against.
    pub fn calculate(outcomes: &[JobOutcome], roster: &[Crew]) -> Self {
        let mut scheduled = 0usize;
        let mut total_travel = 0.0;
        let mut total_score = 0.0;
        let mut booked_hours_by_crew: BTreeMap<String, f64> = BTreeMap::new();
        let mut booked_days_by_crew: BTreeMap<String, usize> = BTreeMap::new();

        for result in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
            scheduled += 1;
            total_travel += result.travel_time_hours;
            total_score += result.efficiency_score;
            *booked_hours_by_crew
                .entry(result.crew_id().to_string())
                .or_insert(0.0) += result.total_duration_hours;
            // One job per crew per day
            *booked_days_by_crew
                .entry(result.crew_id().to_string())
                .or_insert(0) += 1;
        }

        let utilization_by_crew = roster
            .iter()
            .filter_map(|crew| {
                let hours = booked_hours_by_crew.get(&crew.id)?;
                let days = booked_days_by_crew.get(&crew.id).copied().unwrap_or(0);
                let available = days as f64 * crew.working_hours.duration_hours();
                let utilization = if available > 0.0 {
                    (hours / available).min(1.0)
                } else {
                    0.0
                };
                Some((crew.id.clone(), utilization))
            })
            .collect();

        let total = outcomes.len();
        let mean = |sum: f64| {
            if scheduled == 0 {
                0.0
            } else {
                sum / scheduled as f64
            }
        };

        Self {
            scheduled,
            unscheduled: total - scheduled,
            scheduling_rate: if total == 0 {
                1.0
            } else {
                scheduled as f64 / total as f64
            },
            avg_travel_hours: mean(total_travel),
            avg_efficiency_score: mean(total_score),
            crew_share: if roster.is_empty() {
                0.0
            } else {
                booked_hours_by_crew.len() as f64 / roster.len() as f64
            },
            booked_hours_by_crew,
            utilization_by_crew,
        }
    }

    /// Whether the batch meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_scheduling_rate: f64, max_avg_travel_hours: f64) -> bool {
        self.scheduling_rate >= min_scheduling_rate && self.avg_travel_hours <= max_avg_travel_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::{ScheduleResult, ScheduledSlot, ScoreBreakdown, WorkingHours};
    use chrono::{NaiveDate, NaiveTime};

    fn crew(id: &str) -> Crew {
        Crew::new(id, 2).with_working_hours(WorkingHours::from_hours(8, 16))
    }

    fn scheduled(job_id: &str, crew: &Crew, day: u32, hours: f64, travel: f64, score: f64) -> JobOutcome {
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        JobOutcome {
            job_id: job_id.into(),
            result: Ok(ScheduleResult {
                job_id: job_id.into(),
                assigned_crew: crew.clone(),
                scheduled_slot: ScheduledSlot {
                    date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
                    start,
                    end: start + chrono::Duration::minutes((hours * 60.0) as i64),
                },
                total_duration_hours: hours,
                travel_time_hours: travel,
                efficiency_score: score,
                score_breakdown: ScoreBreakdown::default(),
                alternative_slots: Vec::new(),
                notes: Vec::new(),
                warnings: Vec::new(),
            }),
        }
    }

    fn failed(job_id: &str) -> JobOutcome {
        JobOutcome {
            job_id: job_id.into(),
            result: Err(ScheduleError::NoAvailableCrew {
                job_id: job_id.into(),
            }),
        }
    }

    #[test]
    fn test_kpi_basic() {
        let roster = vec![crew("C1"), crew("C2")];
        let outcomes = vec![
            scheduled("J1", &roster[0], 10, 4.0, 0.2, 0.9),
            scheduled("J2", &roster[0], 11, 6.0, 0.4, 0.7),
            failed("J3"),
        ];
        let kpi = BatchKpi::calculate(&outcomes, &roster);

        assert_eq!(kpi.scheduled, 2);
        assert_eq!(kpi.unscheduled, 1);
        assert!((kpi.scheduling_rate - 2.0 / 3.0).abs() < 1e-10);
        assert!((kpi.avg_travel_hours - 0.3).abs() < 1e-10);
        assert!((kpi.avg_efficiency_score - 0.8).abs() < 1e-10);
        assert!((kpi.crew_share - 0.5).abs() < 1e-10);
        // 10h over two 8h days
        assert!((kpi.booked_hours_by_crew["C1"] - 10.0).abs() < 1e-10);
        assert!((kpi.utilization_by_crew["C1"] - 0.625).abs() < 1e-10);
        assert!(!kpi.utilization_by_crew.contains_key("C2"));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = BatchKpi::calculate(&[], &[]);
        assert_eq!(kpi.scheduled, 0);
        assert_eq!(kpi.unscheduled, 0);
        assert!((kpi.scheduling_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.avg_travel_hours, 0.0);
        assert_eq!(kpi.crew_share, 0.0);
    }

    #[test]
    fn test_meets_thresholds() {
        let roster = vec![crew("C1")];
        let outcomes = vec![scheduled("J1", &roster[0], 10, 4.0, 0.5, 0.8), failed("J2")];
        let kpi = BatchKpi::calculate(&outcomes, &roster);
        assert!(kpi.meets_thresholds(0.5, 0.5));
        assert!(!kpi.meets_thresholds(0.6, 0.5));
        assert!(!kpi.meets_thresholds(0.5, 0.4));
    }
}
