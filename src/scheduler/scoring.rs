//! Scoring rules for crew/date options.
//!
//! Each rule rates one aspect of an option on `[0, 1]`, higher is
//! better. The composite score is the weighted sum of the three
//! built-in rules.
//!
//! # Score Convention
//! **Higher score = better option.** Ranking sorts by composite score
//! descending, then crew id ascending, then date ascending, which makes
//! the order total and independent of evaluation order.

use std::cmp::Ordering;
use std::fmt::Debug;

use chrono::NaiveDate;

use crate::config::{ScoreWeights, SchedulerConfig};
use crate::models::{Crew, MoveJobRequest, ScoreBreakdown};

/// One crew on one date, with everything needed to score it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingOption {
    /// Index of the crew in the roster.
    pub crew_index: usize,
    /// Crew id, kept for tie-breaking.
    pub crew_id: String,
    /// Candidate date.
    pub date: NaiveDate,
    /// Signed days from the preferred date.
    pub day_offset: i64,
    /// Job duration for this crew (hours).
    pub total_hours: f64,
    /// Job duration for this crew (whole minutes).
    pub total_minutes: i64,
    /// Travel from home base to the customer (hours).
    pub travel_hours: f64,
    /// Weighted factor scores.
    pub score: ScoreBreakdown,
}

impl SchedulingOption {
    /// Ranking order: best first.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total
            .total_cmp(&self.score.total)
            .then_with(|| self.crew_id.cmp(&other.crew_id))
            .then_with(|| self.date.cmp(&other.date))
    }
}

/// Inputs a scoring rule can look at.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Job being placed.
    pub job: &'a MoveJobRequest,
    /// Candidate crew.
    pub crew: &'a Crew,
    /// Travel from home base (hours).
    pub travel_hours: f64,
    /// Signed days from the preferred date.
    pub day_offset: i64,
    /// Allowed days either side for this job.
    pub window_days: u32,
}

/// A scoring rule.
///
/// Returns a value on `[0, 1]` where higher is better.
pub trait ScoringRule: Send + Sync + Debug {
    /// Rule name.
    fn name(&self) -> &'static str;

    /// Rates the option.
    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f64;
}

/// Closer crews score higher; zero at or beyond `max_travel_hours`.
#[derive(Debug, Clone, Copy)]
pub struct TravelProximity {
    pub max_travel_hours: f64,
}

impl ScoringRule for TravelProximity {
    fn name(&self) -> &'static str {
        "travel"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f64 {
        (1.0 - ctx.travel_hours / self.max_travel_hours).clamp(0.0, 1.0)
    }
}

/// The crew's historical performance rating.
#[derive(Debug, Clone, Copy)]
pub struct CrewPerformance;

impl ScoringRule for CrewPerformance {
    fn name(&self) -> &'static str {
        "efficiency"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.crew.efficiency_rating.clamp(0.0, 1.0)
    }
}

/// Preferred date scores 1; each day away loses `1 / (window + 1)`.
#[derive(Debug, Clone, Copy)]
pub struct DateFit;

impl ScoringRule for DateFit {
    fn name(&self) -> &'static str {
        "date_fit"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f64 {
        let span = ctx.window_days as f64 + 1.0;
        (1.0 - ctx.day_offset.unsigned_abs() as f64 / span).clamp(0.0, 1.0)
    }
}

/// Weighted combination of the built-in rules.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCard {
    travel: TravelProximity,
    weights: ScoreWeights,
}

impl ScoreCard {
    /// Builds the score card from scheduler settings.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            travel: TravelProximity {
                max_travel_hours: config.max_travel_hours,
            },
            weights: config.weights,
        }
    }

    /// Scores one option.
    pub fn score(&self, ctx: &ScoringContext<'_>) -> ScoreBreakdown {
        let travel = self.weights.travel * self.travel.evaluate(ctx);
        let efficiency = self.weights.efficiency * CrewPerformance.evaluate(ctx);
        let date_fit = self.weights.date_fit * DateFit.evaluate(ctx);
        ScoreBreakdown {
            travel,
            efficiency,
            date_fit,
            total: travel + efficiency + date_fit,
        }
    }
}

/// Sorts options best first.
pub fn rank_options(options: &mut [SchedulingOption]) {
    options.sort_by(SchedulingOption::rank_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(job: &'a MoveJobRequest, crew: &'a Crew, travel: f64, offset: i64) -> ScoringContext<'a> {
        ScoringContext {
            job,
            crew,
            travel_hours: travel,
            day_offset: offset,
            window_days: 3,
        }
    }

    fn option(crew_id: &str, day: u32, total: f64) -> SchedulingOption {
        SchedulingOption {
            crew_index: 0,
            crew_id: crew_id.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            day_offset: 0,
            total_hours: 5.0,
            total_minutes: 300,
            travel_hours: 0.2,
            score: ScoreBreakdown {
                total,
                ..ScoreBreakdown::default()
            },
        }
    }

    #[test]
    fn test_travel_proximity() {
        let job = MoveJobRequest::new("J", 10.0, 1.0);
        let crew = Crew::new("C", 2);
        let rule = TravelProximity {
            max_travel_hours: 1.0,
        };
        assert!((rule.evaluate(&ctx(&job, &crew, 0.0, 0)) - 1.0).abs() < 1e-10);
        assert!((rule.evaluate(&ctx(&job, &crew, 0.25, 0)) - 0.75).abs() < 1e-10);
        assert_eq!(rule.evaluate(&ctx(&job, &crew, 2.0, 0)), 0.0);
    }

    #[test]
    fn test_date_fit() {
        let job = MoveJobRequest::new("J", 10.0, 1.0);
        let crew = Crew::new("C", 2);
        assert_eq!(DateFit.evaluate(&ctx(&job, &crew, 0.0, 0)), 1.0);
        assert!((DateFit.evaluate(&ctx(&job, &crew, 0.0, -2)) - 0.5).abs() < 1e-10);
        assert!((DateFit.evaluate(&ctx(&job, &crew, 0.0, 3)) - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_score_card_weights() {
        let job = MoveJobRequest::new("J", 10.0, 1.0);
        let crew = Crew::new("C", 2).with_efficiency(0.8);
        let card = ScoreCard::new(&SchedulerConfig::default());
        let score = card.score(&ctx(&job, &crew, 0.5, 0));

        assert!((score.travel - 0.125).abs() < 1e-10);
        assert!((score.efficiency - 0.36).abs() < 1e-10);
        assert!((score.date_fit - 0.30).abs() < 1e-10);
        assert!((score.total - 0.785).abs() < 1e-10);
    }

    #[test]
    fn test_rank_order() {
        let mut options = vec![
            option("C2", 12, 0.7),
            option("C3", 11, 0.9),
            option("C1", 13, 0.7),
            option("C1", 12, 0.7),
        ];
        rank_options(&mut options);
        let order: Vec<(&str, u32)> = options
            .iter()
            .map(|o| (o.crew_id.as_str(), chrono::Datelike::day(&o.date)))
            .collect();
        assert_eq!(order, vec![("C3", 11), ("C1", 12), ("C1", 13), ("C2", 12)]);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(TravelProximity { max_travel_hours: 1.0 }.name(), "travel");
        assert_eq!(CrewPerformance.name(), "efficiency");
        assert_eq!(DateFit.name(), "date_fit");
    }
}
