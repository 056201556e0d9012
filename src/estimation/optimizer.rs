//! Crew-size optimizer.
//!
//! Evaluates the effort estimator for every practical crew size,
//! identifies the size with the best throughput, and rates the crew
//! currently on the job against it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::EffortEstimator;
use crate::config::EstimatorConfig;
use crate::models::{MoveJobRequest, TrafficCondition};

/// Qualitative rating of a crew size against the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EfficiencyRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl EfficiencyRating {
    /// Rating for a throughput ratio (current / optimal).
    ///
    /// ≥ 0.95 excellent, ≥ 0.80 good, ≥ 0.60 fair, otherwise poor.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.95 {
            EfficiencyRating::Excellent
        } else if ratio >= 0.80 {
            EfficiencyRating::Good
        } else if ratio >= 0.60 {
            EfficiencyRating::Fair
        } else {
            EfficiencyRating::Poor
        }
    }
}

/// Estimator output for one crew size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrewSizeEvaluation {
    /// Crew size.
    pub team_size: u32,
    /// Moving throughput (m³/hour).
    pub throughput: f64,
    /// Billable hours, or `None` if the job could not be estimated.
    pub total_hours: Option<f64>,
}

/// Staffing recommendation for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOptimization {
    /// Crew size currently assigned (or assumed).
    pub current_team_size: u32,
    /// Throughput of the current size (m³/hour).
    pub current_throughput: f64,
    /// Rating of the current size.
    pub efficiency_rating: EfficiencyRating,
    /// Size with the best throughput within the practical range.
    pub optimal_team_size: u32,
    /// Human-readable advice.
    pub recommendations: Vec<String>,
    /// Every size considered, smallest first. Covers the practical range
    /// and the current size if it lies beyond it.
    pub evaluated: Vec<CrewSizeEvaluation>,
}

impl CrewOptimization {
    /// Whether the current crew is already the optimal size.
    pub fn is_optimal(&self) -> bool {
        self.current_team_size == self.optimal_team_size
    }

    /// Evaluation for a given size, if it was considered.
    pub fn evaluation_for(&self, team_size: u32) -> Option<&CrewSizeEvaluation> {
        self.evaluated.iter().find(|e| e.team_size == team_size)
    }
}

/// Recommends crew sizes using an effort estimator.
///
/// # Example
///
/// ```
/// use crew_planner::estimation::{CrewOptimizer, EfficiencyRating};
/// use crew_planner::models::MoveJobRequest;
///
/// let optimizer = CrewOptimizer::default();
/// let job = MoveJobRequest::new("J1", 60.0, 10.0).with_team_size(2);
///
/// let result = optimizer.optimize(&job);
/// assert_eq!(result.optimal_team_size, 4);
/// assert_eq!(result.efficiency_rating, EfficiencyRating::Poor);
/// assert!(result.recommendations[0].starts_with("increase crew by 2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrewOptimizer {
    estimator: EffortEstimator,
    /// Set when the supplied configuration was rejected.
    config_note: Option<String>,
}

impl CrewOptimizer {
    /// Creates an optimizer from an estimator configuration.
    ///
    /// An invalid configuration is replaced by the defaults; every
    /// recommendation list then starts with a note saying so.
    pub fn new(config: EstimatorConfig) -> Self {
        match EffortEstimator::new(config) {
            Ok(estimator) => Self {
                estimator,
                config_note: None,
            },
            Err(err) => {
                warn!(error = %err, "estimator configuration rejected, using defaults");
                Self {
                    estimator: EffortEstimator::default(),
                    config_note: Some(format!(
                        "configuration rejected ({err}); default parameters used"
                    )),
                }
            }
        }
    }

    /// Creates an optimizer around an existing estimator.
    pub fn with_estimator(estimator: EffortEstimator) -> Self {
        Self {
            estimator,
            config_note: None,
        }
    }

    /// Recommends a crew size for the job.
    ///
    /// Never fails. If the job cannot be estimated, sizes are compared on
    /// throughput alone and the recommendations say why hours are missing.
    pub fn optimize(&self, job: &MoveJobRequest) -> CrewOptimization {
        let cfg = self.estimator.config();
        let model = self.estimator.model();
        let max_size = cfg
            .max_practical_crew_size
            .clamp(1, model.max_supported_size().max(1));

        let current = model
            .clamp(job.team_size.unwrap_or(cfg.default_team_size))
            .used;
        let optimal = model.optimal_size(max_size);

        let mut estimate_error = None;
        let evaluated: Vec<CrewSizeEvaluation> = (1..=max_size.max(current))
            .map(|size| {
                let total_hours = match self.estimator.estimate(job, size) {
                    Ok(estimate) => Some(estimate.breakdown.total_hours),
                    Err(err) => {
                        estimate_error.get_or_insert(err);
                        None
                    }
                };
                CrewSizeEvaluation {
                    team_size: size,
                    throughput: model.throughput(size),
                    total_hours,
                }
            })
            .collect();

        let current_throughput = model.throughput(current);
        let ratio = current_throughput / model.throughput(optimal);
        let efficiency_rating = EfficiencyRating::from_ratio(ratio);

        let hours_at = |size: u32| {
            evaluated
                .iter()
                .find(|e| e.team_size == size)
                .and_then(|e| e.total_hours)
        };

        let mut recommendations: Vec<String> = self.config_note.iter().cloned().collect();
        if let Some(err) = &estimate_error {
            recommendations.push(format!(
                "hours could not be estimated ({err}); recommendation based on throughput only"
            ));
        }

        if current != optimal {
            let saved = match (hours_at(current), hours_at(optimal)) {
                (Some(now), Some(best)) => Some(now - best),
                _ => None,
            };
            let delta = current.abs_diff(optimal);
            let verb = if current < optimal { "increase" } else { "reduce" };
            let text = match saved {
                Some(hours) if hours > 0.0 => {
                    format!("{verb} crew by {delta} to save {}h", format_hours(hours))
                }
                Some(_) => format!("{verb} crew by {delta} with no change in duration"),
                None => format!("{verb} crew by {delta} for optimal throughput"),
            };
            recommendations.push(text);
        }

        if job.required_services.len() > 1 && current >= 3 {
            recommendations
                .push("parallel work possible: packing and cleaning can overlap the move".into());
        }

        if job.traffic == Some(TrafficCondition::RushHour) {
            recommendations.push("book outside rush hour for up to 40% faster driving".into());
        }

        debug!(
            job_id = %job.id,
            current,
            optimal,
            ?efficiency_rating,
            "crew size evaluated"
        );

        CrewOptimization {
            current_team_size: current,
            current_throughput,
            efficiency_rating,
            optimal_team_size: optimal,
            recommendations,
            evaluated,
        }
    }
}

/// Recommends a crew size for a job under the given configuration.
pub fn optimize_crew_size(job: &MoveJobRequest, config: &EstimatorConfig) -> CrewOptimization {
    CrewOptimizer::new(config.clone()).optimize(job)
}

/// Formats hours without trailing zeros, e.g. `8.5`, `2`, `0.25`.
fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SERVICE_CLEANING, SERVICE_PACKING};

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(EfficiencyRating::from_ratio(1.0), EfficiencyRating::Excellent);
        assert_eq!(EfficiencyRating::from_ratio(0.95), EfficiencyRating::Excellent);
        assert_eq!(EfficiencyRating::from_ratio(0.94), EfficiencyRating::Good);
        assert_eq!(EfficiencyRating::from_ratio(0.80), EfficiencyRating::Good);
        assert_eq!(EfficiencyRating::from_ratio(0.79), EfficiencyRating::Fair);
        assert_eq!(EfficiencyRating::from_ratio(0.60), EfficiencyRating::Fair);
        assert_eq!(EfficiencyRating::from_ratio(0.59), EfficiencyRating::Poor);
    }

    #[test]
    fn test_large_move_prefers_four_over_two() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("B", 60.0, 0.0).with_team_size(2);
        let result = optimizer.optimize(&job);

        assert_eq!(result.current_team_size, 2);
        assert_eq!(result.optimal_team_size, 4);
        let two = result.evaluation_for(2).unwrap();
        let four = result.evaluation_for(4).unwrap();
        assert!(four.throughput > two.throughput);
        assert!(four.total_hours.unwrap() < two.total_hours.unwrap());
        // 60/4.5 = 13.33 → 13.5h; 60/12 = 5h
        assert_eq!(result.recommendations[0], "increase crew by 2 to save 8.5h");
    }

    #[test]
    fn test_current_optimal_has_no_size_advice() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("O", 40.0, 5.0).with_team_size(4);
        let result = optimizer.optimize(&job);

        assert!(result.is_optimal());
        assert_eq!(result.efficiency_rating, EfficiencyRating::Excellent);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.evaluated.len(), 4);
    }

    #[test]
    fn test_overcrowded_crew_reduce_advice() {
        let config = EstimatorConfig::default().with_max_practical_crew_size(6);
        let optimizer = CrewOptimizer::new(config);
        let job = MoveJobRequest::new("X", 65.0, 0.0).with_team_size(6);
        let result = optimizer.optimize(&job);

        assert_eq!(result.optimal_team_size, 5);
        assert_eq!(result.efficiency_rating, EfficiencyRating::Excellent);
        // 65/12.5 = 5.2 → 5.25h; 65/13 = 5h
        assert_eq!(result.recommendations[0], "reduce crew by 1 to save 0.25h");
    }

    #[test]
    fn test_current_size_beyond_practical_range() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("Big", 48.0, 0.0).with_team_size(6);
        let result = optimizer.optimize(&job);

        assert_eq!(result.current_team_size, 6);
        assert_eq!(result.optimal_team_size, 4);
        assert_eq!(result.evaluated.len(), 6);
        // 48/12.5 = 3.84 → 4h; 48/12 = 4h
        assert_eq!(result.recommendations[0], "reduce crew by 2 with no change in duration");
    }

    #[test]
    fn test_default_team_size_used() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("D", 10.0, 2.0);
        let result = optimizer.optimize(&job);
        assert_eq!(result.current_team_size, 2);
        assert!((result.current_throughput - 4.5).abs() < 1e-10);
        // 4.5 / 12.0 = 0.375
        assert_eq!(result.efficiency_rating, EfficiencyRating::Poor);
    }

    #[test]
    fn test_invalid_job_degrades_gracefully() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("bad", -3.0, 2.0).with_team_size(3);
        let result = optimizer.optimize(&job);

        assert_eq!(result.optimal_team_size, 4);
        assert!(result.evaluated.iter().all(|e| e.total_hours.is_none()));
        assert!(result.recommendations[0].contains("could not be estimated"));
        assert_eq!(result.recommendations[1], "increase crew by 1 for optimal throughput");
    }

    #[test]
    fn test_single_size_table() {
        let config = EstimatorConfig::default().with_throughput_table(vec![2.5]);
        let optimizer = CrewOptimizer::new(config);
        let job = MoveJobRequest::new("S", 10.0, 2.0).with_team_size(3);
        let result = optimizer.optimize(&job);

        assert_eq!(result.optimal_team_size, 1);
        assert_eq!(result.current_team_size, 1);
        assert_eq!(result.evaluated.len(), 1);
        assert!(result.is_optimal());
    }

    #[test]
    fn test_parallel_work_note() {
        let optimizer = CrewOptimizer::default();
        let job = MoveJobRequest::new("P", 30.0, 5.0)
            .with_service(SERVICE_PACKING)
            .with_service(SERVICE_CLEANING)
            .with_team_size(3);
        let result = optimizer.optimize(&job);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("parallel work possible")));
    }

    #[test]
    fn test_free_function() {
        let job = MoveJobRequest::new("F", 60.0, 0.0).with_team_size(2);
        let result = optimize_crew_size(&job, &EstimatorConfig::default());
        assert_eq!(result.optimal_team_size, 4);
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(8.5), "8.5");
        assert_eq!(format_hours(2.0), "2");
        assert_eq!(format_hours(0.25), "0.25");
    }

    #[test]
    fn test_rush_hour_advice() {
        let optimizer = CrewOptimizer::default();
        let rush = MoveJobRequest::new("R", 40.0, 15.0)
            .with_team_size(4)
            .with_traffic(TrafficCondition::RushHour);
        let result = optimizer.optimize(&rush);
        assert_eq!(
            result.recommendations,
            vec!["book outside rush hour for up to 40% faster driving".to_string()]
        );

        let calm = rush.clone().with_traffic(TrafficCondition::Normal);
        assert!(optimizer.optimize(&calm).recommendations.is_empty());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = EstimatorConfig::default().with_rounding_granularity(0.0);
        let result = optimize_crew_size(&MoveJobRequest::new("B", 60.0, 0.0).with_team_size(2), &config);

        assert!(result.recommendations[0].starts_with("configuration rejected"));
        assert_eq!(result.optimal_team_size, 4);
        assert_eq!(result.recommendations[1], "increase crew by 2 to save 8.5h");
        assert!(result
            .evaluated
            .iter()
            .all(|e| e.total_hours.is_some_and(f64::is_finite)));
    }
}
