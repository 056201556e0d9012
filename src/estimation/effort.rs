//! Effort estimator.
//!
//! Turns a job's physical attributes and a crew size into an hour
//! breakdown.
//!
//! # Algorithm
//!
//! 1. Moving: `volume / throughput(size)`, split evenly into loading and
//!    unloading.
//! 2. Driving: round trip at the average speed, scaled by traffic when
//!    the job states it.
//! 3. Logistics: per-floor minutes by elevator access at both ends, plus
//!    carry time beyond the free parking distance.
//! 4. Packing and cleaning at fixed rates, only when booked.
//! 5. Surcharges for pianos and heavy furniture.
//! 6. Total: sum rounded up to the granularity, floored at the minimum.
//!
//! The estimator is pure: identical inputs give bit-identical output.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::CrewEfficiencyModel;
use crate::config::EstimatorConfig;
use crate::error::{ConfigError, EstimateError, EstimateWarning};
use crate::models::{
    EffortBreakdown, MoveJobRequest, SERVICE_CLEANING, SERVICE_MOVING, SERVICE_PACKING,
};

/// Slack for float noise when rounding up to the granularity.
const ROUNDING_EPSILON: f64 = 1e-9;

/// An hour breakdown together with the crew size it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Hour breakdown.
    pub breakdown: EffortBreakdown,
    /// Crew size actually used (after clamping).
    pub team_size: u32,
    /// Non-fatal issues, e.g. a clamped crew size.
    #[serde(skip)]
    pub warnings: Vec<EstimateWarning>,
}

impl Estimate {
    /// Billable hours.
    pub fn total_hours(&self) -> f64 {
        self.breakdown.total_hours
    }
}

/// Computes hour breakdowns from job attributes.
///
/// # Example
///
/// ```
/// use crew_planner::estimation::EffortEstimator;
/// use crew_planner::models::MoveJobRequest;
///
/// let estimator = EffortEstimator::default();
/// let job = MoveJobRequest::new("J1", 24.0, 26.8);
///
/// let estimate = estimator.estimate(&job, 2).unwrap();
/// assert_eq!(estimate.breakdown.total_hours, 6.75);
/// assert!(estimate.warnings.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EffortEstimator {
    config: EstimatorConfig,
    model: CrewEfficiencyModel,
}

impl EffortEstimator {
    /// Creates an estimator from a configuration.
    ///
    /// # Errors
    /// Any parameter [`EstimatorConfig::validate`] rejects, e.g. a zero
    /// rounding granularity or an empty throughput table.
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = CrewEfficiencyModel::from_trusted(&config.throughput_table);
        Ok(Self { config, model })
    }

    /// Configuration in use.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Throughput model in use.
    pub fn model(&self) -> &CrewEfficiencyModel {
        &self.model
    }

    /// Estimates the hours a job takes with a crew of `team_size`.
    ///
    /// Sizes outside the throughput table are clamped and reported as a
    /// warning on the returned estimate.
    ///
    /// # Errors
    /// `EstimateError::InvalidInput` for non-positive volume, negative
    /// distance, negative parking distance or negative living area.
    pub fn estimate(
        &self,
        job: &MoveJobRequest,
        team_size: u32,
    ) -> Result<Estimate, EstimateError> {
        validate_job(job)?;

        let mut warnings = Vec::new();
        let clamped = self.model.clamp(team_size);
        if clamped.was_clamped() {
            warn!(
                job_id = %job.id,
                requested = clamped.requested,
                used = clamped.used,
                "crew size outside supported range, clamping"
            );
            warnings.push(EstimateWarning::UnsupportedCrewSize {
                requested: clamped.requested,
                used: clamped.used,
            });
        }
        let size = clamped.used;
        let cfg = &self.config;
        let volume = job.volume_cubic_meters;

        let (loading_hours, unloading_hours) = if job.includes_service(SERVICE_MOVING) {
            let base = volume / self.model.throughput(size);
            (base / 2.0, base / 2.0)
        } else {
            (0.0, 0.0)
        };

        let mut driving_hours = job.distance_km * 2.0 / cfg.average_speed_kmh;
        if let Some(traffic) = job.traffic {
            driving_hours *= cfg.traffic.multiplier(traffic, job.distance_km);
        }

        let logistics_hours = self.logistics_hours(job);

        let packing_hours = if job.includes_service(SERVICE_PACKING) {
            volume / cfg.packing_rate_cubic_meters_per_hour
        } else {
            0.0
        };

        let cleaning_hours = if job.includes_service(SERVICE_CLEANING) {
            job.effective_living_area() / cfg.cleaning_rate_sqm_per_hour
        } else {
            0.0
        };

        let mut additional_hours = 0.0;
        if job.has_special_requirement("piano") {
            additional_hours += cfg.piano_hours;
        }
        if job.heavy_items {
            additional_hours += volume * cfg.heavy_items_hours_per_cubic_meter;
        }

        let raw_hours = loading_hours
            + unloading_hours
            + driving_hours
            + logistics_hours
            + packing_hours
            + cleaning_hours
            + additional_hours;
        let total_hours = self.billable_hours(raw_hours);

        debug!(
            job_id = %job.id,
            team_size = size,
            raw_hours,
            total_hours,
            "estimated job effort"
        );

        Ok(Estimate {
            breakdown: EffortBreakdown {
                loading_hours,
                unloading_hours,
                driving_hours,
                logistics_hours,
                packing_hours,
                cleaning_hours,
                additional_hours,
                raw_hours,
                total_hours,
            },
            team_size: size,
            warnings,
        })
    }

    /// Stairs, elevators and parking carries at both ends (hours).
    fn logistics_hours(&self, job: &MoveJobRequest) -> f64 {
        let cfg = &self.config;
        let floors: f64 = job
            .floors
            .both()
            .iter()
            .zip(job.elevator_access.both())
            .map(|(&floor, access)| {
                floor as f64 * cfg.floor_penalties.minutes_per_floor(access) / 60.0
            })
            .sum();

        let carry: f64 = job
            .parking_distance_meters
            .both()
            .iter()
            .map(|&meters| (meters - cfg.free_parking_distance_m).max(0.0))
            .sum::<f64>()
            * cfg.carry_hours_per_meter;

        floors + carry
    }

    /// Rounds up to the granularity and applies the minimum.
    ///
    /// The minimum is rounded too, so the result is always a whole
    /// number of granularity steps.
    fn billable_hours(&self, raw_hours: f64) -> f64 {
        let granularity = self.config.rounding_granularity_hours;
        let hours = raw_hours.max(self.config.minimum_job_hours);
        let steps = (hours / granularity - ROUNDING_EPSILON).ceil().max(0.0);
        steps * granularity
    }
}

impl Default for EffortEstimator {
    fn default() -> Self {
        let config = EstimatorConfig::default();
        let model = CrewEfficiencyModel::from_trusted(&config.throughput_table);
        Self { config, model }
    }
}

/// Estimates a job's hours for a crew size under the given configuration.
///
/// # Errors
/// `InvalidConfig` if the configuration fails validation, otherwise as
/// [`EffortEstimator::estimate`].
pub fn estimate_effort(
    job: &MoveJobRequest,
    team_size: u32,
    config: &EstimatorConfig,
) -> Result<Estimate, EstimateError> {
    EffortEstimator::new(config.clone())?.estimate(job, team_size)
}

/// Checks the job attributes the estimator depends on.
pub(crate) fn validate_job(job: &MoveJobRequest) -> Result<(), EstimateError> {
    let volume = job.volume_cubic_meters;
    if !(volume.is_finite() && volume > 0.0) {
        return Err(EstimateError::invalid(
            "volume_cubic_meters",
            format!("must be positive, got {volume}"),
        ));
    }
    let distance = job.distance_km;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(EstimateError::invalid(
            "distance_km",
            format!("must be non-negative, got {distance}"),
        ));
    }
    for meters in job.parking_distance_meters.both() {
        if !(meters.is_finite() && meters >= 0.0) {
            return Err(EstimateError::invalid(
                "parking_distance_meters",
                format!("must be non-negative, got {meters}"),
            ));
        }
    }
    if let Some(area) = job.living_area_sqm {
        if !(area.is_finite() && area >= 0.0) {
            return Err(EstimateError::invalid(
                "living_area_sqm",
                format!("must be non-negative, got {area}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElevatorAccess, TrafficCondition};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-2
    }

    fn is_multiple(value: f64, step: f64) -> bool {
        let ratio = value / step;
        (ratio - ratio.round()).abs() < 1e-9
    }

    #[test]
    fn test_reference_apartment_move() {
        // 24 m³, 26.8 km, two movers at 4.5 m³/h, 40 km/h
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("A", 24.0, 26.8);
        let estimate = estimator.estimate(&job, 2).unwrap();
        let b = estimate.breakdown;

        assert!(approx(b.loading_hours, 2.67));
        assert!(approx(b.unloading_hours, 2.67));
        assert!(approx(b.driving_hours, 1.34));
        assert_eq!(b.logistics_hours, 0.0);
        assert_eq!(b.packing_hours, 0.0);
        assert_eq!(b.total_hours, 6.75);
        assert_eq!(estimate.team_size, 2);
    }

    #[test]
    fn test_minimum_job_hours() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("small", 2.0, 1.0);
        let b = estimator.estimate(&job, 3).unwrap().breakdown;
        assert!(b.raw_hours < 3.0);
        assert_eq!(b.total_hours, 3.0);
    }

    #[test]
    fn test_minimum_rounded_to_granularity() {
        let config = EstimatorConfig::default().with_minimum_job_hours(3.1);
        let estimator = EffortEstimator::new(config).unwrap();
        let job = MoveJobRequest::new("small", 1.0, 0.0);
        let b = estimator.estimate(&job, 2).unwrap().breakdown;
        assert_eq!(b.total_hours, 3.25);
    }

    #[test]
    fn test_exact_multiple_not_bumped() {
        // 45 m³ / 4.5 = 10h exactly, no driving
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("exact", 45.0, 0.0);
        let b = estimator.estimate(&job, 2).unwrap().breakdown;
        assert_eq!(b.total_hours, 10.0);
    }

    #[test]
    fn test_logistics_floors_and_parking() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("L", 10.0, 0.0)
            .with_floors(3, 2)
            .with_elevators(ElevatorAccess::None, ElevatorAccess::Small)
            .with_parking_distance(70.0, 10.0);
        let b = estimator.estimate(&job, 2).unwrap().breakdown;
        // 3 floors × 20 min + 2 floors × 8 min = 76 min; 50 m extra carry = 0.1h
        let expected = 76.0 / 60.0 + 0.1;
        assert!((b.logistics_hours - expected).abs() < 1e-9);
    }

    #[test]
    fn test_packing_and_cleaning_independent_of_crew() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("PC", 30.0, 5.0)
            .with_service(SERVICE_PACKING)
            .with_service(SERVICE_CLEANING)
            .with_living_area(105.0);

        let two = estimator.estimate(&job, 2).unwrap().breakdown;
        let four = estimator.estimate(&job, 4).unwrap().breakdown;

        assert!((two.packing_hours - 6.0).abs() < 1e-9);
        assert!((two.cleaning_hours - 1.5).abs() < 1e-9);
        assert_eq!(two.packing_hours, four.packing_hours);
        assert_eq!(two.cleaning_hours, four.cleaning_hours);
        assert!(four.moving_hours() < two.moving_hours());
    }

    #[test]
    fn test_cleaning_only_job_has_no_moving_hours() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("C", 21.0, 0.0).with_services([SERVICE_CLEANING]);
        let b = estimator.estimate(&job, 2).unwrap().breakdown;
        assert_eq!(b.moving_hours(), 0.0);
        // Derived area 70 m² at 70 m²/h
        assert!((b.cleaning_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_surcharges() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("S", 20.0, 0.0)
            .with_special_requirement("Piano")
            .with_heavy_items(true);
        let b = estimator.estimate(&job, 3).unwrap().breakdown;
        assert!((b.additional_hours - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_traffic_scales_driving() {
        let estimator = EffortEstimator::default();
        let plain = MoveJobRequest::new("T", 10.0, 30.0);
        let rush = plain.clone().with_traffic(TrafficCondition::RushHour);

        let base = estimator.estimate(&plain, 2).unwrap().breakdown.driving_hours;
        let slowed = estimator.estimate(&rush, 2).unwrap().breakdown.driving_hours;
        assert!((base - 1.5).abs() < 1e-9);
        assert!((slowed - 1.5 * 1.4 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let estimator = EffortEstimator::default();

        let zero_volume = MoveJobRequest::new("bad", 0.0, 10.0);
        assert!(matches!(
            estimator.estimate(&zero_volume, 2),
            Err(EstimateError::InvalidInput { field: "volume_cubic_meters", .. })
        ));

        let negative_distance = MoveJobRequest::new("bad", 10.0, -1.0);
        assert!(matches!(
            estimator.estimate(&negative_distance, 2),
            Err(EstimateError::InvalidInput { field: "distance_km", .. })
        ));

        let nan_volume = MoveJobRequest::new("bad", f64::NAN, 10.0);
        assert!(estimator.estimate(&nan_volume, 2).is_err());

        let bad_parking = MoveJobRequest::new("bad", 10.0, 1.0).with_parking_distance(-5.0, 0.0);
        assert!(estimator.estimate(&bad_parking, 2).is_err());
    }

    #[test]
    fn test_unsupported_crew_size_is_clamped_with_warning() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("W", 24.0, 10.0);

        let big = estimator.estimate(&job, 9).unwrap();
        assert_eq!(big.team_size, 6);
        assert_eq!(
            big.warnings,
            vec![EstimateWarning::UnsupportedCrewSize {
                requested: 9,
                used: 6
            }]
        );
        assert_eq!(big.breakdown, estimator.estimate(&job, 6).unwrap().breakdown);

        let zero = estimator.estimate(&job, 0).unwrap();
        assert_eq!(zero.team_size, 1);
        assert_eq!(zero.warnings.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let estimator = EffortEstimator::default();
        let job = MoveJobRequest::new("I", 37.3, 14.2)
            .with_floors(2, 5)
            .with_elevators(ElevatorAccess::Small, ElevatorAccess::None)
            .with_parking_distance(45.0, 30.0)
            .with_service(SERVICE_PACKING);
        let first = estimator.estimate(&job, 3).unwrap();
        for _ in 0..10 {
            let again = estimator.estimate(&job, 3).unwrap();
            assert_eq!(again.breakdown.total_hours.to_bits(), first.breakdown.total_hours.to_bits());
            assert_eq!(again.breakdown.raw_hours.to_bits(), first.breakdown.raw_hours.to_bits());
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_total_hours_invariants_randomized() {
        let estimator = EffortEstimator::default();
        let cfg = estimator.config().clone();
        let mut rng = StdRng::seed_from_u64(7);

        for i in 0..500 {
            let job = MoveJobRequest::new(format!("R{i}"), rng.random_range(0.5..150.0), rng.random_range(0.0..120.0))
                .with_floors(rng.random_range(0..8), rng.random_range(0..8))
                .with_parking_distance(rng.random_range(0.0..120.0), rng.random_range(0.0..120.0));
            let size = rng.random_range(1..=6);
            let b = estimator.estimate(&job, size).unwrap().breakdown;

            assert!(b.total_hours >= cfg.minimum_job_hours);
            assert!(b.total_hours >= b.raw_hours - 1e-9);
            assert!(is_multiple(b.total_hours, cfg.rounding_granularity_hours));
            assert!((b.component_sum() - b.raw_hours).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hours_unimodal_in_crew_size() {
        let config = EstimatorConfig::default().with_max_practical_crew_size(6);
        let estimator = EffortEstimator::new(config).unwrap();
        let optimal = estimator.model().optimal_size(6);
        let mut rng = StdRng::seed_from_u64(11);

        for i in 0..200 {
            let job = MoveJobRequest::new(format!("U{i}"), rng.random_range(1.0..200.0), rng.random_range(0.0..80.0));
            let hours: Vec<f64> = (1..=6)
                .map(|size| estimator.estimate(&job, size).unwrap().breakdown.total_hours)
                .collect();

            for size in 1..optimal {
                let (cur, next) = (hours[size as usize - 1], hours[size as usize]);
                assert!(next <= cur, "hours rose from size {size} to {}", size + 1);
            }
            for size in optimal..6 {
                let (cur, next) = (hours[size as usize - 1], hours[size as usize]);
                assert!(next >= cur, "hours fell from size {size} to {}", size + 1);
            }
        }
    }

    #[test]
    fn test_invalid_config_is_an_error_not_nan() {
        let job = MoveJobRequest::new("J", 24.0, 26.8);

        let zero_step = EstimatorConfig::default().with_rounding_granularity(0.0);
        let err = estimate_effort(&job, 2, &zero_step).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidConfig(_)));
        assert!(err.to_string().contains("rounding_granularity_hours"));

        let empty_table = EstimatorConfig::default().with_throughput_table(Vec::new());
        assert!(matches!(
            estimate_effort(&job, 2, &empty_table),
            Err(EstimateError::InvalidConfig(_))
        ));

        let two_peaks = EstimatorConfig::default().with_throughput_table(vec![3.0, 8.0, 5.0, 9.0]);
        assert!(EffortEstimator::new(two_peaks).is_err());
    }

    #[test]
    fn test_fine_granularity_keeps_whole_steps() {
        // 3.3h is not exact in binary; total must still be 33 steps
        let config = EstimatorConfig::default()
            .with_rounding_granularity(0.1)
            .with_minimum_job_hours(3.25);
        let estimator = EffortEstimator::new(config).unwrap();
        let job = MoveJobRequest::new("G", 1.0, 0.0);
        let b = estimator.estimate(&job, 2).unwrap().breakdown;
        assert!(is_multiple(b.total_hours, 0.1));
        assert!((b.total_hours - 3.3).abs() < 1e-9);
        assert_eq!(b.total_minutes(), 198);
    }

    #[test]
    fn test_free_function_matches_estimator() {
        let job = MoveJobRequest::new("F", 18.0, 9.0);
        let config = EstimatorConfig::default();
        let direct = EffortEstimator::new(config.clone()).unwrap().estimate(&job, 2).unwrap();
        let via_fn = estimate_effort(&job, 2, &config).unwrap();
        assert_eq!(direct, via_fn);
    }
}
