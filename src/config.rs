//! Tunable parameters for estimation, scheduling and benchmarking.
//!
//! Every constant the engine uses lives here so callers can override
//! it per call. Sections deserialize with `#[serde(default)]`, so a
//! JSON document only needs the keys it changes.
//!
//! # Example
//!
//! ```
//! use crew_planner::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_json_str(r#"{
//!     "estimator": { "average_speed_kmh": 35.0, "max_practical_crew_size": 5 },
//!     "scheduler": { "alternative_count": 5 }
//! }"#).unwrap();
//!
//! assert_eq!(config.estimator.average_speed_kmh, 35.0);
//! assert_eq!(config.estimator.minimum_job_hours, 3.0);
//! assert_eq!(config.scheduler.alternative_count, 5);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::models::{ElevatorAccess, Flexibility, TrafficCondition};

/// Minutes of extra work per floor, by elevator access.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorPenalties {
    /// Stairs only.
    pub none: f64,
    /// Small elevator.
    pub small: f64,
    /// Large elevator.
    pub large: f64,
}

impl FloorPenalties {
    /// Minutes per floor for the given access.
    pub fn minutes_per_floor(&self, access: ElevatorAccess) -> f64 {
        match access {
            ElevatorAccess::None => self.none,
            ElevatorAccess::Small => self.small,
            ElevatorAccess::Large => self.large,
        }
    }
}

impl Default for FloorPenalties {
    fn default() -> Self {
        Self {
            none: 20.0,
            small: 8.0,
            large: 2.0,
        }
    }
}

/// Driving-time multipliers by traffic condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficFactors {
    /// Driving-time multiplier on weekends.
    pub weekend: f64,
    /// Multiplier in normal traffic.
    pub normal: f64,
    /// Multiplier during rush hour.
    pub rush_hour: f64,
    /// One-way distance beyond which traffic weighs more (km).
    pub long_trip_threshold_km: f64,
    /// Extra multiplier for trips beyond the threshold.
    pub long_trip_factor: f64,
}

impl TrafficFactors {
    /// Combined multiplier for a condition and one-way distance.
    pub fn multiplier(&self, traffic: TrafficCondition, distance_km: f64) -> f64 {
        let base = match traffic {
            TrafficCondition::Weekend => self.weekend,
            TrafficCondition::Normal => self.normal,
            TrafficCondition::RushHour => self.rush_hour,
        };
        if distance_km > self.long_trip_threshold_km {
            base * self.long_trip_factor
        } else {
            base
        }
    }
}

impl Default for TrafficFactors {
    fn default() -> Self {
        Self {
            weekend: 0.9,
            normal: 1.0,
            rush_hour: 1.4,
            long_trip_threshold_km: 20.0,
            long_trip_factor: 1.1,
        }
    }
}

/// Effort estimator and crew optimizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Moving throughput (m³/hour) by crew size; index 0 is a crew of one.
    pub throughput_table: Vec<f64>,
    /// Average driving speed between pickup and delivery (km/h).
    pub average_speed_kmh: f64,
    /// Per-floor penalties by elevator access.
    pub floor_penalties: FloorPenalties,
    /// Carry distance from parking that costs nothing (m).
    pub free_parking_distance_m: f64,
    /// Hours per meter of carry beyond the free distance.
    pub carry_hours_per_meter: f64,
    /// Packing rate (m³/hour), independent of crew size.
    pub packing_rate_cubic_meters_per_hour: f64,
    /// Cleaning rate (m²/hour), independent of crew size.
    pub cleaning_rate_sqm_per_hour: f64,
    /// Shortest billable job (hours).
    pub minimum_job_hours: f64,
    /// Totals are rounded up to a multiple of this (hours).
    pub rounding_granularity_hours: f64,
    /// Largest crew the optimizer considers.
    pub max_practical_crew_size: u32,
    /// Crew size assumed when a job names none.
    pub default_team_size: u32,
    /// Driving multipliers for jobs that state expected traffic.
    pub traffic: TrafficFactors,
    /// Flat surcharge for moving a piano (hours).
    pub piano_hours: f64,
    /// Surcharge per m³ when heavy furniture is flagged (hours).
    pub heavy_items_hours_per_cubic_meter: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            throughput_table: vec![2.5, 4.5, 10.0, 12.0, 13.0, 12.5],
            average_speed_kmh: 40.0,
            floor_penalties: FloorPenalties::default(),
            free_parking_distance_m: 20.0,
            carry_hours_per_meter: 1.0 / 500.0,
            packing_rate_cubic_meters_per_hour: 5.0,
            cleaning_rate_sqm_per_hour: 70.0,
            minimum_job_hours: 3.0,
            rounding_granularity_hours: 0.25,
            max_practical_crew_size: 4,
            default_team_size: 2,
            traffic: TrafficFactors::default(),
            piano_hours: 1.5,
            heavy_items_hours_per_cubic_meter: 0.05,
        }
    }
}

impl EstimatorConfig {
    /// Sets the throughput table.
    pub fn with_throughput_table(mut self, table: Vec<f64>) -> Self {
        self.throughput_table = table;
        self
    }

    /// Sets the largest crew the optimizer considers.
    pub fn with_max_practical_crew_size(mut self, size: u32) -> Self {
        self.max_practical_crew_size = size;
        self
    }

    /// Sets the minimum billable job length.
    pub fn with_minimum_job_hours(mut self, hours: f64) -> Self {
        self.minimum_job_hours = hours;
        self
    }

    /// Sets the rounding granularity.
    pub fn with_rounding_granularity(mut self, hours: f64) -> Self {
        self.rounding_granularity_hours = hours;
        self
    }

    /// Sets the average driving speed.
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_throughput_table(&self.throughput_table)?;
        require_positive("estimator.average_speed_kmh", self.average_speed_kmh)?;
        require_positive(
            "estimator.packing_rate_cubic_meters_per_hour",
            self.packing_rate_cubic_meters_per_hour,
        )?;
        require_positive(
            "estimator.cleaning_rate_sqm_per_hour",
            self.cleaning_rate_sqm_per_hour,
        )?;
        require_positive(
            "estimator.rounding_granularity_hours",
            self.rounding_granularity_hours,
        )?;
        require_non_negative("estimator.minimum_job_hours", self.minimum_job_hours)?;
        require_non_negative(
            "estimator.free_parking_distance_m",
            self.free_parking_distance_m,
        )?;
        require_non_negative("estimator.carry_hours_per_meter", self.carry_hours_per_meter)?;
        require_non_negative("estimator.piano_hours", self.piano_hours)?;
        require_non_negative(
            "estimator.heavy_items_hours_per_cubic_meter",
            self.heavy_items_hours_per_cubic_meter,
        )?;
        for (name, minutes) in [
            ("estimator.floor_penalties.none", self.floor_penalties.none),
            ("estimator.floor_penalties.small", self.floor_penalties.small),
            ("estimator.floor_penalties.large", self.floor_penalties.large),
        ] {
            require_non_negative(name, minutes)?;
        }
        for (name, factor) in [
            ("estimator.traffic.weekend", self.traffic.weekend),
            ("estimator.traffic.normal", self.traffic.normal),
            ("estimator.traffic.rush_hour", self.traffic.rush_hour),
            ("estimator.traffic.long_trip_factor", self.traffic.long_trip_factor),
        ] {
            require_positive(name, factor)?;
        }
        if self.max_practical_crew_size == 0 {
            return Err(ConfigError::invalid(
                "estimator.max_practical_crew_size",
                "must be at least 1",
            ));
        }
        if self.default_team_size == 0 {
            return Err(ConfigError::invalid(
                "estimator.default_team_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Days either side of the preferred date a job may move, by flexibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexibilityWindows {
    /// Days either side for `Flexibility::Fixed`.
    pub fixed: u32,
    /// Days either side for `Flexibility::Flexible`.
    pub flexible: u32,
    /// Days either side for `Flexibility::VeryFlexible`.
    pub very_flexible: u32,
}

impl FlexibilityWindows {
    /// Maximum day offset for a flexibility level.
    pub fn days(&self, flexibility: Flexibility) -> u32 {
        match flexibility {
            Flexibility::Fixed => self.fixed,
            Flexibility::Flexible => self.flexible,
            Flexibility::VeryFlexible => self.very_flexible,
        }
    }
}

impl Default for FlexibilityWindows {
    fn default() -> Self {
        Self {
            fixed: 0,
            flexible: 1,
            very_flexible: 3,
        }
    }
}

/// Relative weights of the scheduling score factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of travel proximity.
    pub travel: f64,
    /// Weight of crew performance.
    pub efficiency: f64,
    /// Weight of closeness to the preferred date.
    pub date_fit: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            travel: 0.25,
            efficiency: 0.45,
            date_fit: 0.30,
        }
    }
}

/// Which days of the week can be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendPolicy {
    /// Every day is bookable.
    Allow,
    /// Saturdays and Sundays only for high-priority jobs.
    #[default]
    HighPriorityOnly,
}

/// Slot matcher parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of alternatives returned besides the primary (K).
    pub alternative_count: usize,
    /// Date shift allowed per flexibility level.
    pub flexibility_days: FlexibilityWindows,
    /// Score factor weights.
    pub weights: ScoreWeights,
    /// Travel time at which the travel score reaches zero (hours).
    pub max_travel_hours: f64,
    /// Speed used to turn home-base distance into travel time (km/h).
    pub travel_speed_kmh: f64,
    /// Weekend booking rule.
    pub weekend_policy: WeekendPolicy,
    /// Rosters at least this large are scored in parallel.
    pub parallel_threshold: usize,
    /// Special-requirement keyword → crew skill it demands.
    pub special_requirement_skills: BTreeMap<String, String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let mut special_requirement_skills = BTreeMap::new();
        special_requirement_skills.insert("piano".to_string(), "piano_moving".to_string());
        special_requirement_skills.insert("fragile".to_string(), "fragile_handling".to_string());
        Self {
            alternative_count: 3,
            flexibility_days: FlexibilityWindows::default(),
            weights: ScoreWeights::default(),
            max_travel_hours: 1.0,
            travel_speed_kmh: 40.0,
            weekend_policy: WeekendPolicy::HighPriorityOnly,
            parallel_threshold: 64,
            special_requirement_skills,
        }
    }
}

impl SchedulerConfig {
    /// Sets the number of alternatives.
    pub fn with_alternative_count(mut self, k: usize) -> Self {
        self.alternative_count = k;
        self
    }

    /// Sets the weekend policy.
    pub fn with_weekend_policy(mut self, policy: WeekendPolicy) -> Self {
        self.weekend_policy = policy;
        self
    }

    /// Sets the parallel scoring threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("scheduler.max_travel_hours", self.max_travel_hours)?;
        require_positive("scheduler.travel_speed_kmh", self.travel_speed_kmh)?;
        let w = &self.weights;
        for (name, weight) in [
            ("scheduler.weights.travel", w.travel),
            ("scheduler.weights.efficiency", w.efficiency),
            ("scheduler.weights.date_fit", w.date_fit),
        ] {
            require_non_negative(name, weight)?;
        }
        if w.travel + w.efficiency + w.date_fit <= 0.0 {
            return Err(ConfigError::invalid(
                "scheduler.weights",
                "at least one weight must be positive",
            ));
        }
        Ok(())
    }
}

/// Market baseline used for competitive benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Market hours per m³ for apartments and offices.
    pub hours_per_cubic_meter: f64,
    /// Floor on the apartment/office baseline (hours).
    pub minimum_baseline_hours: f64,
    /// Market hours per m³ for houses.
    pub house_hours_per_cubic_meter: f64,
    /// Advantage above which an estimate counts as faster (%).
    pub faster_threshold_pct: f64,
    /// Advantage above which an estimate still counts as competitive (%).
    pub slower_threshold_pct: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            hours_per_cubic_meter: 0.27,
            minimum_baseline_hours: 4.0,
            house_hours_per_cubic_meter: 0.11,
            faster_threshold_pct: 15.0,
            slower_threshold_pct: -5.0,
        }
    }
}

impl BenchmarkConfig {
    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("benchmark.hours_per_cubic_meter", self.hours_per_cubic_meter)?;
        require_positive(
            "benchmark.house_hours_per_cubic_meter",
            self.house_hours_per_cubic_meter,
        )?;
        require_non_negative("benchmark.minimum_baseline_hours", self.minimum_baseline_hours)?;
        if self.faster_threshold_pct <= self.slower_threshold_pct {
            return Err(ConfigError::invalid(
                "benchmark.faster_threshold_pct",
                "must be greater than slower_threshold_pct",
            ));
        }
        Ok(())
    }
}

/// All engine parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub estimator: EstimatorConfig,
    pub scheduler: SchedulerConfig,
    pub benchmark: BenchmarkConfig,
}

impl PlannerConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator.validate()?;
        self.scheduler.validate()?;
        self.benchmark.validate()
    }
}

/// Checks a throughput table: non-empty, positive, single-peaked.
///
/// Single-peaked means rates never drop before the peak and never rise
/// after it, which keeps job hours monotone on each side of the optimum.
pub fn validate_throughput_table(table: &[f64]) -> Result<(), ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::invalid(
            "estimator.throughput_table",
            "must contain at least one crew size",
        ));
    }
    if let Some((i, rate)) = table
        .iter()
        .enumerate()
        .find(|(_, r)| !(r.is_finite() && **r > 0.0))
    {
        return Err(ConfigError::invalid(
            "estimator.throughput_table",
            format!("rate for crew size {} must be positive, got {rate}", i + 1),
        ));
    }

    let mut descending = false;
    for (i, pair) in table.windows(2).enumerate() {
        if pair[1] < pair[0] {
            descending = true;
        } else if descending && pair[1] > pair[0] {
            return Err(ConfigError::invalid(
                "estimator.throughput_table",
                format!("rates rise again at crew size {} after peaking", i + 2),
            ));
        }
    }
    Ok(())
}

fn require_positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            parameter,
            format!("must be positive, got {value}"),
        ))
    }
}

fn require_non_negative(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            parameter,
            format!("must be non-negative, got {value}"),
        ))
    }
}
