//! Competitive benchmarking.
//!
//! Compares an estimate with an assumed market baseline:
//!
//! | Property | Baseline (hours) |
//! |----------|------------------|
//! | Apartment, office | `max(minimum, volume × 0.27)` |
//! | House | `volume × 0.11` |
//!
//! `advantage = (baseline − total) / baseline × 100`. Above the faster
//! threshold (15%) the estimate is faster; above the slower threshold
//! (−5%) it is competitive; otherwise slower.

use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::models::{EffortBreakdown, PropertyType};

/// Where an estimate sits against the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompetitivePosition {
    Faster,
    Competitive,
    Slower,
}

/// Result of benchmarking one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveAnalysis {
    pub position: CompetitivePosition,
    /// Rounded advantage over the baseline (%). Negative means slower.
    pub advantage_percentage: i64,
    /// e.g. "28% faster than market baseline".
    pub statement: String,
    /// Market baseline used (hours).
    pub baseline_hours: f64,
}

/// Market baseline hours for a volume and property type.
pub fn baseline_hours(volume: f64, property_type: PropertyType, config: &BenchmarkConfig) -> f64 {
    match property_type {
        PropertyType::House => volume * config.house_hours_per_cubic_meter,
        PropertyType::Apartment | PropertyType::Office => {
            (volume * config.hours_per_cubic_meter).max(config.minimum_baseline_hours)
        }
    }
}

/// Benchmarks an apartment-style estimate.
///
/// # Example
///
/// ```
/// use crew_planner::benchmark::{benchmark, CompetitivePosition};
/// use crew_planner::config::BenchmarkConfig;
/// use crew_planner::models::EffortBreakdown;
///
/// let breakdown = EffortBreakdown { total_hours: 3.5, ..Default::default() };
/// let analysis = benchmark(&breakdown, 24.0, &BenchmarkConfig::default());
///
/// assert_eq!(analysis.position, CompetitivePosition::Faster);
/// assert_eq!(analysis.advantage_percentage, 46);
/// assert_eq!(analysis.statement, "46% faster than market baseline");
/// ```
pub fn benchmark(
    breakdown: &EffortBreakdown,
    volume: f64,
    config: &BenchmarkConfig,
) -> CompetitiveAnalysis {
    benchmark_for_property(breakdown, volume, PropertyType::Apartment, config)
}

/// Benchmarks an estimate against the baseline for a property type.
///
/// A non-positive baseline (zero volume) counts as competitive with no
/// advantage.
pub fn benchmark_for_property(
    breakdown: &EffortBreakdown,
    volume: f64,
    property_type: PropertyType,
    config: &BenchmarkConfig,
) -> CompetitiveAnalysis {
    let baseline = baseline_hours(volume, property_type, config);
    let advantage = if baseline > 0.0 && baseline.is_finite() {
        (baseline - breakdown.total_hours) / baseline * 100.0
    } else {
        0.0
    };

    let position = if advantage > config.faster_threshold_pct {
        CompetitivePosition::Faster
    } else if advantage > config.slower_threshold_pct {
        CompetitivePosition::Competitive
    } else {
        CompetitivePosition::Slower
    };

    let advantage_percentage = advantage.round() as i64;
    let statement = if advantage_percentage >= 0 {
        format!("{advantage_percentage}% faster than market baseline")
    } else {
        format!("{}% slower than market baseline", -advantage_percentage)
    };

    CompetitiveAnalysis {
        position,
        advantage_percentage,
        statement,
        baseline_hours: baseline,
    }
}
