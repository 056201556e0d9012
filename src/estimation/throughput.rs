//! Crew efficiency model.
//!
//! Maps crew size to moving throughput (m³/hour). The curve is
//! non-linear: a crew of three can pipeline carrying and
//! stacking, so throughput jumps well beyond 3/2 of a pair; past five
//! movers people start getting in each other's way and throughput
//! falls.

use serde::{Deserialize, Serialize};

use crate::config::{validate_throughput_table, EstimatorConfig};
use crate::error::ConfigError;

/// Throughput lookup by crew size.
///
/// Sizes are 1-based: `rates[0]` is a crew of one. Sizes outside the
/// table are clamped to the nearest supported size.
///
/// # Example
///
/// ```
/// use crew_planner::estimation::CrewEfficiencyModel;
///
/// let model = CrewEfficiencyModel::default();
/// assert_eq!(model.throughput(2), 4.5);
/// assert_eq!(model.throughput(3), 10.0);
/// assert_eq!(model.optimal_size(6), 5);
/// assert_eq!(model.optimal_size(4), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewEfficiencyModel {
    rates: Vec<f64>,
}

/// Result of fitting a requested crew size into the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedSize {
    /// Size the caller asked for.
    pub requested: u32,
    /// Size actually used.
    pub used: u32,
}

impl ClampedSize {
    /// Whether the requested size had to be changed.
    pub fn was_clamped(&self) -> bool {
        self.requested != self.used
    }
}

impl CrewEfficiencyModel {
    /// Creates a model from a validated throughput table.
    pub fn new(rates: Vec<f64>) -> Result<Self, ConfigError> {
        validate_throughput_table(&rates)?;
        Ok(Self { rates })
    }

    /// Creates a model without validating the table.
    ///
    /// For callers that already validated their configuration.
    pub(crate) fn from_trusted(rates: &[f64]) -> Self {
        Self {
            rates: rates.to_vec(),
        }
    }

    /// Largest supported crew size.
    pub fn max_supported_size(&self) -> u32 {
        self.rates.len() as u32
    }

    /// Supported crew sizes, `1..=max_supported_size()`.
    pub fn supported_range(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_supported_size()
    }

    /// Fits a crew size into the supported range.
    pub fn clamp(&self, team_size: u32) -> ClampedSize {
        ClampedSize {
            requested: team_size,
            used: team_size.clamp(1, self.max_supported_size().max(1)),
        }
    }

    /// Moving throughput for a crew size (m³/hour).
    ///
    /// Unsupported sizes use the nearest supported size.
    pub fn throughput(&self, team_size: u32) -> f64 {
        let size = self.clamp(team_size).used;
        self.rates
            .get(size as usize - 1)
            .copied()
            .unwrap_or_default()
    }

    /// Crew size in `[1, max_practical_size]` with the highest throughput.
    ///
    /// Ties go to the smaller crew. `max_practical_size` is itself
    /// clamped to the supported range.
    pub fn optimal_size(&self, max_practical_size: u32) -> u32 {
        let upper = self.clamp(max_practical_size).used;
        let mut best = 1;
        let mut best_rate = self.throughput(1);
        for size in 2..=upper {
            let rate = self.throughput(size);
            if rate > best_rate {
                best = size;
                best_rate = rate;
            }
        }
        best
    }
}

impl Default for CrewEfficiencyModel {
    fn default() -> Self {
        Self::from_trusted(&EstimatorConfig::default().throughput_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_curve() {
        let model = CrewEfficiencyModel::default();
        let expected = [2.5, 4.5, 10.0, 12.0, 13.0, 12.5];
        for (i, rate) in expected.iter().enumerate() {
            assert_eq!(model.throughput(i as u32 + 1), *rate);
        }
    }

    #[test]
    fn test_throughput_positive_over_range() {
        let model = CrewEfficiencyModel::default();
        for size in model.supported_range() {
            assert!(model.throughput(size) > 0.0);
        }
    }

    #[test]
    fn test_optimal_size_strictly_maximizes() {
        let model = CrewEfficiencyModel::default();
        for max in 1..=6 {
            let best = model.optimal_size(max);
            for size in 1..=max {
                if size < best {
                    assert!(model.throughput(size) < model.throughput(best));
                } else {
                    assert!(model.throughput(size) <= model.throughput(best));
                }
            }
        }
    }

    #[test]
    fn test_optimal_size_ties_to_smaller() {
        let model = CrewEfficiencyModel::new(vec![3.0, 6.0, 6.0, 5.0]).unwrap();
        assert_eq!(model.optimal_size(4), 2);
    }

    #[test]
    fn test_clamping() {
        let model = CrewEfficiencyModel::default();
        let low = model.clamp(0);
        assert_eq!(low.used, 1);
        assert!(low.was_clamped());

        let high = model.clamp(9);
        assert_eq!(high.used, 6);
        assert_eq!(model.throughput(9), 12.5);

        assert!(!model.clamp(4).was_clamped());
        // Optimal size beyond the table behaves like the table's end
        assert_eq!(model.optimal_size(20), 5);
    }

    #[test]
    fn test_invalid_table_rejected() {
        assert!(CrewEfficiencyModel::new(vec![]).is_err());
        assert!(CrewEfficiencyModel::new(vec![1.0, -2.0]).is_err());
    }

    #[test]
    fn test_flat_industry_constant() {
        // A one-entry table reproduces a flat per-hour constant
        let model = CrewEfficiencyModel::new(vec![2.5]).unwrap();
        assert_eq!(model.throughput(4), 2.5);
        assert_eq!(model.optimal_size(4), 1);
    }
}
