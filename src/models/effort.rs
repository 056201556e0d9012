//! Effort breakdown value object.

use serde::{Deserialize, Serialize};

const MINUTE_EPSILON: f64 = 1e-9;

/// Hours a job takes, split by activity.
///
/// Produced by the effort estimator; never mutated afterwards.
/// `total_hours` is the billable figure: the component sum rounded up
/// to the configured granularity and floored at the minimum job length.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffortBreakdown {
    /// Carrying belongings out and loading the vehicle.
    pub loading_hours: f64,
    /// Unloading the vehicle and carrying belongings in.
    pub unloading_hours: f64,
    /// Round-trip driving.
    pub driving_hours: f64,
    /// Stairs, slow elevators and long carries from parking.
    pub logistics_hours: f64,
    /// Packing service.
    pub packing_hours: f64,
    /// Cleaning service.
    pub cleaning_hours: f64,
    /// Special items (piano, heavy furniture).
    pub additional_hours: f64,
    /// Unrounded sum of all components.
    pub raw_hours: f64,
    /// Billable total.
    pub total_hours: f64,
}

impl EffortBreakdown {
    /// Hours spent handling belongings (loading + unloading).
    pub fn moving_hours(&self) -> f64 {
        self.loading_hours + self.unloading_hours
    }

    /// Sum of every component before rounding.
    pub fn component_sum(&self) -> f64 {
        self.loading_hours
            + self.unloading_hours
            + self.driving_hours
            + self.logistics_hours
            + self.packing_hours
            + self.cleaning_hours
            + self.additional_hours
    }

    /// Total duration in whole minutes, rounded up.
    ///
    /// Ignores float noise, so `33 × 0.1` hours is 198 minutes, not 199.
    pub fn total_minutes(&self) -> i64 {
        (self.total_hours * 60.0 - MINUTE_EPSILON).ceil() as i64
    }
}
