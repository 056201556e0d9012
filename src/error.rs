//! Error and warning types.
//!
//! Estimation rejects malformed input outright; scheduling reports
//! "no crew" and "no slot" as ordinary error values callers branch on.
//! Clamped crew sizes are warnings carried next to a valid result.

use chrono::NaiveDate;
use thiserror::Error;

/// Estimation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// A job attribute is out of range.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The estimator configuration is unusable.
    #[error("{0}")]
    InvalidConfig(String),
}

impl From<ConfigError> for EstimateError {
    fn from(err: ConfigError) -> Self {
        EstimateError::InvalidConfig(err.to_string())
    }
}

impl EstimateError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Non-fatal condition noticed while estimating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateWarning {
    /// The requested crew size is outside the throughput table.
    #[error("crew size {requested} is not supported, estimated with {used}")]
    UnsupportedCrewSize {
        /// Size the caller asked for.
        requested: u32,
        /// Nearest supported size actually used.
        used: u32,
    },
}

/// Scheduling failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// No crew has the required skills and vehicle capacity.
    #[error("no available crew for job {job_id}")]
    NoAvailableCrew {
        /// Job that could not be matched.
        job_id: String,
    },

    /// Eligible crews exist but none can fit the job into a working day
    /// on an acceptable date.
    #[error("no feasible slot for job {job_id} ({required_hours}h needed, preferred {preferred_date})")]
    InfeasibleSlot {
        /// Job that could not be placed.
        job_id: String,
        /// Shortest duration among eligible crews (hours).
        required_hours: f64,
        /// Customer's preferred date.
        preferred_date: NaiveDate,
    },

    /// The job itself is malformed.
    #[error(transparent)]
    InvalidInput(#[from] EstimateError),

    /// The scheduler configuration is unusable.
    #[error("{0}")]
    InvalidConfig(String),
}

impl From<ConfigError> for ScheduleError {
    fn from(err: ConfigError) -> Self {
        ScheduleError::InvalidConfig(err.to_string())
    }
}

/// Configuration rejected at load or validation time.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A parameter has an unusable value.
    #[error("invalid configuration `{parameter}`: {reason}")]
    Invalid {
        /// Parameter path, e.g. `estimator.average_speed_kmh`.
        parameter: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            parameter,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EstimateError::invalid("volume_cubic_meters", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid input for `volume_cubic_meters`: must be positive, got 0"
        );

        let warn = EstimateWarning::UnsupportedCrewSize {
            requested: 9,
            used: 6,
        };
        assert_eq!(warn.to_string(), "crew size 9 is not supported, estimated with 6");

        let sched = ScheduleError::NoAvailableCrew {
            job_id: "J1".into(),
        };
        assert_eq!(sched.to_string(), "no available crew for job J1");
    }

    #[test]
    fn test_schedule_error_from_estimate_error() {
        let err: ScheduleError = EstimateError::invalid("distance_km", "negative").into();
        assert!(matches!(err, ScheduleError::InvalidInput(_)));
    }
}
