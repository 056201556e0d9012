//! Input validation for rosters and job requests.
//!
//! Checks structural integrity before estimating or scheduling. Detects:
//! - Duplicate crew or job IDs
//! - Crews that can never take a job (zero size, empty working window,
//!   no vehicle capacity)
//! - Out-of-range ratings and coordinates
//! - Malformed job attributes
//! - Required services no crew in the roster offers
//!
//! Every check runs; all problems are reported together.

use std::collections::BTreeSet;

use crate::models::{Crew, MoveJobRequest};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two crews or two jobs share the same ID.
    DuplicateId,
    /// Crew size is zero.
    InvalidCrewSize,
    /// Working hours end at or before they start.
    InvalidWorkingHours,
    /// Vehicle capacity is not a positive number.
    InvalidCapacity,
    /// Efficiency rating outside `[0, 1]`.
    InvalidEfficiency,
    /// Latitude/longitude not finite or out of range.
    InvalidLocation,
    /// Volume, distance, parking or living area out of range.
    InvalidJobAttribute,
    /// A job books no services.
    NoServices,
    /// A job requires a service no crew offers.
    UncoveredService,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a crew roster.
///
/// # Example
///
/// ```
/// use crew_planner::models::Crew;
/// use crew_planner::validation::{validate_roster, ValidationErrorKind};
///
/// let roster = vec![Crew::new("C1", 2), Crew::new("C1", 0)];
/// let errors = validate_roster(&roster).unwrap_err();
/// assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId));
/// assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidCrewSize));
/// ```
pub fn validate_roster(roster: &[Crew]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = BTreeSet::new();

    for crew in roster {
        if !ids.insert(crew.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate crew ID: {}", crew.id),
            ));
        }
        if crew.size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCrewSize,
                format!("Crew '{}' has no members", crew.id),
            ));
        }
        if crew.working_hours.duration_minutes() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWorkingHours,
                format!(
                    "Crew '{}' working hours {}-{} are empty",
                    crew.id, crew.working_hours.start, crew.working_hours.end
                ),
            ));
        }
        if !(crew.vehicle_capacity_cubic_meters > 0.0
            && crew.vehicle_capacity_cubic_meters.is_finite())
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!(
                    "Crew '{}' vehicle capacity must be positive, got {}",
                    crew.id, crew.vehicle_capacity_cubic_meters
                ),
            ));
        }
        if !(0.0..=1.0).contains(&crew.efficiency_rating) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidEfficiency,
                format!(
                    "Crew '{}' efficiency rating {} is outside [0, 1]",
                    crew.id, crew.efficiency_rating
                ),
            ));
        }
        if !crew.home_base.is_valid() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidLocation,
                format!("Crew '{}' home base is not a valid coordinate", crew.id),
            ));
        }
    }

    finish(errors)
}

/// Validates one job request.
pub fn validate_job(job: &MoveJobRequest) -> ValidationResult {
    let mut errors = Vec::new();
    check_job(job, &mut errors);
    finish(errors)
}

/// Validates a set of jobs, including ID uniqueness.
pub fn validate_jobs(jobs: &[MoveJobRequest]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = BTreeSet::new();
    for job in jobs {
        if !ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        check_job(job, &mut errors);
    }
    finish(errors)
}

/// Validates jobs and roster together.
///
/// On top of the individual checks, every service a job requires must be
/// offered by at least one crew.
pub fn validate_input(jobs: &[MoveJobRequest], roster: &[Crew]) -> ValidationResult {
    let mut errors = match validate_roster(roster) {
        Ok(()) => Vec::new(),
        Err(e) => e,
    };
    if let Err(e) = validate_jobs(jobs) {
        errors.extend(e);
    }

    let offered: BTreeSet<&str> = roster
        .iter()
        .flat_map(|c| c.skills.iter().map(String::as_str))
        .collect();
    for job in jobs {
        for service in &job.required_services {
            if !offered.contains(service.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UncoveredService,
                    format!("Job '{}' requires '{}' which no crew offers", job.id, service),
                ));
            }
        }
    }

    finish(errors)
}

fn check_job(job: &MoveJobRequest, errors: &mut Vec<ValidationError>) {
    let mut attribute = |message: String| {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidJobAttribute,
            message,
        ))
    };

    if !(job.volume_cubic_meters > 0.0 && job.volume_cubic_meters.is_finite()) {
        attribute(format!(
            "Job '{}' volume must be positive, got {}",
            job.id, job.volume_cubic_meters
        ));
    }
    if !(job.distance_km >= 0.0 && job.distance_km.is_finite()) {
        attribute(format!(
            "Job '{}' distance must be non-negative, got {}",
            job.id, job.distance_km
        ));
    }
    for meters in job.parking_distance_meters.both() {
        if !(meters >= 0.0 && meters.is_finite()) {
            attribute(format!(
                "Job '{}' parking distance must be non-negative, got {}",
                job.id, meters
            ));
        }
    }
    if let Some(area) = job.living_area_sqm {
        if !(area >= 0.0 && area.is_finite()) {
            attribute(format!(
                "Job '{}' living area must be non-negative, got {}",
                job.id, area
            ));
        }
    }

    if job.required_services.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoServices,
            format!("Job '{}' books no services", job.id),
        ));
    }
    if !job.customer_location.is_valid() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidLocation,
            format!("Job '{}' customer location is not a valid coordinate", job.id),
        ));
    }
}
