//! Crew eligibility filter.
//!
//! A crew can take a job only if it has every required skill and its
//! vehicle holds the whole load. Required skills are the booked
//! services plus skills implied by special requirements (a piano needs
//! a piano-trained crew).

use std::collections::BTreeSet;

use crate::config::SchedulerConfig;
use crate::models::{Crew, MoveJobRequest};

/// Why a crew cannot take a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Ineligibility {
    /// Skills the crew lacks.
    MissingSkills(Vec<String>),
    /// Vehicle too small for the load.
    InsufficientCapacity {
        /// Vehicle capacity (m³).
        capacity: f64,
        /// Job volume (m³).
        volume: f64,
    },
}

/// Skills a crew needs for the job.
pub fn required_skills(job: &MoveJobRequest, config: &SchedulerConfig) -> BTreeSet<String> {
    let mut skills = job.required_services.clone();
    for (keyword, skill) in &config.special_requirement_skills {
        if job.has_special_requirement(keyword) {
            skills.insert(skill.clone());
        }
    }
    skills
}

/// Checks skills and vehicle capacity.
///
/// Returns the first failing condition, skills before capacity.
pub fn check_eligibility(
    crew: &Crew,
    job: &MoveJobRequest,
    required: &BTreeSet<String>,
) -> Result<(), Ineligibility> {
    let missing: Vec<String> = required
        .iter()
        .filter(|s| !crew.has_skill(s))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Ineligibility::MissingSkills(missing));
    }

    if crew.vehicle_capacity_cubic_meters < job.volume_cubic_meters {
        return Err(Ineligibility::InsufficientCapacity {
            capacity: crew.vehicle_capacity_cubic_meters,
            volume: job.volume_cubic_meters,
        });
    }

    Ok(())
}
