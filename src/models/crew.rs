//! Crew model.
//!
//! A crew is a team of movers with one vehicle, a home base, a daily
//! working-hours window, and a set of skills. Crews are the resources
//! the scheduler assigns jobs to.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Coordinates;

/// Daily working-hours window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Shift start.
    pub start: NaiveTime,
    /// Shift end.
    pub end: NaiveTime,
}

impl WorkingHours {
    /// Creates a window from start and end times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a window from whole hours, e.g. `from_hours(8, 17)`.
    ///
    /// Hours past 23 are clamped to 23:59.
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start: hour_to_time(start_hour),
            end: hour_to_time(end_hour),
        }
    }

    /// Window length in minutes (0 if end is not after start).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Window length in hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }

    /// Whether a job of the given length fits inside the window.
    pub fn fits(&self, minutes: i64) -> bool {
        minutes <= self.duration_minutes()
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self::from_hours(8, 17)
    }
}

fn hour_to_time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .or_else(|| NaiveTime::from_hms_opt(23, 59, 0))
        .unwrap_or_default()
}

/// A moving crew.
///
/// # Example
///
/// ```
/// use crew_planner::models::{Crew, WorkingHours};
///
/// let crew = Crew::new("C1", 3)
///     .with_skill("moving")
///     .with_skill("packing")
///     .with_vehicle_capacity(40.0)
///     .with_working_hours(WorkingHours::from_hours(7, 16))
///     .with_efficiency(0.9);
///
/// assert!(crew.has_skill("packing"));
/// assert_eq!(crew.working_hours.duration_minutes(), 9 * 60);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    /// Unique crew identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Headcount.
    pub size: u32,
    /// Where the crew starts the day.
    pub home_base: Coordinates,
    /// Skills the crew can perform (e.g. "moving", "piano_moving").
    pub skills: BTreeSet<String>,
    /// Cargo volume of the crew's vehicle (m³).
    pub vehicle_capacity_cubic_meters: f64,
    /// Daily working-hours window.
    pub working_hours: WorkingHours,
    /// Historical performance multiplier (0.0 to 1.0).
    pub efficiency_rating: f64,
    /// Dates on which the crew cannot take jobs.
    pub unavailable_dates: BTreeSet<NaiveDate>,
}

impl Crew {
    /// Creates a crew with default working hours (08:00-17:00) and no skills.
    pub fn new(id: impl Into<String>, size: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            size,
            home_base: Coordinates::default(),
            skills: BTreeSet::new(),
            vehicle_capacity_cubic_meters: 0.0,
            working_hours: WorkingHours::default(),
            efficiency_rating: 1.0,
            unavailable_dates: BTreeSet::new(),
        }
    }

    /// Sets the crew name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the home base.
    pub fn with_home_base(mut self, home_base: Coordinates) -> Self {
        self.home_base = home_base;
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Sets the vehicle capacity (m³).
    pub fn with_vehicle_capacity(mut self, cubic_meters: f64) -> Self {
        self.vehicle_capacity_cubic_meters = cubic_meters;
        self
    }

    /// Sets the working-hours window.
    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.working_hours = hours;
        self
    }

    /// Sets the efficiency rating, clamped to [0, 1].
    pub fn with_efficiency(mut self, rating: f64) -> Self {
        self.efficiency_rating = rating.clamp(0.0, 1.0);
        self
    }

    /// Marks a date as unavailable.
    pub fn with_unavailable_date(mut self, date: NaiveDate) -> Self {
        self.unavailable_dates.insert(date);
        self
    }

    /// Whether the crew has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    /// Whether the crew has every skill in `required`.
    pub fn has_all_skills<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        required.into_iter().all(|s| self.skills.contains(s))
    }

    /// Whether the crew can be booked on a date.
    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        !self.unavailable_dates.contains(&date)
    }
}
