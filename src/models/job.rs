//! Move job request model.
//!
//! A job request carries the physical attributes of a move (volume,
//! distance, floors, elevators, parking) plus the customer's scheduling
//! preferences. Everything the estimator and scheduler need is here;
//! persistence and customer records live outside this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Coordinates;

/// Service name for the moving work itself (loading, driving, unloading).
pub const SERVICE_MOVING: &str = "moving";
/// Service name for packing belongings before the move.
pub const SERVICE_PACKING: &str = "packing";
/// Service name for move-out cleaning.
pub const SERVICE_CLEANING: &str = "cleaning";

/// Elevator access at one end of the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElevatorAccess {
    /// Stairs only.
    #[default]
    None,
    /// Elevator that fits boxes but not furniture.
    Small,
    /// Elevator that fits furniture.
    Large,
}

/// How far the customer tolerates moving the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Flexibility {
    /// Preferred date only.
    #[default]
    Fixed,
    /// A day either side.
    Flexible,
    /// Several days either side.
    VeryFlexible,
}

/// Job priority.
///
/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Kind of property being moved out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Office,
}

impl PropertyType {
    /// Typical furnished volume per square meter of living area (m³/m²).
    pub fn volume_per_square_meter(&self) -> f64 {
        match self {
            PropertyType::Apartment => 0.3,
            PropertyType::House => 0.4,
            PropertyType::Office => 0.25,
        }
    }
}

/// Traffic conditions expected on the driving leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrafficCondition {
    Weekend,
    Normal,
    RushHour,
}

/// A value measured at the pickup and delivery ends of the move.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ends<T> {
    /// Pickup address.
    pub from: T,
    /// Delivery address.
    pub to: T,
}

impl<T> Ends<T> {
    /// Creates a pickup/delivery pair.
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }
}

impl<T: Copy> Ends<T> {
    /// Both values as an array, pickup first.
    pub fn both(&self) -> [T; 2] {
        [self.from, self.to]
    }
}

/// A customer's move request.
///
/// # Example
///
/// ```
/// use crew_planner::models::{MoveJobRequest, Flexibility, ElevatorAccess};
/// use chrono::NaiveDate;
///
/// let job = MoveJobRequest::new("J-100", 24.0, 26.8)
///     .with_preferred_date(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap())
///     .with_flexibility(Flexibility::Flexible)
///     .with_floors(3, 0)
///     .with_elevators(ElevatorAccess::None, ElevatorAccess::Large);
///
/// assert!(job.includes_service("moving"));
/// assert_eq!(job.floors.from, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveJobRequest {
    /// Unique job identifier.
    pub id: String,
    /// Customer (pickup) location.
    pub customer_location: Coordinates,
    /// Free-form service category (e.g. "private", "office").
    pub service_type: String,
    /// Volume of belongings (m³).
    pub volume_cubic_meters: f64,
    /// One-way driving distance between pickup and delivery (km).
    pub distance_km: f64,
    /// Floor numbers at each end (0 = ground floor).
    pub floors: Ends<u32>,
    /// Elevator access at each end.
    pub elevator_access: Ends<ElevatorAccess>,
    /// Carry distance from parking to the entrance at each end (m).
    pub parking_distance_meters: Ends<f64>,
    /// Services the customer booked; doubles as the crew skills required.
    pub required_services: BTreeSet<String>,
    /// Customer's preferred move date.
    pub preferred_date: NaiveDate,
    /// Tolerance for moving the date.
    pub flexibility: Flexibility,
    /// Job priority.
    pub priority: Priority,
    /// Special items or handling notes (e.g. "piano", "fragile").
    pub special_requirements: Vec<String>,
    /// Property kind, used for volume derivation and benchmarking.
    pub property_type: PropertyType,
    /// Living area (m²). Derived from volume when absent.
    pub living_area_sqm: Option<f64>,
    /// Crew size currently assigned or requested.
    pub team_size: Option<u32>,
    /// Expected traffic on the driving leg.
    pub traffic: Option<TrafficCondition>,
    /// Whether the household has heavy furniture beyond the norm.
    pub heavy_items: bool,
}

impl MoveJobRequest {
    /// Creates a moving-only job with the given volume and one-way distance.
    pub fn new(id: impl Into<String>, volume_cubic_meters: f64, distance_km: f64) -> Self {
        let mut required_services = BTreeSet::new();
        required_services.insert(SERVICE_MOVING.to_string());
        Self {
            id: id.into(),
            customer_location: Coordinates::default(),
            service_type: String::new(),
            volume_cubic_meters,
            distance_km,
            floors: Ends::default(),
            elevator_access: Ends::default(),
            parking_distance_meters: Ends::default(),
            required_services,
            preferred_date: NaiveDate::default(),
            flexibility: Flexibility::Fixed,
            priority: Priority::Medium,
            special_requirements: Vec::new(),
            property_type: PropertyType::Apartment,
            living_area_sqm: None,
            team_size: None,
            traffic: None,
            heavy_items: false,
        }
    }

    /// Sets the customer location.
    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.customer_location = location;
        self
    }

    /// Sets the service category.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Sets floor numbers at pickup and delivery.
    pub fn with_floors(mut self, from: u32, to: u32) -> Self {
        self.floors = Ends::new(from, to);
        self
    }

    /// Sets elevator access at pickup and delivery.
    pub fn with_elevators(mut self, from: ElevatorAccess, to: ElevatorAccess) -> Self {
        self.elevator_access = Ends::new(from, to);
        self
    }

    /// Sets parking carry distances at pickup and delivery (m).
    pub fn with_parking_distance(mut self, from: f64, to: f64) -> Self {
        self.parking_distance_meters = Ends::new(from, to);
        self
    }

    /// Adds a required service.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.required_services.insert(service.into());
        self
    }

    /// Replaces the required services.
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_services = services.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the preferred date.
    pub fn with_preferred_date(mut self, date: NaiveDate) -> Self {
        self.preferred_date = date;
        self
    }

    /// Sets the date flexibility.
    pub fn with_flexibility(mut self, flexibility: Flexibility) -> Self {
        self.flexibility = flexibility;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a special requirement.
    pub fn with_special_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.special_requirements.push(requirement.into());
        self
    }

    /// Sets the property type.
    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    /// Sets the living area (m²).
    pub fn with_living_area(mut self, sqm: f64) -> Self {
        self.living_area_sqm = Some(sqm);
        self
    }

    /// Sets the currently assigned crew size.
    pub fn with_team_size(mut self, team_size: u32) -> Self {
        self.team_size = Some(team_size);
        self
    }

    /// Sets the expected traffic.
    pub fn with_traffic(mut self, traffic: TrafficCondition) -> Self {
        self.traffic = Some(traffic);
        self
    }

    /// Marks the move as including heavy furniture.
    pub fn with_heavy_items(mut self, heavy: bool) -> Self {
        self.heavy_items = heavy;
        self
    }

    /// Whether the given service was booked.
    pub fn includes_service(&self, service: &str) -> bool {
        self.required_services.contains(service)
    }

    /// Whether a special requirement mentions the given keyword (case-insensitive).
    pub fn has_special_requirement(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.special_requirements
            .iter()
            .any(|r| r.to_lowercase().contains(&keyword))
    }

    /// Living area (m²), falling back to the property's volume ratio.
    pub fn effective_living_area(&self) -> f64 {
        self.living_area_sqm.unwrap_or_else(|| {
            self.volume_cubic_meters / self.property_type.volume_per_square_meter()
        })
    }
}

/// Estimates the furnished volume of a property from its living area (m³).
///
/// Used by quote flows that only know the floor area.
pub fn volume_from_living_area(living_area_sqm: f64, property_type: PropertyType) -> f64 {
    living_area_sqm * property_type.volume_per_square_meter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = MoveJobRequest::new("J1", 30.0, 12.0)
            .with_service_type("private")
            .with_floors(4, 1)
            .with_elevators(ElevatorAccess::Small, ElevatorAccess::None)
            .with_parking_distance(35.0, 10.0)
            .with_service(SERVICE_PACKING)
            .with_priority(Priority::High)
            .with_special_requirement("Piano (upright)")
            .with_team_size(3);

        assert_eq!(job.id, "J1");
        assert_eq!(job.floors.both(), [4, 1]);
        assert_eq!(job.elevator_access.from, ElevatorAccess::Small);
        assert!(job.includes_service(SERVICE_MOVING));
        assert!(job.includes_service(SERVICE_PACKING));
        assert!(!job.includes_service(SERVICE_CLEANING));
        assert!(job.has_special_requirement("piano"));
        assert_eq!(job.team_size, Some(3));
    }

    #[test]
    fn test_with_services_replaces_moving() {
        let job = MoveJobRequest::new("J1", 10.0, 0.0).with_services([SERVICE_CLEANING]);
        assert!(!job.includes_service(SERVICE_MOVING));
        assert!(job.includes_service(SERVICE_CLEANING));
    }

    #[test]
    fn test_effective_living_area() {
        let derived = MoveJobRequest::new("J1", 30.0, 5.0);
        assert!((derived.effective_living_area() - 100.0).abs() < 1e-9);

        let explicit = MoveJobRequest::new("J2", 30.0, 5.0).with_living_area(85.0);
        assert!((explicit.effective_living_area() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_from_living_area() {
        assert!((volume_from_living_area(100.0, PropertyType::Apartment) - 30.0).abs() < 1e-9);
        assert!((volume_from_living_area(250.0, PropertyType::House) - 100.0).abs() < 1e-9);
        assert!((volume_from_living_area(200.0, PropertyType::Office) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_serde_camel_case_enums() {
        let json = serde_json::to_string(&Flexibility::VeryFlexible).unwrap();
        assert_eq!(json, "\"veryFlexible\"");
        let parsed: ElevatorAccess = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(parsed, ElevatorAccess::Large);
    }
}
