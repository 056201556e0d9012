//! Planning domain models.
//!
//! Plain value types exchanged with the surrounding platform: the
//! customer's move request, the crew roster, and the computed outputs.
//! Nothing here performs I/O or holds shared state.
//!
//! # Domain Mappings
//!
//! | crew-planner | Scheduling theory | Dispatch desk |
//! |--------------|-------------------|---------------|
//! | MoveJobRequest | Job | Booking |
//! | Crew | Resource | Team + truck |
//! | EffortBreakdown | Processing time | Quote hours |
//! | ScheduleResult | Assignment | Dispatch decision |

mod crew;
mod effort;
mod job;
mod location;
mod schedule;

pub use crew::{Crew, WorkingHours};
pub use effort::EffortBreakdown;
pub use job::{
    volume_from_living_area, ElevatorAccess, Ends, Flexibility, MoveJobRequest, Priority,
    PropertyType, TrafficCondition, SERVICE_CLEANING, SERVICE_MOVING, SERVICE_PACKING,
};
pub use location::Coordinates;
pub use schedule::{AlternativeSlot, ScheduleResult, ScheduledSlot, ScoreBreakdown};
