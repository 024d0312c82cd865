pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::memory::InMemoryCargoRepository;
pub use crate::config::{ScenarioConfig, ScenarioWorld};
pub use crate::core::cargo::{Cargo, HandlingOutcome, RouteSpecification, RoutingStatus};
pub use crate::core::replay::{replay, ScenarioReport};
pub use crate::core::tracking::{ReschedulingReport, TrackingService};
pub use crate::domain::handling::{HandlingEvent, HandlingEventType};
pub use crate::domain::itinerary::{Itinerary, Rescheduling};
pub use crate::domain::leg::Leg;
pub use crate::domain::model::{
    CarrierMovement, Location, PortCall, Schedule, TrackingId, UnLocode, Voyage, VoyageNumber,
};
pub use crate::domain::ports::CargoRepository;
pub use crate::domain::{Entity, ValueObject};
pub use crate::utils::error::{ErrorCategory, Result, TrackingError};
