pub mod cargo;
pub mod replay;
pub mod tracking;

pub use crate::domain::itinerary::{Itinerary, Rescheduling};
pub use crate::domain::ports::CargoRepository;
pub use crate::utils::error::Result;
