use crate::domain::model::{Location, Voyage, VoyageNumber};
use crate::domain::{Entity, ValueObject};
use crate::utils::error::{Result, TrackingError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One planned segment of an itinerary: a single voyage between two calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Leg {
    voyage: VoyageNumber,
    load_location: Location,
    unload_location: Location,
    load_time: DateTime<Utc>,
    unload_time: DateTime<Utc>,
}

impl Leg {
    pub fn new(
        voyage: VoyageNumber,
        load_location: Location,
        unload_location: Location,
        load_time: DateTime<Utc>,
        unload_time: DateTime<Utc>,
    ) -> Self {
        Self {
            voyage,
            load_location,
            unload_location,
            load_time,
            unload_time,
        }
    }

    pub fn voyage(&self) -> &VoyageNumber {
        &self.voyage
    }

    pub fn load_location(&self) -> &Location {
        &self.load_location
    }

    pub fn unload_location(&self) -> &Location {
        &self.unload_location
    }

    pub fn load_time(&self) -> DateTime<Utc> {
        self.load_time
    }

    pub fn unload_time(&self) -> DateTime<Utc> {
        self.unload_time
    }

    pub fn is_on_voyage(&self, voyage: &Voyage) -> bool {
        &self.voyage == voyage.id()
    }

    /// Copy of this leg with load/unload times read from the voyage's current schedule.
    pub fn with_rescheduled_voyage(&self, voyage: &Voyage) -> Result<Leg> {
        let (load_time, unload_time) = voyage
            .passage(&self.load_location, &self.unload_location)
            .ok_or_else(|| {
                let departs = voyage
                    .schedule_at(&self.load_location)
                    .and_then(|call| call.departure)
                    .is_some();
                if departs {
                    not_calling(voyage, &self.unload_location)
                } else {
                    not_calling(voyage, &self.load_location)
                }
            })?;

        Ok(Leg {
            voyage: voyage.number().clone(),
            load_location: self.load_location.clone(),
            unload_location: self.unload_location.clone(),
            load_time,
            unload_time,
        })
    }
}

fn not_calling(voyage: &Voyage, location: &Location) -> TrackingError {
    TrackingError::VoyageDoesNotCall {
        voyage: voyage.number().to_string(),
        location: location.unlocode().to_string(),
    }
}

impl ValueObject for Leg {}
