use crate::domain::handling::{HandlingEvent, HandlingEventType};
use crate::domain::itinerary::{Itinerary, Rescheduling};
use crate::domain::model::{Location, TrackingId, Voyage};
use crate::domain::Entity;
use crate::utils::error::{Result, TrackingError};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpecification {
    pub origin: Location,
    pub destination: Location,
    pub arrival_deadline: DateTime<Utc>,
}

impl RouteSpecification {
    pub fn new(
        origin: Location,
        destination: Location,
        arrival_deadline: DateTime<Utc>,
    ) -> Result<Self> {
        if origin == destination {
            return Err(TrackingError::ValidationError {
                message: format!("Origin and destination are both {}", origin.unlocode()),
            });
        }
        Ok(Self {
            origin,
            destination,
            arrival_deadline,
        })
    }

    pub fn is_satisfied_by(&self, itinerary: &Itinerary) -> bool {
        !itinerary.is_empty()
            && itinerary.initial_departure_location() == self.origin
            && itinerary.final_arrival_location() == self.destination
            && itinerary.final_arrival_date() <= self.arrival_deadline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingStatus {
    NotRouted,
    Routed,
    Misrouted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandlingOutcome {
    pub expected: bool,
}

/// The aggregate that owns an itinerary and the handling history of one cargo.
#[derive(Debug, Clone, Serialize)]
pub struct Cargo {
    tracking_id: TrackingId,
    route_specification: RouteSpecification,
    itinerary: Itinerary,
    handling_history: Vec<HandlingEvent>,
}

impl Cargo {
    pub fn new(tracking_id: TrackingId, route_specification: RouteSpecification) -> Self {
        Self {
            tracking_id,
            route_specification,
            itinerary: Itinerary::empty(),
            handling_history: Vec::new(),
        }
    }

    pub fn tracking_id(&self) -> &TrackingId {
        &self.tracking_id
    }

    pub fn origin(&self) -> &Location {
        &self.route_specification.origin
    }

    pub fn route_specification(&self) -> &RouteSpecification {
        &self.route_specification
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn handling_history(&self) -> &[HandlingEvent] {
        &self.handling_history
    }

    pub fn assign_to_route(&mut self, itinerary: Itinerary) {
        tracing::debug!(
            "Cargo {} assigned to {} leg route",
            self.tracking_id,
            itinerary.len()
        );
        self.itinerary = itinerary;
    }

    pub fn routing_status(&self) -> RoutingStatus {
        if self.itinerary.is_empty() {
            RoutingStatus::NotRouted
        } else if self.route_specification.is_satisfied_by(&self.itinerary) {
            RoutingStatus::Routed
        } else {
            RoutingStatus::Misrouted
        }
    }

    /// Customs is cleared at the final destination; everything else is judged by
    /// the itinerary.
    pub fn is_expected(&self, event: &HandlingEvent) -> bool {
        match event.event_type() {
            HandlingEventType::Customs => {
                !self.itinerary.is_empty()
                    && event.location() == &self.route_specification.destination
            }
            _ => self.itinerary.is_expected(event),
        }
    }

    pub fn handle(&mut self, event: HandlingEvent) -> Result<HandlingOutcome> {
        if event.tracking_id() != &self.tracking_id {
            return Err(TrackingError::InvalidHandlingEvent {
                message: format!(
                    "Event for cargo {} reported against cargo {}",
                    event.tracking_id(),
                    self.tracking_id
                ),
            });
        }

        let expected = self.is_expected(&event);
        self.handling_history.push(event);
        Ok(HandlingOutcome { expected })
    }

    pub fn is_misdirected(&self) -> bool {
        self.handling_history
            .iter()
            .any(|event| !self.is_expected(event))
    }

    pub fn last_known_location(&self) -> Location {
        self.handling_history
            .iter()
            .max_by_key(|event| event.completion_time())
            .map(|event| event.location().clone())
            .unwrap_or_else(Location::unknown)
    }

    /// Replaces the itinerary with one adjusted to the voyage's new schedule.
    /// Cargo not travelling on the voyage is left as is.
    pub fn reschedule(&mut self, voyage: &Voyage) -> Result<Rescheduling> {
        if !self.itinerary.uses_voyage(voyage) {
            return Ok(Rescheduling {
                itinerary: self.itinerary.clone(),
                dropped_legs: 0,
            });
        }

        let rescheduling = self.itinerary.with_rescheduled_voyage(voyage)?;
        if rescheduling.is_truncated() {
            tracing::warn!(
                "Cargo {} lost {} leg(s) after voyage {} was rescheduled; re-routing needed",
                self.tracking_id,
                rescheduling.dropped_legs,
                voyage.number()
            );
        }
        if let Err(e) = rescheduling.itinerary.check_route() {
            tracing::warn!(
                "Cargo {} itinerary is no longer consistent: {}",
                self.tracking_id,
                e
            );
        }

        self.itinerary = rescheduling.itinerary.clone();
        Ok(rescheduling)
    }
}

impl Entity for Cargo {
    type Id = TrackingId;

    fn id(&self) -> &TrackingId {
        &self.tracking_id
    }
}
