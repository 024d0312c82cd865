use crate::config::scenario::ScenarioWorld;
use crate::core::cargo::RoutingStatus;
use crate::core::tracking::{ReschedulingReport, TrackingService};
use crate::domain::handling::HandlingEventType;
use crate::domain::model::{Location, TrackingId};
use crate::domain::ports::CargoRepository;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub tracking_id: TrackingId,
    pub event_type: HandlingEventType,
    pub location: Location,
    pub expected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CargoSummary {
    pub tracking_id: TrackingId,
    pub routing_status: RoutingStatus,
    pub misdirected: bool,
    pub legs: usize,
    pub last_known_location: Location,
    pub final_arrival_location: Location,
    pub final_arrival_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub events: Vec<EventReport>,
    pub reschedules: Vec<ReschedulingReport>,
    pub cargos: Vec<CargoSummary>,
}

impl ScenarioReport {
    pub fn misdirected_count(&self) -> usize {
        self.cargos.iter().filter(|c| c.misdirected).count()
    }

    pub fn truncated_count(&self) -> usize {
        self.reschedules.iter().filter(|r| r.dropped_legs > 0).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Books every cargo, then replays events in file order, then applies reschedules.
pub fn replay<R: CargoRepository>(world: ScenarioWorld, repository: R) -> Result<ScenarioReport> {
    let service = TrackingService::new(repository);

    tracing::info!("🚢 Replaying scenario '{}'", world.name);
    for cargo in world.cargos {
        service.book(cargo)?;
    }

    let mut events = Vec::with_capacity(world.events.len());
    for event in world.events {
        let tracking_id = event.tracking_id().clone();
        let event_type = event.event_type();
        let location = event.location().clone();
        let outcome = service.register_handling_event(event)?;
        events.push(EventReport {
            tracking_id,
            event_type,
            location,
            expected: outcome.expected,
        });
    }

    let mut reschedules = Vec::new();
    for voyage in &world.reschedules {
        reschedules.extend(service.voyage_rescheduled(voyage)?);
    }

    let cargos = service
        .repository()
        .find_all()?
        .iter()
        .map(|cargo| {
            let itinerary = cargo.itinerary();
            CargoSummary {
                tracking_id: cargo.tracking_id().clone(),
                routing_status: cargo.routing_status(),
                misdirected: cargo.is_misdirected(),
                legs: itinerary.len(),
                last_known_location: cargo.last_known_location(),
                final_arrival_location: itinerary.final_arrival_location(),
                final_arrival_date: itinerary.last_leg().map(|leg| leg.unload_time()),
            }
        })
        .collect();

    Ok(ScenarioReport {
        name: world.name,
        events,
        reschedules,
        cargos,
    })
}
