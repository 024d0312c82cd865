use crate::core::cargo::{Cargo, HandlingOutcome, RoutingStatus};
use crate::domain::handling::HandlingEvent;
use crate::domain::model::{TrackingId, Voyage};
use crate::domain::ports::CargoRepository;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReschedulingReport {
    pub tracking_id: TrackingId,
    pub dropped_legs: usize,
    pub remaining_legs: usize,
    pub routing_status: RoutingStatus,
}

/// Applies handling events and voyage reschedules to stored cargo.
///
/// Each operation runs inside one repository critical section, so concurrent
/// callers never overwrite each other's changes.
pub struct TrackingService<R: CargoRepository> {
    repository: R,
}

impl<R: CargoRepository> TrackingService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn book(&self, cargo: Cargo) -> Result<()> {
        tracing::info!(
            "📦 Booked cargo {} ({:?})",
            cargo.tracking_id(),
            cargo.routing_status()
        );
        self.repository.store(cargo)
    }

    pub fn register_handling_event(&self, event: HandlingEvent) -> Result<HandlingOutcome> {
        let tracking_id = event.tracking_id().clone();
        let summary = format!(
            "{} at {}{}",
            event.event_type(),
            event.location().unlocode(),
            event
                .voyage()
                .map(|v| format!(" on {}", v))
                .unwrap_or_default()
        );

        let outcome = self
            .repository
            .update(&tracking_id, |cargo| cargo.handle(event))?;
        if outcome.expected {
            tracing::info!("✅ Cargo {}: {}", tracking_id, summary);
        } else {
            tracing::warn!("⚠️ Cargo {} misdirected: {}", tracking_id, summary);
        }
        Ok(outcome)
    }

    /// Reschedules every cargo routed on `voyage`. If any cargo cannot follow the
    /// new schedule, no cargo is changed.
    pub fn voyage_rescheduled(&self, voyage: &Voyage) -> Result<Vec<ReschedulingReport>> {
        let reports = self.repository.update_all(|cargos| {
            let mut reports = Vec::new();
            for cargo in cargos
                .iter_mut()
                .filter(|cargo| cargo.itinerary().uses_voyage(voyage))
            {
                let rescheduling = cargo.reschedule(voyage).map_err(|e| {
                    tracing::warn!(
                        "Voyage {} cannot reschedule cargo {}: {}",
                        voyage.number(),
                        cargo.tracking_id(),
                        e
                    );
                    e
                })?;
                reports.push(ReschedulingReport {
                    tracking_id: cargo.tracking_id().clone(),
                    dropped_legs: rescheduling.dropped_legs,
                    remaining_legs: rescheduling.itinerary.len(),
                    routing_status: cargo.routing_status(),
                });
            }
            Ok(reports)
        })?;

        for report in &reports {
            tracing::info!(
                "🔁 Voyage {} rescheduled cargo {}: {} leg(s) kept, {} dropped",
                voyage.number(),
                report.tracking_id,
                report.remaining_legs,
                report.dropped_legs
            );
        }
        if reports.is_empty() {
            tracing::debug!("Voyage {} carries no tracked cargo", voyage.number());
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCargoRepository;
    use crate::utils::error::TrackingError;
    use std::sync::Arc;
    use std::thread;
    use crate::core::cargo::RouteSpecification;
    use crate::domain::handling::HandlingEventType;
    use crate::domain::itinerary::Itinerary;
    use crate::domain::leg::Leg;
    use crate::domain::model::{CarrierMovement, Location, Schedule, VoyageNumber};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn loc(code: &str) -> Location {
        Location::new(code, code).unwrap()
    }

    fn service_with_cargo() -> TrackingService<InMemoryCargoRepository> {
        let service = TrackingService::new(InMemoryCargoRepository::new());
        let spec = RouteSpecification::new(loc("SESTO"), loc("FIHEL"), at(30)).unwrap();
        let mut cargo = Cargo::new(TrackingId::new("T1").unwrap(), spec);
        cargo.assign_to_route(
            Itinerary::new(vec![
                Leg::new(VoyageNumber::new("V1").unwrap(), loc("SESTO"), loc("DEHAM"), at(1), at(3)),
                Leg::new(VoyageNumber::new("V2").unwrap(), loc("DEHAM"), loc("FIHEL"), at(4), at(6)),
            ])
            .unwrap(),
        );
        service.book(cargo).unwrap();
        service
    }

    #[test]
    fn test_register_event_stores_history() {
        let service = service_with_cargo();
        let tracking_id = TrackingId::new("T1").unwrap();
        let event = HandlingEvent::new(
            tracking_id.clone(),
            HandlingEventType::Receive,
            loc("SESTO"),
            None,
            at(1),
        )
        .unwrap();

        let outcome = service.register_handling_event(event).unwrap();
        assert!(outcome.expected);

        let stored = service.repository().find(&tracking_id).unwrap().unwrap();
        assert_eq!(stored.handling_history().len(), 1);
    }

    #[test]
    fn test_register_event_for_unknown_cargo() {
        let service = service_with_cargo();
        let event = HandlingEvent::new(
            TrackingId::new("NOPE").unwrap(),
            HandlingEventType::Receive,
            loc("SESTO"),
            None,
            at(1),
        )
        .unwrap();
        assert!(matches!(
            service.register_handling_event(event),
            Err(TrackingError::CargoNotFound { .. })
        ));
    }

    #[test]
    fn test_voyage_rescheduled_reports_truncation() {
        let service = service_with_cargo();
        let v2 = Voyage::new(
            VoyageNumber::new("V2").unwrap(),
            Schedule::new(vec![CarrierMovement::new(
                loc("DEHAM"),
                loc("FIHEL"),
                at(2),
                at(5),
            )])
            .unwrap(),
        );

        let reports = service.voyage_rescheduled(&v2).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].dropped_legs, 1);
        assert_eq!(reports[0].remaining_legs, 1);
        assert_eq!(reports[0].routing_status, RoutingStatus::Misrouted);

        let stored = service
            .repository()
            .find(&TrackingId::new("T1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(stored.itinerary().len(), 1);
    }

    fn receive(day: u32) -> HandlingEvent {
        HandlingEvent::new(
            TrackingId::new("T1").unwrap(),
            HandlingEventType::Receive,
            loc("SESTO"),
            None,
            at(day),
        )
        .unwrap()
    }

    #[test]
    fn test_concurrent_events_are_all_kept() {
        let service = Arc::new(service_with_cargo());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for _ in 0..200 {
                        service.register_handling_event(receive(1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = service
            .repository()
            .find(&TrackingId::new("T1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(stored.handling_history().len(), 1600);
    }

    #[test]
    fn test_failed_reschedule_changes_no_cargo() {
        let service = service_with_cargo();
        // T2 also rides V2, but from a port the new schedule no longer calls at.
        let spec = RouteSpecification::new(loc("SEGOT"), loc("FIHEL"), at(30)).unwrap();
        let mut other = Cargo::new(TrackingId::new("T2").unwrap(), spec);
        other.assign_to_route(
            Itinerary::new(vec![Leg::new(
                VoyageNumber::new("V2").unwrap(),
                loc("SEGOT"),
                loc("FIHEL"),
                at(4),
                at(6),
            )])
            .unwrap(),
        );
        service.book(other).unwrap();

        let v2 = Voyage::new(
            VoyageNumber::new("V2").unwrap(),
            Schedule::new(vec![CarrierMovement::new(
                loc("DEHAM"),
                loc("FIHEL"),
                at(2),
                at(5),
            )])
            .unwrap(),
        );

        assert!(matches!(
            service.voyage_rescheduled(&v2),
            Err(TrackingError::VoyageDoesNotCall { .. })
        ));
        for id in ["T1", "T2"] {
            let stored = service
                .repository()
                .find(&TrackingId::new(id).unwrap())
                .unwrap()
                .unwrap();
            assert_eq!(stored.itinerary().last_leg().unwrap().unload_time(), at(6));
        }
        let t1 = service
            .repository()
            .find(&TrackingId::new("T1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(t1.itinerary().len(), 2);
    }
}
