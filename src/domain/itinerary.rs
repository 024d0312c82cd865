use crate::domain::handling::{HandlingEvent, HandlingEventType};
use crate::domain::leg::Leg;
use crate::domain::model::{Location, Voyage};
use crate::domain::{Entity, ValueObject};
use crate::utils::error::{Result, TrackingError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An ordered plan of legs describing a cargo's intended route.
///
/// Built through [`Itinerary::new`], which rejects empty, disconnected or
/// time-reversed plans. [`Itinerary::empty`] is the only legless itinerary and
/// stands in for "not routed yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

/// Outcome of [`Itinerary::with_rescheduled_voyage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rescheduling {
    pub itinerary: Itinerary,
    pub dropped_legs: usize,
}

impl Rescheduling {
    pub fn is_truncated(&self) -> bool {
        self.dropped_legs > 0
    }
}

impl Itinerary {
    pub fn new(legs: Vec<Leg>) -> Result<Self> {
        if legs.is_empty() {
            return Err(TrackingError::EmptyItinerary);
        }
        let itinerary = Self { legs };
        itinerary.check_route()?;
        Ok(itinerary)
    }

    /// Builds from possibly-missing legs, failing on the first gap.
    pub fn from_slots<I>(slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<Leg>>,
    {
        let legs = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(TrackingError::MissingLeg { index }))
            .collect::<Result<Vec<_>>>()?;
        Self::new(legs)
    }

    pub(crate) fn new_unchecked(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks that every leg loads no later than it unloads, and that each leg
    /// starts where and after the previous one ends.
    pub fn check_route(&self) -> Result<()> {
        for (index, leg) in self.legs.iter().enumerate() {
            if leg.load_time() > leg.unload_time() {
                return Err(TrackingError::NonMonotonicTime {
                    index,
                    reason: format!(
                        "loads at {} after unloading at {}",
                        leg.load_time(),
                        leg.unload_time()
                    ),
                });
            }
        }

        for (offset, pair) in self.legs.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            let index = offset + 1;
            if !previous.unload_location().same_identity_as(next.load_location()) {
                return Err(TrackingError::DisconnectedRoute {
                    index,
                    unload: previous.unload_location().unlocode().to_string(),
                    load: next.load_location().unlocode().to_string(),
                });
            }
            if next.load_time() < previous.unload_time() {
                return Err(TrackingError::NonMonotonicTime {
                    index,
                    reason: format!(
                        "loads at {} before the previous leg unloads at {}",
                        next.load_time(),
                        previous.unload_time()
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Whether the event fits somewhere in this plan.
    ///
    /// Stateless: every call re-evaluates the event against the whole plan, so
    /// late or out-of-order reports are still accepted. Customs can't be judged
    /// from the itinerary alone and is always `false` here.
    pub fn is_expected(&self, event: &HandlingEvent) -> bool {
        let (first, last) = match (self.first_leg(), self.last_leg()) {
            (Some(first), Some(last)) => (first, last),
            _ => return false,
        };

        match event.event_type() {
            HandlingEventType::Receive => first.load_location() == event.location(),
            HandlingEventType::Load => self.legs.iter().any(|leg| {
                leg.load_location().same_identity_as(event.location())
                    && event.voyage() == Some(leg.voyage())
            }),
            HandlingEventType::Unload => self.legs.iter().any(|leg| {
                leg.unload_location().same_identity_as(event.location())
                    && event.voyage() == Some(leg.voyage())
            }),
            HandlingEventType::Claim => last.unload_location() == event.location(),
            HandlingEventType::Customs => false,
        }
    }

    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }

    pub fn last_leg(&self) -> Option<&Leg> {
        self.legs.last()
    }

    pub fn initial_departure_location(&self) -> Location {
        self.first_leg()
            .map(|leg| leg.load_location().clone())
            .unwrap_or_else(Location::unknown)
    }

    pub fn final_arrival_location(&self) -> Location {
        self.last_leg()
            .map(|leg| leg.unload_location().clone())
            .unwrap_or_else(Location::unknown)
    }

    /// Unload time of the last leg, or the end of time when there is no plan.
    pub fn final_arrival_date(&self) -> DateTime<Utc> {
        self.last_leg()
            .map(Leg::unload_time)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// The first load location followed by every unload location, in travel order.
    pub fn locations(&self) -> Result<Vec<Location>> {
        let first = self.first_leg().ok_or(TrackingError::EmptyItinerary)?;

        let mut result = Vec::with_capacity(self.legs.len() + 1);
        result.push(first.load_location().clone());
        result.extend(self.legs.iter().map(|leg| leg.unload_location().clone()));
        Ok(result)
    }

    pub fn load_time_at(&self, location: &Location) -> Option<DateTime<Utc>> {
        self.legs
            .iter()
            .find(|leg| leg.load_location().same_identity_as(location))
            .map(Leg::load_time)
    }

    pub fn unload_time_at(&self, location: &Location) -> Option<DateTime<Utc>> {
        self.legs
            .iter()
            .find(|leg| leg.unload_location().same_identity_as(location))
            .map(Leg::unload_time)
    }

    pub fn uses_voyage(&self, voyage: &Voyage) -> bool {
        self.legs.iter().any(|leg| leg.is_on_voyage(voyage))
    }

    /// Copy of this itinerary adjusted to the voyage's new schedule.
    ///
    /// Legs on the voyage get their times from the new schedule. The plan is cut at
    /// the first leg that would load before its original predecessor unloads; that
    /// leg and everything after it are dropped and counted in
    /// [`Rescheduling::dropped_legs`]. The first leg is never dropped.
    pub fn with_rescheduled_voyage(&self, voyage: &Voyage) -> Result<Rescheduling> {
        if self.is_empty() {
            return Err(TrackingError::NothingToReschedule);
        }

        let mut legs = Vec::with_capacity(self.legs.len());
        let mut previous: Option<&Leg> = None;

        for leg in &self.legs {
            let candidate = if leg.is_on_voyage(voyage) {
                leg.with_rescheduled_voyage(voyage)?
            } else {
                leg.clone()
            };

            if let Some(previous) = previous {
                if candidate.load_time() < previous.unload_time() {
                    break;
                }
            }

            legs.push(candidate);
            previous = Some(leg);
        }

        let dropped_legs = self.legs.len() - legs.len();
        if dropped_legs > 0 {
            tracing::debug!(
                "Voyage {} truncates itinerary after {} of {} legs",
                voyage.number(),
                legs.len(),
                self.legs.len()
            );
        }

        Ok(Rescheduling {
            itinerary: Self::new_unchecked(legs),
            dropped_legs,
        })
    }
}

impl ValueObject for Itinerary {}
