use crate::domain::Entity;
use crate::utils::error::{Result, TrackingError};
use crate::utils::validation::{validate_non_empty_string, validate_unlocode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnLocode(String);

impl UnLocode {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim().to_ascii_uppercase();
        validate_unlocode("unlocode", &code)?;
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnLocode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A port, terminal or inland hub. Equality and hashing use the UN/LOCODE only.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    unlocode: UnLocode,
    name: String,
}

const UNKNOWN_UNLOCODE: &str = "XXXXX";

impl Location {
    pub fn new(code: &str, name: &str) -> Result<Self> {
        validate_non_empty_string("location.name", name)?;
        let unlocode = UnLocode::new(code)?;
        if unlocode.as_str() == UNKNOWN_UNLOCODE {
            return Err(TrackingError::ValidationError {
                message: format!("{} is reserved for the unknown location", UNKNOWN_UNLOCODE),
            });
        }
        Ok(Self {
            unlocode,
            name: name.trim().to_string(),
        })
    }

    /// Placeholder for "no known location", e.g. the departure of an empty itinerary.
    /// No location built with `new` compares equal to it.
    pub fn unknown() -> Self {
        Self {
            unlocode: UnLocode(UNKNOWN_UNLOCODE.to_string()),
            name: "Unknown location".to_string(),
        }
    }

    pub fn unlocode(&self) -> &UnLocode {
        &self.unlocode
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Location {
    type Id = UnLocode;

    fn id(&self) -> &UnLocode {
        &self.unlocode
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity_as(other)
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unlocode.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.unlocode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VoyageNumber(String);

impl VoyageNumber {
    pub fn new(number: &str) -> Result<Self> {
        validate_non_empty_string("voyage_number", number)?;
        Ok(Self(number.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoyageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackingId(String);

impl TrackingId {
    pub fn new(id: &str) -> Result<Self> {
        validate_non_empty_string("tracking_id", id)?;
        Ok(Self(id.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// One hop of a voyage between two consecutive calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierMovement {
    pub departure_location: Location,
    pub arrival_location: Location,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl CarrierMovement {
    pub fn new(
        departure_location: Location,
        arrival_location: Location,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
    ) -> Self {
        Self {
            departure_location,
            arrival_location,
            departure_time,
            arrival_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    movements: Vec<CarrierMovement>,
}

impl Schedule {
    pub fn new(movements: Vec<CarrierMovement>) -> Result<Self> {
        if movements.is_empty() {
            return Err(TrackingError::ValidationError {
                message: "Schedule must contain at least one carrier movement".to_string(),
            });
        }

        for (index, movement) in movements.iter().enumerate() {
            if movement.departure_time > movement.arrival_time {
                return Err(TrackingError::ValidationError {
                    message: format!(
                        "Carrier movement {} departs {} after it arrives {}",
                        index, movement.departure_time, movement.arrival_time
                    ),
                });
            }
        }

        for (index, pair) in movements.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            if previous.arrival_location != next.departure_location {
                return Err(TrackingError::ValidationError {
                    message: format!(
                        "Carrier movement {} departs from {} but the voyage arrived at {}",
                        index + 1,
                        next.departure_location.unlocode(),
                        previous.arrival_location.unlocode()
                    ),
                });
            }
            if next.departure_time < previous.arrival_time {
                return Err(TrackingError::ValidationError {
                    message: format!(
                        "Carrier movement {} departs before the previous movement arrives",
                        index + 1
                    ),
                });
            }
        }

        Ok(Self { movements })
    }

    pub fn movements(&self) -> &[CarrierMovement] {
        &self.movements
    }
}

/// Arrival and departure times of a voyage at one of its calls.
/// The first call has no arrival, the last call has no departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCall {
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Voyage {
    number: VoyageNumber,
    schedule: Schedule,
}

impl Voyage {
    pub fn new(number: VoyageNumber, schedule: Schedule) -> Self {
        Self { number, schedule }
    }

    pub fn number(&self) -> &VoyageNumber {
        &self.number
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Same voyage, new timetable.
    pub fn rescheduled(&self, schedule: Schedule) -> Self {
        Self {
            number: self.number.clone(),
            schedule,
        }
    }

    pub fn schedule_at(&self, location: &Location) -> Option<PortCall> {
        let movements = self.schedule.movements();

        let arrival = movements
            .iter()
            .find(|m| m.arrival_location.same_identity_as(location))
            .map(|m| m.arrival_time);
        let departure = movements
            .iter()
            .find(|m| m.departure_location.same_identity_as(location))
            .map(|m| m.departure_time);

        if arrival.is_none() && departure.is_none() {
            None
        } else {
            Some(PortCall { arrival, departure })
        }
    }

    /// Departure from `from` and the first later arrival at `to`.
    ///
    /// A voyage may call at the same port more than once; the arrival is searched
    /// only from the departing movement onwards, so departure <= arrival.
    pub fn passage(
        &self,
        from: &Location,
        to: &Location,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let movements = self.schedule.movements();
        movements
            .iter()
            .enumerate()
            .filter(|(_, m)| m.departure_location.same_identity_as(from))
            .find_map(|(start, departing)| {
                movements[start..]
                    .iter()
                    .find(|m| m.arrival_location.same_identity_as(to))
                    .map(|arriving| (departing.departure_time, arriving.arrival_time))
            })
    }
}

impl Entity for Voyage {
    type Id = VoyageNumber;

    fn id(&self) -> &VoyageNumber {
        &self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn loc(code: &str) -> Location {
        Location::new(code, code).unwrap()
    }

    #[test]
    fn test_location_identity_ignores_name() {
        let a = Location::new("USNYC", "New York").unwrap();
        let b = Location::new("usnyc", "NYC").unwrap();
        assert!(a.same_identity_as(&b));
        assert_eq!(a, b);
        assert_ne!(a, Location::unknown());
    }

    #[test]
    fn test_location_rejects_bad_code() {
        assert!(Location::new("NYC", "New York").is_err());
        assert!(Location::new("USNYC", " ").is_err());
    }

    #[test]
    fn test_unknown_code_is_reserved() {
        assert!(matches!(
            Location::new("xxxxx", "Somewhere"),
            Err(TrackingError::ValidationError { .. })
        ));
        assert_eq!(Location::unknown().unlocode().as_str(), "XXXXX");
    }

    #[test]
    fn test_passage_on_a_voyage_calling_twice() {
        // NYC -> CHI -> NYC -> DAL: the CHI unload after the second NYC departure
        // must not be taken from the first call.
        let schedule = Schedule::new(vec![
            CarrierMovement::new(loc("USNYC"), loc("USCHI"), at(1), at(3)),
            CarrierMovement::new(loc("USCHI"), loc("USNYC"), at(4), at(6)),
            CarrierMovement::new(loc("USNYC"), loc("USDAL"), at(7), at(9)),
            CarrierMovement::new(loc("USDAL"), loc("USCHI"), at(10), at(12)),
        ])
        .unwrap();
        let voyage = Voyage::new(VoyageNumber::new("V100").unwrap(), schedule);

        assert_eq!(
            voyage.passage(&loc("USNYC"), &loc("USCHI")),
            Some((at(1), at(3)))
        );
        assert_eq!(
            voyage.passage(&loc("USDAL"), &loc("USCHI")),
            Some((at(10), at(12)))
        );
        assert_eq!(
            voyage.passage(&loc("USCHI"), &loc("USNYC")),
            Some((at(4), at(6)))
        );
        assert_eq!(voyage.passage(&loc("USDAL"), &loc("USNYC")), None);
        assert_eq!(voyage.passage(&loc("SESTO"), &loc("USCHI")), None);
    }

    #[test]
    fn test_schedule_at() {
        let schedule = Schedule::new(vec![
            CarrierMovement::new(loc("USNYC"), loc("USCHI"), at(9), at(12)),
            CarrierMovement::new(loc("USCHI"), loc("USDAL"), at(13), at(18)),
        ])
        .unwrap();
        let voyage = Voyage::new(VoyageNumber::new("V100").unwrap(), schedule);

        let origin = voyage.schedule_at(&loc("USNYC")).unwrap();
        assert_eq!(origin.arrival, None);
        assert_eq!(origin.departure, Some(at(9)));

        let middle = voyage.schedule_at(&loc("USCHI")).unwrap();
        assert_eq!(middle.arrival, Some(at(12)));
        assert_eq!(middle.departure, Some(at(13)));

        let end = voyage.schedule_at(&loc("USDAL")).unwrap();
        assert_eq!(end.arrival, Some(at(18)));
        assert_eq!(end.departure, None);

        assert!(voyage.schedule_at(&loc("SESTO")).is_none());
    }

    #[test]
    fn test_schedule_rejects_gaps_and_reversed_times() {
        assert!(Schedule::new(vec![]).is_err());
        assert!(Schedule::new(vec![CarrierMovement::new(
            loc("USNYC"),
            loc("USCHI"),
            at(12),
            at(9)
        )])
        .is_err());
        assert!(Schedule::new(vec![
            CarrierMovement::new(loc("USNYC"), loc("USCHI"), at(9), at(12)),
            CarrierMovement::new(loc("USDAL"), loc("SESTO"), at(13), at(18)),
        ])
        .is_err());
    }

    #[test]
    fn test_rescheduled_voyage_keeps_identity() {
        let number = VoyageNumber::new("V100").unwrap();
        let voyage = Voyage::new(
            number.clone(),
            Schedule::new(vec![CarrierMovement::new(
                loc("USNYC"),
                loc("USCHI"),
                at(9),
                at(12),
            )])
            .unwrap(),
        );
        let delayed = voyage.rescheduled(
            Schedule::new(vec![CarrierMovement::new(
                loc("USNYC"),
                loc("USCHI"),
                at(10),
                at(14),
            )])
            .unwrap(),
        );
        assert!(voyage.same_identity_as(&delayed));
        assert_eq!(delayed.number(), &number);
    }
}
