use crate::domain::model::{Location, TrackingId, VoyageNumber};
use crate::utils::error::{Result, TrackingError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandlingEventType {
    Receive,
    Load,
    Unload,
    Claim,
    Customs,
}

impl HandlingEventType {
    pub fn requires_voyage(&self) -> bool {
        matches!(self, HandlingEventType::Load | HandlingEventType::Unload)
    }

    pub fn prohibits_voyage(&self) -> bool {
        matches!(self, HandlingEventType::Receive | HandlingEventType::Claim)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlingEventType::Receive => "RECEIVE",
            HandlingEventType::Load => "LOAD",
            HandlingEventType::Unload => "UNLOAD",
            HandlingEventType::Claim => "CLAIM",
            HandlingEventType::Customs => "CUSTOMS",
        }
    }
}

impl fmt::Display for HandlingEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HandlingEventType {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RECEIVE" => Ok(HandlingEventType::Receive),
            "LOAD" => Ok(HandlingEventType::Load),
            "UNLOAD" => Ok(HandlingEventType::Unload),
            "CLAIM" => Ok(HandlingEventType::Claim),
            "CUSTOMS" => Ok(HandlingEventType::Customs),
            other => Err(TrackingError::InvalidHandlingEvent {
                message: format!("Unknown handling event type: {}", other),
            }),
        }
    }
}

/// A reported real-world handling of a cargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlingEvent {
    tracking_id: TrackingId,
    event_type: HandlingEventType,
    location: Location,
    voyage: Option<VoyageNumber>,
    completion_time: DateTime<Utc>,
}

impl HandlingEvent {
    pub fn new(
        tracking_id: TrackingId,
        event_type: HandlingEventType,
        location: Location,
        voyage: Option<VoyageNumber>,
        completion_time: DateTime<Utc>,
    ) -> Result<Self> {
        if event_type.requires_voyage() && voyage.is_none() {
            return Err(TrackingError::InvalidHandlingEvent {
                message: format!("{} event requires a voyage", event_type),
            });
        }
        if event_type.prohibits_voyage() && voyage.is_some() {
            return Err(TrackingError::InvalidHandlingEvent {
                message: format!("{} event cannot reference a voyage", event_type),
            });
        }

        Ok(Self {
            tracking_id,
            event_type,
            location,
            voyage,
            completion_time,
        })
    }

    pub fn tracking_id(&self) -> &TrackingId {
        &self.tracking_id
    }

    pub fn event_type(&self) -> HandlingEventType {
        self.event_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn voyage(&self) -> Option<&VoyageNumber> {
        self.voyage.as_ref()
    }

    pub fn completion_time(&self) -> DateTime<Utc> {
        self.completion_time
    }
}
