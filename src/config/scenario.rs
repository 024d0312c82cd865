use crate::core::cargo::{Cargo, RouteSpecification};
use crate::domain::handling::{HandlingEvent, HandlingEventType};
use crate::domain::itinerary::Itinerary;
use crate::domain::leg::Leg;
use crate::domain::model::{
    CarrierMovement, Location, Schedule, TrackingId, UnLocode, Voyage, VoyageNumber,
};
use crate::utils::error::{Result, TrackingError};
use crate::utils::validation::{
    validate_non_empty_string, validate_unique, validate_unlocode, Validate,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: ScenarioInfo,
    pub locations: Vec<LocationConfig>,
    #[serde(default)]
    pub voyages: Vec<VoyageConfig>,
    #[serde(default)]
    pub cargos: Vec<CargoConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
    #[serde(default)]
    pub reschedules: Vec<VoyageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageConfig {
    pub number: String,
    pub movements: Vec<MovementConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    pub from: String,
    pub to: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoConfig {
    pub tracking_id: String,
    pub origin: String,
    pub destination: String,
    pub arrival_deadline: DateTime<Utc>,
    #[serde(default)]
    pub legs: Vec<LegConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegConfig {
    pub voyage: String,
    pub from: String,
    pub to: String,
    pub load: DateTime<Utc>,
    pub unload: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub tracking_id: String,
    pub r#type: String,
    pub location: String,
    pub voyage: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Domain values resolved from a scenario file.
#[derive(Debug, Clone)]
pub struct ScenarioWorld {
    pub name: String,
    pub locations: HashMap<UnLocode, Location>,
    pub voyages: HashMap<VoyageNumber, Voyage>,
    pub cargos: Vec<Cargo>,
    pub events: Vec<HandlingEvent>,
    pub reschedules: Vec<Voyage>,
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DEPARTURE_DAY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 將代碼解析為領域物件
    pub fn into_world(&self) -> Result<ScenarioWorld> {
        let mut locations = HashMap::new();
        for location in &self.locations {
            let location = Location::new(&location.code, &location.name)?;
            locations.insert(location.unlocode().clone(), location);
        }

        let mut voyages = HashMap::new();
        for voyage in &self.voyages {
            let voyage = build_voyage(voyage, &locations)?;
            voyages.insert(voyage.number().clone(), voyage);
        }

        let cargos = self
            .cargos
            .iter()
            .map(|cargo| build_cargo(cargo, &locations, &voyages))
            .collect::<Result<Vec<_>>>()?;

        let events = self
            .events
            .iter()
            .map(|event| build_event(event, &locations, &voyages))
            .collect::<Result<Vec<_>>>()?;

        let reschedules = self
            .reschedules
            .iter()
            .map(|voyage| -> Result<Voyage> {
                let rescheduled = build_voyage(voyage, &locations)?;
                if !voyages.contains_key(rescheduled.number()) {
                    return Err(TrackingError::UnknownVoyage {
                        number: voyage.number.clone(),
                    });
                }
                Ok(rescheduled)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ScenarioWorld {
            name: self.scenario.name.clone(),
            locations,
            voyages,
            cargos,
            events,
            reschedules,
        })
    }
}

fn resolve_location(locations: &HashMap<UnLocode, Location>, code: &str) -> Result<Location> {
    let unlocode = UnLocode::new(code).map_err(|_| TrackingError::UnknownLocation {
        code: code.to_string(),
    })?;
    locations
        .get(&unlocode)
        .cloned()
        .ok_or_else(|| TrackingError::UnknownLocation {
            code: code.to_string(),
        })
}

fn resolve_voyage(voyages: &HashMap<VoyageNumber, Voyage>, number: &str) -> Result<VoyageNumber> {
    let number = VoyageNumber::new(number)?;
    if voyages.contains_key(&number) {
        Ok(number)
    } else {
        Err(TrackingError::UnknownVoyage {
            number: number.to_string(),
        })
    }
}

fn build_voyage(config: &VoyageConfig, locations: &HashMap<UnLocode, Location>) -> Result<Voyage> {
    let movements = config
        .movements
        .iter()
        .map(|m| -> Result<CarrierMovement> {
            Ok(CarrierMovement::new(
                resolve_location(locations, &m.from)?,
                resolve_location(locations, &m.to)?,
                m.departure,
                m.arrival,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Voyage::new(
        VoyageNumber::new(&config.number)?,
        Schedule::new(movements)?,
    ))
}

fn build_cargo(
    config: &CargoConfig,
    locations: &HashMap<UnLocode, Location>,
    voyages: &HashMap<VoyageNumber, Voyage>,
) -> Result<Cargo> {
    let spec = RouteSpecification::new(
        resolve_location(locations, &config.origin)?,
        resolve_location(locations, &config.destination)?,
        config.arrival_deadline,
    )?;
    let mut cargo = Cargo::new(TrackingId::new(&config.tracking_id)?, spec);

    if !config.legs.is_empty() {
        let legs = config
            .legs
            .iter()
            .map(|leg| -> Result<Leg> {
                Ok(Leg::new(
                    resolve_voyage(voyages, &leg.voyage)?,
                    resolve_location(locations, &leg.from)?,
                    resolve_location(locations, &leg.to)?,
                    leg.load,
                    leg.unload,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        cargo.assign_to_route(Itinerary::new(legs)?);
    }

    Ok(cargo)
}

fn build_event(
    config: &EventConfig,
    locations: &HashMap<UnLocode, Location>,
    voyages: &HashMap<VoyageNumber, Voyage>,
) -> Result<HandlingEvent> {
    let voyage = config
        .voyage
        .as_deref()
        .map(|number| resolve_voyage(voyages, number))
        .transpose()?;

    HandlingEvent::new(
        TrackingId::new(&config.tracking_id)?,
        config.r#type.parse::<HandlingEventType>()?,
        resolve_location(locations, &config.location)?,
        voyage,
        config.completed_at,
    )
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scenario.name", &self.scenario.name)?;

        if self.locations.is_empty() {
            return Err(TrackingError::ValidationError {
                message: "Scenario must declare at least one location".to_string(),
            });
        }
        for location in &self.locations {
            validate_unlocode("locations.code", &location.code.to_ascii_uppercase())?;
        }
        let codes: Vec<String> = self
            .locations
            .iter()
            .map(|l| l.code.to_ascii_uppercase())
            .collect();
        validate_unique("locations.code", codes.iter().map(String::as_str))?;

        validate_unique("voyages.number", self.voyages.iter().map(|v| v.number.as_str()))?;
        for voyage in self.voyages.iter().chain(&self.reschedules) {
            if voyage.movements.is_empty() {
                return Err(TrackingError::ValidationError {
                    message: format!("Voyage {} has no movements", voyage.number),
                });
            }
        }

        validate_unique(
            "cargos.tracking_id",
            self.cargos.iter().map(|c| c.tracking_id.as_str()),
        )?;

        for event in &self.events {
            event.r#type.parse::<HandlingEventType>()?;
        }

        Ok(())
    }
}
