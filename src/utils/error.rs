use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Itinerary must contain at least one leg")]
    EmptyItinerary,

    #[error("Itinerary leg {index} is missing")]
    MissingLeg { index: usize },

    #[error("Leg {index} loads at {load} but the previous leg unloads at {unload}")]
    DisconnectedRoute {
        index: usize,
        unload: String,
        load: String,
    },

    #[error("Leg {index} has non-monotonic times: {reason}")]
    NonMonotonicTime { index: usize, reason: String },

    #[error("Voyage {voyage} does not call at {location}")]
    VoyageDoesNotCall { voyage: String, location: String },

    #[error("Cannot reschedule an empty itinerary")]
    NothingToReschedule,

    #[error("Invalid handling event: {message}")]
    InvalidHandlingEvent { message: String },

    #[error("Cargo not found: {tracking_id}")]
    CargoNotFound { tracking_id: String },

    #[error("Unknown location: {code}")]
    UnknownLocation { code: String },

    #[error("Unknown voyage: {number}")]
    UnknownVoyage { number: String },

    #[error("Repository error: {message}")]
    RepositoryError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Routing,
    Configuration,
    System,
}

impl TrackingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackingError::EmptyItinerary
            | TrackingError::MissingLeg { .. }
            | TrackingError::DisconnectedRoute { .. }
            | TrackingError::NonMonotonicTime { .. }
            | TrackingError::InvalidHandlingEvent { .. }
            | TrackingError::ValidationError { .. } => ErrorCategory::Validation,
            TrackingError::VoyageDoesNotCall { .. }
            | TrackingError::NothingToReschedule
            | TrackingError::CargoNotFound { .. } => ErrorCategory::Routing,
            TrackingError::UnknownLocation { .. }
            | TrackingError::UnknownVoyage { .. }
            | TrackingError::ConfigError { .. } => ErrorCategory::Configuration,
            TrackingError::RepositoryError { .. }
            | TrackingError::IoError(_)
            | TrackingError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Check that legs are chained and that each leg loads before it unloads"
            }
            ErrorCategory::Routing => {
                "The cargo needs re-routing; assign a new itinerary before handling more events"
            }
            ErrorCategory::Configuration => {
                "Check that every code referenced in the scenario file is declared"
            }
            ErrorCategory::System => "Check file permissions and the scenario path",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackingError>;
