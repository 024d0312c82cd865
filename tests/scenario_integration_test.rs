use shipping_itinerary::utils::validation::Validate;
use shipping_itinerary::{
    replay, InMemoryCargoRepository, Location, RoutingStatus, ScenarioConfig, TrackingError,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn sample_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/hongkong-newyork.toml")
}

#[test]
fn test_sample_scenario_end_to_end() {
    let config = ScenarioConfig::from_file(sample_path()).unwrap();
    config.validate().unwrap();
    let world = config.into_world().unwrap();

    let report = replay(world, InMemoryCargoRepository::new()).unwrap();
    assert_eq!(report.name, "hongkong-newyork");

    let expected: Vec<bool> = report.events.iter().map(|e| e.expected).collect();
    assert_eq!(expected, vec![true, true, false]);

    assert_eq!(report.reschedules.len(), 1);
    let rescheduled = &report.reschedules[0];
    assert_eq!(rescheduled.tracking_id.as_str(), "ABC123");
    assert_eq!(rescheduled.dropped_legs, 1);
    assert_eq!(rescheduled.remaining_legs, 1);
    assert_eq!(rescheduled.routing_status, RoutingStatus::Misrouted);
    assert_eq!(report.truncated_count(), 1);

    assert_eq!(report.cargos.len(), 2);
    let abc = &report.cargos[0];
    assert_eq!(abc.tracking_id.as_str(), "ABC123");
    assert!(!abc.misdirected);
    assert_eq!(abc.legs, 1);
    assert_eq!(abc.last_known_location, Location::new("CNHKG", "HK").unwrap());
    assert_eq!(abc.final_arrival_location, Location::new("USLBG", "LB").unwrap());

    let xyz = &report.cargos[1];
    assert!(xyz.misdirected);
    assert_eq!(xyz.routing_status, RoutingStatus::Routed);
    assert_eq!(report.misdirected_count(), 1);
}

#[test]
fn test_report_serializes_to_json() {
    let world = ScenarioConfig::from_file(sample_path())
        .unwrap()
        .into_world()
        .unwrap();
    let report = replay(world, InMemoryCargoRepository::new()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["name"], "hongkong-newyork");
    assert_eq!(json["events"][2]["event_type"], "LOAD");
    assert_eq!(json["reschedules"][0]["routing_status"], "MISROUTED");
}

#[test]
fn test_event_for_unbooked_cargo_fails_replay() {
    let content = std::fs::read_to_string(sample_path())
        .unwrap()
        .replace("tracking_id = \"XYZ789\"\ntype", "tracking_id = \"NOPE\"\ntype");
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let world = ScenarioConfig::from_file(file.path())
        .unwrap()
        .into_world()
        .unwrap();
    assert!(matches!(
        replay(world, InMemoryCargoRepository::new()),
        Err(TrackingError::CargoNotFound { .. })
    ));
}

#[test]
fn test_disconnected_plan_in_scenario_is_rejected() {
    let content = std::fs::read_to_string(sample_path())
        .unwrap()
        .replacen("from = \"USLBG\"\nto = \"USNYC\"", "from = \"USCHI\"\nto = \"USNYC\"", 1);
    let config = ScenarioConfig::from_toml_str(&content).unwrap();
    assert!(matches!(
        config.into_world(),
        Err(TrackingError::DisconnectedRoute { index: 1, .. })
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        ScenarioConfig::from_file("does/not/exist.toml"),
        Err(TrackingError::IoError(_))
    ));
}
