use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use fleetgen_core::{EntityCounts, SeedConfig, TripStatus};
use fleetgen_generate::{
    GenerateOptions, GenerationEngine, GenerationError, check_dataset, generate_dataset,
};

const TABLE_FILES: &[&str] = &[
    "vehicle_models.csv",
    "vehicles.csv",
    "drivers.csv",
    "routes.csv",
    "trips.csv",
    "deliveries.csv",
    "maintenance.csv",
];

fn small_config() -> SeedConfig {
    SeedConfig {
        seed: 42,
        counts: EntityCounts {
            vehicles: 10,
            drivers: 10,
            routes: 6,
            trips: 50,
            deliveries: 150,
            maintenance: 10,
        },
        cities: vec![
            "Bogotá".to_string(),
            "Medellín".to_string(),
            "Cali".to_string(),
        ],
        hub_city: Some("Bogotá".to_string()),
        reference_time: NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0)),
        ..SeedConfig::default()
    }
}

fn run_engine(label: &str, config: &SeedConfig) -> fleetgen_generate::GenerationResult {
    let options = GenerateOptions {
        out_dir: temp_out_dir(label),
        run_id: Some(label.to_string()),
        write_csv: true,
    };
    GenerationEngine::new(options)
        .run(config)
        .expect("run generation")
}

#[test]
fn small_run_is_referentially_consistent() {
    let dataset = generate_dataset(&small_config()).expect("generate dataset");

    assert_eq!(dataset.vehicles.len(), 10);
    assert_eq!(dataset.drivers.len(), 10);
    assert_eq!(dataset.routes.len(), 6);
    assert_eq!(dataset.trips.len(), 50);
    assert_eq!(dataset.deliveries.len(), 150);
    assert!(dataset.maintenance.len() <= 10);
    assert!(!dataset.maintenance.is_empty());

    let report = check_dataset(&dataset);
    assert!(
        report.is_clean(),
        "integrity violations: {:?}",
        report
            .checks
            .iter()
            .filter(|check| check.violations > 0)
            .collect::<Vec<_>>()
    );

    // Every trip in a two-year window ending 15 days before "now" has landed.
    assert!(
        dataset
            .trips
            .iter()
            .all(|trip| trip.status == TripStatus::Completed)
    );
}

#[test]
fn generate_is_deterministic() {
    let config = small_config();
    let result_a = run_engine("run_a", &config);
    let result_b = run_engine("run_b", &config);

    for file in TABLE_FILES {
        let a = fs::read(result_a.run_dir.join(file)).expect("read csv A");
        let b = fs::read(result_b.run_dir.join(file)).expect("read csv B");
        assert_eq!(a, b, "{file} should be deterministic");
    }
    assert_eq!(result_a.dataset, result_b.dataset);
}

#[test]
fn different_seeds_produce_different_data() {
    let config = small_config();
    let mut other = small_config();
    other.seed = 7;

    let a = generate_dataset(&config).expect("generate A");
    let b = generate_dataset(&other).expect("generate B");
    assert_ne!(a.vehicles, b.vehicles);
    assert_ne!(a.trips, b.trips);
}

#[test]
fn generate_writes_report_and_headers() {
    let result = run_engine("run_report", &small_config());

    let report_path = result.run_dir.join("generation_report.json");
    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&report_path).expect("read generation_report.json"),
    )
    .expect("parse report");

    let tables = report
        .get("tables")
        .and_then(|value| value.as_array())
        .expect("tables array");
    let trips = tables
        .iter()
        .find(|table| table.get("table").and_then(|v| v.as_str()) == Some("trips"))
        .expect("trips table");
    assert_eq!(trips.get("rows_generated").and_then(|v| v.as_u64()), Some(50));
    assert_eq!(
        report.get("reference_time").and_then(|v| v.as_str()),
        Some("2025-06-01 12:00:00")
    );
    assert!(report.get("integrity").is_some());

    let trips_csv = fs::read_to_string(result.run_dir.join("trips.csv")).expect("read trips.csv");
    let header = trips_csv.lines().next().expect("header line");
    assert_eq!(
        header,
        "trip_id,vehicle_id,driver_id,route_id,departure_datetime,arrival_datetime,\
         fuel_consumed_liters,total_weight_kg,status"
    );
    assert_eq!(trips_csv.lines().count(), 51);

    let deliveries_csv =
        fs::read_to_string(result.run_dir.join("deliveries.csv")).expect("read deliveries.csv");
    let first = deliveries_csv.lines().nth(1).expect("first delivery");
    assert!(first.starts_with("1,1,FL202500000001,"));
}

#[test]
fn report_counts_bytes_written() {
    let result = run_engine("run_bytes", &small_config());

    let on_disk: u64 = TABLE_FILES
        .iter()
        .map(|file| {
            fs::metadata(result.run_dir.join(file))
                .expect("csv metadata")
                .len()
        })
        .sum();
    assert_eq!(result.report.bytes_written, on_disk);
    assert_eq!(result.report.rows_total, result.dataset.total_rows() as u64);
}

#[test]
fn csv_output_can_be_disabled() {
    let options = GenerateOptions {
        out_dir: temp_out_dir("run_no_csv"),
        run_id: None,
        write_csv: false,
    };
    let result = GenerationEngine::new(options)
        .run(&small_config())
        .expect("run generation");

    assert!(!result.run_dir.join("trips.csv").exists());
    assert!(result.run_dir.join("generation_report.json").exists());
    assert_eq!(result.report.bytes_written, 0);
}

#[test]
fn short_route_enumeration_is_reported() {
    let mut config = small_config();
    config.counts.routes = 100;

    let result = run_engine("run_short", &config);
    assert_eq!(result.dataset.routes.len(), 16);
    assert!(result.report.warnings.iter().any(|issue| {
        issue.code == "rows_short" && issue.table.as_deref() == Some("routes")
    }));
}

#[test]
fn invalid_config_is_rejected_before_generation() {
    let mut config = small_config();
    config.counts.trips = 0;

    let err = generate_dataset(&config).expect_err("zero trips should fail");
    assert!(matches!(err, GenerationError::InvalidConfig(_)));
}

#[test]
fn invalid_config_leaves_no_run_dir() {
    let mut config = small_config();
    config.window_days = 200_000_000;
    let out_dir = std::env::temp_dir().join(format!(
        "fleetgen_generate_rejected_{}",
        uuid::Uuid::new_v4()
    ));
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        run_id: Some("rejected".to_string()),
        write_csv: true,
    };

    let err = GenerationEngine::new(options)
        .run(&config)
        .expect_err("oversized window should fail");
    assert!(matches!(err, GenerationError::InvalidConfig(_)));
    assert!(!out_dir.exists());
}

#[test]
fn route_speed_check_flags_inconsistent_durations() {
    let mut dataset = generate_dataset(&small_config()).expect("generate dataset");
    let speed = check_dataset(&dataset)
        .check("route_speed_in_range")
        .cloned()
        .expect("speed check present");
    assert_eq!(speed.checked, 6);
    assert_eq!(speed.violations, 0);

    dataset.routes[0].estimated_duration_hours = dataset.routes[0].distance_km / 20.0;
    let report = check_dataset(&dataset);
    assert_eq!(
        report.check("route_speed_in_range").map(|check| check.violations),
        Some(1)
    );
    assert!(!report.is_clean());
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "fleetgen_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
