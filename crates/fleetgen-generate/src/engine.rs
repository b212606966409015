use std::any::Any;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDateTime, Timelike};
use tracing::{info, warn};

use fleetgen_core::{DATETIME_FORMAT, Dataset, SeedConfig, validate_config};

use crate::checks::check_dataset;
use crate::errors::GenerationError;
use crate::generators::{
    Locale, TripInputs, generate_deliveries, generate_drivers, generate_maintenance,
    generate_routes, generate_trips, generate_vehicles,
};
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport, TableReport};
use crate::output::csv::write_dataset_csv;
use crate::rng::seeded_rng;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    pub dataset: Dataset,
}

/// Entry point for generating a fleet dataset and its run artifacts.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, config: &SeedConfig) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = self
            .options
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        validate_config(config)?;

        let run_dir = self.options.out_dir.clone();
        std::fs::create_dir_all(&run_dir)?;
        let now = resolve_reference_time(config);

        let mut report = GenerationReport::new(run_id.clone(), config.seed);
        report.reference_time = now.format(DATETIME_FORMAT).to_string();

        info!(
            run_id = %run_id,
            seed = config.seed,
            reference_time = %report.reference_time,
            locale = %config.locale,
            "generation started"
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
            || -> Result<Dataset, GenerationError> {
                let dataset = build_dataset(config, now, &mut report)?;

                if self.options.write_csv {
                    for (table, bytes) in write_dataset_csv(&run_dir, &dataset)? {
                        report.bytes_written += bytes;
                        if let Some(entry) = report.table_mut(table) {
                            entry.bytes_written = Some(bytes);
                        }
                    }
                }

                let integrity = check_dataset(&dataset);
                for check in integrity.checks.iter().filter(|check| check.violations > 0) {
                    let issue = GenerationIssue {
                        level: "warning".to_string(),
                        code: "integrity_violation".to_string(),
                        message: format!(
                            "{} violated by {} of {} rows",
                            check.name, check.violations, check.checked
                        ),
                        table: None,
                    };
                    log_issue(&issue);
                    report.record_warning(issue);
                }
                report.integrity = Some(integrity);

                Ok(dataset)
            },
        ));

        report.duration_ms = start.elapsed().as_millis() as u64;

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(Ok(dataset)) => {
                write_report(&report)?;
                info!(
                    run_id = %run_id,
                    tables = report.tables.len(),
                    rows_total = report.rows_total,
                    duration_ms = report.duration_ms,
                    bytes_written = report.bytes_written,
                    "generation completed"
                );
                Ok(GenerationResult {
                    run_dir,
                    report,
                    dataset,
                })
            }
            Ok(Err(err)) => {
                record_generation_failure(&mut report, err.to_string());
                write_report(&report)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
            Err(panic) => {
                record_generation_failure(&mut report, panic_message(panic));
                write_report(&report)?;
                warn!(run_id = %run_id, "generation panicked");
                Err(GenerationError::Failed(Box::new(report)))
            }
        }
    }
}

/// Generate the full dataset in memory without writing any artifact.
///
/// The same configuration and reference time always yield the same
/// dataset.
pub fn generate_dataset(config: &SeedConfig) -> Result<Dataset, GenerationError> {
    validate_config(config)?;
    let now = resolve_reference_time(config);
    let mut report = GenerationReport::new(String::new(), config.seed);
    build_dataset(config, now, &mut report)
}

/// Configured reference time, or local wall-clock time truncated to whole
/// seconds.
pub fn resolve_reference_time(config: &SeedConfig) -> NaiveDateTime {
    config.reference_time.unwrap_or_else(|| {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    })
}

fn build_dataset(
    config: &SeedConfig,
    now: NaiveDateTime,
    report: &mut GenerationReport,
) -> Result<Dataset, GenerationError> {
    let locale = Locale::resolve(&config.locale)?;
    let today = now.date();
    let counts = &config.counts;
    let mut rng = seeded_rng(config.seed);

    let stage = Instant::now();
    info!(table = "vehicles", rows = counts.vehicles, "generating table");
    let fleet = generate_vehicles(config, today, &mut rng)?;
    let models = fleet.vehicle_models.len();
    record_stage(report, "vehicle_models", models, models, stage);
    record_stage(report, "vehicles", counts.vehicles, fleet.vehicles.len(), stage);

    let stage = Instant::now();
    info!(table = "drivers", rows = counts.drivers, "generating table");
    let drivers = generate_drivers(config, today, locale, &mut rng)?;
    record_stage(report, "drivers", counts.drivers, drivers.len(), stage);

    let stage = Instant::now();
    info!(table = "routes", rows = counts.routes, "generating table");
    let routes = generate_routes(config, &mut rng);
    record_stage(report, "routes", counts.routes, routes.len(), stage);

    let stage = Instant::now();
    info!(table = "trips", rows = counts.trips, "generating table");
    let trips = generate_trips(
        &TripInputs {
            vehicles: &fleet.vehicles,
            drivers: &drivers,
            routes: &routes,
            count: counts.trips,
            window_days: config.window_days,
            now,
        },
        &mut rng,
    )?;
    record_stage(report, "trips", counts.trips, trips.len(), stage);

    let stage = Instant::now();
    info!(table = "deliveries", rows = counts.deliveries, "generating table");
    let deliveries = generate_deliveries(&trips, &routes, locale, now, counts.deliveries, &mut rng)?;
    record_stage(report, "deliveries", counts.deliveries, deliveries.len(), stage);

    let stage = Instant::now();
    info!(table = "maintenance", rows = counts.maintenance, "generating table");
    let maintenance = generate_maintenance(
        &trips,
        &config.maintenance_types,
        locale,
        counts.maintenance,
        &mut rng,
    );
    record_stage(report, "maintenance", counts.maintenance, maintenance.len(), stage);

    Ok(Dataset {
        reference_time: now,
        vehicle_models: fleet.vehicle_models,
        vehicles: fleet.vehicles,
        drivers,
        routes,
        trips,
        deliveries,
        maintenance,
    })
}

fn record_stage(
    report: &mut GenerationReport,
    table: &str,
    requested: usize,
    generated: usize,
    started: Instant,
) {
    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        table = %table,
        rows_generated = generated,
        duration_ms,
        "table generated"
    );
    if generated < requested {
        let issue = GenerationIssue {
            level: "warning".to_string(),
            code: "rows_short".to_string(),
            message: format!("generated {generated} of {requested} requested rows"),
            table: Some(table.to_string()),
        };
        log_issue(&issue);
        report.record_warning(issue);
    }
    report.record_table(TableReport {
        table: table.to_string(),
        rows_requested: requested as u64,
        rows_generated: generated as u64,
        bytes_written: None,
        duration_ms,
    });
}

fn record_generation_failure(report: &mut GenerationReport, message: String) {
    report.record_warning(GenerationIssue {
        level: "error".to_string(),
        code: "generation_failed".to_string(),
        message,
        table: None,
    });
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}

fn log_issue(issue: &GenerationIssue) {
    warn!(
        code = %issue.code,
        table = issue.table.as_deref().unwrap_or(""),
        message = %issue.message
    );
}
