use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use std::env;

use fleetgen_core::{EntityCounts, SeedConfig};
use fleetgen_generate::generate_dataset;
use fleetgen_store::{DatasetSink, LoadOptions, PostgresSink, connect};

fn database_url() -> Result<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .context("set TEST_DATABASE_URL or DATABASE_URL for integration tests")
}

fn small_config() -> SeedConfig {
    SeedConfig {
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
        reference_time: NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0)),
        ..SeedConfig::default()
    }
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn loads_dataset_in_dependency_order() -> Result<()> {
    let db_url = database_url()?;
    let pool = connect(&db_url).await.context("connecting to Postgres")?;
    let sink = PostgresSink::new(pool);

    let dataset = generate_dataset(&small_config())?;
    let options = LoadOptions {
        batch_size: 7,
        create_schema: true,
        truncate: true,
    };
    let report = sink.load(&dataset, &options).await?;

    assert_eq!(report.engine, "postgres");
    assert!(report.validations_passed(), "{:?}", report.integrity);

    let trips = report
        .tables
        .iter()
        .find(|table| table.table == "trips")
        .ok_or_else(|| anyhow!("expected trips load"))?;
    assert_eq!(trips.rows_inserted, 50);
    assert_eq!(trips.batches, 8);

    let cities = report
        .table_counts
        .iter()
        .find(|(table, _)| table == "cities")
        .map(|(_, count)| *count);
    assert_eq!(cities, Some(3));

    let stats = report
        .deliveries
        .ok_or_else(|| anyhow!("expected delivery stats"))?;
    assert!(stats.min_per_trip >= 1 && stats.max_per_trip <= 6);

    // A second load over a reset store yields the same row counts.
    let again = sink.load(&dataset, &options).await?;
    assert_eq!(again.table_counts, report.table_counts);

    Ok(())
}
