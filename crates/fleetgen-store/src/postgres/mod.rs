use std::collections::HashMap;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use fleetgen_core::{Dataset, RecordId};

use crate::errors::{Result, db_error};
use crate::options::LoadOptions;
use crate::report::LoadReport;
use crate::rows::resolve_route_endpoints;
use crate::sink::{CityResolver, DatasetSink};

pub mod queries;

pub use queries::{SCHEMA_SQL, TABLES};

/// Open a small pool against `url`.
pub async fn connect(url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(url)
        .await
        .map_err(db_error)
}

/// Sink for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Create a new sink using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_schema(&self) -> Result<()> {
        queries::create_schema(&self.pool).await?;
        info!("schema created");
        Ok(())
    }

    pub async fn truncate(&self) -> Result<()> {
        queries::truncate_all(&self.pool).await?;
        info!(tables = TABLES.len(), "tables truncated");
        Ok(())
    }
}

#[async_trait::async_trait]
impl CityResolver for PostgresSink {
    async fn resolve_cities(&self, names: &[String]) -> Result<HashMap<String, RecordId>> {
        queries::resolve_cities(&self.pool, names).await
    }
}

#[async_trait::async_trait]
impl DatasetSink for PostgresSink {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self, dataset: &Dataset, opts: &LoadOptions) -> Result<LoadReport> {
        opts.validate()?;
        let start = Instant::now();
        let pool = &self.pool;
        let batch = opts.batch_size;

        if opts.create_schema {
            self.create_schema().await?;
        }
        if opts.truncate {
            self.truncate().await?;
        }

        info!(
            rows = dataset.total_rows(),
            batch_size = batch,
            "load started"
        );

        let mut report = LoadReport::new(self.engine());
        let models = queries::insert_vehicle_models(pool, &dataset.vehicle_models, batch).await?;
        report.record_table(models);
        report.record_table(queries::insert_vehicles(pool, &dataset.vehicles, batch).await?);
        report.record_table(queries::insert_drivers(pool, &dataset.drivers, batch).await?);

        let cities = dataset.cities();
        let city_ids = self.resolve_cities(&cities).await?;
        info!(cities = city_ids.len(), "cities resolved");

        let routes = resolve_route_endpoints(&dataset.routes, &city_ids)?;
        report.record_table(queries::insert_routes(pool, &routes, batch).await?);
        report.record_table(queries::insert_trips(pool, &dataset.trips, batch).await?);
        let deliveries = queries::insert_deliveries(pool, &dataset.deliveries, batch).await?;
        report.record_table(deliveries);
        let maintenance = queries::insert_maintenance(pool, &dataset.maintenance, batch).await?;
        report.record_table(maintenance);

        for table in &report.tables {
            info!(
                table = %table.table,
                rows_inserted = table.rows_inserted,
                batches = table.batches,
                "table loaded"
            );
        }

        report.integrity = queries::integrity_counts(pool).await?;
        for check in &report.integrity {
            if check.violations > 0 {
                warn!(check = %check.name, violations = check.violations, "integrity check failed");
            } else {
                info!(check = %check.name, "integrity check passed");
            }
        }

        report.table_counts = queries::table_counts(pool).await?;
        report.deliveries = queries::delivery_stats(pool).await?;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            rows_total = report.rows_total,
            batches_total = report.batches_total,
            validations_passed = report.validations_passed(),
            duration_ms = report.duration_ms,
            "load completed"
        );

        Ok(report)
    }
}
