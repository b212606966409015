use std::collections::HashMap;

use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use fleetgen_core::{
    Delivery, Driver, MaintenanceRecord, RecordId, Trip, Vehicle, VehicleModel,
};

use crate::errors::{Result, StoreError, db_error};
use crate::report::{DeliveryStats, IntegrityCount, TableLoad};
use crate::rows::RouteRow;

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Every table, in insert order.
pub const TABLES: &[&str] = &[
    "vehicle_models",
    "vehicles",
    "drivers",
    "cities",
    "routes",
    "trips",
    "deliveries",
    "maintenance",
];

const INTEGRITY_QUERIES: &[(&str, &str)] = &[
    (
        "trips_without_vehicle",
        "select count(*) from trips t \
         left join vehicles v on t.vehicle_id = v.vehicle_id \
         where v.vehicle_id is null",
    ),
    (
        "deliveries_without_trip",
        "select count(*) from deliveries d \
         left join trips t on d.trip_id = t.trip_id \
         where t.trip_id is null",
    ),
    (
        "trips_arriving_before_departure",
        "select count(*) from trips \
         where arrival_datetime is not null and arrival_datetime < departure_datetime",
    ),
    (
        "trips_over_capacity",
        "select count(*) from trips t \
         join vehicles v on t.vehicle_id = v.vehicle_id \
         join vehicle_models m on v.model_id = m.model_id \
         where t.total_weight_kg > m.capacity_kg",
    ),
    (
        "deliveries_without_tracking_number",
        "select count(*) from deliveries \
         where tracking_number is null or tracking_number = ''",
    ),
];

pub async fn create_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_SQL.split(';') {
        let sql = statement.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(pool).await.map_err(db_error)?;
    }
    Ok(())
}

pub async fn truncate_all(pool: &PgPool) -> Result<()> {
    let sql = format!("truncate table {} restart identity cascade", TABLES.join(", "));
    sqlx::query(&sql).execute(pool).await.map_err(db_error)?;
    Ok(())
}

/// Insert `rows` in chunks of `batch_size`, one transaction per chunk.
async fn insert_batched<'a, T, F>(
    pool: &PgPool,
    table: &'static str,
    columns: &'static str,
    rows: &'a [T],
    batch_size: usize,
    mut bind_row: F,
) -> Result<TableLoad>
where
    T: Sync,
    F: FnMut(Separated<'_, 'a, Postgres, &'static str>, &'a T) + Send,
{
    let mut load = TableLoad::new(table);
    for chunk in rows.chunks(batch_size) {
        let mut builder: QueryBuilder<'a, Postgres> =
            QueryBuilder::new(format!("insert into {table} ({columns}) "));
        builder.push_values(chunk, &mut bind_row);

        let mut tx = pool.begin().await.map_err(db_error)?;
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;

        load.rows_inserted += chunk.len() as u64;
        load.batches += 1;
        debug!(
            table,
            batch = load.batches,
            rows_inserted = load.rows_inserted,
            rows_total = rows.len(),
            "batch committed"
        );
    }
    Ok(load)
}

pub async fn insert_vehicle_models(
    pool: &PgPool,
    rows: &[VehicleModel],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "vehicle_models",
        "model_id, model_name, capacity_kg, fuel_type",
        rows,
        batch_size,
        |mut row, model| {
            row.push_bind(model.model_id)
                .push_bind(model.model_name.as_str())
                .push_bind(model.capacity_kg)
                .push_bind(model.fuel_type.as_str());
        },
    )
    .await
}

pub async fn insert_vehicles(
    pool: &PgPool,
    rows: &[Vehicle],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "vehicles",
        "vehicle_id, license_plate, model_id, acquisition_date, status",
        rows,
        batch_size,
        |mut row, vehicle| {
            row.push_bind(vehicle.vehicle_id)
                .push_bind(vehicle.license_plate.as_str())
                .push_bind(vehicle.model_id)
                .push_bind(vehicle.acquisition_date)
                .push_bind(vehicle.status.as_str());
        },
    )
    .await
}

pub async fn insert_drivers(
    pool: &PgPool,
    rows: &[Driver],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "drivers",
        "driver_id, employee_code, first_name, last_name, license_number, \
         license_type, license_expiry, phone, hire_date, status",
        rows,
        batch_size,
        |mut row, driver| {
            row.push_bind(driver.driver_id)
                .push_bind(driver.employee_code.as_str())
                .push_bind(driver.first_name.as_str())
                .push_bind(driver.last_name.as_str())
                .push_bind(driver.license_number.as_str())
                .push_bind(driver.license_type.as_str())
                .push_bind(driver.license_expiry)
                .push_bind(driver.phone.as_str())
                .push_bind(driver.hire_date)
                .push_bind(driver.status.as_str());
        },
    )
    .await
}

pub async fn insert_routes(
    pool: &PgPool,
    rows: &[RouteRow<'_>],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "routes",
        "route_id, route_code, origin_city_id, destination_city_id, distance_km, \
         estimated_duration_hours, toll_cost",
        rows,
        batch_size,
        |mut row, resolved| {
            let route = resolved.route;
            row.push_bind(route.route_id)
                .push_bind(route.route_code.as_str())
                .push_bind(resolved.origin_city_id)
                .push_bind(resolved.destination_city_id)
                .push_bind(route.distance_km)
                .push_bind(route.estimated_duration_hours)
                .push_bind(route.toll_cost);
        },
    )
    .await
}

pub async fn insert_trips(pool: &PgPool, rows: &[Trip], batch_size: usize) -> Result<TableLoad> {
    insert_batched(
        pool,
        "trips",
        "trip_id, vehicle_id, driver_id, route_id, departure_datetime, arrival_datetime, \
         fuel_consumed_liters, total_weight_kg, status",
        rows,
        batch_size,
        |mut row, trip| {
            row.push_bind(trip.trip_id)
                .push_bind(trip.vehicle_id)
                .push_bind(trip.driver_id)
                .push_bind(trip.route_id)
                .push_bind(trip.departure_datetime)
                .push_bind(trip.arrival_datetime)
                .push_bind(trip.fuel_consumed_liters)
                .push_bind(trip.total_weight_kg)
                .push_bind(trip.status.as_str());
        },
    )
    .await
}

pub async fn insert_deliveries(
    pool: &PgPool,
    rows: &[Delivery],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "deliveries",
        "delivery_id, trip_id, tracking_number, customer_name, delivery_address, \
         package_weight_kg, scheduled_datetime, delivered_datetime, delivery_status, \
         recipient_signature",
        rows,
        batch_size,
        |mut row, delivery| {
            row.push_bind(delivery.delivery_id)
                .push_bind(delivery.trip_id)
                .push_bind(delivery.tracking_number.as_str())
                .push_bind(delivery.customer_name.as_str())
                .push_bind(delivery.delivery_address.as_str())
                .push_bind(delivery.package_weight_kg)
                .push_bind(delivery.scheduled_datetime)
                .push_bind(delivery.delivered_datetime)
                .push_bind(delivery.delivery_status.as_str())
                .push_bind(delivery.recipient_signature);
        },
    )
    .await
}

pub async fn insert_maintenance(
    pool: &PgPool,
    rows: &[MaintenanceRecord],
    batch_size: usize,
) -> Result<TableLoad> {
    insert_batched(
        pool,
        "maintenance",
        "maintenance_id, vehicle_id, maintenance_date, maintenance_type, description, \
         cost, next_maintenance_date, performed_by",
        rows,
        batch_size,
        |mut row, record| {
            row.push_bind(record.maintenance_id)
                .push_bind(record.vehicle_id)
                .push_bind(record.maintenance_date)
                .push_bind(record.maintenance_type.as_str())
                .push_bind(record.description.as_str())
                .push_bind(record.cost)
                .push_bind(record.next_maintenance_date)
                .push_bind(record.performed_by.as_str());
        },
    )
    .await
}

/// Insert any missing city names, then read back the id of every name.
pub async fn resolve_cities(
    pool: &PgPool,
    names: &[String],
) -> Result<HashMap<String, RecordId>> {
    for name in names {
        sqlx::query("insert into cities (city_name) values ($1) on conflict (city_name) do nothing")
            .bind(name)
            .execute(pool)
            .await
            .map_err(db_error)?;
    }

    let rows = sqlx::query_as::<_, (RecordId, String)>(
        "select city_id, city_name from cities where city_name = any($1)",
    )
    .bind(names)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let ids: HashMap<String, RecordId> = rows.into_iter().map(|(id, name)| (name, id)).collect();
    if let Some(missing) = names.iter().find(|name| !ids.contains_key(*name)) {
        return Err(StoreError::UnresolvedCity(missing.clone()));
    }
    Ok(ids)
}

pub async fn integrity_counts(pool: &PgPool) -> Result<Vec<IntegrityCount>> {
    let mut counts = Vec::with_capacity(INTEGRITY_QUERIES.len());
    for (name, sql) in INTEGRITY_QUERIES {
        let violations = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(pool)
            .await
            .map_err(db_error)?;
        counts.push(IntegrityCount {
            name: (*name).to_string(),
            violations,
        });
    }
    Ok(counts)
}

pub async fn table_counts(pool: &PgPool) -> Result<Vec<(String, i64)>> {
    let mut counts = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let count = sqlx::query_scalar::<_, i64>(&format!("select count(*) from {table}"))
            .fetch_one(pool)
            .await
            .map_err(db_error)?;
        counts.push(((*table).to_string(), count));
    }
    Ok(counts)
}

pub async fn delivery_stats(pool: &PgPool) -> Result<Option<DeliveryStats>> {
    let (avg, min, max) = sqlx::query_as::<_, (Option<f64>, Option<i64>, Option<i64>)>(
        "select avg(delivery_count)::float8, min(delivery_count), max(delivery_count) \
         from (select trip_id, count(*) as delivery_count from deliveries group by trip_id) \
         as delivery_stats",
    )
    .fetch_one(pool)
    .await
    .map_err(db_error)?;

    Ok(match (avg, min, max) {
        (Some(avg_per_trip), Some(min_per_trip), Some(max_per_trip)) => Some(DeliveryStats {
            avg_per_trip,
            min_per_trip,
            max_per_trip,
        }),
        _ => None,
    })
}
