use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fleetgen_core::{
    DATE_FORMAT, DATETIME_FORMAT, Dataset, Delivery, Driver, MaintenanceRecord, Route, Trip,
    Vehicle, VehicleModel,
};

/// A row type with a fixed CSV header.
pub trait CsvRecord {
    const TABLE: &'static str;
    const HEADER: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

/// Bytes written per table file, in write order.
pub type WrittenTables = Vec<(&'static str, u64)>;

/// Write every table of the dataset as `<table>.csv` into `dir`.
pub fn write_dataset_csv(dir: &Path, dataset: &Dataset) -> Result<WrittenTables, csv::Error> {
    Ok(vec![
        write_table(dir, &dataset.vehicle_models)?,
        write_table(dir, &dataset.vehicles)?,
        write_table(dir, &dataset.drivers)?,
        write_table(dir, &dataset.routes)?,
        write_table(dir, &dataset.trips)?,
        write_table(dir, &dataset.deliveries)?,
        write_table(dir, &dataset.maintenance)?,
    ])
}

fn write_table<T: CsvRecord>(dir: &Path, rows: &[T]) -> Result<(&'static str, u64), csv::Error> {
    let path = dir.join(format!("{}.csv", T::TABLE));
    Ok((T::TABLE, write_table_csv(&path, rows)?))
}

/// Write rows under the type's header, returning the bytes written.
pub fn write_table_csv<T: CsvRecord>(path: &Path, rows: &[T]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

fn optional_datetime(value: Option<chrono::NaiveDateTime>) -> String {
    value
        .map(|value| value.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

impl CsvRecord for VehicleModel {
    const TABLE: &'static str = "vehicle_models";
    const HEADER: &'static [&'static str] = &["model_id", "model_name", "capacity_kg", "fuel_type"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.model_id.to_string(),
            self.model_name.clone(),
            decimal(self.capacity_kg),
            self.fuel_type.clone(),
        ]
    }
}

impl CsvRecord for Vehicle {
    const TABLE: &'static str = "vehicles";
    const HEADER: &'static [&'static str] = &[
        "vehicle_id",
        "license_plate",
        "model_id",
        "acquisition_date",
        "status",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.vehicle_id.to_string(),
            self.license_plate.clone(),
            self.model_id.to_string(),
            self.acquisition_date.format(DATE_FORMAT).to_string(),
            self.status.as_str().to_string(),
        ]
    }
}

impl CsvRecord for Driver {
    const TABLE: &'static str = "drivers";
    const HEADER: &'static [&'static str] = &[
        "driver_id",
        "employee_code",
        "first_name",
        "last_name",
        "license_number",
        "license_type",
        "license_expiry",
        "phone",
        "hire_date",
        "status",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.driver_id.to_string(),
            self.employee_code.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.license_number.clone(),
            self.license_type.clone(),
            self.license_expiry.format(DATE_FORMAT).to_string(),
            self.phone.clone(),
            self.hire_date.format(DATE_FORMAT).to_string(),
            self.status.as_str().to_string(),
        ]
    }
}

impl CsvRecord for Route {
    const TABLE: &'static str = "routes";
    const HEADER: &'static [&'static str] = &[
        "route_id",
        "route_code",
        "origin_city",
        "destination_city",
        "distance_km",
        "estimated_duration_hours",
        "toll_cost",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.route_id.to_string(),
            self.route_code.clone(),
            self.origin_city.clone(),
            self.destination_city.clone(),
            decimal(self.distance_km),
            decimal(self.estimated_duration_hours),
            self.toll_cost.to_string(),
        ]
    }
}

impl CsvRecord for Trip {
    const TABLE: &'static str = "trips";
    const HEADER: &'static [&'static str] = &[
        "trip_id",
        "vehicle_id",
        "driver_id",
        "route_id",
        "departure_datetime",
        "arrival_datetime",
        "fuel_consumed_liters",
        "total_weight_kg",
        "status",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.trip_id.to_string(),
            self.vehicle_id.to_string(),
            self.driver_id.to_string(),
            self.route_id.to_string(),
            self.departure_datetime.format(DATETIME_FORMAT).to_string(),
            optional_datetime(self.arrival_datetime),
            decimal(self.fuel_consumed_liters),
            decimal(self.total_weight_kg),
            self.status.as_str().to_string(),
        ]
    }
}

impl CsvRecord for Delivery {
    const TABLE: &'static str = "deliveries";
    const HEADER: &'static [&'static str] = &[
        "delivery_id",
        "trip_id",
        "tracking_number",
        "customer_name",
        "delivery_address",
        "package_weight_kg",
        "scheduled_datetime",
        "delivered_datetime",
        "delivery_status",
        "recipient_signature",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.delivery_id.to_string(),
            self.trip_id.to_string(),
            self.tracking_number.clone(),
            self.customer_name.clone(),
            self.delivery_address.clone(),
            decimal(self.package_weight_kg),
            self.scheduled_datetime.format(DATETIME_FORMAT).to_string(),
            optional_datetime(self.delivered_datetime),
            self.delivery_status.as_str().to_string(),
            self.recipient_signature.to_string(),
        ]
    }
}

impl CsvRecord for MaintenanceRecord {
    const TABLE: &'static str = "maintenance";
    const HEADER: &'static [&'static str] = &[
        "maintenance_id",
        "vehicle_id",
        "maintenance_date",
        "maintenance_type",
        "description",
        "cost",
        "next_maintenance_date",
        "performed_by",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.maintenance_id.to_string(),
            self.vehicle_id.to_string(),
            self.maintenance_date.format(DATE_FORMAT).to_string(),
            self.maintenance_type.clone(),
            self.description.clone(),
            decimal(self.cost),
            self.next_maintenance_date.format(DATE_FORMAT).to_string(),
            self.performed_by.clone(),
        ]
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
