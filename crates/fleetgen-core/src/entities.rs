use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Numeric identifier assigned in output order, starting at 1.
pub type RecordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Completed,
    InProgress,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Pending,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Pending => "pending",
        }
    }
}

/// Distinct vehicle model referenced by at least one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub model_id: RecordId,
    pub model_name: String,
    pub capacity_kg: f64,
    pub fuel_type: String,
}

/// Fleet vehicle. Model attributes are denormalized so downstream stages
/// can read capacity without a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: RecordId,
    pub license_plate: String,
    pub model_id: RecordId,
    pub model_name: String,
    pub capacity_kg: f64,
    pub fuel_type: String,
    pub acquisition_date: NaiveDate,
    pub status: VehicleStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: RecordId,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub license_type: String,
    pub license_expiry: NaiveDate,
    pub phone: String,
    pub hire_date: NaiveDate,
    pub status: DriverStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: RecordId,
    pub route_code: String,
    pub origin_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration_hours: f64,
    pub toll_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: RecordId,
    pub vehicle_id: RecordId,
    pub driver_id: RecordId,
    pub route_id: RecordId,
    pub departure_datetime: NaiveDateTime,
    /// `None` while the trip is still in progress.
    pub arrival_datetime: Option<NaiveDateTime>,
    pub fuel_consumed_liters: f64,
    pub total_weight_kg: f64,
    pub status: TripStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub delivery_id: RecordId,
    pub trip_id: RecordId,
    pub tracking_number: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub package_weight_kg: f64,
    pub scheduled_datetime: NaiveDateTime,
    pub delivered_datetime: Option<NaiveDateTime>,
    pub delivery_status: DeliveryStatus,
    pub recipient_signature: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub maintenance_id: RecordId,
    pub vehicle_id: RecordId,
    pub maintenance_date: NaiveDate,
    pub maintenance_type: String,
    pub description: String,
    pub cost: f64,
    pub next_maintenance_date: NaiveDate,
    pub performed_by: String,
}

/// Every record produced by a single run, in output order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Instant treated as "now" while generating.
    pub reference_time: NaiveDateTime,
    pub vehicle_models: Vec<VehicleModel>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub deliveries: Vec<Delivery>,
    pub maintenance: Vec<MaintenanceRecord>,
}

impl Dataset {
    /// City names referenced by routes, in order of first appearance.
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = Vec::new();
        for route in &self.routes {
            for city in [&route.origin_city, &route.destination_city] {
                if !cities.contains(city) {
                    cities.push(city.clone());
                }
            }
        }
        cities
    }

    pub fn total_rows(&self) -> usize {
        self.vehicle_models.len()
            + self.vehicles.len()
            + self.drivers.len()
            + self.routes.len()
            + self.trips.len()
            + self.deliveries.len()
            + self.maintenance.len()
    }
}
