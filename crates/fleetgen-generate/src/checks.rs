use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use fleetgen_core::{
    Dataset, DeliveryStatus, DriverStatus, RecordId, TripStatus, VehicleStatus,
};

use crate::generators::deliveries::MIN_PACKAGE_KG;
use crate::generators::routes::duration_within_speed_bounds;

/// Outcome of a single integrity rule over the generated dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub checked: u64,
    pub violations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub checks: Vec<CheckResult>,
}

impl IntegrityReport {
    pub fn total_violations(&self) -> u64 {
        self.checks.iter().map(|check| check.violations).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_violations() == 0
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|check| check.name == name)
    }

    fn push<T>(&mut self, name: &str, rows: &[T], violates: impl Fn(&T) -> bool) {
        self.checks.push(CheckResult {
            name: name.to_string(),
            checked: rows.len() as u64,
            violations: rows.iter().filter(|row| violates(row)).count() as u64,
        });
    }
}

/// Evaluate referential and value rules across every table.
pub fn check_dataset(dataset: &Dataset) -> IntegrityReport {
    let models: HashSet<RecordId> = dataset.vehicle_models.iter().map(|m| m.model_id).collect();
    let vehicles: HashMap<RecordId, (VehicleStatus, f64)> = dataset
        .vehicles
        .iter()
        .map(|v| (v.vehicle_id, (v.status, v.capacity_kg)))
        .collect();
    let drivers: HashMap<RecordId, DriverStatus> = dataset
        .drivers
        .iter()
        .map(|d| (d.driver_id, d.status))
        .collect();
    let routes: HashSet<RecordId> = dataset.routes.iter().map(|r| r.route_id).collect();
    let trips: HashSet<RecordId> = dataset.trips.iter().map(|t| t.trip_id).collect();

    let mut report = IntegrityReport::default();

    report.push("vehicle_model_exists", &dataset.vehicles, |v| {
        !models.contains(&v.model_id)
    });

    report.push("route_distinct_endpoints", &dataset.routes, |r| {
        r.origin_city == r.destination_city
    });
    report.push("route_distance_non_negative", &dataset.routes, |r| {
        r.distance_km < 0.0
    });
    report.push("route_speed_in_range", &dataset.routes, |r| {
        !duration_within_speed_bounds(r.distance_km, r.estimated_duration_hours)
    });

    report.push("trip_references_exist", &dataset.trips, |t| {
        !vehicles.contains_key(&t.vehicle_id)
            || !drivers.contains_key(&t.driver_id)
            || !routes.contains(&t.route_id)
    });
    report.push("trip_vehicle_active", &dataset.trips, |t| {
        vehicles
            .get(&t.vehicle_id)
            .is_some_and(|(status, _)| *status != VehicleStatus::Active)
    });
    report.push("trip_driver_active", &dataset.trips, |t| {
        drivers
            .get(&t.driver_id)
            .is_some_and(|status| *status != DriverStatus::Active)
    });
    report.push("trip_arrival_after_departure", &dataset.trips, |t| {
        t.arrival_datetime
            .is_some_and(|arrival| arrival < t.departure_datetime)
    });
    report.push("trip_status_consistent", &dataset.trips, |t| {
        match t.status {
            TripStatus::Completed => t.arrival_datetime.is_none_or(|a| a >= dataset.reference_time),
            TripStatus::InProgress => t.arrival_datetime.is_some(),
        }
    });
    report.push("trip_weight_within_capacity", &dataset.trips, |t| {
        vehicles
            .get(&t.vehicle_id)
            .is_some_and(|(_, capacity)| t.total_weight_kg > *capacity)
    });

    let mut tracking = HashSet::new();
    let duplicate_tracking: Vec<bool> = dataset
        .deliveries
        .iter()
        .map(|d| !tracking.insert(d.tracking_number.as_str()))
        .collect();
    report.checks.push(CheckResult {
        name: "delivery_tracking_unique".to_string(),
        checked: dataset.deliveries.len() as u64,
        violations: duplicate_tracking.iter().filter(|dup| **dup).count() as u64,
    });
    report.push("delivery_trip_exists", &dataset.deliveries, |d| {
        !trips.contains(&d.trip_id)
    });
    report.push("delivery_min_weight", &dataset.deliveries, |d| {
        d.package_weight_kg < MIN_PACKAGE_KG
    });
    report.push("delivery_status_consistent", &dataset.deliveries, |d| {
        match d.delivery_status {
            DeliveryStatus::Delivered => d.delivered_datetime.is_none(),
            DeliveryStatus::Pending => d.delivered_datetime.is_some() || d.recipient_signature,
        }
    });

    report.push("maintenance_vehicle_exists", &dataset.maintenance, |m| {
        !vehicles.contains_key(&m.vehicle_id)
    });
    report.push("maintenance_next_after_date", &dataset.maintenance, |m| {
        m.next_maintenance_date <= m.maintenance_date
    });

    report
}
