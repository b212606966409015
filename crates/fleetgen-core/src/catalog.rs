//! Default catalogs for the fleet-logistics domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base distance used for city pairs missing from the lookup table.
pub const DEFAULT_DISTANCE_KM: f64 = 500.0;

/// Longest historical window accepted, about a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Largest base distance accepted in the lookup table.
pub const MAX_DISTANCE_KM: f64 = 1_000_000.0;

pub const DEFAULT_HUB_CITY: &str = "Bogotá";

pub const DEFAULT_CITIES: &[&str] = &["Bogotá", "Medellín", "Cali", "Barranquilla", "Cartagena"];

pub const DEFAULT_LOCALE: &str = "en_US";

pub const SUPPORTED_LOCALES: &[&str] = &["en_US", "pt_BR"];

pub const DEFAULT_LICENSE_TYPES: &[&str] = &["C1", "C2", "C3", "A2"];

/// Vehicle model entry with its relative sampling weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleModelSpec {
    pub name: String,
    pub capacity_kg: f64,
    pub fuel_type: String,
    pub weight: f64,
}

impl VehicleModelSpec {
    fn new(name: &str, capacity_kg: f64, fuel_type: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            capacity_kg,
            fuel_type: fuel_type.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTypeSpec {
    pub name: String,
    pub base_cost: f64,
    pub interval_days: u32,
}

impl MaintenanceTypeSpec {
    fn new(name: &str, base_cost: f64, interval_days: u32) -> Self {
        Self {
            name: name.to_string(),
            base_cost,
            interval_days,
        }
    }
}

/// Road distance between two cities, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDistance {
    pub from: String,
    pub to: String,
    pub km: f64,
}

impl CityDistance {
    fn new(from: &str, to: &str, km: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            km,
        }
    }
}

pub fn default_vehicle_models() -> Vec<VehicleModelSpec> {
    vec![
        VehicleModelSpec::new("Large truck", 5000.0, "diesel", 0.3),
        VehicleModelSpec::new("Medium truck", 3000.0, "diesel", 0.3),
        VehicleModelSpec::new("Van", 1500.0, "gasoline", 0.3),
        VehicleModelSpec::new("Motorcycle", 50.0, "gasoline", 0.1),
    ]
}

/// Costs are expressed in Colombian pesos.
pub fn default_maintenance_types() -> Vec<MaintenanceTypeSpec> {
    vec![
        MaintenanceTypeSpec::new("Oil change", 150_000.0, 30),
        MaintenanceTypeSpec::new("Brake inspection", 250_000.0, 60),
        MaintenanceTypeSpec::new("Tire replacement", 450_000.0, 90),
        MaintenanceTypeSpec::new("General service", 350_000.0, 45),
        MaintenanceTypeSpec::new("Engine inspection", 500_000.0, 60),
        MaintenanceTypeSpec::new("Alignment and balancing", 180_000.0, 30),
    ]
}

pub fn default_distances() -> Vec<CityDistance> {
    vec![
        CityDistance::new("Bogotá", "Medellín", 440.0),
        CityDistance::new("Bogotá", "Cali", 460.0),
        CityDistance::new("Bogotá", "Barranquilla", 1000.0),
        CityDistance::new("Bogotá", "Cartagena", 1050.0),
        CityDistance::new("Medellín", "Cali", 420.0),
        CityDistance::new("Medellín", "Barranquilla", 640.0),
        CityDistance::new("Medellín", "Cartagena", 640.0),
        CityDistance::new("Cali", "Barranquilla", 1100.0),
        CityDistance::new("Cali", "Cartagena", 1100.0),
        CityDistance::new("Barranquilla", "Cartagena", 120.0),
    ]
}

/// Symmetric distance lookup keyed by the unordered city pair.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    entries: BTreeMap<(String, String), f64>,
}

impl DistanceTable {
    pub fn new(distances: &[CityDistance]) -> Self {
        let entries = distances
            .iter()
            .map(|entry| (pair_key(&entry.from, &entry.to), entry.km))
            .collect();
        Self { entries }
    }

    /// Base distance for the pair, or [`DEFAULT_DISTANCE_KM`] when unknown.
    pub fn base_distance(&self, origin: &str, destination: &str) -> f64 {
        self.entries
            .get(&pair_key(origin, destination))
            .copied()
            .unwrap_or(DEFAULT_DISTANCE_KM)
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_lookup_is_symmetric() {
        let table = DistanceTable::new(&default_distances());
        assert_eq!(table.base_distance("Cali", "Bogotá"), 460.0);
        assert_eq!(table.base_distance("Bogotá", "Cali"), 460.0);
    }

    #[test]
    fn unknown_pair_falls_back_to_default() {
        let table = DistanceTable::new(&default_distances());
        assert_eq!(table.base_distance("Pasto", "Bogotá"), DEFAULT_DISTANCE_KM);
    }
}
