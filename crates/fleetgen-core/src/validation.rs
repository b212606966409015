use std::collections::BTreeSet;

use crate::catalog::{MAX_DISTANCE_KM, MAX_WINDOW_DAYS, SUPPORTED_LOCALES};
use crate::config::SeedConfig;
use crate::error::{Error, Result};

/// Validate seed parameters before any generation begins.
///
/// This checks:
/// - every requested count is positive
/// - at least two distinct, non-blank cities, and the hub (if any) is one of them
/// - catalogs are non-empty with unique model names and positive weights,
///   capacities and intervals
/// - the historical window is between 1 and `MAX_WINDOW_DAYS` days
/// - distances are finite and at most `MAX_DISTANCE_KM`
/// - the locale is supported
pub fn validate_config(config: &SeedConfig) -> Result<()> {
    let counts = &config.counts;
    for (name, value) in [
        ("vehicles", counts.vehicles),
        ("drivers", counts.drivers),
        ("routes", counts.routes),
        ("trips", counts.trips),
        ("deliveries", counts.deliveries),
        ("maintenance", counts.maintenance),
    ] {
        if value == 0 {
            return Err(invalid(format!("{name} count must be positive")));
        }
    }

    let mut seen = BTreeSet::new();
    for city in &config.cities {
        if city.trim().is_empty() {
            return Err(invalid("city names must not be blank"));
        }
        if !seen.insert(city.as_str()) {
            return Err(invalid(format!("duplicate city: {city}")));
        }
    }
    if seen.len() < 2 {
        return Err(invalid("at least two cities are required to build routes"));
    }
    if let Some(hub) = &config.hub_city {
        if !seen.contains(hub.as_str()) {
            return Err(invalid(format!("hub city '{hub}' is not in the city list")));
        }
    }

    if !SUPPORTED_LOCALES.contains(&config.locale.as_str()) {
        return Err(invalid(format!("unsupported locale '{}'", config.locale)));
    }

    if config.window_days == 0 {
        return Err(invalid("window_days must be positive"));
    }
    if config.window_days > MAX_WINDOW_DAYS {
        return Err(invalid(format!(
            "window_days must be at most {MAX_WINDOW_DAYS}, got {}",
            config.window_days
        )));
    }

    if config.vehicle_models.is_empty() {
        return Err(invalid("vehicle model catalog is empty"));
    }
    let mut model_names = BTreeSet::new();
    for model in &config.vehicle_models {
        if !model_names.insert(model.name.as_str()) {
            return Err(invalid(format!("duplicate vehicle model: {}", model.name)));
        }
        if !(model.weight > 0.0 && model.weight.is_finite()) {
            return Err(invalid(format!(
                "vehicle model '{}' must have a positive weight",
                model.name
            )));
        }
        if !(model.capacity_kg > 0.0 && model.capacity_kg.is_finite()) {
            return Err(invalid(format!(
                "vehicle model '{}' must have a positive capacity",
                model.name
            )));
        }
    }

    if config.license_types.is_empty() {
        return Err(invalid("license type catalog is empty"));
    }

    if config.maintenance_types.is_empty() {
        return Err(invalid("maintenance type catalog is empty"));
    }
    for kind in &config.maintenance_types {
        if kind.interval_days == 0 {
            return Err(invalid(format!(
                "maintenance type '{}' must have a positive interval",
                kind.name
            )));
        }
        if !(kind.base_cost >= 0.0 && kind.base_cost.is_finite()) {
            return Err(invalid(format!(
                "maintenance type '{}' must not have a negative cost",
                kind.name
            )));
        }
    }

    for entry in &config.distances {
        if !(entry.km >= 0.0 && entry.km <= MAX_DISTANCE_KM) {
            return Err(invalid(format!(
                "distance between '{}' and '{}' must be within 0..={MAX_DISTANCE_KM} km, got {}",
                entry.from, entry.to, entry.km
            )));
        }
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}
