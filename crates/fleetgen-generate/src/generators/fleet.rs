use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;

use fleetgen_core::{
    Driver, DriverStatus, RecordId, SeedConfig, Vehicle, VehicleModel, VehicleStatus,
};

use crate::errors::GenerationError;
use crate::generators::people::Locale;
use crate::rng::{date_between, weighted_index};

const YEAR_DAYS: i64 = 365;

/// Vehicles plus the distinct models they reference.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    pub vehicle_models: Vec<VehicleModel>,
    pub vehicles: Vec<Vehicle>,
}

/// Generate `config.counts.vehicles` vehicles by weighted choice over the
/// model catalog. Model ids follow order of first use.
pub fn generate_vehicles<R: Rng + ?Sized>(
    config: &SeedConfig,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Fleet, GenerationError> {
    let catalog = &config.vehicle_models;
    let weights: Vec<f64> = catalog.iter().map(|model| model.weight).collect();
    let model_dist = weighted_index(&weights)?;

    let acquired_from = today - Duration::days(5 * YEAR_DAYS);
    let acquired_to = today - Duration::days(30);

    let mut fleet = Fleet::default();
    for index in 0..config.counts.vehicles {
        let choice = &catalog[model_dist.sample(rng)];
        let model_id = match fleet
            .vehicle_models
            .iter()
            .find(|model| model.model_name == choice.name)
        {
            Some(model) => model.model_id,
            None => {
                let model_id = fleet.vehicle_models.len() as RecordId + 1;
                fleet.vehicle_models.push(VehicleModel {
                    model_id,
                    model_name: choice.name.clone(),
                    capacity_kg: choice.capacity_kg,
                    fuel_type: choice.fuel_type.clone(),
                });
                model_id
            }
        };

        let license_plate = license_plate(rng);
        let acquisition_date = date_between(rng, acquired_from, acquired_to);
        let status = if rng.random_ratio(1, 10) {
            VehicleStatus::Maintenance
        } else {
            VehicleStatus::Active
        };

        fleet.vehicles.push(Vehicle {
            vehicle_id: index as RecordId + 1,
            license_plate,
            model_id,
            model_name: choice.name.clone(),
            capacity_kg: choice.capacity_kg,
            fuel_type: choice.fuel_type.clone(),
            acquisition_date,
            status,
        });
    }

    Ok(fleet)
}

/// Three uppercase letters followed by three digits. Collisions are allowed.
fn license_plate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut plate = String::with_capacity(6);
    for _ in 0..3 {
        plate.push(char::from(rng.random_range(b'A'..=b'Z')));
    }
    plate.push_str(&rng.random_range(100..=999).to_string());
    plate
}

pub fn generate_drivers<R: Rng + ?Sized>(
    config: &SeedConfig,
    today: NaiveDate,
    locale: Locale,
    rng: &mut R,
) -> Result<Vec<Driver>, GenerationError> {
    let expiry_from = today - Duration::days(30);
    let expiry_to = today + Duration::days(3 * YEAR_DAYS);
    let hired_from = today - Duration::days(5 * YEAR_DAYS);
    let hired_to = today - Duration::days(7);

    let mut drivers = Vec::with_capacity(config.counts.drivers);
    for index in 0..config.counts.drivers {
        let driver_id = index as RecordId + 1;
        let first_name = locale.first_name(rng);
        let last_name = locale.last_name(rng);
        let license_number = rng.random_range(1_000_000_000_u64..=9_999_999_999).to_string();
        let license_type = config
            .license_types
            .choose(rng)
            .cloned()
            .ok_or_else(|| GenerationError::EmptyPool("license types".to_string()))?;
        let license_expiry = date_between(rng, expiry_from, expiry_to);
        let phone = format!("3{}", rng.random_range(100_000_000_u32..=999_999_999));
        let hire_date = date_between(rng, hired_from, hired_to);
        let status = if rng.random_ratio(1, 20) {
            DriverStatus::Inactive
        } else {
            DriverStatus::Active
        };

        drivers.push(Driver {
            driver_id,
            employee_code: format!("EMP{driver_id:04}"),
            first_name,
            last_name,
            license_number,
            license_type,
            license_expiry,
            phone,
            hire_date,
            status,
        });
    }

    Ok(drivers)
}
