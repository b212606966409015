use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;

use fleetgen_core::{
    Driver, DriverStatus, RecordId, Route, Trip, TripStatus, Vehicle, VehicleStatus,
};

use crate::errors::GenerationError;
use crate::rng::{add_hours, round2, uniform, weighted_index};

const MINUTES_PER_DAY: u64 = 1440;

/// Relative departure weight per hour of day.
///
/// Baseline 0.02, daytime 6-19 at 0.06, morning peak 8-11 at 0.08 and
/// afternoon peak 14-17 at 0.07.
pub fn hourly_weights() -> [f64; 24] {
    let mut weights = [0.02; 24];
    weights[6..20].fill(0.06);
    weights[8..12].fill(0.08);
    weights[14..18].fill(0.07);
    weights
}

/// Minutes the running clock advances per trip.
pub fn clock_step_minutes(window_days: u32, count: usize) -> i64 {
    let window_minutes = u64::from(window_days) * MINUTES_PER_DAY;
    (window_minutes / count.max(1) as u64).max(1) as i64
}

/// Inputs of the trip stage.
pub struct TripInputs<'a> {
    pub vehicles: &'a [Vehicle],
    pub drivers: &'a [Driver],
    pub routes: &'a [Route],
    pub count: usize,
    pub window_days: u32,
    pub now: NaiveDateTime,
}

/// Generate trips spread over the window ending at `now`.
///
/// Vehicles and drivers are sampled only among `active` records; the
/// running clock fixes the date and the sampled hour the time of day.
pub fn generate_trips<R: Rng + ?Sized>(
    inputs: &TripInputs<'_>,
    rng: &mut R,
) -> Result<Vec<Trip>, GenerationError> {
    let vehicles: Vec<&Vehicle> = inputs
        .vehicles
        .iter()
        .filter(|vehicle| vehicle.status == VehicleStatus::Active)
        .collect();
    let drivers: Vec<&Driver> = inputs
        .drivers
        .iter()
        .filter(|driver| driver.status == DriverStatus::Active)
        .collect();
    if vehicles.is_empty() {
        return Err(GenerationError::EmptyPool("active vehicles".to_string()));
    }
    if drivers.is_empty() {
        return Err(GenerationError::EmptyPool("active drivers".to_string()));
    }
    if inputs.routes.is_empty() {
        return Err(GenerationError::EmptyPool("routes".to_string()));
    }

    let hours = weighted_index(&hourly_weights())?;
    let step = Duration::minutes(clock_step_minutes(inputs.window_days, inputs.count));
    let mut clock = inputs
        .now
        .checked_sub_signed(Duration::days(i64::from(inputs.window_days)))
        .ok_or_else(|| {
            fleetgen_core::Error::InvalidConfig(format!(
                "a {} day window before {} is out of range",
                inputs.window_days, inputs.now
            ))
        })?;

    let mut trips = Vec::with_capacity(inputs.count);
    for index in 0..inputs.count {
        let (Some(vehicle), Some(driver), Some(route)) = (
            vehicles.choose(rng),
            drivers.choose(rng),
            inputs.routes.choose(rng),
        ) else {
            break;
        };

        let hour = hours.sample(rng) as u32;
        let minute = rng.random_range(0..60);
        let second = rng.random_range(0..60);
        let departure = clock
            .date()
            .and_hms_opt(hour, minute, second)
            .unwrap_or(clock);

        let actual_hours = route.estimated_duration_hours * uniform(rng, 0.8, 1.3);
        let arrival = add_hours(departure, actual_hours);
        let fuel = route.distance_km * uniform(rng, 0.08, 0.15);
        let weight = vehicle.capacity_kg * uniform(rng, 0.4, 0.9);

        let (status, arrival_datetime) = if arrival < inputs.now {
            (TripStatus::Completed, Some(arrival))
        } else {
            (TripStatus::InProgress, None)
        };

        trips.push(Trip {
            trip_id: index as RecordId + 1,
            vehicle_id: vehicle.vehicle_id,
            driver_id: driver.driver_id,
            route_id: route.route_id,
            departure_datetime: departure,
            arrival_datetime,
            fuel_consumed_liters: round2(fuel),
            total_weight_kg: round2(weight),
            status,
        });

        clock += step;
    }

    Ok(trips)
}
