use rand::Rng;

use fleetgen_core::{DistanceTable, RecordId, Route, SeedConfig};

use crate::rng::{round2, uniform};

/// Toll charged per full 100 km of route distance.
pub const TOLL_PER_100_KM: i64 = 15_000;
const DISTANCE_JITTER_KM: f64 = 50.0;
/// Average speed bounds used to derive the estimated duration.
pub const MIN_SPEED_KMH: f64 = 60.0;
pub const MAX_SPEED_KMH: f64 = 80.0;
/// Slack for the two-decimal rounding of distance and duration.
const DURATION_TOLERANCE_HOURS: f64 = 0.01;

/// Directed city pairs in enumeration order, repeated once per route variant.
///
/// Pairs touching the hub city get three variants, all others two.
pub fn route_slots(config: &SeedConfig) -> impl Iterator<Item = (&str, &str)> + '_ {
    config.cities.iter().flat_map(move |origin| {
        config
            .cities
            .iter()
            .filter(move |destination| *destination != origin)
            .flat_map(move |destination| {
                let variants = if config.is_hub(origin) || config.is_hub(destination) {
                    3
                } else {
                    2
                };
                std::iter::repeat_n((origin.as_str(), destination.as_str()), variants)
            })
    })
}

/// Whether `duration_hours` is `distance_km` driven at some speed between
/// `MIN_SPEED_KMH` and `MAX_SPEED_KMH`, up to rounding.
pub fn duration_within_speed_bounds(distance_km: f64, duration_hours: f64) -> bool {
    let fastest = distance_km / MAX_SPEED_KMH - DURATION_TOLERANCE_HOURS;
    let slowest = distance_km / MIN_SPEED_KMH + DURATION_TOLERANCE_HOURS;
    (fastest..=slowest).contains(&duration_hours)
}

/// Generate up to `config.counts.routes` routes. When the enumeration is
/// shorter than the target the result is capped, never topped up.
pub fn generate_routes<R: Rng + ?Sized>(config: &SeedConfig, rng: &mut R) -> Vec<Route> {
    let distances = config.distance_table();
    route_slots(config)
        .take(config.counts.routes)
        .enumerate()
        .map(|(index, (origin, destination))| {
            build_route(index as RecordId + 1, origin, destination, &distances, rng)
        })
        .collect()
}

fn build_route<R: Rng + ?Sized>(
    route_id: RecordId,
    origin: &str,
    destination: &str,
    distances: &DistanceTable,
    rng: &mut R,
) -> Route {
    let base = distances.base_distance(origin, destination);
    let distance = (base + uniform(rng, -DISTANCE_JITTER_KM, DISTANCE_JITTER_KM)).max(0.0);
    let speed = uniform(rng, MIN_SPEED_KMH, MAX_SPEED_KMH);
    let duration = distance / speed;
    let toll_cost = ((distance / 100.0).floor() as i64).saturating_mul(TOLL_PER_100_KM);

    Route {
        route_id,
        route_code: format!("R{route_id:03}"),
        origin_city: origin.to_string(),
        destination_city: destination.to_string(),
        distance_km: round2(distance),
        estimated_duration_hours: round2(duration),
        toll_cost,
    }
}
