use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rand::seq::IndexedRandom;

use fleetgen_core::{DATE_FORMAT, MaintenanceRecord, MaintenanceTypeSpec, RecordId, Trip};

use crate::generators::people::Locale;
use crate::rng::{round2, uniform};

/// Trips per scheduled maintenance event.
pub const TRIPS_PER_SERVICE: u64 = 20;
/// Operating window used when a vehicle's trip span is not positive.
pub const FALLBACK_WINDOW_DAYS: i64 = 90;

/// Per-vehicle trip aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTripStats {
    pub vehicle_id: RecordId,
    pub trip_count: u64,
    pub first_departure: NaiveDateTime,
    /// Latest recorded arrival, `None` when every trip is still in progress.
    pub last_arrival: Option<NaiveDateTime>,
}

impl VehicleTripStats {
    /// Number of maintenance events, one per [`TRIPS_PER_SERVICE`] trips
    /// and at least one.
    pub fn service_count(&self) -> u64 {
        (self.trip_count / TRIPS_PER_SERVICE).max(1)
    }

    /// Whole days between first departure and last arrival, or
    /// [`FALLBACK_WINDOW_DAYS`] when that span is not positive.
    pub fn window_days(&self) -> i64 {
        let last = self.last_arrival.unwrap_or(self.first_departure);
        let days = (last - self.first_departure).num_days();
        if days > 0 { days } else { FALLBACK_WINDOW_DAYS }
    }
}

/// Aggregate trips per vehicle in ascending vehicle id order.
pub fn aggregate_trip_stats(trips: &[Trip]) -> Vec<VehicleTripStats> {
    let mut stats: BTreeMap<RecordId, VehicleTripStats> = BTreeMap::new();
    for trip in trips {
        let entry = stats
            .entry(trip.vehicle_id)
            .or_insert_with(|| VehicleTripStats {
                vehicle_id: trip.vehicle_id,
                trip_count: 0,
                first_departure: trip.departure_datetime,
                last_arrival: None,
            });
        entry.trip_count += 1;
        entry.first_departure = entry.first_departure.min(trip.departure_datetime);
        entry.last_arrival = match (entry.last_arrival, trip.arrival_datetime) {
            (Some(current), Some(arrival)) => Some(current.max(arrival)),
            (current, arrival) => current.or(arrival),
        };
    }
    stats.into_values().collect()
}

struct VehicleSchedule {
    stats: VehicleTripStats,
    services: u64,
    window_days: i64,
    next_index: u64,
}

/// Lazy sequence of maintenance records spread evenly across each
/// vehicle's operating window. Bound it with `take(n)`.
pub struct MaintenanceStream<'a, R: ?Sized> {
    vehicles: std::vec::IntoIter<VehicleTripStats>,
    catalog: &'a [MaintenanceTypeSpec],
    locale: Locale,
    next_id: RecordId,
    current: Option<VehicleSchedule>,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> MaintenanceStream<'a, R> {
    pub fn new(
        trips: &[Trip],
        catalog: &'a [MaintenanceTypeSpec],
        locale: Locale,
        rng: &'a mut R,
    ) -> Self {
        Self {
            vehicles: aggregate_trip_stats(trips).into_iter(),
            catalog,
            locale,
            next_id: 1,
            current: None,
            rng,
        }
    }

    fn build_record(&mut self, schedule: &mut VehicleSchedule) -> Option<MaintenanceRecord> {
        let index = schedule.next_index;
        schedule.next_index += 1;

        let offset_days =
            schedule.window_days * (index as i64 + 1) / (schedule.services as i64 + 1);
        let maintenance_date =
            (schedule.stats.first_departure + Duration::days(offset_days)).date();

        let catalog = self.catalog;
        let kind = catalog.choose(self.rng)?;
        let cost = round2(kind.base_cost * uniform(self.rng, 0.8, 1.2));
        let next_maintenance_date =
            maintenance_date + Duration::days(i64::from(kind.interval_days));
        let performed_by = format!(
            "{} {}",
            self.locale.first_name(self.rng),
            self.locale.last_name(self.rng)
        );

        let maintenance_id = self.next_id;
        self.next_id += 1;

        Some(MaintenanceRecord {
            maintenance_id,
            vehicle_id: schedule.stats.vehicle_id,
            maintenance_date,
            maintenance_type: kind.name.clone(),
            description: format!(
                "{} scheduled for {}",
                kind.name,
                maintenance_date.format(DATE_FORMAT)
            ),
            cost,
            next_maintenance_date,
            performed_by,
        })
    }
}

impl<'a, R: Rng + ?Sized> Iterator for MaintenanceStream<'a, R> {
    type Item = MaintenanceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(mut schedule) = self.current.take() {
                if schedule.next_index < schedule.services {
                    let record = self.build_record(&mut schedule);
                    self.current = Some(schedule);
                    return record;
                }
            }
            let stats = self.vehicles.next()?;
            self.current = Some(VehicleSchedule {
                services: stats.service_count(),
                window_days: stats.window_days(),
                stats,
                next_index: 0,
            });
        }
    }
}

/// Generate at most `target` maintenance records, truncating the last
/// vehicle's schedule if needed.
pub fn generate_maintenance<R: Rng + ?Sized>(
    trips: &[Trip],
    catalog: &[MaintenanceTypeSpec],
    locale: Locale,
    target: usize,
    rng: &mut R,
) -> Vec<MaintenanceRecord> {
    MaintenanceStream::new(trips, catalog, locale, rng)
        .take(target)
        .collect()
}
