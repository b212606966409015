use chrono::{Duration, NaiveDate, NaiveDateTime};

use fleetgen_core::{
    DeliveryStatus, DriverStatus, EntityCounts, SeedConfig, Trip, TripStatus, VehicleStatus,
};
use fleetgen_generate::GenerationError;
use fleetgen_generate::generators::deliveries::MIN_PACKAGE_KG;
use fleetgen_generate::generators::routes::{MAX_SPEED_KMH, MIN_SPEED_KMH, TOLL_PER_100_KM};
use fleetgen_generate::generators::{
    Locale, TripInputs, aggregate_trip_stats, distribute_weight, duration_within_speed_bounds,
    generate_deliveries, generate_drivers, generate_maintenance, generate_routes, generate_trips,
    generate_vehicles, route_slots,
};
use fleetgen_generate::rng::seeded_rng;

fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid reference time")
}

fn config_with(counts: EntityCounts) -> SeedConfig {
    SeedConfig {
        counts,
        cities: vec![
            "Bogotá".to_string(),
            "Medellín".to_string(),
            "Cali".to_string(),
        ],
        hub_city: Some("Bogotá".to_string()),
        reference_time: Some(reference_time()),
        ..SeedConfig::default()
    }
}

fn trip(id: i64, vehicle_id: i64, departure: NaiveDateTime, hours: Option<i64>) -> Trip {
    Trip {
        trip_id: id,
        vehicle_id,
        driver_id: 1,
        route_id: 1,
        departure_datetime: departure,
        arrival_datetime: hours.map(|hours| departure + Duration::hours(hours)),
        fuel_consumed_liters: 40.0,
        total_weight_kg: 1_000.0,
        status: if hours.is_some() {
            TripStatus::Completed
        } else {
            TripStatus::InProgress
        },
    }
}

#[test]
fn route_slots_repeat_hub_pairs() {
    let config = config_with(EntityCounts::default());
    let slots: Vec<(&str, &str)> = route_slots(&config).collect();

    assert_eq!(slots.len(), 16);
    assert_eq!(&slots[..3], &[("Bogotá", "Medellín"); 3]);
    assert_eq!(&slots[3..6], &[("Bogotá", "Cali"); 3]);
    assert_eq!(&slots[9..11], &[("Medellín", "Cali"); 2]);
}

#[test]
fn routes_are_capped_by_enumeration() {
    let config = config_with(EntityCounts {
        routes: 100,
        ..EntityCounts::default()
    });
    let mut rng = seeded_rng(42);
    let routes = generate_routes(&config, &mut rng);

    assert_eq!(routes.len(), 16);
    assert_eq!(routes[0].route_code, "R001");
    assert_eq!(routes[15].route_code, "R016");
    for route in &routes {
        assert_ne!(route.origin_city, route.destination_city);
        assert!(route.distance_km >= 0.0);
        assert!(route.estimated_duration_hours > 0.0);
        let speed = route.distance_km / route.estimated_duration_hours;
        assert!(
            (MIN_SPEED_KMH * 0.99..=MAX_SPEED_KMH * 1.01).contains(&speed),
            "{} averages {speed} km/h",
            route.route_code
        );
        assert!(duration_within_speed_bounds(
            route.distance_km,
            route.estimated_duration_hours
        ));
        // 370-510 km on every pair here, so the toll is 3, 4 or 5 steps.
        assert_eq!(route.toll_cost % TOLL_PER_100_KM, 0);
        assert!((3..=5).contains(&(route.toll_cost / TOLL_PER_100_KM)));
    }
}

#[test]
fn vehicles_reference_dense_model_ids() {
    let config = config_with(EntityCounts {
        vehicles: 200,
        ..EntityCounts::default()
    });
    let mut rng = seeded_rng(42);
    let fleet = generate_vehicles(&config, reference_time().date(), &mut rng)
        .expect("generate vehicles");

    assert_eq!(fleet.vehicles.len(), 200);
    assert_eq!(fleet.vehicle_models.len(), 4);
    for (index, model) in fleet.vehicle_models.iter().enumerate() {
        assert_eq!(model.model_id, index as i64 + 1);
    }
    assert_eq!(fleet.vehicle_models[0].model_name, fleet.vehicles[0].model_name);

    let today = reference_time().date();
    for vehicle in &fleet.vehicles {
        assert_eq!(vehicle.license_plate.len(), 6);
        assert!(vehicle.acquisition_date <= today - Duration::days(30));
        assert!(vehicle.acquisition_date >= today - Duration::days(5 * 365));
    }
    let in_shop = fleet
        .vehicles
        .iter()
        .filter(|vehicle| vehicle.status == VehicleStatus::Maintenance)
        .count();
    assert!(in_shop > 0 && in_shop < 50, "in maintenance: {in_shop}");
}

#[test]
fn drivers_follow_code_and_phone_formats() {
    let config = config_with(EntityCounts {
        drivers: 40,
        ..EntityCounts::default()
    });
    let mut rng = seeded_rng(42);
    let drivers = generate_drivers(&config, reference_time().date(), Locale::EnUs, &mut rng)
        .expect("generate drivers");

    assert_eq!(drivers.len(), 40);
    assert_eq!(drivers[0].employee_code, "EMP0001");
    assert_eq!(drivers[39].employee_code, "EMP0040");
    for driver in &drivers {
        assert_eq!(driver.license_number.len(), 10);
        assert_eq!(driver.phone.len(), 10);
        assert!(driver.phone.starts_with('3'));
        assert!(config.license_types.contains(&driver.license_type));
        assert!(driver.hire_date < reference_time().date());
    }
}

#[test]
fn weight_split_respects_floor_and_target() {
    let mut rng = seeded_rng(42);

    let shares = distribute_weight(1_000.0, 4, &mut rng);
    assert_eq!(shares.len(), 4);
    assert!(shares.iter().all(|share| *share >= MIN_PACKAGE_KG));
    assert!(shares.iter().sum::<f64>() >= 950.0 - 1e-6);

    // A payload too light to split is floored on every package.
    let shares = distribute_weight(0.5, 4, &mut rng);
    assert_eq!(shares, vec![MIN_PACKAGE_KG; 4]);
}

#[test]
fn trips_only_use_active_resources() {
    let config = config_with(EntityCounts {
        vehicles: 20,
        drivers: 20,
        routes: 6,
        ..EntityCounts::default()
    });
    let today = reference_time().date();
    let mut rng = seeded_rng(42);
    let fleet = generate_vehicles(&config, today, &mut rng).expect("vehicles");
    let drivers = generate_drivers(&config, today, Locale::EnUs, &mut rng).expect("drivers");
    let routes = generate_routes(&config, &mut rng);

    let trips = generate_trips(
        &TripInputs {
            vehicles: &fleet.vehicles,
            drivers: &drivers,
            routes: &routes,
            count: 500,
            window_days: 30,
            now: reference_time(),
        },
        &mut rng,
    )
    .expect("trips");

    assert_eq!(trips.len(), 500);
    for pair in trips.windows(2) {
        assert!(pair[0].departure_datetime.date() <= pair[1].departure_datetime.date());
    }
    for trip in &trips {
        let vehicle = &fleet.vehicles[(trip.vehicle_id - 1) as usize];
        let driver = &drivers[(trip.driver_id - 1) as usize];
        assert_eq!(vehicle.status, VehicleStatus::Active);
        assert_eq!(driver.status, DriverStatus::Active);
        assert!(trip.total_weight_kg <= vehicle.capacity_kg);
        match trip.status {
            TripStatus::Completed => {
                let arrival = trip.arrival_datetime.expect("completed trip has arrival");
                assert!(arrival >= trip.departure_datetime);
                assert!(arrival < reference_time());
            }
            TripStatus::InProgress => assert!(trip.arrival_datetime.is_none()),
        }
    }
}

#[test]
fn trips_fail_without_active_drivers() {
    let config = config_with(EntityCounts {
        vehicles: 5,
        drivers: 5,
        routes: 2,
        ..EntityCounts::default()
    });
    let today = reference_time().date();
    let mut rng = seeded_rng(1);
    let fleet = generate_vehicles(&config, today, &mut rng).expect("vehicles");
    let mut drivers = generate_drivers(&config, today, Locale::EnUs, &mut rng).expect("drivers");
    for driver in &mut drivers {
        driver.status = DriverStatus::Inactive;
    }
    let routes = generate_routes(&config, &mut rng);

    let err = generate_trips(
        &TripInputs {
            vehicles: &fleet.vehicles,
            drivers: &drivers,
            routes: &routes,
            count: 10,
            window_days: 30,
            now: reference_time(),
        },
        &mut rng,
    )
    .expect_err("no active drivers");
    assert!(matches!(err, GenerationError::EmptyPool(_)));
}

#[test]
fn deliveries_stop_at_target_mid_trip() {
    let config = config_with(EntityCounts {
        routes: 1,
        ..EntityCounts::default()
    });
    let mut rng = seeded_rng(42);
    let routes = generate_routes(&config, &mut rng);
    let start = reference_time() - Duration::days(10);
    let trips = vec![trip(1, 1, start, Some(8)), trip(2, 1, start, Some(8))];

    let deliveries = generate_deliveries(
        &trips,
        &routes,
        Locale::EnUs,
        reference_time(),
        3,
        &mut rng,
    )
    .expect("deliveries");

    assert_eq!(deliveries.len(), 3);
    assert_eq!(deliveries[0].tracking_number, "FL202500000001");
    assert_eq!(deliveries[2].tracking_number, "FL202500000003");
    // The first trip always carries at least two packages.
    assert_eq!(deliveries[0].trip_id, 1);
    assert_eq!(deliveries[1].trip_id, 1);
    for delivery in &deliveries {
        assert!(delivery.delivery_address.ends_with(", Medellín"));
        assert_eq!(delivery.delivery_status, DeliveryStatus::Delivered);
        let delivered = delivery.delivered_datetime.expect("delivered time");
        let offset = (delivered - delivery.scheduled_datetime).num_minutes();
        assert!((-30..=30).contains(&offset) || (60..=180).contains(&offset));
    }
}

#[test]
fn deliveries_of_open_trips_are_pending() {
    let config = config_with(EntityCounts {
        routes: 1,
        ..EntityCounts::default()
    });
    let mut rng = seeded_rng(42);
    let routes = generate_routes(&config, &mut rng);
    let departure = reference_time() - Duration::hours(2);
    let trips = vec![trip(1, 1, departure, None)];

    let deliveries = generate_deliveries(
        &trips,
        &routes,
        Locale::PtBr,
        reference_time(),
        100,
        &mut rng,
    )
    .expect("deliveries");

    assert!((2..=6).contains(&deliveries.len()));
    for (index, delivery) in deliveries.iter().enumerate() {
        assert_eq!(delivery.delivery_status, DeliveryStatus::Pending);
        assert!(delivery.delivered_datetime.is_none());
        assert!(!delivery.recipient_signature);
        // Half-hour slices, scheduled at the slice midpoint.
        let expected = departure + Duration::minutes(15 + 30 * index as i64);
        assert_eq!(delivery.scheduled_datetime, expected);
    }
}

#[test]
fn trip_stats_aggregate_per_vehicle() {
    let start = reference_time() - Duration::days(100);
    let trips = vec![
        trip(1, 2, start, Some(5)),
        trip(2, 1, start, None),
        trip(3, 2, start + Duration::days(40), Some(5)),
    ];

    let stats = aggregate_trip_stats(&trips);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].vehicle_id, 1);
    assert_eq!(stats[0].trip_count, 1);
    assert_eq!(stats[0].last_arrival, None);
    assert_eq!(stats[0].window_days(), 90);
    assert_eq!(stats[1].vehicle_id, 2);
    assert_eq!(stats[1].trip_count, 2);
    assert_eq!(stats[1].window_days(), 40);
    assert_eq!(stats[1].service_count(), 1);
}

#[test]
fn maintenance_is_spread_and_truncated() {
    let start = reference_time() - Duration::days(200);
    let trips: Vec<Trip> = (0..100)
        .map(|index| trip(index + 1, 1 + index % 2, start + Duration::days(index), Some(6)))
        .collect();
    let catalog = SeedConfig::default().maintenance_types;

    let mut rng = seeded_rng(42);
    let records = generate_maintenance(&trips, &catalog, Locale::EnUs, 100, &mut rng);
    // 50 trips per vehicle gives two services each.
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].vehicle_id, 1);
    assert_eq!(records[2].vehicle_id, 2);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.maintenance_id, index as i64 + 1);
        assert!(record.next_maintenance_date > record.maintenance_date);
        assert!(record.description.starts_with(&record.maintenance_type));
        let base = catalog
            .iter()
            .find(|kind| kind.name == record.maintenance_type)
            .expect("catalog type")
            .base_cost;
        assert!(record.cost >= base * 0.8 - 0.01 && record.cost <= base * 1.2 + 0.01);
    }
    assert!(records[0].maintenance_date < records[1].maintenance_date);

    let mut rng = seeded_rng(42);
    let truncated = generate_maintenance(&trips, &catalog, Locale::EnUs, 3, &mut rng);
    assert_eq!(truncated.len(), 3);
    assert_eq!(truncated[..], records[..3]);
}
