//! The five generation stages, each a batch transform over the shared
//! random stream.

pub mod deliveries;
pub mod fleet;
pub mod maintenance;
pub mod people;
pub mod routes;
pub mod trips;

pub use deliveries::{DeliveryStream, distribute_weight, generate_deliveries};
pub use fleet::{Fleet, generate_drivers, generate_vehicles};
pub use maintenance::{
    MaintenanceStream, VehicleTripStats, aggregate_trip_stats, generate_maintenance,
};
pub use people::Locale;
pub use routes::{duration_within_speed_bounds, generate_routes, route_slots};
pub use trips::{TripInputs, generate_trips, hourly_weights};
