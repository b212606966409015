//! Core contracts for FleetGen.
//!
//! This crate defines the fleet-logistics entity types, the seed
//! configuration consumed by the generators, the default catalogs, and the
//! validation that runs before any row is produced.

pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod redaction;
pub mod validation;

pub use catalog::{CityDistance, DistanceTable, MaintenanceTypeSpec, VehicleModelSpec};
pub use config::{EntityCounts, SeedConfig, parse_reference_time};
pub use entities::{
    Dataset, Delivery, DeliveryStatus, Driver, DriverStatus, MaintenanceRecord, RecordId, Route,
    Trip, TripStatus, Vehicle, VehicleModel, VehicleStatus,
};
pub use error::{Error, Result};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use validation::validate_config;

/// Format used for date columns in every output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for timestamp columns in every output.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
