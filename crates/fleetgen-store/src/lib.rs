//! Relational sinks for generated fleet datasets.

pub mod errors;
pub mod options;
pub mod postgres;
pub mod report;
pub mod rows;
pub mod sink;

pub use errors::{Result, StoreError};
pub use options::{DEFAULT_BATCH_SIZE, LoadOptions, MAX_BATCH_SIZE};
pub use postgres::{PostgresSink, connect};
pub use report::{DeliveryStats, IntegrityCount, LoadReport, TableLoad};
pub use rows::{RouteRow, resolve_route_endpoints};
pub use sink::{CityResolver, DatasetSink};
