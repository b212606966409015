use std::collections::HashMap;

use async_trait::async_trait;

use fleetgen_core::{Dataset, RecordId};

use crate::errors::Result;
use crate::options::LoadOptions;
use crate::report::LoadReport;

/// Destination that accepts a whole generated dataset.
#[async_trait]
pub trait DatasetSink {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Insert every table in dependency order.
    async fn load(&self, dataset: &Dataset, opts: &LoadOptions) -> Result<LoadReport>;
}

/// Maps city names to the store's surrogate ids, inserting unknown names
/// first.
#[async_trait]
pub trait CityResolver {
    async fn resolve_cities(&self, names: &[String]) -> Result<HashMap<String, RecordId>>;
}
