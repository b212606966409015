use std::collections::HashMap;

use fleetgen_core::{RecordId, Route};

use crate::errors::{Result, StoreError};

/// A route with both endpoints resolved to city ids.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow<'a> {
    pub route: &'a Route,
    pub origin_city_id: RecordId,
    pub destination_city_id: RecordId,
}

/// Attach city ids to every route, failing on the first unknown name.
pub fn resolve_route_endpoints<'a>(
    routes: &'a [Route],
    city_ids: &HashMap<String, RecordId>,
) -> Result<Vec<RouteRow<'a>>> {
    let lookup = |name: &str| {
        city_ids
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnresolvedCity(name.to_string()))
    };
    routes
        .iter()
        .map(|route| {
            Ok(RouteRow {
                route,
                origin_city_id: lookup(&route.origin_city)?,
                destination_city_id: lookup(&route.destination_city)?,
            })
        })
        .collect()
}
