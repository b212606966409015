use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use fleetgen_core::{RecordId, Route};
use fleetgen_store::postgres::{SCHEMA_SQL, TABLES};
use fleetgen_store::{
    CityResolver, LoadOptions, LoadReport, StoreError, TableLoad, resolve_route_endpoints,
};

/// Hands out ids in order of first request, like an identity column.
#[derive(Default)]
struct MemoryCities {
    ids: Mutex<Vec<String>>,
}

#[async_trait]
impl CityResolver for MemoryCities {
    async fn resolve_cities(
        &self,
        names: &[String],
    ) -> fleetgen_store::Result<HashMap<String, RecordId>> {
        let mut known = self.ids.lock().expect("city lock");
        for name in names {
            if !known.contains(name) {
                known.push(name.clone());
            }
        }
        Ok(names
            .iter()
            .filter_map(|name| {
                known
                    .iter()
                    .position(|candidate| candidate == name)
                    .map(|index| (name.clone(), index as RecordId + 1))
            })
            .collect())
    }
}

fn route(id: RecordId, origin: &str, destination: &str) -> Route {
    Route {
        route_id: id,
        route_code: format!("R{id:03}"),
        origin_city: origin.to_string(),
        destination_city: destination.to_string(),
        distance_km: 440.0,
        estimated_duration_hours: 6.2,
        toll_cost: 60_000,
    }
}

#[test]
fn batch_size_bounds_are_enforced() {
    assert!(LoadOptions::default().validate().is_ok());
    assert_eq!(LoadOptions::default().batch_size, 1_000);

    for batch_size in [0, 5_001] {
        let options = LoadOptions {
            batch_size,
            ..LoadOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(StoreError::InvalidOptions(_))
        ));
    }

    let options = LoadOptions {
        batch_size: 5_000,
        ..LoadOptions::default()
    };
    assert!(options.validate().is_ok());
}

#[tokio::test]
async fn resolver_is_idempotent_for_known_cities() {
    let resolver = MemoryCities::default();
    let first = resolver
        .resolve_cities(&["Bogotá".to_string(), "Cali".to_string()])
        .await
        .expect("resolve first batch");
    let second = resolver
        .resolve_cities(&["Cali".to_string(), "Medellín".to_string()])
        .await
        .expect("resolve second batch");

    assert_eq!(first.get("Cali"), second.get("Cali"));
    assert_eq!(second.get("Medellín"), Some(&3));
}

#[tokio::test]
async fn routes_take_resolved_city_ids() {
    let routes = vec![route(1, "Bogotá", "Medellín"), route(2, "Medellín", "Bogotá")];
    let resolver = MemoryCities::default();
    let ids = resolver
        .resolve_cities(&["Bogotá".to_string(), "Medellín".to_string()])
        .await
        .expect("resolve cities");

    let rows = resolve_route_endpoints(&routes, &ids).expect("resolve routes");
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].origin_city_id, rows[0].destination_city_id), (1, 2));
    assert_eq!((rows[1].origin_city_id, rows[1].destination_city_id), (2, 1));
    assert_eq!(rows[1].route.route_code, "R002");
}

#[test]
fn unknown_city_is_reported() {
    let routes = vec![route(1, "Bogotá", "Pasto")];
    let ids = HashMap::from([("Bogotá".to_string(), 1)]);

    let err = resolve_route_endpoints(&routes, &ids).expect_err("unknown city");
    match err {
        StoreError::UnresolvedCity(name) => assert_eq!(name, "Pasto"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_creates_tables_before_their_references() {
    let position = |needle: &str| {
        SCHEMA_SQL
            .find(&format!("CREATE TABLE IF NOT EXISTS {needle} ("))
            .unwrap_or_else(|| panic!("missing table {needle}"))
    };

    let positions: Vec<usize> = TABLES.iter().copied().map(position).collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "tables must be declared in insert order"
    );
    assert!(SCHEMA_SQL.contains("city_name VARCHAR(100) NOT NULL UNIQUE"));
}

#[test]
fn report_totals_follow_recorded_tables() {
    let mut report = LoadReport::new("postgres");
    report.record_table(TableLoad {
        table: "trips".to_string(),
        rows_inserted: 2_500,
        batches: 3,
    });
    report.record_table(TableLoad {
        table: "deliveries".to_string(),
        rows_inserted: 9_000,
        batches: 9,
    });

    assert_eq!(report.rows_total, 11_500);
    assert_eq!(report.batches_total, 12);
    assert!(report.validations_passed());
}
