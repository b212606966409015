use serde::{Deserialize, Serialize};

/// Rows and batches written to one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLoad {
    pub table: String,
    pub rows_inserted: u64,
    pub batches: u64,
}

impl TableLoad {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows_inserted: 0,
            batches: 0,
        }
    }
}

/// Result of one post-load integrity query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityCount {
    pub name: String,
    pub violations: i64,
}

/// Deliveries-per-trip statistics read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStats {
    pub avg_per_trip: f64,
    pub min_per_trip: i64,
    pub max_per_trip: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub engine: String,
    pub tables: Vec<TableLoad>,
    pub rows_total: u64,
    pub batches_total: u64,
    pub integrity: Vec<IntegrityCount>,
    /// Final row count per table as seen by the store.
    pub table_counts: Vec<(String, i64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliveries: Option<DeliveryStats>,
    pub duration_ms: u64,
}

impl LoadReport {
    pub fn new(engine: &str) -> Self {
        Self {
            engine: engine.to_string(),
            ..Self::default()
        }
    }

    pub fn record_table(&mut self, table: TableLoad) {
        self.rows_total += table.rows_inserted;
        self.batches_total += table.batches;
        self.tables.push(table);
    }

    pub fn validations_passed(&self) -> bool {
        self.integrity.iter().all(|check| check.violations == 0)
    }
}
