use serde::{Deserialize, Serialize};

use crate::errors::{Result, StoreError};

pub const DEFAULT_BATCH_SIZE: usize = 1_000;
/// Largest batch whose widest table stays under the Postgres bind limit.
pub const MAX_BATCH_SIZE: usize = 5_000;

/// Options that control how a dataset is written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Rows per INSERT; each batch commits in its own transaction.
    pub batch_size: usize,
    /// Run the bundled DDL before inserting.
    pub create_schema: bool,
    /// Truncate every table and restart identities before inserting.
    pub truncate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            create_schema: false,
            truncate: false,
        }
    }
}

impl LoadOptions {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(StoreError::InvalidOptions(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        Ok(())
    }
}
