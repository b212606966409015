use thiserror::Error;

use crate::model::GenerationReport;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    InvalidConfig(#[from] fleetgen_core::Error),
    #[error("no candidates to sample from: {0}")]
    EmptyPool(String),
    #[error("invalid distribution: {0}")]
    Distribution(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("generation failed")]
    Failed(Box<GenerationReport>),
}
