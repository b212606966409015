use thiserror::Error;

/// Errors raised while loading a dataset into a relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(String),
    #[error("city '{0}' could not be resolved to an id")]
    UnresolvedCity(String),
    #[error("invalid load options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub(crate) fn db_error(err: sqlx::Error) -> StoreError {
    StoreError::Db(err.to_string())
}
