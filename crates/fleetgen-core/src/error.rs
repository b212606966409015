use thiserror::Error;

/// Core error type shared across FleetGen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Seed parameters are missing, empty, or inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Failure reading a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for `SeedConfig`.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias for results returned by FleetGen crates.
pub type Result<T> = std::result::Result<T, Error>;
