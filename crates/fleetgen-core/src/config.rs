use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{
    CityDistance, DEFAULT_CITIES, DEFAULT_HUB_CITY, DEFAULT_LICENSE_TYPES, DEFAULT_LOCALE,
    DistanceTable, MaintenanceTypeSpec, VehicleModelSpec, default_distances,
    default_maintenance_types, default_vehicle_models,
};
use crate::DATETIME_FORMAT;
use crate::error::Result;

/// Requested row count per generated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCounts {
    pub vehicles: usize,
    pub drivers: usize,
    pub routes: usize,
    pub trips: usize,
    pub deliveries: usize,
    pub maintenance: usize,
}

impl Default for EntityCounts {
    fn default() -> Self {
        Self {
            vehicles: 200,
            drivers: 400,
            routes: 50,
            trips: 100_000,
            deliveries: 400_000,
            maintenance: 5_000,
        }
    }
}

/// Seed parameters that fully determine the shape of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed for the single random stream shared by every stage.
    pub seed: u64,
    pub counts: EntityCounts,
    /// Ordered city list; route enumeration follows this order.
    pub cities: Vec<String>,
    /// City whose pairs get an extra route variant.
    pub hub_city: Option<String>,
    /// Length of the historical window that trips are spread over.
    pub window_days: u32,
    /// Instant treated as "now". Defaults to the local clock at run start.
    ///
    /// TOML accepts a local datetime (`2025-06-01T12:00:00`) or a string in
    /// either that form or `2025-06-01 12:00:00`.
    #[serde(deserialize_with = "deserialize_reference_time")]
    pub reference_time: Option<NaiveDateTime>,
    /// Faker locale for names and addresses (`en_US` or `pt_BR`).
    pub locale: String,
    pub vehicle_models: Vec<VehicleModelSpec>,
    pub license_types: Vec<String>,
    pub maintenance_types: Vec<MaintenanceTypeSpec>,
    pub distances: Vec<CityDistance>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            counts: EntityCounts::default(),
            cities: DEFAULT_CITIES.iter().map(|city| city.to_string()).collect(),
            hub_city: Some(DEFAULT_HUB_CITY.to_string()),
            window_days: 730,
            reference_time: None,
            locale: DEFAULT_LOCALE.to_string(),
            vehicle_models: default_vehicle_models(),
            license_types: DEFAULT_LICENSE_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
            maintenance_types: default_maintenance_types(),
            distances: default_distances(),
        }
    }
}

impl SeedConfig {
    /// Parse a TOML document; omitted fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn distance_table(&self) -> DistanceTable {
        DistanceTable::new(&self.distances)
    }

    pub fn is_hub(&self, city: &str) -> bool {
        self.hub_city.as_deref() == Some(city)
    }
}

/// Parse a reference time written with a space or a `T` separator.
/// Fractional seconds are dropped.
pub fn parse_reference_time(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|parsed| parsed.with_nanosecond(0).unwrap_or(parsed))
        .map_err(|err| {
            format!("invalid reference time '{value}', expected YYYY-MM-DD HH:MM:SS: {err}")
        })
}

fn deserialize_reference_time<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(text)) => text,
        Some(toml::Value::Datetime(datetime)) => {
            if datetime.offset.is_some() {
                return Err(D::Error::custom(
                    "reference_time must be a local datetime without an offset",
                ));
            }
            datetime.to_string()
        }
        Some(other) => {
            return Err(D::Error::custom(format!(
                "reference_time must be a datetime, found {}",
                other.type_str()
            )));
        }
    };
    parse_reference_time(&text).map(Some).map_err(D::Error::custom)
}
