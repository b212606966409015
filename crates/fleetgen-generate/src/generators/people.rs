use std::fmt;

use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, StreetName};
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::locales::{EN, PT_BR};
use rand::Rng;

use crate::errors::GenerationError;

/// Faker locale used for person names and street addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    EnUs,
    PtBr,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn resolve(value: &str) -> Result<Self, GenerationError> {
        Self::parse(value).ok_or_else(|| {
            GenerationError::InvalidConfig(fleetgen_core::Error::InvalidConfig(format!(
                "unsupported locale '{value}'"
            )))
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }

    pub fn first_name<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            Self::EnUs => FirstName(EN).fake_with_rng(rng),
            Self::PtBr => FirstName(PT_BR).fake_with_rng(rng),
        }
    }

    pub fn last_name<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            Self::EnUs => LastName(EN).fake_with_rng(rng),
            Self::PtBr => LastName(PT_BR).fake_with_rng(rng),
        }
    }

    pub fn full_name<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            Self::EnUs => Name(EN).fake_with_rng(rng),
            Self::PtBr => Name(PT_BR).fake_with_rng(rng),
        }
    }

    /// Building number followed by street name.
    pub fn street_address<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        let (number, street): (String, String) = match self {
            Self::EnUs => (
                BuildingNumber(EN).fake_with_rng(rng),
                StreetName(EN).fake_with_rng(rng),
            ),
            Self::PtBr => (
                BuildingNumber(PT_BR).fake_with_rng(rng),
                StreetName(PT_BR).fake_with_rng(rng),
            ),
        };
        format!("{number} {street}")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
