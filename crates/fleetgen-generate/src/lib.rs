//! Deterministic fleet-logistics data generation for FleetGen.
//!
//! This crate turns a `SeedConfig` into a referentially consistent
//! `Dataset` by running five dependent stages over a single seeded random
//! stream, then writes one CSV per table.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod rng;

pub use checks::{CheckResult, IntegrityReport, check_dataset};
pub use engine::{GenerationEngine, GenerationResult, generate_dataset};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationIssue, GenerationReport, TableReport};
