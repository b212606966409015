//! Seeded random stream and the sampling helpers shared by every stage.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1};

use crate::errors::GenerationError;

/// The single random stream threaded through a run.
pub type FleetRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> FleetRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build a categorical distribution, mapping bad weights to a generation error.
pub fn weighted_index(weights: &[f64]) -> Result<WeightedIndex<f64>, GenerationError> {
    WeightedIndex::new(weights.iter().copied())
        .map_err(|err| GenerationError::Distribution(err.to_string()))
}

/// Round to two decimal places, the precision of every stored measure.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform real in `[min, max)`; returns `min` for an empty range.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Draw from an exponential distribution with scale 1.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    Exp1.sample(rng)
}

/// Uniform date in `[start, end]`, inclusive on both ends.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.random_range(0..=span))
}

/// Shift a timestamp by a fractional number of hours, to whole seconds.
pub fn add_hours(at: NaiveDateTime, hours: f64) -> NaiveDateTime {
    at + Duration::seconds((hours * 3600.0).round() as i64)
}

/// Elapsed hours between two timestamps.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(0.5), 0.5);
    }

    #[test]
    fn exponential_draws_are_positive() {
        let mut rng = seeded_rng(3);
        for _ in 0..1000 {
            assert!(exponential(&mut rng) >= 0.0);
        }
    }

    #[test]
    fn date_between_stays_in_bounds() {
        let mut rng = seeded_rng(9);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default();
        for _ in 0..200 {
            let date = date_between(&mut rng, start, end);
            assert!(date >= start && date <= end);
        }
    }
}
