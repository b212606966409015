use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDateTime};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use fleetgen_core::{Delivery, DeliveryStatus, RecordId, Route, Trip};

use crate::errors::GenerationError;
use crate::generators::people::Locale;
use crate::rng::{add_hours, exponential, hours_between, round2, weighted_index};

/// Possible delivery counts per trip and their weights.
pub const DELIVERIES_PER_TRIP: [usize; 5] = [2, 3, 4, 5, 6];
const DELIVERIES_PER_TRIP_WEIGHTS: [f64; 5] = [0.1, 0.2, 0.4, 0.2, 0.1];

/// Share of a trip's weight allocated to its packages.
pub const PAYLOAD_SHARE: f64 = 0.95;
/// Floor applied to each package weight after normalization.
pub const MIN_PACKAGE_KG: f64 = 0.5;
/// Time slice used when a trip has no recorded arrival.
const DEFAULT_SLICE_HOURS: f64 = 0.5;

/// Split `total_weight` into `count` shares drawn from exponential(1),
/// scaled to [`PAYLOAD_SHARE`] of the total and floored at
/// [`MIN_PACKAGE_KG`]. The floor is applied after scaling, so the sum may
/// exceed the target.
pub fn distribute_weight<R: Rng + ?Sized>(
    total_weight: f64,
    count: usize,
    rng: &mut R,
) -> Vec<f64> {
    let draws: Vec<f64> = (0..count).map(|_| exponential(rng)).collect();
    let sum: f64 = draws.iter().sum();
    let target = total_weight * PAYLOAD_SHARE;
    draws
        .into_iter()
        .map(|draw| {
            let share = if sum > 0.0 {
                draw / sum * target
            } else {
                target / count as f64
            };
            share.max(MIN_PACKAGE_KG)
        })
        .collect()
}

struct TripPlan<'a> {
    trip: &'a Trip,
    city: &'a str,
    weights: Vec<f64>,
    slice_hours: f64,
    next_index: usize,
}

/// Lazy, finite sequence of deliveries over a trip set.
///
/// Each trip is expanded into 2 to 6 deliveries as the sequence is
/// consumed; bounding it with `take(n)` stops generation mid-trip.
pub struct DeliveryStream<'a, R: ?Sized> {
    trips: std::slice::Iter<'a, Trip>,
    destinations: HashMap<RecordId, &'a str>,
    per_trip: WeightedIndex<f64>,
    locale: Locale,
    year: i32,
    next_id: RecordId,
    current: Option<TripPlan<'a>>,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> DeliveryStream<'a, R> {
    pub fn new(
        trips: &'a [Trip],
        routes: &'a [Route],
        locale: Locale,
        now: NaiveDateTime,
        rng: &'a mut R,
    ) -> Result<Self, GenerationError> {
        let destinations = routes
            .iter()
            .map(|route| (route.route_id, route.destination_city.as_str()))
            .collect();
        Ok(Self {
            trips: trips.iter(),
            destinations,
            per_trip: weighted_index(&DELIVERIES_PER_TRIP_WEIGHTS)?,
            locale,
            year: now.year(),
            next_id: 1,
            current: None,
            rng,
        })
    }

    fn plan_trip(&mut self, trip: &'a Trip) -> TripPlan<'a> {
        let count = DELIVERIES_PER_TRIP[self.per_trip.sample(self.rng)];
        let weights = distribute_weight(trip.total_weight_kg, count, self.rng);
        let slice_hours = match trip.arrival_datetime {
            Some(arrival) => {
                let hours = hours_between(trip.departure_datetime, arrival);
                if hours > 0.0 {
                    hours / count as f64
                } else {
                    DEFAULT_SLICE_HOURS
                }
            }
            None => DEFAULT_SLICE_HOURS,
        };
        TripPlan {
            trip,
            city: self
                .destinations
                .get(&trip.route_id)
                .copied()
                .unwrap_or_default(),
            weights,
            slice_hours,
            next_index: 0,
        }
    }

    fn build_delivery(&mut self, plan: &mut TripPlan<'a>) -> Delivery {
        let index = plan.next_index;
        plan.next_index += 1;

        let trip = plan.trip;
        let scheduled = add_hours(
            trip.departure_datetime,
            plan.slice_hours * (index as f64 + 0.5),
        );

        let (delivered_datetime, delivery_status, recipient_signature) =
            if trip.arrival_datetime.is_some() {
                let offset_minutes = if self.rng.random_bool(0.9) {
                    self.rng.random_range(-30..=30)
                } else {
                    self.rng.random_range(60..=180)
                };
                let delivered = scheduled + Duration::minutes(offset_minutes);
                let signed = self.rng.random_bool(0.95);
                (Some(delivered), DeliveryStatus::Delivered, signed)
            } else {
                (None, DeliveryStatus::Pending, false)
            };

        let delivery_id = self.next_id;
        self.next_id += 1;
        let customer_name = self.locale.full_name(self.rng);
        let street = self.locale.street_address(self.rng);

        Delivery {
            delivery_id,
            trip_id: trip.trip_id,
            tracking_number: format!("FL{}{delivery_id:08}", self.year),
            customer_name,
            delivery_address: format!("{street}, {}", plan.city),
            package_weight_kg: round2(plan.weights[index]),
            scheduled_datetime: scheduled,
            delivered_datetime,
            delivery_status,
            recipient_signature,
        }
    }
}

impl<'a, R: Rng + ?Sized> Iterator for DeliveryStream<'a, R> {
    type Item = Delivery;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(mut plan) = self.current.take() {
                if plan.next_index < plan.weights.len() {
                    let delivery = self.build_delivery(&mut plan);
                    self.current = Some(plan);
                    return Some(delivery);
                }
            }
            let trip = self.trips.next()?;
            self.current = Some(self.plan_trip(trip));
        }
    }
}

/// Generate at most `target` deliveries, stopping mid-trip if needed.
pub fn generate_deliveries<R: Rng + ?Sized>(
    trips: &[Trip],
    routes: &[Route],
    locale: Locale,
    now: NaiveDateTime,
    target: usize,
    rng: &mut R,
) -> Result<Vec<Delivery>, GenerationError> {
    Ok(DeliveryStream::new(trips, routes, locale, now, rng)?
        .take(target)
        .collect())
}
