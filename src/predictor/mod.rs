mod config;
pub mod pace;
mod prediction;

pub use config::*;
pub use pace::PaceProfile;
pub use prediction::*;

use std::{fmt::Display, time::Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    plan::RoutePlan,
    route,
    shared::{
        geo::{Distance, Location},
        time::{Duration, Timestamp},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Schedule,
    Trip,
}

impl Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanKind::Schedule => f.write_str("schedule"),
            PlanKind::Trip => f.write_str("trip"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("The {plan} plan has {found} usable timestamps, {required} required")]
    InsufficientAnchors {
        plan: PlanKind,
        found: usize,
        required: usize,
    },
    #[error("Schedule and trip are projected onto different routes")]
    RouteMismatch,
    #[error("Distance {distance} is outside the route [0, {total}]")]
    DistanceOutOfRange { distance: Distance, total: Distance },
    #[error("Invalid location: {0}")]
    InvalidGeometry(#[from] route::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    distance: Distance,
    timestamp: Timestamp,
}

struct Estimate {
    timestamp: Timestamp,
    bracket: Bracket,
    dist_to_closest_ts: Distance,
    time_to_closest_ts: Duration,
    warning: Option<Warning>,
}

/// Predicts timestamps along a route from a dense schedule and a sparse trip.
///
/// Between two known trip timestamps the observed duration is split in
/// proportion to the time the schedule expects to spend on each part of the
/// span. Outside the known range the schedule's pace is used to extrapolate
/// from the nearest known trip timestamp.
///
/// Predictions are pure functions of the two plans, so a predictor can be
/// shared freely between threads.
pub struct TimestampPredictor<'a> {
    schedule: &'a RoutePlan<'a>,
    trip: &'a RoutePlan<'a>,
    config: Config,
    profile: Option<PaceProfile>,
    // Trip anchors ordered by distance
    anchors: Box<[Anchor]>,
    schedule_anchor_count: usize,
    ratio: f64,
}

impl<'a> TimestampPredictor<'a> {
    pub fn new(
        schedule: &'a RoutePlan<'a>,
        trip: &'a RoutePlan<'a>,
    ) -> Result<Self, self::Error> {
        if !std::ptr::eq(schedule.route(), trip.route()) && schedule.route() != trip.route() {
            return Err(Error::RouteMismatch);
        }

        let schedule_anchor_count = schedule.anchor_count();
        let profile = PaceProfile::from_anchors(
            schedule
                .anchors()
                .filter_map(|point| point.timestamp.map(|ts| (point.distance, ts))),
        );

        let mut anchors: Vec<Anchor> = trip
            .anchors()
            .filter_map(|point| {
                point.timestamp.map(|timestamp| Anchor {
                    distance: point.distance,
                    timestamp,
                })
            })
            .collect();
        anchors.sort_by(|a, b| a.distance.get().total_cmp(&b.distance.get()));

        let ratio = if schedule_anchor_count == 0 {
            0.0
        } else {
            anchors.len() as f64 / schedule_anchor_count as f64
        };

        Ok(Self {
            schedule,
            trip,
            config: Config::default(),
            profile,
            anchors: anchors.into(),
            schedule_anchor_count,
            ratio,
        })
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn tail_mode(mut self, tail_mode: TailMode) -> Self {
        self.config.tail_mode = tail_mode;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Known trip timestamps per schedule timestamp.
    pub fn trip_to_schedule_ts_ratio(&self) -> f64 {
        self.ratio
    }

    /// `None` if the schedule has fewer than two anchors at distinct distances.
    pub fn profile(&self) -> Option<&PaceProfile> {
        self.profile.as_ref()
    }

    pub fn predict_at(&self, distance: Distance) -> Result<Prediction, self::Error> {
        let profile = self.ready()?;
        self.check_distance(distance)?;
        Ok(self.prediction(profile, distance, None))
    }

    /// Projects `location` onto the route without a hint and predicts there.
    pub fn predict_location(&self, location: &Location) -> Result<Prediction, self::Error> {
        route::check_location(0, location)?;
        let projection = self.trip.route().project(location, None);
        self.predict_at(projection.distance)
    }

    /// One result per target. A failing target never affects the others.
    pub fn predict_batch(&self, distances: &[Distance]) -> Vec<Result<Prediction, self::Error>> {
        let now = Instant::now();
        let predictions: Vec<_> = distances
            .iter()
            .map(|distance| self.predict_at(*distance))
            .collect();
        debug!(
            "Predicted {} distances in {:?}",
            predictions.len(),
            now.elapsed()
        );
        predictions
    }

    /// Same as [`Self::predict_batch`], spread over the rayon thread pool.
    pub fn par_predict_batch(
        &self,
        distances: &[Distance],
    ) -> Vec<Result<Prediction, self::Error>> {
        let now = Instant::now();
        let predictions: Vec<_> = distances
            .par_iter()
            .map(|distance| self.predict_at(*distance))
            .collect();
        debug!(
            "Predicted {} distances in {:?}",
            predictions.len(),
            now.elapsed()
        );
        predictions
    }

    /// A prediction for every schedule waypoint, in schedule order.
    pub fn predict_schedule(&self) -> Result<Vec<Prediction>, self::Error> {
        let profile = self.ready()?;
        let now = Instant::now();
        let predictions: Vec<_> = self
            .schedule
            .points()
            .iter()
            .map(|point| self.prediction(profile, point.distance, Some(point.index)))
            .collect();
        debug!(
            "Predicted {} schedule waypoints in {:?}",
            predictions.len(),
            now.elapsed()
        );
        Ok(predictions)
    }

    /// A prediction for every trip point without a timestamp, in trip order.
    pub fn predict_missing_trip(&self) -> Result<Vec<Prediction>, self::Error> {
        let profile = self.ready()?;
        let now = Instant::now();
        let predictions: Vec<_> = self
            .trip
            .points()
            .iter()
            .filter(|point| !point.is_anchor())
            .map(|point| self.prediction(profile, point.distance, Some(point.index)))
            .collect();
        debug!(
            "Predicted {} trip points in {:?}",
            predictions.len(),
            now.elapsed()
        );
        Ok(predictions)
    }

    fn ready(&self) -> Result<&PaceProfile, self::Error> {
        if self.anchors.is_empty() {
            return Err(Error::InsufficientAnchors {
                plan: PlanKind::Trip,
                found: 0,
                required: 1,
            });
        }
        self.profile.as_ref().ok_or(Error::InsufficientAnchors {
            plan: PlanKind::Schedule,
            found: self.schedule_anchor_count,
            required: 2,
        })
    }

    fn check_distance(&self, distance: Distance) -> Result<(), self::Error> {
        let total = self.trip.route().total_length();
        if !distance.is_finite() || distance < Distance::ZERO || distance > total {
            return Err(Error::DistanceOutOfRange { distance, total });
        }
        Ok(())
    }

    fn prediction(
        &self,
        profile: &PaceProfile,
        distance: Distance,
        sample_index: Option<usize>,
    ) -> Prediction {
        let estimate = self.estimate(profile, distance);
        Prediction {
            sample_index,
            distance,
            timestamp: estimate.timestamp,
            bracket: estimate.bracket,
            dist_to_closest_ts: estimate.dist_to_closest_ts,
            time_to_closest_ts: estimate.time_to_closest_ts,
            trip_to_schedule_ts_ratio: self.ratio,
            warning: estimate.warning,
        }
    }

    // Requires at least one anchor.
    fn estimate(&self, profile: &PaceProfile, distance: Distance) -> Estimate {
        let index = self
            .anchors
            .partition_point(|anchor| anchor.distance <= distance);
        let previous = index.checked_sub(1).map(|i| self.anchors[i]);
        match (previous, self.anchors.get(index)) {
            (Some(previous), Some(next)) => interpolate(profile, distance, previous, *next),
            (Some(previous), None) => self.extrapolate_forward(profile, distance, previous),
            (None, _) => self.extrapolate_backward(profile, distance, self.anchors[0]),
        }
    }

    fn extrapolate_backward(
        &self,
        profile: &PaceProfile,
        distance: Distance,
        first: Anchor,
    ) -> Estimate {
        let elapsed = match self.config.tail_mode {
            TailMode::ScheduleEnds => {
                Duration::from_seconds(profile.first_pace() * (first.distance - distance).get())
            }
            TailMode::Profile => profile.elapsed(distance, first.distance),
        };
        let timestamp = first.timestamp - elapsed;
        Estimate {
            timestamp,
            bracket: Bracket::Leading,
            dist_to_closest_ts: (first.distance - distance).abs(),
            time_to_closest_ts: (first.timestamp - timestamp).abs(),
            warning: None,
        }
    }

    fn extrapolate_forward(
        &self,
        profile: &PaceProfile,
        distance: Distance,
        last: Anchor,
    ) -> Estimate {
        let elapsed = match self.config.tail_mode {
            TailMode::ScheduleEnds => {
                Duration::from_seconds(profile.last_pace() * (distance - last.distance).get())
            }
            TailMode::Profile => profile.elapsed(last.distance, distance),
        };
        let timestamp = last.timestamp + elapsed;
        Estimate {
            timestamp,
            bracket: Bracket::Trailing,
            dist_to_closest_ts: (distance - last.distance).abs(),
            time_to_closest_ts: (timestamp - last.timestamp).abs(),
            warning: None,
        }
    }
}

/// Splits the observed duration between two anchors by where the schedule
/// expects the time to be spent.
fn interpolate(
    profile: &PaceProfile,
    distance: Distance,
    previous: Anchor,
    next: Anchor,
) -> Estimate {
    let expected = profile.elapsed(previous.distance, next.distance).as_seconds();
    let (weight, warning) = if expected.abs() > f64::EPSILON {
        let covered = profile.elapsed(previous.distance, distance).as_seconds();
        (covered / expected, None)
    } else {
        warn!(
            "Schedule expects no time between {} and {}, splitting by distance",
            previous.distance, next.distance
        );
        (
            (distance - previous.distance) / (next.distance - previous.distance),
            Some(Warning::DegradedConfidence),
        )
    };

    let timestamp = previous.timestamp + (next.timestamp - previous.timestamp) * weight;
    Estimate {
        timestamp,
        bracket: Bracket::Interior,
        dist_to_closest_ts: nearer(
            (distance - previous.distance).abs(),
            (next.distance - distance).abs(),
        ),
        time_to_closest_ts: nearer(
            (timestamp - previous.timestamp).abs(),
            (next.timestamp - timestamp).abs(),
        ),
        warning,
    }
}

fn nearer<T: PartialOrd>(a: T, b: T) -> T {
    if a <= b { a } else { b }
}
