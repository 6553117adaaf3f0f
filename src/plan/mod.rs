use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    route::{self, RoutePath},
    shared::{
        geo::{Distance, Location},
        time::Timestamp,
    },
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("A route plan needs at least one sample")]
    EmptySampleSet,
    #[error("Sample {index} has a non-finite timestamp")]
    NonFiniteTimestamp { index: usize },
    #[error("Invalid sample geometry: {0}")]
    InvalidGeometry(#[from] route::Error),
}

/// A caller supplied position with an optional timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub location: Location,
    pub timestamp: Option<Timestamp>,
}

impl Sample {
    pub fn new(location: Location, timestamp: Option<Timestamp>) -> Self {
        Self {
            location,
            timestamp,
        }
    }

    pub fn timed(location: Location, timestamp: Timestamp) -> Self {
        Self::new(location, Some(timestamp))
    }

    pub fn untimed(location: Location) -> Self {
        Self::new(location, None)
    }
}

/// `(longitude, latitude, timestamp)`
impl From<(f64, f64, Option<f64>)> for Sample {
    fn from((longitude, latitude, timestamp): (f64, f64, Option<f64>)) -> Self {
        Self::new(
            Location::new(longitude, latitude),
            timestamp.map(Timestamp::from_seconds),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Position of the originating sample in the input.
    pub index: usize,
    pub location: Location,
    /// Cumulative distance along the route, within `[0, total_length]`.
    pub distance: Distance,
    /// How far the sample sits from the route.
    pub offset: Distance,
    pub segment: usize,
    pub timestamp: Option<Timestamp>,
}

impl ProjectedPoint {
    pub fn is_anchor(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Samples projected, in order, onto a shared route.
///
/// Each projection is hinted with the previous sample's segment so
/// overlapping parts of the route resolve in travel order. This biases the
/// distances toward a forward progression but does not force it: genuine
/// backward motion in the input comes through as decreasing distances, and
/// callers needing strict monotonicity have to denoise their samples first.
#[derive(Debug, Clone)]
pub struct RoutePlan<'a> {
    route: &'a RoutePath,
    points: Box<[ProjectedPoint]>,
}

impl<'a> RoutePlan<'a> {
    pub fn new(route: &'a RoutePath, samples: &[Sample]) -> Result<Self, self::Error> {
        let now = Instant::now();
        if samples.is_empty() {
            return Err(Error::EmptySampleSet);
        }

        let mut points: Vec<ProjectedPoint> = Vec::with_capacity(samples.len());
        let mut hint: Option<usize> = None;
        for (index, sample) in samples.iter().enumerate() {
            route::check_location(index, &sample.location)?;
            if let Some(timestamp) = sample.timestamp
                && !timestamp.is_finite()
            {
                return Err(Error::NonFiniteTimestamp { index });
            }
            let projection = route.project(&sample.location, hint);
            if let Some(previous) = points.last()
                && projection.distance < previous.distance
            {
                warn!(
                    "Sample {index} projects behind sample {} ({} < {})",
                    previous.index, projection.distance, previous.distance
                );
            }
            hint = Some(projection.segment);
            points.push(ProjectedPoint {
                index,
                location: sample.location,
                distance: projection.distance,
                offset: projection.offset,
                segment: projection.segment,
                timestamp: sample.timestamp,
            });
        }

        debug!(
            "Projected {} samples onto the route in {:?}",
            points.len(),
            now.elapsed()
        );
        Ok(Self {
            route,
            points: points.into(),
        })
    }

    pub fn route(&self) -> &'a RoutePath {
        self.route
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Points carrying a known timestamp, in input order.
    pub fn anchors(&self) -> impl Iterator<Item = &ProjectedPoint> {
        self.points.iter().filter(|point| point.is_anchor())
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors().count()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
