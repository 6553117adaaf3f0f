mod config;
pub use config::*;

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::shared::geo::{Distance, Location, Metric};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("A route needs at least 2 points, got {found}")]
    TooFewPoints { found: usize },
    #[error("Point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("Point {index} ({location}) is outside valid longitude/latitude bounds")]
    OutOfBounds { index: usize, location: Location },
    #[error("Segment {index} is degenerate, its end points are identical")]
    DegenerateSegment { index: usize },
}

/// Where a location lands on a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Cumulative distance from the start of the route.
    pub distance: Distance,
    /// Distance between the location and the route.
    pub offset: Distance,
    pub segment: usize,
    /// The projected position on the route.
    pub location: Location,
}

/// An ordered polyline with the cumulative distance of every vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    vertices: Box<[Location]>,
    cumulative: Box<[Distance]>,
    config: Config,
}

impl RoutePath {
    pub fn new(points: Vec<Location>) -> Result<Self, self::Error> {
        Self::with_config(points, Config::default())
    }

    pub fn with_config(points: Vec<Location>, config: Config) -> Result<Self, self::Error> {
        let now = Instant::now();
        if points.len() < 2 {
            return Err(Error::TooFewPoints {
                found: points.len(),
            });
        }
        for (index, location) in points.iter().enumerate() {
            check_location(index, location)?;
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = Distance::ZERO;
        cumulative.push(total);
        for (index, pair) in points.windows(2).enumerate() {
            let length = config.metric.distance(&pair[0], &pair[1]);
            if length.get() <= config.degenerate_epsilon && !config.allow_duplicate_vertices {
                return Err(Error::DegenerateSegment { index });
            }
            total += length;
            cumulative.push(total);
        }

        debug!(
            "Built route with {} vertices and length {} in {:?}",
            points.len(),
            total,
            now.elapsed()
        );
        Ok(Self {
            vertices: points.into(),
            cumulative: cumulative.into(),
            config,
        })
    }

    pub fn vertices(&self) -> &[Location] {
        &self.vertices
    }

    /// One entry per vertex, starting at zero.
    pub fn cumulative_distances(&self) -> &[Distance] {
        &self.cumulative
    }

    pub fn total_length(&self) -> Distance {
        self.cumulative[self.cumulative.len() - 1]
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() - 1
    }

    pub fn metric(&self) -> Metric {
        self.config.metric
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Projects `location` onto the closest segment of the route.
    ///
    /// When several segments are equally close (within the configured
    /// projection tolerance), which happens on overlapping or
    /// self-intersecting routes, the segment whose index is nearest to
    /// `hint` wins, forward segments before backward ones. Without a hint
    /// the earliest segment wins. Ties are ranked by segment index, not by
    /// cumulative distance, so long segments between candidates do not skew
    /// the choice.
    pub fn project(&self, location: &Location, hint: Option<usize>) -> Projection {
        let metric = self.config.metric;
        let candidates: Vec<Projection> = self
            .vertices
            .windows(2)
            .enumerate()
            .map(|(segment, pair)| {
                let point = metric.closest_on_segment(location, &pair[0], &pair[1]);
                let distance = if point.fraction >= 1.0 {
                    self.cumulative[segment + 1]
                } else {
                    let length = self.cumulative[segment + 1] - self.cumulative[segment];
                    self.cumulative[segment] + length * point.fraction
                };
                Projection {
                    distance,
                    offset: metric.distance(location, &point.location),
                    segment,
                    location: point.location,
                }
            })
            .collect();

        let best = candidates
            .iter()
            .map(|candidate| candidate.offset.get())
            .fold(f64::INFINITY, f64::min);
        let threshold = best + self.config.projection_tolerance;

        candidates
            .iter()
            .filter(|candidate| candidate.offset.get() <= threshold)
            .min_by_key(|candidate| tie_break_key(candidate.segment, hint))
            .copied()
            .unwrap_or(candidates[0])
    }

    /// The position on the route at a cumulative distance, clamped to the
    /// route's ends.
    pub fn location_at(&self, distance: Distance) -> Location {
        let segment = self
            .cumulative
            .partition_point(|d| *d <= distance)
            .clamp(1, self.segment_count())
            - 1;
        let start = self.cumulative[segment];
        let length = self.cumulative[segment + 1] - start;
        let fraction = if length.get() > 0.0 {
            ((distance - start) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.vertices[segment].lerp(&self.vertices[segment + 1], fraction)
    }
}

fn tie_break_key(segment: usize, hint: Option<usize>) -> (usize, bool, usize) {
    match hint {
        Some(hint) => (segment.abs_diff(hint), segment < hint, segment),
        None => (0, false, segment),
    }
}

pub(crate) fn check_location(index: usize, location: &Location) -> Result<(), self::Error> {
    if !location.is_finite() {
        return Err(Error::NonFinite { index });
    }
    if !location.in_bounds() {
        return Err(Error::OutOfBounds {
            index,
            location: *location,
        });
    }
    Ok(())
}
