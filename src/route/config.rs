use serde::Deserialize;

use crate::shared::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metric: Metric,
    /// Consecutive vertices closer than this (in route units) form a
    /// degenerate segment.
    pub degenerate_epsilon: f64,
    /// Keep degenerate segments instead of rejecting the route.
    pub allow_duplicate_vertices: bool,
    /// Segments whose offset is within this of the best offset are treated
    /// as equally close when projecting.
    pub projection_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metric: Metric::Haversine,
            degenerate_epsilon: 1e-9,
            allow_duplicate_vertices: false,
            projection_tolerance: 1e-6,
        }
    }
}

impl Config {
    pub fn planar() -> Self {
        Self {
            metric: Metric::Planar,
            projection_tolerance: 1e-12,
            ..Default::default()
        }
    }
}
