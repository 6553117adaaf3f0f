use serde::{Deserialize, Serialize};

use crate::{
    plan::{RoutePlan, Sample},
    predictor::{Bracket, Prediction},
    shared::{geo::Location, time::Timestamp},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ShapeRow {
    pub longitude: f64,
    pub latitude: f64,
}

impl From<ShapeRow> for Location {
    fn from(value: ShapeRow) -> Self {
        Location::new(value.longitude, value.latitude)
    }
}

/// A schedule or trip row. Trips leave `timestamp` empty where unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRow {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl From<SampleRow> for Sample {
    fn from(value: SampleRow) -> Self {
        Sample::new(
            Location::new(value.longitude, value.latitude),
            value.timestamp.map(Timestamp::from_seconds),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionRow {
    pub longitude: f64,
    pub latitude: f64,
    pub distance_traveled: f64,
    pub predicted_timestamp: f64,
    pub dist_to_closest_ts: f64,
    pub time_to_closest_ts: f64,
    pub trip_to_schedule_ts_ratio: f64,
    pub bracket: Bracket,
    pub degraded: bool,
}

impl PredictionRow {
    /// Uses the plan point's own location when the prediction belongs to
    /// one, otherwise the position on the route.
    pub fn new(plan: &RoutePlan, prediction: &Prediction) -> Self {
        let location = prediction
            .sample_index
            .and_then(|index| plan.points().get(index))
            .map(|point| point.location)
            .unwrap_or_else(|| plan.route().location_at(prediction.distance));
        Self {
            longitude: location.longitude,
            latitude: location.latitude,
            distance_traveled: prediction.distance.get(),
            predicted_timestamp: prediction.timestamp.as_seconds(),
            dist_to_closest_ts: prediction.dist_to_closest_ts.get(),
            time_to_closest_ts: prediction.time_to_closest_ts.as_seconds(),
            trip_to_schedule_ts_ratio: prediction.trip_to_schedule_ts_ratio,
            bracket: prediction.bracket,
            degraded: prediction.is_degraded(),
        }
    }
}
