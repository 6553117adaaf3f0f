use serde::Serialize;

use crate::shared::{
    geo::Distance,
    time::{Duration, Timestamp},
};

/// Which known trip timestamps a prediction was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bracket {
    /// Before the first known trip timestamp.
    Leading,
    /// Between two known trip timestamps.
    Interior,
    /// At or after the last known trip timestamp.
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// The schedule expects no time to pass across the bracketing span, so the
    /// observed duration was split by distance alone.
    DegradedConfidence,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Index of the plan point this prediction is for, if any.
    pub sample_index: Option<usize>,
    pub distance: Distance,
    pub timestamp: Timestamp,
    pub bracket: Bracket,
    /// Route distance to the nearest known trip timestamp used.
    pub dist_to_closest_ts: Distance,
    /// Time between the prediction and the nearest known trip timestamp used.
    pub time_to_closest_ts: Duration,
    /// Known trip timestamps per schedule timestamp. Same for every
    /// prediction from one predictor.
    pub trip_to_schedule_ts_ratio: f64,
    pub warning: Option<Warning>,
}

impl Prediction {
    pub fn is_degraded(&self) -> bool {
        self.warning == Some(Warning::DegradedConfidence)
    }
}
