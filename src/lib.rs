//! Timestamp prediction along a fixed route.
//!
//! A [`route::RoutePath`] holds the route geometry. A [`plan::RoutePlan`]
//! projects an ordered list of samples onto it, once for the schedule and
//! once for an observed trip. A [`predictor::TimestampPredictor`] then fills
//! in the trip's missing timestamps, splitting each observed interval the way
//! the schedule expects the time to be spent.
//!
//! ```
//! use routepace::prelude::*;
//!
//! let route = RoutePath::with_config(
//!     vec![Location::new(0.0, 0.0), Location::new(0.0, 1.0), Location::new(0.0, 2.0)],
//!     route::Config::planar(),
//! )?;
//! let schedule = RoutePlan::new(
//!     &route,
//!     &[
//!         Sample::timed(Location::new(0.0, 0.0), Timestamp::from_seconds(0.0)),
//!         Sample::timed(Location::new(0.0, 1.0), Timestamp::from_seconds(100.0)),
//!         Sample::timed(Location::new(0.0, 2.0), Timestamp::from_seconds(200.0)),
//!     ],
//! )?;
//! let trip = RoutePlan::new(
//!     &route,
//!     &[Sample::timed(Location::new(0.0, 0.5), Timestamp::from_seconds(50.0))],
//! )?;
//! let predictor = TimestampPredictor::new(&schedule, &trip)?;
//! let prediction = predictor.predict_at(Distance::new(1.0))?;
//! assert_eq!(prediction.timestamp, Timestamp::from_seconds(100.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod io;
pub mod plan;
pub mod predictor;
pub mod route;
pub mod shared;

pub mod prelude {
    pub use crate::{
        plan::{ProjectedPoint, RoutePlan, Sample},
        predictor::{Bracket, Prediction, TailMode, TimestampPredictor, Warning},
        route::{self, Projection, RoutePath},
        shared::{Distance, Duration, Location, Metric, Timestamp},
    };
}
