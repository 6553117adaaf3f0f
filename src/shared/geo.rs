use std::{
    cmp,
    fmt::Display,
    ops::{Add, AddAssign, Div, Mul, Sub},
};

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A length along or across a route.
///
/// The unit is fixed by the [`Metric`] the route was built with: meters for
/// [`Metric::Haversine`], coordinate degrees for [`Metric::Planar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Distance {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Ratio of two distances.
impl Div for Distance {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Distance {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn get(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

/// A geographic position in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.longitude, self.latitude))
    }
}

/// `(longitude, latitude)`
impl From<(f64, f64)> for Location {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Location> for (f64, f64) {
    fn from(value: Location) -> Self {
        (value.longitude, value.latitude)
    }
}

impl Location {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    pub fn in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &Self) -> Distance {
        let dist_lat = f64::to_radians(other.latitude - self.latitude);
        let dist_lon = f64::to_radians(other.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(other.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::new(EARTH_RADIUS_METERS * c)
    }

    /// Straight-line distance in coordinate degrees.
    pub fn planar_distance(&self, other: &Self) -> Distance {
        let dx = other.longitude - self.longitude;
        let dy = other.latitude - self.latitude;
        Distance::new(dx.hypot(dy))
    }

    pub(crate) fn lerp(&self, other: &Self, fraction: f64) -> Self {
        Self {
            longitude: self.longitude + (other.longitude - self.longitude) * fraction,
            latitude: self.latitude + (other.latitude - self.latitude) * fraction,
        }
    }
}

/// How lengths are measured along and across a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Great-circle distance in meters.
    #[default]
    Haversine,
    /// Euclidean distance directly on the coordinates.
    Planar,
}

/// Closest point on a segment to some location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPoint {
    pub location: Location,
    /// Position along the segment in `[0, 1]`.
    pub fraction: f64,
}

impl Metric {
    pub fn distance(&self, from: &Location, to: &Location) -> Distance {
        match self {
            Metric::Haversine => from.haversine_distance(to),
            Metric::Planar => from.planar_distance(to),
        }
    }

    /// Finds the point on segment `start -> end` closest to `location`.
    ///
    /// Under [`Metric::Haversine`] the search runs in a local equirectangular
    /// frame centred on `location`, which is accurate for segment lengths
    /// typical of route shapes.
    pub fn closest_on_segment(
        &self,
        location: &Location,
        start: &Location,
        end: &Location,
    ) -> SegmentPoint {
        let x_scale = match self {
            Metric::Haversine => f64::cos(f64::to_radians(location.latitude)),
            Metric::Planar => 1.0,
        };
        let (sx, sy) = (start.longitude * x_scale, start.latitude);
        let (ex, ey) = (end.longitude * x_scale, end.latitude);
        let (px, py) = (location.longitude * x_scale, location.latitude);

        let (dx, dy) = (ex - sx, ey - sy);
        let length_sq = dx * dx + dy * dy;
        let fraction = if length_sq == 0.0 {
            0.0
        } else {
            (((px - sx) * dx + (py - sy) * dy) / length_sq).clamp(0.0, 1.0)
        };

        // Endpoints are returned verbatim so vertices project onto themselves.
        let location = if fraction <= 0.0 {
            *start
        } else if fraction >= 1.0 {
            *end
        } else {
            start.lerp(end, fraction)
        };
        SegmentPoint { location, fraction }
    }
}

#[test]
fn distance_test() {
    let paris = Location::new(2.3514350059357927, 48.85800943005911);
    let london = Location::new(-0.12495407345099824, 51.5052389927712);
    let d = paris.haversine_distance(&london);
    assert!((d.as_kilometers() - 343.5).abs() < 2.0);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::new(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::new(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn planar_distance_test() {
    let a = Location::new(0.0, 0.0);
    let b = Location::new(3.0, 4.0);
    assert_eq!(Metric::Planar.distance(&a, &b), Distance::new(5.0));
}

#[test]
fn closest_on_segment_interior() {
    let point = Metric::Planar.closest_on_segment(
        &Location::new(1.0, 0.5),
        &Location::new(0.0, 0.0),
        &Location::new(0.0, 2.0),
    );
    assert_eq!(point.location, Location::new(0.0, 0.5));
    assert_eq!(point.fraction, 0.25);
}

#[test]
fn closest_on_segment_clamps_to_endpoints() {
    let start = Location::new(0.0, 0.0);
    let end = Location::new(0.0, 1.0);
    let before = Metric::Planar.closest_on_segment(&Location::new(0.0, -3.0), &start, &end);
    let after = Metric::Planar.closest_on_segment(&Location::new(0.2, 7.0), &start, &end);
    assert_eq!(before.location, start);
    assert_eq!(after.location, end);
    assert_eq!(after.fraction, 1.0);
}

#[test]
fn closest_on_zero_length_segment() {
    let vertex = Location::new(10.0, 50.0);
    let point =
        Metric::Haversine.closest_on_segment(&Location::new(10.1, 50.1), &vertex, &vertex);
    assert_eq!(point.location, vertex);
    assert_eq!(point.fraction, 0.0);
}

#[test]
fn bounds_test() {
    assert!(Location::new(-180.0, 90.0).in_bounds());
    assert!(!Location::new(180.5, 0.0).in_bounds());
    assert!(!Location::new(0.0, -91.0).in_bounds());
    assert!(!Location::new(f64::NAN, 0.0).is_finite());
}
