use std::{
    cmp,
    fmt::Display,
    ops::{Add, AddAssign, Mul, Sub},
};

use chrono::{DateTime, Utc};

/// Seconds since the Unix epoch.
///
/// Callers are expected to have normalized time zones before handing
/// timestamps over.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp(f64);

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl From<f64> for Timestamp {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Timestamp {
    pub const fn from_seconds(secs: f64) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// `None` when the timestamp is not finite or out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }
}

/// A signed span of seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Duration(f64);

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl From<f64> for Duration {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const ZERO: Self = Self(0.0);

    pub const fn from_seconds(secs: f64) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Mul<f64> for Duration {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

#[test]
fn timestamp_difference() {
    let a = Timestamp::from_seconds(1_700_000_000.0);
    let b = Timestamp::from_seconds(1_700_000_090.5);
    assert_eq!((b - a).as_seconds(), 90.5);
    assert_eq!(a + Duration::from_seconds(60.0), Timestamp::from_seconds(1_700_000_060.0));
    assert_eq!(b - Duration::from_seconds(0.5), Timestamp::from_seconds(1_700_000_090.0));
}

#[test]
fn timestamp_to_datetime() {
    let ts = Timestamp::from_seconds(0.5);
    let datetime = ts.to_datetime().unwrap();
    assert_eq!(datetime.timestamp(), 0);
    assert_eq!(datetime.timestamp_subsec_millis(), 500);
}

#[test]
fn timestamp_display_non_finite() {
    let ts = Timestamp::from_seconds(f64::NAN);
    assert!(ts.to_datetime().is_none());
    assert_eq!(ts.to_string(), "NaN");
    assert!(!ts.is_finite());
    assert!(Timestamp::from_seconds(1.5).is_finite());
}

#[test]
fn duration_scaling() {
    let d = Duration::from_seconds(120.0) * 0.25;
    assert_eq!(d, Duration::from_seconds(30.0));
    assert_eq!(Duration::from_seconds(-5.0).abs(), Duration::from_seconds(5.0));
}
