use crate::shared::{
    geo::Distance,
    time::{Duration, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PaceSegment {
    start: Distance,
    end: Distance,
    /// Schedule time spent before `start`, relative to the first anchor.
    offset: Duration,
    /// Seconds per route unit.
    pace: f64,
}

impl PaceSegment {
    fn implied(&self, distance: Distance) -> Duration {
        self.offset + Duration::from_seconds(self.pace * (distance - self.start).get())
    }
}

/// The time a schedule expects to spend along the route.
///
/// Built from the schedule's anchors ordered by distance. Every pair of
/// consecutive anchors with a positive distance between them becomes a
/// segment of constant pace; pairs at the same distance (a dwell) carry no
/// distance and are skipped. Before the first and after the last anchor the
/// outermost paces are extended.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceProfile {
    segments: Box<[PaceSegment]>,
}

impl PaceProfile {
    /// `None` if fewer than two anchors sit at distinct distances.
    pub fn from_anchors<I>(anchors: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Distance, Timestamp)>,
    {
        let mut anchors: Vec<(Distance, Timestamp)> = anchors.into_iter().collect();
        anchors.sort_by(|(a, _), (b, _)| a.get().total_cmp(&b.get()));

        let mut offset = Duration::ZERO;
        let mut segments = Vec::with_capacity(anchors.len().saturating_sub(1));
        for pair in anchors.windows(2) {
            let (start, start_time) = pair[0];
            let (end, end_time) = pair[1];
            let length = end - start;
            if length.get() <= 0.0 {
                continue;
            }
            let scheduled = end_time - start_time;
            segments.push(PaceSegment {
                start,
                end,
                offset,
                pace: scheduled.as_seconds() / length.get(),
            });
            offset += scheduled;
        }

        if segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: segments.into(),
            })
        }
    }

    /// Pace of the first two anchors.
    pub fn first_pace(&self) -> f64 {
        self.segments[0].pace
    }

    /// Pace of the last two anchors.
    pub fn last_pace(&self) -> f64 {
        self.segments[self.segments.len() - 1].pace
    }

    /// Scheduled pace at `distance`, in seconds per route unit.
    pub fn pace_at(&self, distance: Distance) -> f64 {
        self.segment_at(distance).pace
    }

    /// Schedule time expected between two distances.
    pub fn elapsed(&self, from: Distance, to: Distance) -> Duration {
        self.implied(to) - self.implied(from)
    }

    pub fn start(&self) -> Distance {
        self.segments[0].start
    }

    pub fn end(&self) -> Distance {
        self.segments[self.segments.len() - 1].end
    }

    fn implied(&self, distance: Distance) -> Duration {
        self.segment_at(distance).implied(distance)
    }

    // A distance on a boundary belongs to the segment starting there.
    fn segment_at(&self, distance: Distance) -> &PaceSegment {
        let index = self
            .segments
            .partition_point(|segment| segment.end <= distance)
            .min(self.segments.len() - 1);
        &self.segments[index]
    }
}

#[cfg(test)]
fn profile(anchors: &[(f64, f64)]) -> Option<PaceProfile> {
    PaceProfile::from_anchors(
        anchors
            .iter()
            .map(|(d, t)| (Distance::new(*d), Timestamp::from_seconds(*t))),
    )
}

#[test]
fn profile_needs_two_distinct_distances() {
    assert!(profile(&[(0.0, 0.0)]).is_none());
    assert!(profile(&[(1.0, 0.0), (1.0, 30.0)]).is_none());
    assert!(profile(&[(0.0, 0.0), (1.0, 30.0)]).is_some());
}

#[test]
fn profile_paces() {
    let profile = profile(&[(0.0, 0.0), (1.0, 100.0), (2.0, 300.0)]).unwrap();
    assert_eq!(profile.first_pace(), 100.0);
    assert_eq!(profile.last_pace(), 200.0);
    assert_eq!(profile.pace_at(Distance::new(0.5)), 100.0);
    assert_eq!(profile.pace_at(Distance::new(1.0)), 200.0);
    assert_eq!(profile.elapsed(Distance::new(0.5), Distance::new(1.5)).as_seconds(), 150.0);
}

#[test]
fn profile_extends_outer_paces() {
    let profile = profile(&[(1.0, 100.0), (2.0, 300.0), (3.0, 400.0)]).unwrap();
    assert_eq!(profile.elapsed(Distance::new(0.0), Distance::new(1.0)).as_seconds(), 200.0);
    assert_eq!(profile.elapsed(Distance::new(3.0), Distance::new(5.0)).as_seconds(), 200.0);
}

#[test]
fn profile_skips_dwell() {
    let profile = profile(&[(0.0, 0.0), (1.0, 60.0), (1.0, 120.0), (2.0, 240.0)]).unwrap();
    assert_eq!(profile.pace_at(Distance::new(0.5)), 60.0);
    assert_eq!(profile.pace_at(Distance::new(1.5)), 120.0);
    assert_eq!(profile.elapsed(Distance::new(0.0), Distance::new(2.0)).as_seconds(), 180.0);
}

#[test]
fn profile_sorts_by_distance() {
    let profile = profile(&[(2.0, 200.0), (0.0, 0.0), (1.0, 100.0)]).unwrap();
    assert_eq!(profile.start(), Distance::new(0.0));
    assert_eq!(profile.end(), Distance::new(2.0));
    assert_eq!(profile.first_pace(), 100.0);
}
