use routepace::{
    plan::{self, RoutePlan, Sample},
    route::{self, RoutePath},
    shared::{Distance, Location, Timestamp},
};

fn planar(points: &[(f64, f64)]) -> RoutePath {
    let points = points.iter().copied().map(Location::from).collect();
    RoutePath::with_config(points, route::Config::planar()).unwrap()
}

fn crossing_route() -> RoutePath {
    planar(&[
        (0.0, 0.0),
        (0.0, 2.0),
        (1.0, 2.0),
        (1.0, 1.0),
        (-1.0, 1.0),
        (-1.0, 3.0),
    ])
}

fn timed(longitude: f64, latitude: f64, ts: f64) -> Sample {
    Sample::timed(
        Location::new(longitude, latitude),
        Timestamp::from_seconds(ts),
    )
}

fn untimed(longitude: f64, latitude: f64) -> Sample {
    Sample::untimed(Location::new(longitude, latitude))
}

#[test]
fn empty_samples_rejected() {
    let route = crossing_route();
    let err = RoutePlan::new(&route, &[]).unwrap_err();
    assert_eq!(err, plan::Error::EmptySampleSet);
}

#[test]
fn invalid_sample_rejected() {
    let route = crossing_route();
    let err = RoutePlan::new(&route, &[untimed(0.0, 0.0), untimed(0.0, 95.0)]).unwrap_err();
    assert_eq!(
        err,
        plan::Error::InvalidGeometry(route::Error::OutOfBounds {
            index: 1,
            location: Location::new(0.0, 95.0),
        })
    );
}

#[test]
fn non_finite_timestamp_rejected() {
    let route = planar(&[(0.0, 0.0), (0.0, 2.0)]);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = RoutePlan::new(
            &route,
            &[timed(0.0, 0.0, 0.0), timed(0.0, 1.0, bad), timed(0.0, 2.0, 200.0)],
        )
        .unwrap_err();
        assert_eq!(err, plan::Error::NonFiniteTimestamp { index: 1 });
    }
}

#[test]
fn anchors_keep_input_order() {
    let route = crossing_route();
    let samples = [
        timed(0.0, 0.5, 10.0),
        untimed(0.0, 1.5),
        timed(1.0, 1.5, 30.0),
        untimed(0.5, 1.0),
        timed(-1.0, 2.0, 60.0),
    ];
    let plan = RoutePlan::new(&route, &samples).unwrap();
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.anchor_count(), 3);
    let indexes: Vec<usize> = plan.anchors().map(|point| point.index).collect();
    assert_eq!(indexes, vec![0, 2, 4]);
    let timestamps: Vec<f64> = plan
        .anchors()
        .filter_map(|point| point.timestamp)
        .map(|ts| ts.as_seconds())
        .collect();
    assert_eq!(timestamps, vec![10.0, 30.0, 60.0]);
}

#[test]
fn overlap_resolves_in_travel_order() {
    let route = crossing_route();
    let samples = [
        untimed(0.0, 0.5),
        untimed(0.0, 1.0),
        untimed(1.0, 1.5),
        untimed(0.0, 1.0),
        untimed(-1.0, 2.0),
    ];
    let plan = RoutePlan::new(&route, &samples).unwrap();
    let distances: Vec<Distance> = plan.points().iter().map(|point| point.distance).collect();
    assert_eq!(
        distances,
        vec![
            Distance::new(0.5),
            Distance::new(1.0),
            Distance::new(3.5),
            Distance::new(5.0),
            Distance::new(7.0),
        ]
    );
    let segments: Vec<usize> = plan.points().iter().map(|point| point.segment).collect();
    assert_eq!(segments, vec![0, 0, 2, 3, 4]);
}

#[test]
fn backward_motion_is_kept() {
    let route = planar(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    let plan = RoutePlan::new(&route, &[untimed(0.0, 1.5), untimed(0.0, 0.5)]).unwrap();
    assert_eq!(plan.points()[0].distance, Distance::new(1.5));
    assert_eq!(plan.points()[1].distance, Distance::new(0.5));
}

#[test]
fn projected_points_stay_on_route() {
    let route = planar(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    let plan = RoutePlan::new(
        &route,
        &[untimed(0.3, -4.0), untimed(-0.2, 1.0), untimed(0.0, 9.0)],
    )
    .unwrap();
    for point in plan.points() {
        assert!(point.distance >= Distance::ZERO);
        assert!(point.distance <= route.total_length());
    }
    assert_eq!(plan.points()[1].offset, Distance::new(0.2));
    assert!(std::ptr::eq(plan.route(), &route));
}

#[test]
fn sample_from_tuple() {
    let sample = Sample::from((12.5, 55.1, Some(1_700_000_000.0)));
    assert_eq!(sample.location, Location::new(12.5, 55.1));
    assert_eq!(
        sample.timestamp,
        Some(Timestamp::from_seconds(1_700_000_000.0))
    );
    assert!(Sample::from((12.5, 55.1, None)).timestamp.is_none());
}
