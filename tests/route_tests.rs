use routepace::{
    route::{self, RoutePath},
    shared::{Distance, Location},
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn planar(points: &[(f64, f64)]) -> RoutePath {
    let points = points.iter().copied().map(Location::from).collect();
    RoutePath::with_config(points, route::Config::planar()).unwrap()
}

// Crosses itself at (0, 1): segment 0 runs north through it, segment 3 runs
// west through it.
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

#[test]
fn too_few_points() {
    let err = RoutePath::new(vec![Location::new(0.0, 0.0)]).unwrap_err();
    assert_eq!(err, route::Error::TooFewPoints { found: 1 });
    let err = RoutePath::new(vec![]).unwrap_err();
    assert_eq!(err, route::Error::TooFewPoints { found: 0 });
}

#[test]
fn degenerate_segment_rejected() {
    let points = vec![
        Location::new(10.0, 50.0),
        Location::new(10.1, 50.0),
        Location::new(10.1, 50.0),
    ];
    let err = RoutePath::new(points.clone()).unwrap_err();
    assert_eq!(err, route::Error::DegenerateSegment { index: 1 });

    let config = route::Config {
        allow_duplicate_vertices: true,
        ..Default::default()
    };
    let route = RoutePath::with_config(points, config).unwrap();
    let cumulative = route.cumulative_distances();
    assert_eq!(cumulative[1], cumulative[2]);
}

#[test]
fn out_of_bounds_rejected() {
    let err = RoutePath::new(vec![Location::new(0.0, 0.0), Location::new(181.0, 0.0)]).unwrap_err();
    assert_eq!(
        err,
        route::Error::OutOfBounds {
            index: 1,
            location: Location::new(181.0, 0.0)
        }
    );

    let err = RoutePath::new(vec![Location::new(f64::NAN, 0.0), Location::new(1.0, 0.0)])
        .unwrap_err();
    assert_eq!(err, route::Error::NonFinite { index: 0 });
}

#[test]
fn total_length_matches_last_vertex() {
    let route = crossing_route();
    let cumulative = route.cumulative_distances();
    assert_eq!(cumulative.len(), route.vertices().len());
    assert_eq!(cumulative[0], Distance::ZERO);
    assert_eq!(*cumulative.last().unwrap(), route.total_length());
    assert_eq!(route.total_length(), Distance::new(8.0));
    assert!(cumulative.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn haversine_length_along_equator() {
    let route = RoutePath::new(vec![
        Location::new(0.0, 0.0),
        Location::new(1.0, 0.0),
        Location::new(2.0, 0.0),
    ])
    .unwrap();
    // One degree of longitude on the equator is about 111.2 km.
    assert!((route.total_length().as_kilometers() - 222.39).abs() < 0.1);
}

#[test]
fn projecting_vertices_is_idempotent() {
    let routes = [
        crossing_route(),
        RoutePath::new(vec![
            Location::new(10.0, 50.0),
            Location::new(10.01, 50.01),
            Location::new(10.02, 50.0),
            Location::new(10.05, 50.02),
        ])
        .unwrap(),
    ];
    for route in routes {
        let mut hint = None;
        for (k, vertex) in route.vertices().iter().enumerate() {
            let projection = route.project(vertex, hint);
            assert_eq!(projection.distance, route.cumulative_distances()[k]);
            assert_eq!(projection.offset, Distance::ZERO);
            hint = Some(projection.segment);
        }
    }
}

#[test]
fn project_reports_offset() {
    let route = planar(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    let projection = route.project(&Location::new(0.5, 1.5), None);
    assert_eq!(projection.segment, 1);
    assert_eq!(projection.distance, Distance::new(1.5));
    assert_eq!(projection.offset, Distance::new(0.5));
    assert_eq!(projection.location, Location::new(0.0, 1.5));
}

#[test]
fn project_clamps_to_route_ends() {
    let route = planar(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    let before = route.project(&Location::new(0.0, -1.0), None);
    let after = route.project(&Location::new(0.0, 5.0), None);
    assert_eq!(before.distance, Distance::ZERO);
    assert_eq!(after.distance, route.total_length());
    assert_eq!(after.offset, Distance::new(3.0));
}

#[test]
fn crossing_without_hint_picks_earliest_segment() {
    let route = crossing_route();
    let projection = route.project(&Location::new(0.0, 1.0), None);
    assert_eq!(projection.segment, 0);
    assert_eq!(projection.distance, Distance::new(1.0));
}

#[test]
fn crossing_follows_hint() {
    let route = crossing_route();
    let crossing = Location::new(0.0, 1.0);

    let later = route.project(&crossing, Some(2));
    assert_eq!(later.segment, 3);
    assert_eq!(later.distance, Distance::new(5.0));
    assert_eq!(later.offset, Distance::ZERO);

    let earlier = route.project(&crossing, Some(1));
    assert_eq!(earlier.segment, 0);
    assert_eq!(earlier.distance, Distance::new(1.0));
}

#[test]
fn equidistant_point_follows_hint() {
    let route = crossing_route();
    let location = Location::new(0.2, 1.2);

    let first = route.project(&location, Some(0));
    assert_eq!(first.segment, 0);
    assert_close(first.distance.get(), 1.2);

    let second = route.project(&location, Some(3));
    assert_eq!(second.segment, 3);
    assert_close(second.distance.get(), 4.8);
    assert_close(first.offset.get(), second.offset.get());
}

#[test]
fn ties_ranked_by_segment_index_not_distance() {
    // Crosses itself at (0, 1) on segments 0 and 3, with long segments in
    // between so segment 3 reaches the crossing far along the route.
    let route = planar(&[
        (0.0, 0.0),
        (0.0, 2.0),
        (20.0, 2.0),
        (40.0, 1.0),
        (-1.0, 1.0),
    ]);
    let projection = route.project(&Location::new(0.0, 1.0), Some(2));
    assert_eq!(projection.segment, 3);
    assert_close(projection.distance.get(), 62.0 + 401f64.sqrt());
}

#[test]
fn strictly_closer_segment_beats_hint() {
    let route = crossing_route();
    let projection = route.project(&Location::new(0.0, 0.5), Some(4));
    assert_eq!(projection.segment, 0);
    assert_eq!(projection.distance, Distance::new(0.5));
}

#[test]
fn location_at_distance() {
    let route = crossing_route();
    assert_eq!(route.location_at(Distance::new(0.0)), Location::new(0.0, 0.0));
    assert_eq!(route.location_at(Distance::new(2.5)), Location::new(0.5, 2.0));
    assert_eq!(route.location_at(Distance::new(5.0)), Location::new(0.0, 1.0));
    assert_eq!(route.location_at(Distance::new(8.0)), Location::new(-1.0, 3.0));
    assert_eq!(route.location_at(Distance::new(99.0)), Location::new(-1.0, 3.0));
}
