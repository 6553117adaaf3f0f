use criterion::{Criterion, criterion_group, criterion_main};
use routepace::prelude::*;
use std::{hint::black_box, time::Duration as StdDuration};

const VERTICES: usize = 2_000;

// A gently winding shape heading north-east from central Stockholm.
fn shape() -> Vec<Location> {
    (0..VERTICES)
        .map(|i| {
            let step = i as f64;
            Location::new(
                18.0 + step * 0.000_2 + (step * 0.05).sin() * 0.000_05,
                59.3 + step * 0.000_1,
            )
        })
        .collect()
}

fn schedule(route: &RoutePath) -> Vec<Sample> {
    route
        .vertices()
        .iter()
        .step_by(20)
        .enumerate()
        .map(|(i, location)| Sample::timed(*location, Timestamp::from_seconds(i as f64 * 45.0)))
        .collect()
}

fn trip(route: &RoutePath) -> Vec<Sample> {
    route
        .vertices()
        .iter()
        .step_by(10)
        .enumerate()
        .map(|(i, location)| {
            let offset = Location::new(location.longitude + 0.000_01, location.latitude);
            if i % 7 == 0 {
                Sample::timed(offset, Timestamp::from_seconds(i as f64 * 25.0))
            } else {
                Sample::untimed(offset)
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let route = RoutePath::new(shape()).expect("Failed to build route");
    let schedule_samples = schedule(&route);
    let trip_samples = trip(&route);
    let schedule = RoutePlan::new(&route, &schedule_samples).expect("Failed to build schedule");
    let trip = RoutePlan::new(&route, &trip_samples).expect("Failed to build trip");
    let predictor = TimestampPredictor::new(&schedule, &trip).expect("Failed to build predictor");
    let targets: Vec<Distance> = (0..10_000)
        .map(|i| route.total_length() * (i as f64 / 10_000.0))
        .collect();

    let mut group = c.benchmark_group("Prediction");
    group.measurement_time(StdDuration::from_secs(10));

    group.bench_function("Project trip", |b| {
        b.iter(|| black_box(RoutePlan::new(&route, &trip_samples)))
    });

    group.bench_function("Predict schedule", |b| {
        b.iter(|| black_box(predictor.predict_schedule()))
    });

    group.bench_function("Predict batch", |b| {
        b.iter(|| black_box(predictor.predict_batch(&targets)))
    });

    group.bench_function("Predict batch parallel", |b| {
        b.iter(|| black_box(predictor.par_predict_batch(&targets)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
