//! Benchmarks for extrapolator hot paths

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reckon_extrapolate::{Extrapolator, ScalarExtrapolator};
use reckon_test::{LinkProfile, ScenarioConfig, SimulatedLink, TrackingScenario, Trajectory};

fn bench_add_sample(c: &mut Criterion) {
    let mut ex = Extrapolator::<f64>::new(3);
    ex.reset(0.0, 0.0, &[0.0, 0.0, 0.0]);

    c.bench_function("extrapolator_add_sample", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let t = i as f64 * 0.05;
            black_box(ex.add_sample(black_box(t), black_box(t + 0.08), &[t, -t, 0.5 * t]))
        })
    });
}

fn bench_add_sample_with_velocity(c: &mut Criterion) {
    let mut ex = Extrapolator::<f64>::new(3);
    ex.reset(0.0, 0.0, &[0.0, 0.0, 0.0]);

    c.bench_function("extrapolator_add_sample_with_velocity", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let t = i as f64 * 0.05;
            black_box(ex.add_sample_with_velocity(
                black_box(t),
                black_box(t + 0.08),
                &[t, -t, 0.5 * t],
                &[1.0, -1.0, 0.5],
            ))
        })
    });
}

fn bench_read_position(c: &mut Criterion) {
    let mut ex = Extrapolator::<f64>::new(3);
    ex.reset(0.0, 0.0, &[0.0, 0.0, 0.0]);
    for i in 1..20 {
        let t = i as f64 * 0.05;
        ex.add_sample(t, t + 0.08, &[t, -t, 0.5 * t]);
    }
    let at = ex.snapshot_time() + 0.01;
    let mut out = [0.0; 3];

    c.bench_function("extrapolator_read_position", |b| {
        b.iter(|| black_box(ex.read_position(black_box(at), &mut out)))
    });
}

fn bench_scalar_read(c: &mut Criterion) {
    let mut ex = ScalarExtrapolator::<f32>::new();
    ex.reset(0.0, 0.0, 0.0);
    for i in 1..20 {
        let t = i as f64 * 0.05;
        ex.add_sample(t, t + 0.08, t as f32);
    }
    let at = ex.inner().snapshot_time() + 0.01;

    c.bench_function("scalar_extrapolator_read", |b| {
        b.iter(|| black_box(ex.read(black_box(at))))
    });
}

fn bench_tracking_scenario(c: &mut Criterion) {
    let config = ScenarioConfig {
        duration: 2.0,
        ..ScenarioConfig::default()
    };
    let scenario = TrackingScenario::new(
        config,
        Trajectory::Circle {
            center: [0.0, 0.0],
            radius: 5.0,
            angular_speed: 1.0,
        },
    );

    c.bench_function("tracking_scenario_poor_link", |b| {
        b.iter(|| {
            let mut link = SimulatedLink::new(LinkProfile::poor(), 42);
            black_box(scenario.run(&mut link))
        })
    });
}

criterion_group!(
    benches,
    bench_add_sample,
    bench_add_sample_with_velocity,
    bench_read_position,
    bench_scalar_read,
    bench_tracking_scenario,
);
criterion_main!(benches);
