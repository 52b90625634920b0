use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rewind_snapshot::{
    ComponentSnapshot, FrameContext, ParticleSystemSnapshot, ParticleSystemTarget, SnapshotConfig,
};
use rewind_test_fixtures::{particle_systems, MockParticleSystem};

/// Full fountain, then the same system 0.1s later.
fn make_pair() -> (ParticleSystemSnapshot, ParticleSystemSnapshot, MockParticleSystem) {
    let cfg = SnapshotConfig::default();
    let mut sys = particle_systems::system("fountain").expect("fountain fixture");
    sys.playing = true;
    sys.time = 0.5;
    let count = sys.def.max_particles;
    for i in 0..count {
        sys.spawn(i as f32, i as f32 / count as f32 * 0.9);
    }
    let left = ParticleSystemSnapshot::capture(&mut sys, &cfg);
    sys.simulate(0.1);
    let right = ParticleSystemSnapshot::capture(&mut sys, &cfg);
    (left, right, sys)
}

fn bench_particle_interpolate(c: &mut Criterion) {
    let cfg = SnapshotConfig::default();
    let (left, right, mut target) = make_pair();
    let frame = FrameContext::from_stamps(0.5, 0.6, 0.55);

    c.bench_function("particle_interpolate", |b| {
        b.iter(|| {
            left.interpolate(
                black_box(&right),
                black_box(frame.factor()),
                &frame,
                &mut target,
                &cfg,
            )
            .expect("interpolate");
        });
    });
}

criterion_group!(benches, bench_particle_interpolate);
criterion_main!(benches);
