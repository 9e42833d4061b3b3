use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spooknloot_system_level::{DecorConfig, LevelConfig, LevelGenerator};
use spooknloot_system_navigation::{Navigator, NavigatorConfig};

fn bench_flow_field(c: &mut Criterion) {
    let generator = LevelGenerator::new(LevelConfig::default(), DecorConfig::default());
    let level = generator.generate_seeded(42);
    let target = level.tile_center(level.spawn_tile());
    let probe = level.tile_center(level.exit_tile());

    let mut navigator = Navigator::new(NavigatorConfig::default());
    navigator.set_obstacles(level.colliders().to_vec());

    c.bench_function("rebuild_40x25", |b| {
        b.iter(|| navigator.rebuild(black_box(target)));
    });

    c.bench_function("sample_exit", |b| {
        b.iter(|| navigator.sample(black_box(probe)));
    });
}

fn bench_generation(c: &mut Criterion) {
    let generator = LevelGenerator::new(LevelConfig::default(), DecorConfig::default());
    c.bench_function("generate_level", |b| {
        b.iter(|| generator.generate_seeded(black_box(7)));
    });
}

criterion_group!(benches, bench_flow_field, bench_generation);
criterion_main!(benches);
