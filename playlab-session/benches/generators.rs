use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pprof::criterion::{Output, PProfProfiler};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use playlab_core::RngSource;
use playlab_session::{Game, SessionMachine};
use playlab_session::games::{
    ColorPerception, ColorPerceptionParams, Press, ReactionParams, ReactionTest, ShapeRecognition,
    ShapeRecognitionParams, VerbalMemory, VerbalMemoryParams, VisualMemory, VisualMemoryParams,
};
use playlab_timing::ManualClock;

/// Stimulus generation at a few levels, where grid sizes and cell counts differ.
pub fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_stimulus");
    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    for level in [1u32, 10, 40] {
        group.bench_with_input(BenchmarkId::new("visual_memory", level), &level, |b, &level| {
            let mut game = VisualMemory::new(VisualMemoryParams::default());
            let mut rng = RngSource(StdRng::seed_from_u64(7));
            b.iter(|| black_box(game.generate_stimulus(black_box(level), &mut rng)));
        });
        group.bench_with_input(BenchmarkId::new("color_perception", level), &level, |b, &level| {
            let mut game = ColorPerception::new(ColorPerceptionParams::default());
            let mut rng = RngSource(StdRng::seed_from_u64(7));
            b.iter(|| black_box(game.generate_stimulus(black_box(level), &mut rng)));
        });
        group.bench_with_input(BenchmarkId::new("shape_recognition", level), &level, |b, &level| {
            let mut game = ShapeRecognition::new(ShapeRecognitionParams::default());
            let mut rng = RngSource(StdRng::seed_from_u64(7));
            b.iter(|| black_box(game.generate_stimulus(black_box(level), &mut rng)));
        });
    }

    // fresh pool per batch; draws drain it
    group.bench_function("verbal_memory_pool", |b| {
        b.iter_batched(
            || {
                (
                    VerbalMemory::new(VerbalMemoryParams::default()),
                    RngSource(StdRng::seed_from_u64(7)),
                )
            },
            |(mut game, mut rng)| {
                for _ in 0..32 {
                    black_box(game.generate_stimulus(1, &mut rng));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// One full reaction trial driven through the state machine.
pub fn bench_reaction_trial(c: &mut Criterion) {
    c.bench_function("reaction_trial_cycle", |b| {
        b.iter_batched(
            || {
                let clock = ManualClock::new();
                let m = SessionMachine::new(
                    ReactionTest::visual(ReactionParams::default()),
                    clock.clone(),
                    RngSource(StdRng::seed_from_u64(1)),
                );
                (m, clock)
            },
            |(mut m, clock)| {
                let _ = m.start();
                clock.advance(Duration::from_secs(5));
                black_box(m.update());
                black_box(m.respond(Press));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
        .confidence_level(0.95)
        .noise_threshold(0.02);
    targets = bench_generate, bench_reaction_trial
}

criterion_main!(benches);
