//! Search benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full genmove with varying playout counts
//! - Single playouts from an empty position
//! - Expansion and tree-dump costs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{Board, Player};
use games_go::{Goban, UniformSampler};
use mcts::{Search, SearchConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_config() -> SearchConfig {
    SearchConfig::default()
        .with_mature_threshold(2.0)
        .with_max_nodes(100_000)
}

fn bench_genmove_playouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("genmove_playouts");

    for playouts in [50, 200, 800] {
        group.throughput(Throughput::Elements(playouts as u64));
        group.bench_with_input(
            BenchmarkId::new("9x9", playouts),
            &playouts,
            |b, &playouts| {
                let config = bench_config().with_playouts(playouts);
                b.iter(|| {
                    let mut board = Goban::new(9);
                    let mut search =
                        Search::new(config.clone(), UniformSampler::new(), Goban::new(9));
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    black_box(search.genmove(&mut board, Player::Black, &mut rng))
                });
            },
        );
    }

    group.finish();
}

fn bench_single_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("playout");

    for size in [9usize, 13] {
        group.bench_with_input(BenchmarkId::new("empty", size), &size, |b, &size| {
            let board = Goban::new(size);
            let mut search = Search::new(
                bench_config(),
                UniformSampler::new(),
                Goban::new(size),
            );
            search.sync_root(&board);
            let mut rng = ChaCha20Rng::seed_from_u64(42);

            b.iter(|| black_box(search.playout(&board, &mut rng)));
        });
    }

    group.finish();
}

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_ops");

    // Root sync on a position a few moves in
    group.bench_function("sync_root", |b| {
        let mut board = Goban::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search = Search::new(
            bench_config().with_playouts(100),
            UniformSampler::new(),
            Goban::new(9),
        );
        for _ in 0..6 {
            let player = board.act_player();
            search.genmove(&mut board, player, &mut rng);
        }

        b.iter(|| {
            search.sync_root(&board);
            black_box(search.tree().in_use())
        });
    });

    // Rendering the analysis dump
    group.bench_function("show_tree", |b| {
        let board = Goban::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search = Search::new(
            bench_config().with_playouts(400),
            UniformSampler::new(),
            Goban::new(9),
        );
        search.sync_root(&board);
        for _ in 0..400 {
            search.playout(&board, &mut rng);
        }

        b.iter(|| black_box(search.show_tree(1.0, 4)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_genmove_playouts,
    bench_single_playout,
    bench_tree_operations,
);

criterion_main!(benches);
