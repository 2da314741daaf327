//! Benchmarks for the sliding-jigsaw engine.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use jigslide::cluster::build_cluster;
use jigslide::resolver::move_cluster;
use jigslide::session::snapshot_coords;
use jigslide::{Board, Coordinate};

const BENCH_DIM: usize = 50;

fn solved_board() -> Board {
    Board::new(BENCH_DIM, BENCH_DIM)
}

fn shuffled_board() -> Board {
    let mut board = solved_board();
    let mut rng = SmallRng::seed_from_u64(0xBE7C);
    board.shuffle(&mut rng);
    board
}

/// Worst-case cluster build: the whole solved board from a center seed.
fn bench_cluster_build(c: &mut Criterion) {
    let board = solved_board();
    let seed = board.piece_at(Coordinate::new(25, 25)).unwrap();

    c.bench_function("cluster_build_full_board", |b| {
        b.iter(|| build_cluster(black_box(&board), black_box(seed)))
    });
}

/// Single-piece drag with one displaced occupant on a shuffled board.
fn bench_move_single_piece(c: &mut Criterion) {
    let board = shuffled_board();

    c.bench_function("move_single_piece", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| {
                let seed = board.piece_at(Coordinate::new(0, 0)).unwrap();
                let cluster = vec![seed];
                let coords = snapshot_coords(&board, &cluster);
                let _ = move_cluster(
                    &mut board,
                    &cluster,
                    &coords,
                    seed,
                    Coordinate::new(25, 25),
                );
                board
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_completion_scan(c: &mut Criterion) {
    let board = solved_board();

    c.bench_function("completion_scan", |b| {
        b.iter(|| black_box(&board).is_complete())
    });
}

fn bench_joined_masks(c: &mut Criterion) {
    let board = shuffled_board();

    c.bench_function("joined_masks_full_board", |b| {
        b.iter(|| black_box(&board).joined_masks())
    });
}

fn bench_shuffle(c: &mut Criterion) {
    c.bench_function("shuffle", |b| {
        b.iter_batched(
            || (solved_board(), SmallRng::seed_from_u64(1)),
            |(mut board, mut rng)| {
                board.shuffle(&mut rng);
                board
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_cluster_build,
    bench_move_single_piece,
    bench_completion_scan,
    bench_joined_masks,
    bench_shuffle
);
criterion_main!(benches);
