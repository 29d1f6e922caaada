use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use coup::board::zobrist::{ZobristKeys, calculate_hash};
use coup::prelude::*;

// Both back ranks plus both pawn ranks, the densest board the game ever has.
const START_OCCUPANCY: BitBoard = BitBoard(0xFFFF00000000FFFF);

fn bench_bitboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitboard");

    group.bench_function("try_pop_lsb_drain", |b| {
        b.iter_batched(
            || START_OCCUPANCY,
            |mut bb| {
                while let Some(bit) = bb.try_pop_lsb() {
                    black_box(bit);
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("iter_bits_sum", |b| {
        b.iter(|| black_box(START_OCCUPANCY).iter_bits().sum::<usize>())
    });

    group.bench_function("pop_count", |b| {
        b.iter(|| black_box(START_OCCUPANCY).pop_count())
    });

    group.finish();
}

// The sliding lookups walk blocker-cut rays, so they are the ones worth
// watching; the leaper lookups are plain array reads.
fn bench_attack_tables(c: &mut Criterion) {
    let occupied = Board::from_fen(KIWIPETE).occupied();
    let mut group = c.benchmark_group("attack_tables");

    group.bench_function("knight_lookup", |b| {
        b.iter(|| black_box(MOVE_TABLES.knight_moves[black_box(28)]))
    });

    group.bench_function("rook_attacks_occupied", |b| {
        b.iter(|| black_box(MOVE_TABLES.get_rook_attacks(black_box(28), black_box(occupied))))
    });

    group.bench_function("bishop_attacks_occupied", |b| {
        b.iter(|| black_box(MOVE_TABLES.get_bishop_attacks(black_box(28), black_box(occupied))))
    });

    group.bench_function("between_bb", |b| {
        b.iter(|| black_box(MOVE_TABLES.between_bb(black_box(4), black_box(60))))
    });

    group.bench_function("aligned", |b| {
        b.iter(|| black_box(MOVE_TABLES.aligned(black_box(4), black_box(28), black_box(60))))
    });

    group.finish();
}

fn bench_hashing(c: &mut Criterion) {
    let board = Board::from_fen(KIWIPETE);
    let mut group = c.benchmark_group("hashing");

    group.bench_function("full_board_hash", |b| {
        b.iter(|| black_box(calculate_hash(black_box(&board))))
    });

    group.bench_function("key_table_init", |b| {
        b.iter_batched(
            || (),
            |_| black_box(ZobristKeys::new()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_bitboard, bench_attack_tables, bench_hashing);
criterion_main!(benches);
