use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use coup::moves::move_gen::{self, GenType};
use coup::prelude::*;

// White is in check here, so evasions is the live stage.
const CHECK_FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

/// Every staged category on the same middlegame position, measured
/// through the dispatcher.
fn bench_staged_generation(c: &mut Criterion) {
    let board = Board::from_fen(KIWIPETE);
    let mut group = c.benchmark_group("staged_generation");

    for (label, gen_type) in [
        ("captures", GenType::Captures),
        ("quiets", GenType::Quiets),
        ("quiet_checks", GenType::QuietChecks),
        ("non_evasions", GenType::NonEvasions),
        ("legal", GenType::Legal),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| black_box(move_gen::generate(black_box(&board), gen_type)));
        });
    }

    group.finish();
}

fn bench_evasions(c: &mut Criterion) {
    let board = Board::from_fen(CHECK_FEN);

    c.bench_function("generate_evasions", |b| {
        b.iter(|| black_box(move_gen::generate(black_box(&board), GenType::Evasions)));
    });
}

fn bench_check_info(c: &mut Criterion) {
    let board = Board::from_fen(KIWIPETE);

    c.bench_function("check_info_new", |b| {
        b.iter(|| black_box(CheckInfo::new(black_box(&board))));
    });
}

fn bench_make_unmake_cycle(c: &mut Criterion) {
    let mut board = Board::new();
    let m = Move::new(Square::from_index(12), Square::from_index(28));

    c.bench_function("make_unmake_cycle", |b| {
        b.iter(|| {
            let info = board.make_move(m).unwrap();
            board.unmake_move(&info).unwrap();
            black_box(&board);
        });
    });
}

/// Full tree walk; measures generation and make/unmake together.
fn bench_perft(c: &mut Criterion) {
    let mut startpos = Board::new();
    let mut kiwipete = Board::from_fen(KIWIPETE);

    c.bench_function("perft_startpos_3", |b| {
        b.iter(|| black_box(perft::perft(&mut startpos, 3, false).nodes));
    });

    c.bench_function("perft_kiwipete_2", |b| {
        b.iter(|| black_box(perft::perft(&mut kiwipete, 2, false).nodes));
    });
}

criterion_group!(
    benches,
    bench_staged_generation,
    bench_evasions,
    bench_check_info,
    bench_make_unmake_cycle,
    bench_perft
);
criterion_main!(benches);
