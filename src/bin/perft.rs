use std::env;

use coup::board::Board;
use coup::perft::{perft_divide, run_perft_suite};

/// Bare-args perft runner, handy under a profiler or in scripts where
/// clap parsing is just noise: `perft <depth> [fen]`.
fn main() {
    coup::init();

    let mut args = env::args().skip(1);

    let Some(raw_depth) = args.next() else {
        println!("Usage: perft <depth> [fen]");
        println!("    depth: depth to walk; 0 runs a depth table to 5 instead");
        println!("    fen: (optional) FEN string for the position");
        return;
    };
    let Ok(depth) = raw_depth.parse::<u8>() else {
        println!("Invalid depth: {raw_depth}");
        return;
    };

    let mut board = match args.next() {
        Some(fen) => Board::from_fen(&fen),
        None => Board::new(),
    };

    if depth == 0 {
        run_perft_suite(&mut board, 5);
    } else {
        perft_divide(&mut board, depth);
    }
}
