//! Staged chess move generation over bitboards, with perft tooling to
//! prove it right.

pub mod board;
pub mod moves;
pub mod perft;
pub mod prelude;
pub mod utils;

pub use prelude::*;
pub use utils::log::init;

pub mod consts {
    use crate::prelude::*;

    pub const NUM_SQUARES: usize = 64;
    pub const NUM_FILES: usize = 8;
    pub const NUM_RANKS: usize = 8;
    pub const NUM_SIDES: usize = Side::SIDES.len();
    pub const NUM_PIECES: usize = Piece::PIECES.len();
    pub const NUM_CASTLING_RIGHTS: usize = 16;

    /// Upper bound on legal moves in any reachable position.
    pub const MAX_MOVES: usize = 256;

    pub const FILE_MASKS: [u64; NUM_FILES] = {
        let mut masks = [0u64; NUM_FILES];
        let mut file = 0;
        while file < NUM_FILES {
            masks[file] = 0x0101010101010101 << file;
            file += 1;
        }
        masks
    };

    pub const RANK_MASKS: [u64; NUM_RANKS] = {
        let mut masks = [0u64; NUM_RANKS];
        let mut rank = 0;
        while rank < NUM_RANKS {
            masks[rank] = 0xFF << (8 * rank);
            rank += 1;
        }
        masks
    };

    pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    // Every special move type at once; the standard movegen torture test.
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
}
