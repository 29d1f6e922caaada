use std::sync::LazyLock;

use crate::prelude::*;
use crate::utils::prng::Prng;

pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::new);

/// Fixed seed so every run and every test sees the same key set.
const SEED: u64 = 1070373321345817214;

#[derive(Debug)]
pub struct ZobristKeys {
    /// One key per side, piece kind and square.
    pub pieces: [[[u64; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES],
    /// One key per castling-rights bit pattern.
    pub castling: [u64; NUM_CASTLING_RIGHTS],
    /// One key per en-passant file.
    pub en_passant_file: [u64; NUM_FILES],
    /// Flipped in and out as the side to move changes.
    pub black_to_move: u64,
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = Prng::init(SEED);
        let mut keys = Self {
            pieces: [[[0; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES],
            castling: [0; NUM_CASTLING_RIGHTS],
            en_passant_file: [0; NUM_FILES],
            black_to_move: rng.rand(),
        };

        for side in Side::SIDES {
            for piece in Piece::all_pieces() {
                let per_square = &mut keys.pieces[side.index()][piece.index()];
                for key in per_square.iter_mut() {
                    *key = rng.rand();
                }
            }
        }
        for key in keys.castling.iter_mut() {
            *key = rng.rand();
        }
        for key in keys.en_passant_file.iter_mut() {
            *key = rng.rand();
        }

        keys
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash of the full position state. The board only ever stores an
/// en-passant square a pawn can actually use (FEN parsing and
/// [`Board::make_move`] both enforce this), so two positions that differ
/// only in an unusable double-push square hash the same.
pub fn calculate_hash(board: &Board) -> u64 {
    let mut hash = 0;

    for (piece, side) in Piece::all() {
        for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
            hash ^= ZOBRIST.pieces[side.index()][piece.index()][sq];
        }
    }

    hash ^= ZOBRIST.castling[board.castling_rights.0 as usize];

    if board.enpassant_square.is_some() {
        hash ^= ZOBRIST.en_passant_file[board.enpassant_square.col()];
    }

    if board.stm == Side::Black {
        hash ^= ZOBRIST.black_to_move;
    }

    hash
}
