pub use std::fmt::Display;
pub use std::str::FromStr;

pub use miette::{self, Context, IntoDiagnostic, Result};
pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};

pub use crate::board::{
    self, Board, fen,
    components::{
        BitBoard, BitBoardIterator, BoardState, CastlingRights, Piece, PieceInfo, Side, Square,
    },
    moves::MoveInfo,
    zobrist::ZOBRIST,
};
pub use crate::consts::*;
pub use crate::moves::{
    self, Direction, move_gen,
    check_info::CheckInfo,
    move_buffer::MoveBuffer,
    move_info::{Move, MoveKind},
    precomputed::MOVE_TABLES,
};
pub use crate::perft::{self, PerftResult};
pub use crate::utils::{self, cli::*, log::*, prng::*};
