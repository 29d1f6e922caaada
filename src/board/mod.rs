pub mod components;
pub mod fen;
pub mod moves;
pub mod zobrist;


use std::fmt::Display;

use crate::moves::check_info::CheckInfo;
use crate::moves::move_gen;
use crate::prelude::*;

/// Full game position: piece placement plus every rule-state field the
/// move generator queries. Castling bookkeeping is per right
/// (see [`CastlingRights::right_index`]) and works for any rook file, so
/// Chess960 positions need no special casing beyond the flag.
///
/// The board is a plain value. Generation never mutates it;
/// [`Board::make_move`] and [`Board::unmake_move`] (see
/// [`moves::MoveInfo`]) are for callers that walk the game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub positions: BoardState,
    pub stm: Side,
    pub castling_rights: CastlingRights,
    /// En-passant target square, [`Square::NONE`] when no capture is live.
    pub enpassant_square: Square,
    pub halfmove_clock: u8,
    pub fullmove_counter: u16,
    /// Castling rook files are free; king lands on the classical squares.
    pub chess960: bool,
    /// Rook origin per castling right.
    castling_rooks: [Square; 4],
    /// Squares that must be empty per right, origins excluded.
    castling_paths: [BitBoard; 4],
    /// Rights forfeited when a move touches the square.
    castling_masks: [u8; 64],
}

/// Mirrors a white square index to the given side's half of the board.
pub(crate) const fn relative_square(side: Side, white_square: usize) -> usize {
    match side {
        Side::White => white_square,
        Side::Black => white_square ^ 56,
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_fen(crate::consts::START_FEN)
    }

    /// Board with no pieces and no rights. FEN parsing fills it in.
    pub(crate) fn empty() -> Self {
        Self {
            positions: BoardState::default(),
            stm: Side::White,
            castling_rights: CastlingRights::empty(),
            enpassant_square: Square::NONE,
            halfmove_clock: 0,
            fullmove_counter: 1,
            chess960: false,
            castling_rooks: [Square::NONE; 4],
            castling_paths: [BitBoard(0); 4],
            castling_masks: [0; 64],
        }
    }

    /// Builds a board from a FEN string.
    ///
    /// # Panics
    /// Panics on malformed input; positions are the caller's contract.
    /// Use [`fen::parse_fen`] to handle untrusted strings.
    pub fn from_fen(fen: &str) -> Self {
        match fen::parse_fen(fen) {
            Ok(board) => board,
            Err(report) => panic!("invalid FEN '{fen}': {report:?}"),
        }
    }

    pub fn to_fen(&self) -> String {
        let castling = if self.castling_rights.is_empty() {
            "-".to_string()
        } else if self.chess960 {
            self.shredder_castling_field()
        } else {
            format!("{}", self.castling_rights)
        };
        format!(
            "{} {} {} {} {} {}",
            self.positions.to_fen_pieces(),
            if self.stm == Side::White { 'w' } else { 'b' },
            castling,
            format!("{}", self.enpassant_square).to_lowercase(),
            self.halfmove_clock,
            self.fullmove_counter,
        )
    }

    /// Castling field with rook files spelled out, as Shredder-FEN does.
    fn shredder_castling_field(&self) -> String {
        let mut field = String::new();
        for side in Side::SIDES {
            for kingside in [true, false] {
                if self.castling_rights.can_castle(side, kingside) {
                    let rook = self.castling_rooks[CastlingRights::right_index(side, kingside)];
                    let file = (rook.col() as u8 + b'a') as char;
                    field.push(match side {
                        Side::White => file.to_ascii_uppercase(),
                        Side::Black => file,
                    });
                }
            }
        }
        field
    }

    #[inline(always)]
    pub fn occupied(&self) -> BitBoard {
        self.positions.get_occupied_bb()
    }

    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        self.positions.get_piece_at(&square)
    }

    pub fn king_square(&self, side: Side) -> Square {
        let kings = self.positions.get_piece_bb(side, Piece::King);
        debug_assert!(kings.any(), "no {side} king on the board");
        Square::from_index(kings.0.trailing_zeros() as usize)
    }

    /// Every piece of either color attacking `square` under the given
    /// occupancy. Sliders see through nothing; pass a doctored occupancy
    /// to ask x-ray questions.
    pub fn attackers_to(&self, square: usize, occupied: BitBoard) -> BitBoard {
        let white_pawns = *self.positions.get_piece_bb(Side::White, Piece::Pawn);
        let black_pawns = *self.positions.get_piece_bb(Side::Black, Piece::Pawn);
        let knights = *self.positions.get_piece_bb(Side::White, Piece::Knight)
            | *self.positions.get_piece_bb(Side::Black, Piece::Knight);
        let kings = *self.positions.get_piece_bb(Side::White, Piece::King)
            | *self.positions.get_piece_bb(Side::Black, Piece::King);
        let ortho = self.positions.get_ortho_sliders_bb(Side::White)
            | self.positions.get_ortho_sliders_bb(Side::Black);
        let diag = self.positions.get_diag_sliders_bb(Side::White)
            | self.positions.get_diag_sliders_bb(Side::Black);

        (MOVE_TABLES.get_pawn_attacks(square, Side::Black) & white_pawns)
            | (MOVE_TABLES.get_pawn_attacks(square, Side::White) & black_pawns)
            | (MOVE_TABLES.knight_moves[square] & knights)
            | (MOVE_TABLES.get_rook_attacks(square, occupied) & ortho)
            | (MOVE_TABLES.get_bishop_attacks(square, occupied) & diag)
            | (MOVE_TABLES.king_moves[square] & kings)
    }

    pub fn is_square_attacked(&self, square: usize, by: Side) -> bool {
        (self.attackers_to(square, self.occupied()) & *self.positions.get_side_bb(by)).any()
    }

    /// Opponent pieces currently giving check to the side to move.
    pub fn checkers(&self) -> BitBoard {
        let ksq = self.king_square(self.stm);
        self.attackers_to(ksq.index(), self.occupied())
            & *self.positions.get_side_bb(self.stm.flip())
    }

    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.checkers().any()
    }

    /// Pieces of `piece_color` that are the sole blocker between an enemy
    /// slider of `king_color` and `king_color`'s king.
    fn check_blockers(&self, piece_color: Side, king_color: Side) -> BitBoard {
        let ksq = self.king_square(king_color).index();
        let them = king_color.flip();
        let snipers = (MOVE_TABLES.get_rook_rays(ksq) & self.positions.get_ortho_sliders_bb(them))
            | (MOVE_TABLES.get_bishop_rays(ksq) & self.positions.get_diag_sliders_bb(them));

        let occupied = self.occupied();
        let mut result = BitBoard(0);
        for sniper in snipers.iter_bits() {
            let blockers = MOVE_TABLES.between_bb(ksq, sniper) & occupied;
            if !blockers.more_than_one() {
                result |= blockers & *self.positions.get_side_bb(piece_color);
            }
        }
        result
    }

    /// Own pieces pinned against the given side's king.
    pub fn pinned_pieces(&self, side: Side) -> BitBoard {
        self.check_blockers(side, side)
    }

    /// Side-to-move pieces whose departure from a line discovers check
    /// against the opponent king.
    pub fn discovered_check_candidates(&self) -> BitBoard {
        self.check_blockers(self.stm, self.stm.flip())
    }

    #[inline(always)]
    pub fn castling_rook_square(&self, side: Side, kingside: bool) -> Square {
        self.castling_rooks[CastlingRights::right_index(side, kingside)]
    }

    /// True when a piece stands on the castling path of the given right.
    pub fn castling_impeded(&self, side: Side, kingside: bool) -> bool {
        let path = self.castling_paths[CastlingRights::right_index(side, kingside)];
        (path & self.occupied()).any()
    }

    /// Registers a castling right for `side` with the rook on `rook_from`,
    /// precomputing the empty-path mask and the per-square forfeit masks.
    pub(crate) fn set_castling_right(&mut self, side: Side, rook_from: Square) {
        let kfrom = self.king_square(side);
        let kingside = rook_from > kfrom;
        let right = CastlingRights::for_right(side, kingside);
        let index = CastlingRights::right_index(side, kingside);

        let kto = relative_square(side, if kingside { 6 } else { 2 }); // G1 / C1
        let rto = relative_square(side, if kingside { 5 } else { 3 }); // F1 / D1

        let span = |a: usize, b: usize| {
            MOVE_TABLES
                .between_bb(a, b)
                .or(BitBoard(1 << a))
                .or(BitBoard(1 << b))
        };
        let origins = kfrom.bb() | rook_from.bb();
        let path =
            (span(rook_from.index(), rto) | span(kfrom.index(), kto)) & !origins;

        self.castling_rights.add_right(right);
        self.castling_rooks[index] = rook_from;
        self.castling_paths[index] = path;
        self.castling_masks[kfrom.index()] |= CastlingRights::for_side(side).0;
        self.castling_masks[rook_from.index()] |= right.0;

        // Any placement away from the classical squares only works under
        // Chess960 rules.
        if kfrom.index() != relative_square(side, 4)
            || (rook_from.index() != relative_square(side, 0)
                && rook_from.index() != relative_square(side, 7))
        {
            self.chess960 = true;
        }
    }

    /// Whether a pseudo-legal move would leave the mover's king attacked.
    /// `pinned` must come from [`Board::pinned_pieces`] for the side to
    /// move. Castling transit squares are vetted at generation and pass
    /// here unchecked.
    pub fn is_legal(&self, m: Move, pinned: BitBoard) -> bool {
        let us = self.stm;
        let from = m.from_sq();
        let ksq = self.king_square(us);
        debug_assert!(
            self.positions.square_belongs_to(us, from.index()),
            "move origin holds no {us} piece"
        );

        if m.is_en_passant() {
            // Lift both pawns and re-scan the rays through our king; this
            // is the one capture that can expose it along the fifth rank.
            let to = m.to_sq();
            let capsq = to.get_neighbor(-us.up());
            let occupied = (self.occupied() ^ from.bb() ^ capsq.bb()) | to.bb();
            let them = us.flip();
            return (MOVE_TABLES.get_rook_attacks(ksq.index(), occupied)
                & self.positions.get_ortho_sliders_bb(them))
            .is_empty()
                && (MOVE_TABLES.get_bishop_attacks(ksq.index(), occupied)
                    & self.positions.get_diag_sliders_bb(them))
                .is_empty();
        }

        if from == ksq {
            return m.is_castling()
                || (self.attackers_to(m.to_sq().index(), self.occupied())
                    & *self.positions.get_side_bb(us.flip()))
                .is_empty();
        }

        !pinned.contains_square(from.index())
            || MOVE_TABLES.aligned(from.index(), m.to_sq().index(), ksq.index())
    }

    /// Whether a pseudo-legal move checks the opponent. Direct and
    /// discovered checks come straight off the metadata; promotions,
    /// en passant and castling rebuild the occupancy they change.
    pub fn gives_check(&self, m: Move, ci: &CheckInfo) -> bool {
        let us = self.stm;
        let from = m.from_sq();
        let to = m.to_sq();
        let Some((piece, side)) = self.positions.get_piece_at(&from) else {
            debug_assert!(false, "gives_check on empty origin {from}");
            return false;
        };
        debug_assert!(side == us);

        // Direct check
        if ci.check_squares[piece.index()].contains_square(to.index()) {
            return true;
        }

        // Discovered check
        if ci.dc_candidates.contains_square(from.index())
            && !MOVE_TABLES.aligned(from.index(), to.index(), ci.ksq.index())
        {
            return true;
        }

        match m.kind() {
            MoveKind::Normal => false,
            MoveKind::Promotion => {
                let occupied = self.occupied() ^ from.bb();
                MOVE_TABLES
                    .get_attacks(m.promotion(), to.index(), occupied)
                    .contains_square(ci.ksq.index())
            }
            MoveKind::EnPassant => {
                let capsq = to.get_neighbor(-us.up());
                let occupied = (self.occupied() ^ from.bb() ^ capsq.bb()) | to.bb();
                let ksq = ci.ksq.index();
                (MOVE_TABLES.get_rook_attacks(ksq, occupied)
                    & self.positions.get_ortho_sliders_bb(us))
                .any()
                    || (MOVE_TABLES.get_bishop_attacks(ksq, occupied)
                        & self.positions.get_diag_sliders_bb(us))
                    .any()
            }
            MoveKind::Castling => {
                let kfrom = from;
                let rfrom = to;
                let kingside = rfrom > kfrom;
                let kto = relative_square(us, if kingside { 6 } else { 2 });
                let rto = relative_square(us, if kingside { 5 } else { 3 });
                if !MOVE_TABLES
                    .get_rook_rays(rto)
                    .contains_square(ci.ksq.index())
                {
                    return false;
                }
                let occupied = (self.occupied() ^ kfrom.bb() ^ rfrom.bb())
                    | BitBoard(1 << kto)
                    | BitBoard(1 << rto);
                MOVE_TABLES
                    .get_rook_attacks(rto, occupied)
                    .contains_square(ci.ksq.index())
            }
        }
    }

    /// All fully legal moves in the position.
    pub fn generate_legal_moves(&self) -> MoveBuffer {
        move_gen::generate_legal(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  +------------------------+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let square = Square::from_index(rank * 8 + file);
                match self.positions.get_piece_at(&square) {
                    Some((piece, side)) => write!(f, " {} ", piece.icon(side))?,
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +------------------------+")?;
        writeln!(f, "    a  b  c  d  e  f  g  h")?;
        writeln!(f)?;
        writeln!(
            f,
            "{} to move | castling: {} | ep: {}",
            self.stm,
            self.castling_rights,
            format!("{}", self.enpassant_square).to_lowercase()
        )?;
        write!(f, "fen: {}", self.to_fen())
    }
}
