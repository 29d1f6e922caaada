use miette::Context;

use super::relative_square;
use crate::prelude::*;

/// Undo record returned by [`Board::make_move`]. Holds the move itself
/// plus every field the move clobbers irreversibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInfo {
    pub mv: Move,
    /// Piece removed from the board, if any. For en passant this is the
    /// pawn behind the target square.
    pub captured: Option<Piece>,
    pub castling_rights: CastlingRights,
    pub enpassant_square: Square,
    pub halfmove_clock: u8,
    pub fullmove_counter: u16,
}

impl Board {
    /// Applies a move for the side to move and flips the turn.
    ///
    /// The move must be pseudo-legal for the current position; legality
    /// (king safety) is the generator's concern. Returns the undo record
    /// for [`Board::unmake_move`].
    pub fn make_move(&mut self, m: Move) -> miette::Result<MoveInfo> {
        let us = self.stm;
        let them = us.flip();
        let from = m.from_sq();
        let to = m.to_sq();
        let (piece, side) = self
            .positions
            .get_piece_at(&from)
            .with_context(|| format!("no piece on {from} to move"))?;
        miette::ensure!(
            side == us,
            "piece on {from} belongs to {side}, but {us} is to move"
        );

        let mut info = MoveInfo {
            mv: m,
            captured: None,
            castling_rights: self.castling_rights,
            enpassant_square: self.enpassant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_counter: self.fullmove_counter,
        };

        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        self.enpassant_square = Square::NONE;

        match m.kind() {
            MoveKind::Castling => {
                // King and rook may cross or land on each other's origin
                // in Chess960, so lift both before placing either.
                let kingside = to > from;
                let kto = relative_square(us, if kingside { 6 } else { 2 });
                let rto = relative_square(us, if kingside { 5 } else { 3 });
                self.positions.remove_piece(us, Piece::King, from.index())?;
                self.positions.remove_piece(us, Piece::Rook, to.index())?;
                self.positions.set(us, Piece::King, kto)?;
                self.positions.set(us, Piece::Rook, rto)?;
            }
            MoveKind::EnPassant => {
                let capsq = to.get_neighbor(-us.up());
                self.positions
                    .remove_piece(them, Piece::Pawn, capsq.index())
                    .with_context(|| format!("en passant with no pawn on {capsq}"))?;
                self.positions.move_piece(from, to)?;
                info.captured = Some(Piece::Pawn);
                self.halfmove_clock = 0;
            }
            MoveKind::Promotion => {
                if let Some((victim, victim_side)) = self.positions.get_piece_at(&to) {
                    miette::ensure!(
                        victim_side == them,
                        "promotion on {to} would capture own {victim}"
                    );
                    self.positions.remove_piece(them, victim, to.index())?;
                    info.captured = Some(victim);
                }
                self.positions.remove_piece(us, Piece::Pawn, from.index())?;
                self.positions.set(us, m.promotion(), to.index())?;
                self.halfmove_clock = 0;
            }
            MoveKind::Normal => {
                if let Some((victim, victim_side)) = self.positions.get_piece_at(&to) {
                    miette::ensure!(
                        victim_side == them,
                        "move to {to} would capture own {victim}"
                    );
                    self.positions.remove_piece(them, victim, to.index())?;
                    info.captured = Some(victim);
                    self.halfmove_clock = 0;
                }
                self.positions.move_piece(from, to)?;
                if piece == Piece::Pawn {
                    self.halfmove_clock = 0;
                    let up = us.up();
                    if to.index() as i8 - from.index() as i8 == 2 * up {
                        // Record the skipped square only when an enemy pawn
                        // can actually capture onto it.
                        let ep = from.get_neighbor(up);
                        let capturers = MOVE_TABLES.get_pawn_attacks(ep.index(), us)
                            & *self.positions.get_piece_bb(them, Piece::Pawn);
                        if capturers.any() {
                            self.enpassant_square = ep;
                        }
                    }
                }
            }
        }

        let forfeited = self.castling_masks[from.index()] | self.castling_masks[to.index()];
        self.castling_rights
            .remove_right(&CastlingRights(forfeited));

        if us == Side::Black {
            self.fullmove_counter += 1;
        }
        self.stm = them;
        Ok(info)
    }

    /// Reverts the most recent [`Board::make_move`] given its undo record.
    pub fn unmake_move(&mut self, info: &MoveInfo) -> miette::Result<()> {
        let m = info.mv;
        let us = self.stm.flip();
        let them = self.stm;
        let from = m.from_sq();
        let to = m.to_sq();

        match m.kind() {
            MoveKind::Castling => {
                let kingside = to > from;
                let kto = relative_square(us, if kingside { 6 } else { 2 });
                let rto = relative_square(us, if kingside { 5 } else { 3 });
                self.positions.remove_piece(us, Piece::King, kto)?;
                self.positions.remove_piece(us, Piece::Rook, rto)?;
                self.positions.set(us, Piece::King, from.index())?;
                self.positions.set(us, Piece::Rook, to.index())?;
            }
            MoveKind::EnPassant => {
                self.positions.move_piece(to, from)?;
                let capsq = to.get_neighbor(-us.up());
                self.positions.set(them, Piece::Pawn, capsq.index())?;
            }
            MoveKind::Promotion => {
                self.positions
                    .remove_piece(us, m.promotion(), to.index())?;
                if let Some(victim) = info.captured {
                    self.positions.set(them, victim, to.index())?;
                }
                self.positions.set(us, Piece::Pawn, from.index())?;
            }
            MoveKind::Normal => {
                self.positions.move_piece(to, from)?;
                if let Some(victim) = info.captured {
                    self.positions.set(them, victim, to.index())?;
                }
            }
        }

        self.stm = us;
        self.castling_rights = info.castling_rights;
        self.enpassant_square = info.enpassant_square;
        self.halfmove_clock = info.halfmove_clock;
        self.fullmove_counter = info.fullmove_counter;
        Ok(())
    }
}
