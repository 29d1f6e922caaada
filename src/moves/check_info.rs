use crate::prelude::*;

/// Check-related data for the side to move, computed once per position
/// and shared across a generation pass.
///
/// `check_squares[p]` holds the squares from which a piece of type `p`
/// would attack the opponent king under the current occupancy. The king
/// entry stays empty; a king can never give check by itself.
#[derive(Debug, Clone, Copy)]
pub struct CheckInfo {
    /// Squares that deliver check, indexed by [`Piece::index`].
    pub check_squares: [BitBoard; NUM_PIECES],
    /// Side-to-move pieces whose departure discovers check.
    pub dc_candidates: BitBoard,
    /// Opponent king square.
    pub ksq: Square,
}

impl CheckInfo {
    pub fn new(board: &Board) -> Self {
        let them = board.stm.flip();
        let ksq = board.king_square(them);
        let occupied = board.occupied();

        let mut check_squares = [BitBoard(0); NUM_PIECES];
        check_squares[Piece::pawn()] = MOVE_TABLES.get_pawn_attacks(ksq.index(), them);
        check_squares[Piece::knight()] = MOVE_TABLES.knight_moves[ksq.index()];
        check_squares[Piece::bishop()] = MOVE_TABLES.get_bishop_attacks(ksq.index(), occupied);
        check_squares[Piece::rook()] = MOVE_TABLES.get_rook_attacks(ksq.index(), occupied);
        check_squares[Piece::queen()] =
            check_squares[Piece::bishop()] | check_squares[Piece::rook()];

        Self {
            check_squares,
            dc_candidates: board.discovered_check_candidates(),
            ksq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init;

    #[test]
    fn check_squares_point_at_the_enemy_king() {
        init();
        let board = Board::new();
        let ci = CheckInfo::new(&board);

        assert_eq!(ci.ksq, Square::from_index(60), "black king starts on e8");
        // A white knight checks from d6 or f6.
        assert!(ci.check_squares[Piece::knight()].contains_square(43));
        assert!(ci.check_squares[Piece::knight()].contains_square(45));
        // No square on the board checks with a king.
        assert!(ci.check_squares[Piece::king()].is_empty());
        // Sliders are walled in by the black pawns.
        assert_eq!(
            ci.check_squares[Piece::rook()],
            MOVE_TABLES.get_rook_attacks(60, board.occupied())
        );
        assert!(ci.dc_candidates.is_empty());
    }

    #[test]
    fn pawn_check_squares_use_the_defender_perspective() {
        init();
        // White to move: a white pawn on d7 or f7 would check the king on e8.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let ci = CheckInfo::new(&board);
        assert!(ci.check_squares[Piece::pawn()].contains_square(51));
        assert!(ci.check_squares[Piece::pawn()].contains_square(53));
        assert_eq!(ci.check_squares[Piece::pawn()].pop_count(), 2);
    }

    #[test]
    fn dc_candidates_sees_own_screen_piece() {
        init();
        // Knight on d5 screens the b3 bishop's diagonal to the king on f7.
        let board = Board::from_fen("8/5k2/8/3N4/8/1B6/8/4K3 w - - 0 1");
        let ci = CheckInfo::new(&board);
        assert!(
            ci.dc_candidates.contains_square(35),
            "knight on d5 is a discovered-check candidate"
        );
        assert_eq!(ci.dc_candidates.pop_count(), 1);
    }
}
