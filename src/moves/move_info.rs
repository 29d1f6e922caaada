use std::fmt::Display;

use crate::{Piece, Square};

/// How a move changes the board beyond sliding a piece.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(u16)]
pub enum MoveKind {
    #[default]
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

/// A move packed into 16 bits.
///
/// ```text
/// Bits:  15 14 | 13 12 | 11 .. 6 | 5 .. 0
///        promo |  kind |   to    |  from
/// ```
///
/// `promo` stores the promotion piece minus one (knight = 0 .. queen = 3)
/// and is zero for every other kind, so derived equality compares exactly
/// the (from, to, kind, promotion) tuple.
///
/// Castling is encoded as "king takes own rook": `from` is the king's
/// origin and `to` the castling rook's origin. That stays unambiguous in
/// Chess960, where the king's destination square may be occupied or equal
/// to its origin. Kingside castling iff `to > from`.
///
/// En passant carries the en-passant square as `to`; the captured pawn
/// stands one push behind it.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// Null sentinel, never produced by generation.
    pub const NONE: Move = Move(0);

    const SQ_MASK: u16 = 0x3F;
    const KIND_SHIFT: u16 = 12;
    const PROMO_SHIFT: u16 = 14;

    #[inline(always)]
    const fn encode(from: Square, to: Square, kind: MoveKind, promo_bits: u16) -> Self {
        debug_assert!(from.is_some() && to.is_some());
        Self(
            from.index() as u16
                | (to.index() as u16) << 6
                | (kind as u16) << Self::KIND_SHIFT
                | promo_bits << Self::PROMO_SHIFT,
        )
    }

    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveKind::Normal, 0)
    }

    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, promotion: Piece) -> Self {
        debug_assert!(matches!(
            promotion,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        ));
        Self::encode(
            from,
            to,
            MoveKind::Promotion,
            (promotion.index() - 1) as u16,
        )
    }

    #[inline(always)]
    pub const fn new_en_passant(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveKind::EnPassant, 0)
    }

    #[inline(always)]
    pub const fn new_castling(king_from: Square, rook_from: Square) -> Self {
        Self::encode(king_from, rook_from, MoveKind::Castling, 0)
    }

    #[inline(always)]
    pub const fn from_sq(&self) -> Square {
        Square::from_index((self.0 & Self::SQ_MASK) as usize)
    }

    #[inline(always)]
    pub const fn to_sq(&self) -> Square {
        Square::from_index((self.0 >> 6 & Self::SQ_MASK) as usize)
    }

    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        match self.0 >> Self::KIND_SHIFT & 0b11 {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// The promotion piece. Meaningful only when `kind()` is
    /// [`MoveKind::Promotion`]; reads as a knight otherwise.
    #[inline(always)]
    pub const fn promotion(&self) -> Piece {
        Piece::from_index((self.0 >> Self::PROMO_SHIFT) as usize + 1)
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline(always)]
    pub const fn is_castling(&self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    /// Coordinate notation on the raw encoding, lowercase. Castling comes
    /// out in the king-takes-rook form used by Chess960 interfaces.
    pub fn uci(&self) -> String {
        let mut out = format!("{}{}", self.from_sq(), self.to_sq()).to_lowercase();
        if self.is_promotion() {
            out.push(
                Piece::PIECE_CHARS[1][self.promotion().index()], // lowercase set
            );
        }
        out
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            MoveKind::Castling => {
                if self.to_sq() > self.from_sq() {
                    write!(f, "O-O")
                } else {
                    write!(f, "O-O-O")
                }
            }
            MoveKind::Promotion => write!(
                f,
                "{}{}={}",
                self.from_sq(),
                self.to_sq(),
                Piece::PIECE_CHARS[0][self.promotion().index()]
            ),
            _ => write!(f, "{}{}", self.from_sq(), self.to_sq()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    #[test]
    fn test_normal_round_trip() {
        let m = Move::new(sq("E2"), sq("E4"));
        assert_eq!(m.from_sq(), sq("E2"));
        assert_eq!(m.to_sq(), sq("E4"));
        assert_eq!(m.kind(), MoveKind::Normal);
        assert!(!m.is_promotion());
        assert!(!m.is_en_passant());
        assert!(!m.is_castling());
    }

    #[test]
    fn test_promotion_round_trip() {
        for promo in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            let m = Move::new_promotion(sq("B7"), sq("A8"), promo);
            assert_eq!(m.from_sq(), sq("B7"));
            assert_eq!(m.to_sq(), sq("A8"));
            assert_eq!(m.kind(), MoveKind::Promotion);
            assert_eq!(m.promotion(), promo, "promotion piece survives encoding");
        }
    }

    #[test]
    fn test_en_passant_round_trip() {
        let m = Move::new_en_passant(sq("E5"), sq("D6"));
        assert_eq!(m.from_sq(), sq("E5"));
        assert_eq!(m.to_sq(), sq("D6"));
        assert_eq!(m.kind(), MoveKind::EnPassant);
    }

    #[test]
    fn test_castling_round_trip() {
        let kingside = Move::new_castling(sq("E1"), sq("H1"));
        assert_eq!(kingside.from_sq(), sq("E1"));
        assert_eq!(kingside.to_sq(), sq("H1"), "destination is the rook square");
        assert_eq!(kingside.kind(), MoveKind::Castling);

        let queenside = Move::new_castling(sq("E8"), sq("A8"));
        assert_eq!(queenside.to_sq(), sq("A8"));
    }

    #[test]
    fn test_equality_is_field_equality() {
        assert_eq!(Move::new(sq("G1"), sq("F3")), Move::new(sq("G1"), sq("F3")));
        assert_ne!(Move::new(sq("G1"), sq("F3")), Move::new(sq("G1"), sq("H3")));
        assert_ne!(
            Move::new(sq("E7"), sq("E8")),
            Move::new_promotion(sq("E7"), sq("E8"), Piece::Queen),
            "kind participates in equality"
        );
        assert_ne!(
            Move::new_promotion(sq("E7"), sq("E8"), Piece::Queen),
            Move::new_promotion(sq("E7"), sq("E8"), Piece::Knight),
        );
    }

    #[test]
    fn test_display_and_uci() {
        assert_eq!(format!("{}", Move::new(sq("E2"), sq("E4"))), "E2E4");
        assert_eq!(
            format!("{}", Move::new_promotion(sq("A7"), sq("A8"), Piece::Rook)),
            "A7A8=R"
        );
        assert_eq!(format!("{}", Move::new_castling(sq("E1"), sq("H1"))), "O-O");
        assert_eq!(
            format!("{}", Move::new_castling(sq("E1"), sq("A1"))),
            "O-O-O"
        );

        assert_eq!(Move::new(sq("E2"), sq("E4")).uci(), "e2e4");
        assert_eq!(
            Move::new_promotion(sq("H2"), sq("G1"), Piece::Knight).uci(),
            "h2g1n"
        );
    }
}
