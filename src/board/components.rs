use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::prelude::*;

/// Sixty-four squares in one machine word, bit 0 = A1, bit 63 = H8.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(transparent)]
pub struct BitBoard(pub u64);

impl BitBoard {
    pub const EMPTY: Self = Self(0);

    #[inline(always)]
    pub const fn set(&mut self, pos: usize) {
        self.0 |= 1 << pos;
    }

    #[inline(always)]
    pub const fn capture(&mut self, index: usize) {
        self.0 &= !(1 << index);
    }

    #[inline(always)]
    pub fn pop_count(&self) -> u32 {
        #[cfg(all(target_arch = "x86_64", target_feature = "popcnt"))]
        {
            unsafe { std::arch::x86_64::_popcnt64(self.0 as i64) as u32 }
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "popcnt")))]
        {
            self.0.count_ones()
        }
    }

    /// True when at least two bits are set.
    #[inline(always)]
    pub const fn more_than_one(&self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Lowest set bit, usable in const contexts.
    #[inline(always)]
    pub const fn const_lsb(&self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        Some(self.0.trailing_zeros() as u64)
    }

    /// Highest set bit, usable in const contexts.
    #[inline(always)]
    pub const fn const_msb(&self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        Some(63 - self.0.leading_zeros() as u64)
    }

    /// Clears and returns the lowest set bit, or `None` on an empty board.
    #[inline(always)]
    pub fn try_pop_lsb(&mut self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as u64;
        #[cfg(all(target_arch = "x86_64", target_feature = "bmi1"))]
        {
            self.0 = unsafe { std::arch::x86_64::_blsr_u64(self.0) };
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi1")))]
        {
            self.0 &= self.0 - 1;
        }
        Some(bit)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn any(&self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    pub const fn iter_bits(&self) -> BitBoardIterator {
        BitBoardIterator { bits: self.0 }
    }

    #[inline(always)]
    pub const fn or(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }

    #[inline(always)]
    pub const fn and(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }

    #[inline(always)]
    pub const fn contains_square(&self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Slides every bit one step along `dir`, dropping bits that would wrap
    /// past the A or H file.
    #[inline(always)]
    pub const fn shift(self, dir: i8) -> Self {
        const OFF_A: u64 = !FILE_MASKS[0];
        const OFF_H: u64 = !FILE_MASKS[7];
        Self(match dir {
            Direction::NORTH => self.0 << 8,
            Direction::SOUTH => self.0 >> 8,
            Direction::EAST => (self.0 & OFF_H) << 1,
            Direction::WEST => (self.0 & OFF_A) >> 1,
            Direction::NORTHEAST => (self.0 & OFF_H) << 9,
            Direction::NORTHWEST => (self.0 & OFF_A) << 7,
            Direction::SOUTHEAST => (self.0 & OFF_H) >> 7,
            Direction::SOUTHWEST => (self.0 & OFF_A) >> 9,
            _ => 0,
        })
    }
}

/// Yields the index of every set bit, lowest first.
pub struct BitBoardIterator {
    bits: u64,
}

impl Iterator for BitBoardIterator {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        #[cfg(all(target_arch = "x86_64", target_feature = "bmi1"))]
        {
            self.bits = unsafe { std::arch::x86_64::_blsr_u64(self.bits) };
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi1")))]
        {
            self.bits &= self.bits - 1;
        }
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }

    fn count(self) -> usize {
        self.bits.count_ones() as usize
    }
}

impl ExactSizeIterator for BitBoardIterator {
    fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

impl BitAnd for BitBoard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for BitBoard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for BitBoard {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for BitBoard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl BitAndAssign for BitBoard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for BitBoard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for BitBoard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub const SIDES: [Side; 2] = [Side::White, Side::Black];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub const fn flip(&self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Direction pawns of this side advance.
    pub const fn up(&self) -> i8 {
        match self {
            Side::White => Direction::NORTH,
            Side::Black => Direction::SOUTH,
        }
    }

    /// Row holding this side's pieces at the start of the game.
    pub const fn back_rank(&self) -> usize {
        self.index() * 7
    }
}

impl Not for Side {
    type Output = Side;
    fn not(self) -> Side {
        self.flip()
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::White => "White",
            Side::Black => "Black",
        })
    }
}

#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub enum Piece {
    #[default]
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const PIECES: [Piece; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// FEN letters indexed by `[side][piece]`.
    pub const PIECE_CHARS: [[char; 6]; 2] = [
        ['P', 'N', 'B', 'R', 'Q', 'K'],
        ['p', 'n', 'b', 'r', 'q', 'k'],
    ];

    /// Every `(piece, side)` pair, white pieces first.
    pub fn all() -> impl Iterator<Item = (Piece, Side)> {
        Side::SIDES
            .into_iter()
            .flat_map(|side| Self::PIECES.into_iter().map(move |piece| (piece, side)))
    }

    pub fn all_pieces() -> impl Iterator<Item = Piece> {
        Self::PIECES.into_iter()
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Inverse of [`Piece::index`]. Indices past the king fold to the king.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Piece {
        match index {
            0 => Self::Pawn,
            1 => Self::Knight,
            2 => Self::Bishop,
            3 => Self::Rook,
            4 => Self::Queen,
            _ => Self::King,
        }
    }

    pub const fn pawn() -> usize {
        Self::Pawn as usize
    }
    pub const fn knight() -> usize {
        Self::Knight as usize
    }
    pub const fn bishop() -> usize {
        Self::Bishop as usize
    }
    pub const fn rook() -> usize {
        Self::Rook as usize
    }
    pub const fn queen() -> usize {
        Self::Queen as usize
    }
    pub const fn king() -> usize {
        Self::King as usize
    }

    #[inline(always)]
    pub const fn is_slider(&self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }

    /// Glyph for the pretty printer. White gets the filled set.
    pub fn icon(&self, stm: Side) -> char {
        const GLYPHS: [[char; 6]; 2] = [
            ['♟', '♞', '♝', '♜', '♛', '♚'],
            ['♙', '♘', '♗', '♖', '♕', '♔'],
        ];
        GLYPHS[stm.index()][self.index()]
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        })
    }
}

/// A piece together with its owner, as stored in the mailbox.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub struct PieceInfo {
    pub piece: Piece,
    pub side: Side,
}

impl PieceInfo {
    pub fn new(piece: Piece, side: Side) -> Self {
        Self { piece, side }
    }
}

/// Piece placement half of a position: twelve per-piece boards, two side
/// occupancy boards and a mailbox, mutated in lockstep.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub struct BoardState {
    side_bbs: [BitBoard; 2],
    piece_bbs: [[BitBoard; 6]; 2],
    mailbox: [Option<PieceInfo>; 64],
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            side_bbs: [BitBoard::EMPTY; 2],
            piece_bbs: [[BitBoard::EMPTY; 6]; 2],
            mailbox: [None; 64],
        }
    }
}

impl BoardState {
    #[inline(always)]
    pub const fn get_piece_bb(&self, side: Side, piece: Piece) -> &BitBoard {
        &self.piece_bbs[side.index()][piece.index()]
    }

    #[inline(always)]
    pub const fn get_side_bb(&self, side: Side) -> &BitBoard {
        &self.side_bbs[side.index()]
    }

    /// Rooks and queens of one side, the pieces that attack along ranks
    /// and files.
    #[inline(always)]
    pub const fn get_ortho_sliders_bb(&self, side: Side) -> BitBoard {
        let s = side.index();
        self.piece_bbs[s][Piece::rook()].or(self.piece_bbs[s][Piece::queen()])
    }

    /// Bishops and queens of one side.
    #[inline(always)]
    pub const fn get_diag_sliders_bb(&self, side: Side) -> BitBoard {
        let s = side.index();
        self.piece_bbs[s][Piece::bishop()].or(self.piece_bbs[s][Piece::queen()])
    }

    #[inline(always)]
    pub const fn square_belongs_to(&self, side: Side, square: usize) -> bool {
        self.side_bbs[side.index()].contains_square(square)
    }

    #[inline(always)]
    pub const fn is_occupied(&self, square: usize) -> bool {
        self.side_bbs[0].contains_square(square) || self.side_bbs[1].contains_square(square)
    }

    #[inline(always)]
    pub fn get_piece_at(&self, square: &Square) -> Option<(Piece, Side)> {
        self.mailbox[square.index()].map(|info| (info.piece, info.side))
    }

    #[inline(always)]
    pub fn get_occupied_bb(&self) -> BitBoard {
        self.side_bbs[0] | self.side_bbs[1]
    }

    /// Places a piece on an empty square.
    pub fn set(&mut self, side: Side, piece: Piece, square: usize) -> miette::Result<()> {
        miette::ensure!(
            self.mailbox[square].is_none(),
            "square {} is already occupied",
            Square::from(square)
        );
        self.piece_bbs[side.index()][piece.index()].set(square);
        self.side_bbs[side.index()].set(square);
        self.mailbox[square] = Some(PieceInfo::new(piece, side));
        Ok(())
    }

    /// Lifts a piece off the board.
    pub fn remove_piece(&mut self, side: Side, piece: Piece, square: usize) -> miette::Result<()> {
        miette::ensure!(
            self.mailbox[square].is_some(),
            "no {piece} to remove on {}",
            Square::from(square)
        );
        self.piece_bbs[side.index()][piece.index()].capture(square);
        self.side_bbs[side.index()].capture(square);
        self.mailbox[square] = None;
        Ok(())
    }

    /// Relocates a piece between two squares. The destination must be
    /// empty, captures are the caller's business.
    pub fn move_piece(&mut self, from: Square, to: Square) -> miette::Result<()> {
        let info = self.mailbox[from.index()]
            .with_context(|| format!("no piece on {from} to move"))?;
        miette::ensure!(
            self.mailbox[to.index()].is_none(),
            "cannot move {} onto occupied square {to}",
            info.piece
        );
        let side = info.side.index();
        self.piece_bbs[side][info.piece.index()].capture(from.index());
        self.piece_bbs[side][info.piece.index()].set(to.index());
        self.side_bbs[side].capture(from.index());
        self.side_bbs[side].set(to.index());
        self.mailbox[to.index()] = self.mailbox[from.index()].take();
        Ok(())
    }

    /// Piece placement field of a FEN record, eighth rank first.
    pub fn to_fen_pieces(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut run = 0;
            for file in 0..8 {
                match self.mailbox[rank * 8 + file] {
                    Some(info) => {
                        if run > 0 {
                            out.push_str(&run.to_string());
                            run = 0;
                        }
                        out.push(Piece::PIECE_CHARS[info.side.index()][info.piece.index()]);
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                out.push_str(&run.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}

/// One bit per castling right: bit 0 white kingside, bit 1 white queenside,
/// bit 2 black kingside, bit 3 black queenside.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(transparent)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NO_CASTLING: u8 = 0;
    pub const WHITE_00: u8 = 0b0001;
    pub const WHITE_000: u8 = 0b0010;
    pub const BLACK_00: u8 = 0b0100;
    pub const BLACK_000: u8 = 0b1000;

    pub const WHITE_CASTLING: Self = Self(Self::WHITE_00 | Self::WHITE_000);
    pub const BLACK_CASTLING: Self = Self(Self::BLACK_00 | Self::BLACK_000);
    pub const ANY_CASTLING: Self = Self(Self::WHITE_CASTLING.0 | Self::BLACK_CASTLING.0);

    /// Flat index of one right, matching the bit layout above. Usable for
    /// per-right bookkeeping tables.
    #[inline(always)]
    pub const fn right_index(side: Side, kingside: bool) -> usize {
        side.index() * 2 + if kingside { 0 } else { 1 }
    }

    /// Mask holding exactly one right.
    #[inline(always)]
    pub const fn for_right(side: Side, kingside: bool) -> Self {
        Self(1 << Self::right_index(side, kingside))
    }

    /// Both rights of one side.
    #[inline(always)]
    pub const fn for_side(side: Side) -> Self {
        match side {
            Side::White => Self::WHITE_CASTLING,
            Side::Black => Self::BLACK_CASTLING,
        }
    }

    #[inline(always)]
    pub const fn all() -> Self {
        Self::ANY_CASTLING
    }

    #[inline(always)]
    pub const fn empty() -> Self {
        Self(Self::NO_CASTLING)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == Self::NO_CASTLING
    }

    #[inline(always)]
    pub const fn add_right(&mut self, rights: CastlingRights) {
        self.0 |= rights.0;
    }

    #[inline(always)]
    pub const fn remove_right(&mut self, rights: &CastlingRights) {
        self.0 &= !rights.0;
    }

    #[inline(always)]
    pub const fn allows(&self, rights: CastlingRights) -> bool {
        self.0 & rights.0 != Self::NO_CASTLING
    }

    #[inline(always)]
    pub const fn can_castle(&self, side: Side, kingside: bool) -> bool {
        self.allows(Self::for_right(side, kingside))
    }

    /// True when the given side still has either right.
    #[inline(always)]
    pub const fn can_castle_side(&self, side: Side) -> bool {
        self.allows(Self::for_side(side))
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::empty()
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let letters = [
            (Self::WHITE_00, 'K'),
            (Self::WHITE_000, 'Q'),
            (Self::BLACK_00, 'k'),
            (Self::BLACK_000, 'q'),
        ];
        for (bit, letter) in letters {
            if self.allows(Self(bit)) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Board square as a little-endian rank-file index: A1 is 0, B1 is 1,
/// A2 is 8 and H8 is 63.
///
/// [`Square::NONE`] sits just past the board and stands for "no square",
/// mainly the empty en-passant slot.
#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Square(usize);

impl Square {
    /// Sentinel for "no square". Never a valid board index.
    pub const NONE: Square = Square(64);

    /// Checked constructor, `None` for indices past 63.
    #[inline(always)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < 64 {
            return Some(Self(index));
        }
        None
    }

    /// Unchecked const constructor for indices already known to be on the
    /// board.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Builds the target square of an en-passant capture from its FEN
    /// coordinates. Only the third and sixth ranks qualify.
    pub fn enpassant_from_index(file: char, rank: char) -> miette::Result<Self> {
        let file = file.to_ascii_lowercase();
        miette::ensure!(
            ('a'..='h').contains(&file),
            "en passant file {file} is not in a..=h"
        );
        miette::ensure!(
            rank == '3' || rank == '6',
            "en passant rank {rank} must be 3 or 6"
        );
        let col = file as usize - 'a' as usize;
        let row = if rank == '3' { 2 } else { 5 };
        Ok(Self(row * 8 + col))
    }

    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        self.0 >= 64
    }

    #[inline(always)]
    pub const fn is_some(&self) -> bool {
        self.0 < 64
    }

    /// Square one step along `dir`. The caller keeps it on the board.
    #[inline(always)]
    pub const fn get_neighbor(&self, dir: i8) -> Square {
        Self((self.0 as i8 + dir) as usize)
    }

    #[inline(always)]
    pub const fn row(&self) -> usize {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn col(&self) -> usize {
        self.0 % 8
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub const fn bb(&self) -> BitBoard {
        BitBoard(1 << self.0)
    }
}

impl From<usize> for Square {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl FromStr for Square {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        miette::ensure!(
            bytes.len() == 2,
            "square notation needs a file letter and a rank digit"
        );
        let file = bytes[0].to_ascii_uppercase().wrapping_sub(b'A');
        let rank = bytes[1].wrapping_sub(b'1');
        miette::ensure!(file < 8 && rank < 8, "{s} is off the board");
        Ok(Self((8 * rank + file) as usize))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }
        let file = b'A' + (self.0 % 8) as u8;
        let rank = b'1' + (self.0 / 8) as u8;
        write!(f, "{}{}", file as char, rank as char)
    }
}
