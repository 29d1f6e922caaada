use std::{array, iter, ops::Index, slice};

use crate::{consts::MAX_MOVES, prelude::Move};

/// Inline, fixed-capacity move list. Generation appends to one of these
/// instead of allocating; 256 slots covers any reachable position.
#[derive(Clone, Copy, Debug)]
pub struct MoveBuffer {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveBuffer {
    pub const fn new() -> Self {
        Self {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    pub const fn push(&mut self, m: Move) {
        debug_assert!(self.len < MAX_MOVES, "move buffer overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub const fn clear(&mut self) {
        self.len = 0;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Removes the move at `index` by swapping the last move into its
    /// place. Order is not preserved. This is how the legal filter
    /// compacts a pseudo-legal list without shifting the tail.
    pub const fn swap_remove(&mut self, index: usize) -> Move {
        debug_assert!(index < self.len, "swap_remove out of bounds");
        let removed = self.moves[index];
        self.len -= 1;
        self.moves[index] = self.moves[self.len];
        removed
    }

    pub fn iter(&self) -> slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveBuffer {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len, "MoveBuffer index out of bounds");
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveBuffer {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MoveBuffer {
    type Item = Move;
    type IntoIter = iter::Take<array::IntoIter<Move, MAX_MOVES>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter().take(self.len)
    }
}
