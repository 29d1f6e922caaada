use crate::{BitBoard, Piece, Side, moves::Direction};

/// Precomputed attack tables, built once at compile time.
///
/// Leaper moves (knight, king, pawn attacks) are direct lookups. Slider
/// attacks walk the eight empty-board ray tables and cut each ray at the
/// first occupied square, keeping that square (capture semantics; callers
/// mask own pieces out through their target bitboards).
#[derive(Debug)]
pub struct MoveTables {
    pub knight_moves: [BitBoard; 64],
    pub king_moves: [BitBoard; 64],
    /// Diagonal capture squares per side, indexed by [`Side::index`].
    pawn_attacks: [[BitBoard; 64]; 2],
    /// Empty-board rays in `COMPASS` order, origin square excluded.
    rays: [[BitBoard; 64]; 8],
}

pub const MOVE_TABLES: MoveTables = MoveTables::new();

const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];
const KING_OFFSETS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

// Index layout of the `rays` table
const COMPASS: [i8; 8] = [
    Direction::NORTH,
    Direction::SOUTH,
    Direction::EAST,
    Direction::WEST,
    Direction::NORTHEAST,
    Direction::SOUTHEAST,
    Direction::SOUTHWEST,
    Direction::NORTHWEST,
];
const N: usize = 0;
const S: usize = 1;
const E: usize = 2;
const W: usize = 3;
const NE: usize = 4;
const SE: usize = 5;
const SW: usize = 6;
const NW: usize = 7;

const fn compass_index(dir: i8) -> Option<usize> {
    match dir {
        Direction::NORTH => Some(N),
        Direction::SOUTH => Some(S),
        Direction::EAST => Some(E),
        Direction::WEST => Some(W),
        Direction::NORTHEAST => Some(NE),
        Direction::SOUTHEAST => Some(SE),
        Direction::SOUTHWEST => Some(SW),
        Direction::NORTHWEST => Some(NW),
        _ => None,
    }
}

/// Jump table for a fixed-offset piece. A jump that wraps around a board
/// edge shows up as an oversized file distance and is rejected.
const fn leaper_table(offsets: [i8; 8], max_file_span: i8) -> [BitBoard; 64] {
    let mut table = [BitBoard(0); 64];
    let mut from = 0;
    while from < 64 {
        let mut targets = BitBoard(0);
        let mut i = 0;
        while i < 8 {
            let to = from as i8 + offsets[i];
            if to >= 0 && to < 64 {
                let file_diff = (from as i8 % 8) - (to % 8);
                if file_diff.abs() <= max_file_span {
                    targets.set(to as usize);
                }
            }
            i += 1;
        }
        table[from] = targets;
        from += 1;
    }
    table
}

/// Walks one compass direction until the board edge, origin excluded.
const fn ray_from(square: usize, dir: i8) -> BitBoard {
    let mut ray = BitBoard(0);
    let mut step = BitBoard(1 << square).shift(dir);
    while step.any() {
        ray = ray.or(step);
        step = step.shift(dir);
    }
    ray
}

impl Default for MoveTables {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTables {
    pub const fn new() -> Self {
        let mut pawn_attacks = [[BitBoard(0); 64]; 2];
        let mut rays = [[BitBoard(0); 64]; 8];

        let mut from = 0;
        while from < 64 {
            let origin = BitBoard(1 << from);
            pawn_attacks[Side::White as usize][from] = origin
                .shift(Direction::NORTHEAST)
                .or(origin.shift(Direction::NORTHWEST));
            pawn_attacks[Side::Black as usize][from] = origin
                .shift(Direction::SOUTHEAST)
                .or(origin.shift(Direction::SOUTHWEST));

            let mut d = 0;
            while d < COMPASS.len() {
                rays[d][from] = ray_from(from, COMPASS[d]);
                d += 1;
            }

            from += 1;
        }

        Self {
            knight_moves: leaper_table(KNIGHT_OFFSETS, 2),
            king_moves: leaper_table(KING_OFFSETS, 1),
            pawn_attacks,
            rays,
        }
    }

    pub const fn get_ray(&self, from: usize, dir: i8) -> BitBoard {
        match compass_index(dir) {
            Some(i) => self.rays[i][from],
            None => BitBoard(0),
        }
    }

    /// Cuts a ray at the first occupied square, keeping that square.
    /// `forward` tells which end of the ray is nearest the origin.
    pub const fn ray_until_blocker(
        &self,
        ray: BitBoard,
        occupied: BitBoard,
        forward: bool,
    ) -> BitBoard {
        let blockers = ray.and(occupied);

        let maybe_blocker = if forward {
            blockers.const_lsb()
        } else {
            blockers.const_msb()
        };
        if let Some(index) = maybe_blocker {
            let blocker_mask = 1u64 << index;
            let mask_up_to_blocker = if forward {
                blocker_mask | (blocker_mask - 1)
            } else {
                !(blocker_mask - 1)
            };
            BitBoard(ray.0 & mask_up_to_blocker)
        } else {
            ray
        }
    }

    pub const fn get_rook_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.ray_until_blocker(self.rays[N][from], occupied, true)
            .or(self.ray_until_blocker(self.rays[S][from], occupied, false))
            .or(self.ray_until_blocker(self.rays[E][from], occupied, true))
            .or(self.ray_until_blocker(self.rays[W][from], occupied, false))
    }

    pub const fn get_bishop_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.ray_until_blocker(self.rays[NE][from], occupied, true)
            .or(self.ray_until_blocker(self.rays[NW][from], occupied, true))
            .or(self.ray_until_blocker(self.rays[SE][from], occupied, false))
            .or(self.ray_until_blocker(self.rays[SW][from], occupied, false))
    }

    pub const fn get_queen_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.get_rook_attacks(from, occupied)
            .or(self.get_bishop_attacks(from, occupied))
    }

    /// Empty-board rook rays, both orthogonal lines through the square.
    pub const fn get_rook_rays(&self, from: usize) -> BitBoard {
        self.rays[N][from]
            .or(self.rays[S][from])
            .or(self.rays[E][from])
            .or(self.rays[W][from])
    }

    /// Empty-board bishop rays, both diagonals through the square.
    pub const fn get_bishop_rays(&self, from: usize) -> BitBoard {
        self.rays[NE][from]
            .or(self.rays[NW][from])
            .or(self.rays[SE][from])
            .or(self.rays[SW][from])
    }

    pub const fn get_queen_rays(&self, from: usize) -> BitBoard {
        self.get_rook_rays(from).or(self.get_bishop_rays(from))
    }

    pub const fn get_pawn_attacks(&self, from: usize, side: Side) -> BitBoard {
        self.pawn_attacks[side.index()][from]
    }

    /// Attacks of a non-pawn piece from a square under the given occupancy.
    pub const fn get_attacks(&self, piece: Piece, from: usize, occupied: BitBoard) -> BitBoard {
        match piece {
            Piece::Knight => self.knight_moves[from],
            Piece::Bishop => self.get_bishop_attacks(from, occupied),
            Piece::Rook => self.get_rook_attacks(from, occupied),
            Piece::Queen => self.get_queen_attacks(from, occupied),
            Piece::King => self.king_moves[from],
            Piece::Pawn => BitBoard(0),
        }
    }

    /// Empty-board attacks of a non-pawn piece.
    pub const fn get_pseudo_attacks(&self, piece: Piece, from: usize) -> BitBoard {
        match piece {
            Piece::Knight => self.knight_moves[from],
            Piece::Bishop => self.get_bishop_rays(from),
            Piece::Rook => self.get_rook_rays(from),
            Piece::Queen => self.get_queen_rays(from),
            Piece::King => self.king_moves[from],
            Piece::Pawn => BitBoard(0),
        }
    }

    /// Squares strictly between two squares, empty when they share no line.
    pub const fn between_bb(&self, a: usize, b: usize) -> BitBoard {
        let dir = Direction::get_dir(a, b);
        if dir == 0 {
            return BitBoard(0);
        }
        self.get_ray(a, dir).and(self.get_ray(b, -dir))
    }

    /// The full line through two squares, from board edge to board edge,
    /// both endpoints included. Empty when they share no line.
    pub const fn line_bb(&self, a: usize, b: usize) -> BitBoard {
        let dir = Direction::get_dir(a, b);
        if dir == 0 {
            return BitBoard(0);
        }
        self.get_ray(a, dir)
            .or(self.get_ray(a, -dir))
            .or(BitBoard(1 << a))
    }

    /// True when three squares sit on one rank, file or diagonal.
    pub const fn aligned(&self, a: usize, b: usize, c: usize) -> bool {
        self.line_bb(a, b).contains_square(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::board::components::Square;

    fn sq(name: &str) -> usize {
        Square::from_str(name).unwrap().index()
    }

    #[test]
    fn knight_jumps_do_not_wrap_the_board() {
        assert_eq!(MOVE_TABLES.knight_moves[sq("A1")].pop_count(), 2);
        assert_eq!(MOVE_TABLES.knight_moves[sq("B1")].pop_count(), 3);
        assert_eq!(MOVE_TABLES.knight_moves[sq("H8")].pop_count(), 2);
        assert_eq!(MOVE_TABLES.knight_moves[sq("E4")].pop_count(), 8);
        assert!(MOVE_TABLES.knight_moves[sq("G1")].contains_square(sq("F3")));
        assert!(!MOVE_TABLES.knight_moves[sq("G1")].contains_square(sq("H4")));
    }

    #[test]
    fn king_steps_do_not_wrap_the_board() {
        assert_eq!(MOVE_TABLES.king_moves[sq("A1")].pop_count(), 3);
        assert_eq!(MOVE_TABLES.king_moves[sq("E1")].pop_count(), 5);
        assert_eq!(MOVE_TABLES.king_moves[sq("E4")].pop_count(), 8);
        assert!(!MOVE_TABLES.king_moves[sq("H4")].contains_square(sq("A5")));
    }

    #[test]
    fn pawn_attacks_point_the_right_way() {
        let white = MOVE_TABLES.get_pawn_attacks(sq("E4"), Side::White);
        assert!(white.contains_square(sq("D5")));
        assert!(white.contains_square(sq("F5")));

        let black = MOVE_TABLES.get_pawn_attacks(sq("E4"), Side::Black);
        assert!(black.contains_square(sq("D3")));
        assert!(black.contains_square(sq("F3")));

        // Edge files attack one square only
        assert_eq!(
            MOVE_TABLES
                .get_pawn_attacks(sq("A2"), Side::White)
                .pop_count(),
            1
        );
        assert_eq!(
            MOVE_TABLES
                .get_pawn_attacks(sq("H7"), Side::Black)
                .pop_count(),
            1
        );
    }

    #[test]
    fn rays_reach_the_edge_in_every_direction() {
        assert!(MOVE_TABLES.get_ray(sq("E4"), Direction::NORTHWEST).contains_square(sq("A8")));
        assert!(MOVE_TABLES.get_ray(sq("E4"), Direction::SOUTHEAST).contains_square(sq("H1")));
        assert!(MOVE_TABLES.get_ray(sq("E4"), Direction::NORTHEAST).contains_square(sq("H7")));
        assert!(MOVE_TABLES.get_ray(sq("E4"), Direction::SOUTHWEST).contains_square(sq("B1")));
        assert!(MOVE_TABLES.get_ray(sq("A1"), Direction::NORTHWEST).is_empty());
        assert_eq!(MOVE_TABLES.get_ray(sq("A1"), Direction::NORTH).pop_count(), 7);
        assert!(MOVE_TABLES.get_ray(sq("E4"), 0).is_empty(), "bad direction yields nothing");
    }

    #[test]
    fn rook_attacks_stop_at_the_first_blocker() {
        // Rook on A1, blocker on A4: file ray is A2-A4, rank ray is open
        let occupied = BitBoard(1 << sq("A4"));
        let attacks = MOVE_TABLES.get_rook_attacks(sq("A1"), occupied);
        assert!(attacks.contains_square(sq("A2")));
        assert!(attacks.contains_square(sq("A4")), "first blocker is kept");
        assert!(!attacks.contains_square(sq("A5")));
        assert!(attacks.contains_square(sq("H1")));
        assert_eq!(attacks.pop_count(), 3 + 7);
    }

    #[test]
    fn bishop_attacks_stop_at_the_first_blocker() {
        let occupied = BitBoard(1 << sq("C3") | 1 << sq("G7"));
        let attacks = MOVE_TABLES.get_bishop_attacks(sq("E5"), occupied);
        assert!(attacks.contains_square(sq("D4")));
        assert!(attacks.contains_square(sq("C3")));
        assert!(!attacks.contains_square(sq("B2")));
        assert!(attacks.contains_square(sq("G7")));
        assert!(!attacks.contains_square(sq("H8")));
    }

    #[test]
    fn between_and_line_share_a_diagonal() {
        let between = MOVE_TABLES.between_bb(sq("B2"), sq("F6"));
        assert_eq!(between.pop_count(), 3);
        assert!(between.contains_square(sq("C3")));
        assert!(between.contains_square(sq("E5")));
        assert!(!between.contains_square(sq("B2")));
        assert!(!between.contains_square(sq("F6")));

        assert!(MOVE_TABLES.between_bb(sq("B2"), sq("C4")).is_empty());
        assert!(MOVE_TABLES.between_bb(sq("E4"), sq("E5")).is_empty());

        let line = MOVE_TABLES.line_bb(sq("B2"), sq("F6"));
        assert!(line.contains_square(sq("A1")), "line runs to the edge");
        assert!(line.contains_square(sq("H8")));
        assert!(line.contains_square(sq("B2")));
        assert!(line.contains_square(sq("F6")));
        assert_eq!(line.pop_count(), 8);

        assert!(MOVE_TABLES.aligned(sq("A1"), sq("D4"), sq("H8")));
        assert!(!MOVE_TABLES.aligned(sq("A1"), sq("D4"), sq("E4")));
    }
}
